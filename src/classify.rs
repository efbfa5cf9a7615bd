use std::fmt;

use crate::color::{Color, Palette};
use crate::reddit::Submission;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png"];
const IMAGE_HOSTS: &[&str] = &["imgur", "imageshack", "photobucket", "beeimg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTag {
    Post,
    Pic,
    Album,
    Video,
    Nsfw,
}

impl LinkTag {
    pub fn label(self) -> &'static str {
        match self {
            LinkTag::Post => "[POST]",
            LinkTag::Pic => "[PIC]",
            LinkTag::Album => "[ALBUM]",
            LinkTag::Video => "[VIDEO]",
            LinkTag::Nsfw => "[NSFW]",
        }
    }

    pub fn color(self) -> Color {
        match self {
            LinkTag::Post => Color::Info,
            LinkTag::Pic | LinkTag::Album | LinkTag::Video => Color::OkGreen,
            LinkTag::Nsfw => Color::Fail,
        }
    }
}

impl fmt::Display for LinkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tags a submission with at most one content type, then NSFW if flagged.
pub fn classify(submission: &Submission) -> Vec<LinkTag> {
    let mut tags = Vec::with_capacity(2);

    if let Some(primary) = primary_tag(submission) {
        tags.push(primary);
    }
    if submission.over_18 {
        tags.push(LinkTag::Nsfw);
    }

    tags
}

fn primary_tag(submission: &Submission) -> Option<LinkTag> {
    if submission.url == submission.permalink {
        Some(LinkTag::Post)
    } else if is_image_url(&submission.url) {
        Some(LinkTag::Pic)
    } else if is_image_host(&submission.domain) {
        Some(LinkTag::Album)
    } else if submission.media.is_some() {
        Some(LinkTag::Video)
    } else {
        None
    }
}

fn is_image_url(url: &str) -> bool {
    let extension = url.rsplit('.').next().unwrap_or(url).to_lowercase();
    IMAGE_EXTENSIONS.contains(&extension.as_str())
}

// Albums are usually hosted on a bare image site, so only the name just
// before the TLD matters ("i.imgur.com" -> "imgur").
fn is_image_host(domain: &str) -> bool {
    let segments: Vec<&str> = domain.split('.').collect();
    if segments.len() < 2 {
        return false;
    }
    let host = segments[segments.len() - 2].to_lowercase();
    IMAGE_HOSTS.contains(&host.as_str())
}

/// Renders each tag in its own color, separated by single spaces.
pub fn render_tags(tags: &[LinkTag], palette: Palette) -> String {
    tags.iter()
        .map(|tag| palette.paint(tag.color(), tag.label()))
        .collect::<Vec<_>>()
        .join(" ")
}
