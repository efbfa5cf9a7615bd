use std::collections::HashSet;
use std::io::{self, Write};

use textwrap::{wrap, Options as WrapOptions};

use crate::classify::{classify, render_tags};
use crate::color::{Color, Palette};
use crate::reddit::Submission;

pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

const ARROW: &str = " -> ";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: i64,
    pub palette: Palette,
}

/// Formats submissions with color, wrapped to `terminal_width` columns.
pub fn format(submissions: &[Submission], terminal_width: i64) -> Vec<String> {
    render(
        submissions,
        &RenderOptions {
            width: terminal_width,
            palette: Palette::colored(),
        },
    )
}

pub fn render(submissions: &[Submission], options: &RenderOptions) -> Vec<String> {
    let Some(max_score) = submissions.iter().map(|s| s.score).max() else {
        return Vec::new();
    };

    let count_width = submissions.len().to_string().len();
    let score_width = max_score.to_string().len();
    let indent = " ".repeat(count_width + ARROW.len() + score_width + 1);
    let show_subreddit = spans_multiple_subreddits(submissions);

    let width = usize::try_from(options.width)
        .unwrap_or(0)
        .max(indent.len() + 1);
    let wrap_options = WrapOptions::new(width)
        .break_words(true)
        .subsequent_indent(&indent);

    let palette = options.palette;
    let mut lines = Vec::with_capacity(submissions.len());
    for (i, submission) in submissions.iter().enumerate() {
        let mut line = format!(
            "{green}{count:>count_width$}{ARROW}{yellow}{score:>score_width$} {blue}{title}",
            green = palette.get(Color::OkGreen),
            count = i + 1,
            yellow = palette.get(Color::Warning),
            score = submission.score,
            blue = palette.get(Color::OkBlue),
            title = collapse_whitespace(&submission.title),
        );
        if show_subreddit {
            line.push_str(palette.get(Color::Subtext));
            line.push_str(&format!(" ({})", collapse_whitespace(&submission.subreddit)));
        }
        let tags = render_tags(&classify(submission), palette);
        if !tags.is_empty() {
            line.push(' ');
            line.push_str(&tags);
        }
        line.push_str(palette.get(Color::Reset));

        lines.extend(
            wrap(&line, &wrap_options)
                .into_iter()
                .map(|cow| cow.into_owned()),
        );
    }
    lines
}

// Newlines and tabs would otherwise force breaks that ignore the width.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn spans_multiple_subreddits(submissions: &[Submission]) -> bool {
    let names: HashSet<&str> = submissions.iter().map(|s| s.subreddit.as_str()).collect();
    names.len() > 1
}

/// Column count of the controlling terminal, or 80 when it can't be read.
pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => DEFAULT_TERMINAL_WIDTH,
    }
}

pub fn print_colorized(out: &mut dyn Write, palette: Palette, text: &str) -> io::Result<()> {
    writeln!(out, "{}", palette.paint(Color::Header, text))
}

pub fn warning(palette: Palette, text: &str) -> String {
    palette.paint(Color::Warning, text)
}
