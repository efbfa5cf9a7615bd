use anyhow::{Context, Result};
use std::sync::Arc;

use crate::reddit::{self, SortOption, Submission};

/// Listing name that selects the aggregate front page.
pub const FRONT_PAGE: &str = "front";

pub trait FeedService {
    fn get_listing(&self, source: &str, sort: SortOption, limit: u32) -> Result<Vec<Submission>>;
    fn get_front_page(&self, sort: SortOption, limit: u32) -> Result<Vec<Submission>>;
}

pub struct RedditFeedService {
    client: Arc<reddit::Client>,
}

impl RedditFeedService {
    pub fn new(client: Arc<reddit::Client>) -> Self {
        Self { client }
    }
}

impl FeedService for RedditFeedService {
    fn get_listing(&self, source: &str, sort: SortOption, limit: u32) -> Result<Vec<Submission>> {
        self.client
            .subreddit_listing(source, sort, limit)
            .with_context(|| format!("fetch /r/{source}"))
    }

    fn get_front_page(&self, sort: SortOption, limit: u32) -> Result<Vec<Submission>> {
        self.client
            .front_page(sort, limit)
            .context("fetch front page")
    }
}

/// Loads `source`, treating [`FRONT_PAGE`] as the front page.
pub fn fetch_listing(
    feed: &dyn FeedService,
    source: &str,
    sort: SortOption,
    limit: u32,
) -> Result<Vec<Submission>> {
    if source == FRONT_PAGE {
        feed.get_front_page(sort, limit)
    } else {
        feed.get_listing(source, sort, limit)
    }
}

/// Appends every submission's url to `links` and hands the list back.
pub fn collect_links(submissions: &[Submission], mut links: Vec<String>) -> Vec<String> {
    links.extend(submissions.iter().map(|s| s.url.clone()));
    links
}
