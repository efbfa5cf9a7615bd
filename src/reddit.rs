use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FeedError;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com/";
pub const PERMALINK_HOST: &str = "https://www.reddit.com";

/// Reddit refuses to return more than this many children per request.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub user_agent: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub http_client: Option<HttpClient>,
}

#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl ListingOptions {
    fn into_params(self) -> Vec<(String, String)> {
        let mut params = vec![("raw_json".to_string(), "1".to_string())];
        if let Some(after) = self.after {
            params.push(("after".into(), after));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".into(), limit.to_string()));
        }
        params.extend(self.extra);
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Hot,
    New,
    Top,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Hot => "hot",
            SortOption::New => "new",
            SortOption::Top => "top",
        }
    }
}

pub struct Client {
    http: HttpClient,
    user_agent: String,
    base_url: Url,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            bail!("reddit client user agent required");
        }
        let base = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base).with_context(|| format!("parse base url {base:?}"))?;
        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(config.timeout.unwrap_or(Duration::from_secs(20)))
                // Unknown subreddits redirect to a search page.
                .redirect(Policy::none())
                .build()?,
        };

        Ok(Client {
            http,
            user_agent: config.user_agent,
            base_url,
        })
    }

    /// Fetches up to `limit` submissions from `/r/<subreddit>/<sort>`.
    pub fn subreddit_listing(
        &self,
        subreddit: &str,
        sort: SortOption,
        limit: u32,
    ) -> Result<Vec<Submission>> {
        let name = subreddit.trim_start_matches("r/");
        if !is_subreddit_name(name) {
            bail!(FeedError::UnknownSource(name.to_string()));
        }
        let path = format!("/r/{}/{}.json", name, sort.as_str());
        self.fetch_submissions(&path, limit)
            .map_err(|err| match err.downcast::<NotFound>() {
                Ok(_) => FeedError::UnknownSource(name.to_string()).into(),
                Err(err) => err,
            })
    }

    pub fn front_page(&self, sort: SortOption, limit: u32) -> Result<Vec<Submission>> {
        let path = format!("/{}.json", sort.as_str());
        self.fetch_submissions(&path, limit)
            .map_err(|err| match err.downcast::<NotFound>() {
                Ok(_) => anyhow!("reddit: front page listing not found"),
                Err(err) => err,
            })
    }

    fn fetch_submissions(&self, path: &str, limit: u32) -> Result<Vec<Submission>> {
        let wanted = limit as usize;
        let mut submissions = Vec::with_capacity(wanted.min(MAX_PAGE_SIZE as usize));
        let mut after = None;

        while submissions.len() < wanted {
            let page_size = (wanted - submissions.len()).min(MAX_PAGE_SIZE as usize) as u32;
            let listing: Listing<Submission> = self.fetch_listing(
                path,
                ListingOptions {
                    after: after.take(),
                    limit: Some(page_size),
                    ..ListingOptions::default()
                },
            )?;
            let received = listing.children.len();
            debug!("{path}: received {received} submissions (requested {page_size})");
            submissions.extend(
                listing
                    .children
                    .into_iter()
                    .map(|thing| thing.data.normalized()),
            );
            match listing.after {
                Some(next) if received > 0 => after = Some(next),
                _ => break,
            }
        }

        submissions.truncate(wanted);
        Ok(submissions)
    }

    fn fetch_listing<T>(&self, path: &str, opts: ListingOptions) -> Result<Listing<T>>
    where
        T: DeserializeOwned,
    {
        let params = opts.into_params();
        let resp = self.request(path, &params)?;
        let listing: ListingEnvelope<T> = resp
            .json()
            .with_context(|| format!("reddit: decode listing {path}"))?;
        Ok(listing.data)
    }

    fn request(&self, path: &str, params: &[(String, String)]) -> Result<Response> {
        let mut url = self.base_url.join(path)?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }

        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .header(USER_AGENT, self.user_agent.clone())
            .send()
            .with_context(|| format!("reddit: request {path}"))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status.is_redirection() || status.as_u16() == 404 {
            return Err(NotFound.into());
        }
        let body = resp.text().unwrap_or_default();
        match status.as_u16() {
            403 => Err(anyhow!("reddit: forbidden")),
            429 => Err(anyhow!("reddit: rate limited: {}", body)),
            _ => Err(anyhow!("reddit: api error {}: {}", status, body)),
        }
    }
}

// Letters, digits and underscores, with `+` joining several subreddits.
fn is_subreddit_name(name: &str) -> bool {
    name.split('+').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

#[derive(Debug, thiserror::Error)]
#[error("reddit: listing not found")]
struct NotFound;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub after: Option<String>,
    pub before: Option<String>,
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

/// A link or self post as returned in a `t3` listing child.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub title: String,
    pub subreddit: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub media: Option<PostMedia>,
}

impl Submission {
    /// Makes `permalink` absolute so it compares equal to a self post's url.
    fn normalized(mut self) -> Self {
        if self.permalink.starts_with('/') {
            self.permalink = format!("{PERMALINK_HOST}{}", self.permalink);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PostMedia {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RedditVideo {
    #[serde(default)]
    pub fallback_url: String,
    #[serde(default)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListingEnvelope<T> {
    kind: String,
    data: Listing<T>,
}
