use std::io::Write;

use anyhow::{bail, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::browser::LinkOpener;
use crate::cli::{Cli, DEFAULT_LIMIT};
use crate::color::Palette;
use crate::data::{self, collect_links, FeedService, FRONT_PAGE};
use crate::error::FeedError;
use crate::format::{self, RenderOptions};
use crate::range::Range;
use crate::reddit::SortOption;

/// How many submissions random mode pulls from each listing.
pub const RANDOM_POOL_SIZE: u32 = 200;

/// The single action one invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    List,
    Open(i64),
    OpenRange(Range),
    Random,
}

impl Selection {
    /// Picks the action implied by the flags, rejecting combinations that conflict.
    pub fn from_args(cli: &Cli) -> Result<Self, FeedError> {
        if let Some(range) = cli.openrange {
            if cli.open.is_some() || cli.random {
                return Err(FeedError::UsageConflict(
                    "You cannot use [-or OPENRANGE] with [-o OPEN] or with [-r RANDOM]".into(),
                ));
            }
            return Ok(Selection::OpenRange(range));
        }

        match (cli.open, cli.random) {
            (Some(_), true) => Err(FeedError::UsageConflict(
                "You cannot use [-o OPEN] with [-r RANDOM]".into(),
            )),
            (Some(index), false) => Ok(Selection::Open(index)),
            (None, true) if cli.limit != DEFAULT_LIMIT => Err(FeedError::UsageConflict(
                "You cannot use [-l LIMIT] with [-r RANDOM] (unless the limit is 10)".into(),
            )),
            (None, true) => Ok(Selection::Random),
            (None, false) => Ok(Selection::List),
        }
    }
}

pub struct Controller<'a, R> {
    feed: &'a dyn FeedService,
    browser: &'a dyn LinkOpener,
    rng: R,
    palette: Palette,
    width: i64,
}

impl<'a, R: Rng> Controller<'a, R> {
    pub fn new(
        feed: &'a dyn FeedService,
        browser: &'a dyn LinkOpener,
        rng: R,
        palette: Palette,
        width: i64,
    ) -> Self {
        Self {
            feed,
            browser,
            rng,
            palette,
            width,
        }
    }

    pub fn run(
        &mut self,
        selection: Selection,
        source: &str,
        limit: u32,
        out: &mut dyn Write,
    ) -> Result<()> {
        debug!("running {selection:?} against {source} (limit {limit})");
        match selection {
            Selection::List => self.list(source, limit, out),
            Selection::Open(index) => self.open_one(index, source, limit, out),
            Selection::OpenRange(range) => self.open_range(range, source, limit, out),
            Selection::Random => self.open_random(source, out),
        }
    }

    fn list(&mut self, source: &str, limit: u32, out: &mut dyn Write) -> Result<()> {
        let submissions = data::fetch_listing(self.feed, source, SortOption::Hot, limit)?;
        let header = if source == FRONT_PAGE {
            format!("Top {limit} front page links:")
        } else {
            format!("Top {limit} /r/{source} links:")
        };
        format::print_colorized(out, self.palette, &header)?;

        let options = RenderOptions {
            width: self.width,
            palette: self.palette,
        };
        for line in format::render(&submissions, &options) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn open_one(
        &mut self,
        index: i64,
        source: &str,
        limit: u32,
        out: &mut dyn Write,
    ) -> Result<()> {
        if index < 1 {
            bail!(out_of_feed(limit));
        }
        let links = self.links(source, limit)?;
        let Some(link) = usize::try_from(index - 1).ok().and_then(|i| links.get(i)) else {
            bail!(out_of_links(links.len(), limit));
        };

        format::print_colorized(out, self.palette, "\nViewing a submission\n")?;
        self.browser.open(link)
    }

    fn open_range(
        &mut self,
        range: Range,
        source: &str,
        limit: u32,
        out: &mut dyn Write,
    ) -> Result<()> {
        if range.start < 1 || range.start > range.end {
            bail!(FeedError::out_of_range(format!(
                "'{range}' is not a usable range; the start must be at least 1 and no greater than the end"
            )));
        }
        if range.end > i64::from(limit) {
            bail!(FeedError::out_of_range(format!(
                "The upper range limit you typed was out of the feed's range \
                 (try to pick a number between 1 and {limit} or add --limit {})",
                range.end
            )));
        }

        let links = self.links(source, limit)?;
        // Bounds were checked against the limit, but the listing may be shorter.
        let (start, end) = (range.start as usize, range.end as usize);
        if end > links.len() {
            bail!(out_of_links(links.len(), limit));
        }

        format::print_colorized(out, self.palette, "\nViewing a range of submissions\n")?;
        for link in &links[start - 1..end] {
            self.browser.open(link)?;
        }
        Ok(())
    }

    fn open_random(&mut self, source: &str, out: &mut dyn Write) -> Result<()> {
        let links = if source == FRONT_PAGE {
            let front = self.feed.get_front_page(SortOption::Hot, RANDOM_POOL_SIZE)?;
            collect_links(&front, Vec::new())
        } else {
            let mut links = Vec::new();
            for sort in [SortOption::Top, SortOption::New, SortOption::Hot] {
                let submissions = self.feed.get_listing(source, sort, RANDOM_POOL_SIZE)?;
                links = collect_links(&submissions, links);
            }
            links
        };
        debug!("choosing from {} links", links.len());

        let Some(link) = links.choose(&mut self.rng) else {
            bail!(FeedError::EmptyListing(source.to_string()));
        };
        self.browser.open(link)?;
        format::print_colorized(out, self.palette, "\nViewing a random submission\n")?;
        Ok(())
    }

    fn links(&self, source: &str, limit: u32) -> Result<Vec<String>> {
        let submissions = data::fetch_listing(self.feed, source, SortOption::Hot, limit)?;
        Ok(collect_links(&submissions, Vec::new()))
    }
}

fn out_of_feed(limit: u32) -> FeedError {
    FeedError::out_of_range(format!(
        "The number you typed in was out of the feed's range \
         (try to pick a number between 1 and {limit} or add --limit)"
    ))
}

fn out_of_links(available: usize, limit: u32) -> FeedError {
    if available == 0 {
        return FeedError::out_of_range("The feed returned no links to open");
    }
    if available < limit as usize {
        return FeedError::out_of_range(format!(
            "The feed only returned {available} links; pick a number between 1 and {available}"
        ));
    }
    out_of_feed(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reddit::Submission;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    struct StubFeed {
        submissions: Vec<Submission>,
        calls: RefCell<Vec<String>>,
    }

    impl StubFeed {
        fn with_links(count: usize) -> Self {
            let submissions = (1..=count)
                .map(|i| Submission {
                    title: format!("Story {i}"),
                    subreddit: "rust".into(),
                    url: format!("https://example.com/{i}"),
                    permalink: format!("https://www.reddit.com/r/rust/comments/{i}/"),
                    domain: "example.com".into(),
                    score: i as i64,
                    ..Submission::default()
                })
                .collect();
            Self {
                submissions,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn take(&self, limit: u32) -> Vec<Submission> {
            self.submissions
                .iter()
                .take(limit as usize)
                .cloned()
                .collect()
        }
    }

    impl FeedService for StubFeed {
        fn get_listing(
            &self,
            source: &str,
            sort: SortOption,
            limit: u32,
        ) -> Result<Vec<Submission>> {
            if source == "missing" {
                bail!(FeedError::UnknownSource(source.into()));
            }
            self.calls
                .borrow_mut()
                .push(format!("{source}:{}:{limit}", sort.as_str()));
            Ok(self.take(limit))
        }

        fn get_front_page(&self, sort: SortOption, limit: u32) -> Result<Vec<Submission>> {
            self.calls
                .borrow_mut()
                .push(format!("front:{}:{limit}", sort.as_str()));
            Ok(self.take(limit))
        }
    }

    #[derive(Default)]
    struct RecordingBrowser {
        opened: RefCell<Vec<String>>,
    }

    impl LinkOpener for RecordingBrowser {
        fn open(&self, url: &str) -> Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["alienfeed"];
        argv.extend_from_slice(args);
        Cli::try_parse_args(argv).unwrap()
    }

    fn run(
        feed: &StubFeed,
        browser: &RecordingBrowser,
        selection: Selection,
        source: &str,
        limit: u32,
    ) -> (Result<()>, String) {
        let mut controller =
            Controller::new(feed, browser, StdRng::seed_from_u64(7), Palette::plain(), 80);
        let mut out = Vec::new();
        let result = controller.run(selection, source, limit, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn feed_error(result: Result<()>) -> FeedError {
        result
            .unwrap_err()
            .downcast::<FeedError>()
            .expect("expected a FeedError")
    }

    #[test]
    fn range_with_open_or_random_conflicts() {
        for args in [
            &["-or", "1..3", "-o", "2"][..],
            &["-or", "1..3", "-r"][..],
        ] {
            assert!(matches!(
                Selection::from_args(&cli(args)),
                Err(FeedError::UsageConflict(msg)) if msg.contains("[-or OPENRANGE]")
            ));
        }
    }

    #[test]
    fn open_with_random_conflicts() {
        assert!(matches!(
            Selection::from_args(&cli(&["-o", "2", "-r"])),
            Err(FeedError::UsageConflict(msg)) if msg.contains("[-o OPEN] with [-r RANDOM]")
        ));
    }

    #[test]
    fn random_with_custom_limit_conflicts() {
        assert!(matches!(
            Selection::from_args(&cli(&["rust", "-r", "-l", "25"])),
            Err(FeedError::UsageConflict(msg)) if msg.contains("[-l LIMIT]")
        ));
        assert_eq!(
            Selection::from_args(&cli(&["rust", "-r", "-l", "10"])),
            Ok(Selection::Random)
        );
    }

    #[test]
    fn picks_each_selection() {
        assert_eq!(Selection::from_args(&cli(&[])), Ok(Selection::List));
        assert_eq!(
            Selection::from_args(&cli(&["-o", "3"])),
            Ok(Selection::Open(3))
        );
        assert_eq!(
            Selection::from_args(&cli(&["-or", "2..4"])),
            Ok(Selection::OpenRange(Range::new(2, 4)))
        );
    }

    #[test]
    fn range_opens_inclusive_ascending() {
        let feed = StubFeed::with_links(10);
        let browser = RecordingBrowser::default();
        let (result, out) = run(
            &feed,
            &browser,
            Selection::OpenRange(Range::new(2, 4)),
            "rust",
            10,
        );
        result.unwrap();
        assert_eq!(
            *browser.opened.borrow(),
            vec![
                "https://example.com/2",
                "https://example.com/3",
                "https://example.com/4"
            ]
        );
        assert!(out.contains("Viewing a range of submissions"));
        assert_eq!(*feed.calls.borrow(), vec!["rust:hot:10"]);
    }

    #[test]
    fn range_beyond_limit_fetches_and_opens_nothing() {
        let feed = StubFeed::with_links(10);
        let browser = RecordingBrowser::default();
        let (result, _) = run(
            &feed,
            &browser,
            Selection::OpenRange(Range::new(8, 12)),
            "rust",
            10,
        );
        assert!(matches!(
            feed_error(result),
            FeedError::IndexOutOfRange { message } if message.contains("--limit 12")
        ));
        assert!(browser.opened.borrow().is_empty());
        assert!(feed.calls.borrow().is_empty());
    }

    #[test]
    fn range_longer_than_listing_opens_nothing() {
        let feed = StubFeed::with_links(3);
        let browser = RecordingBrowser::default();
        let (result, _) = run(
            &feed,
            &browser,
            Selection::OpenRange(Range::new(2, 5)),
            "rust",
            10,
        );
        assert!(matches!(
            feed_error(result),
            FeedError::IndexOutOfRange { .. }
        ));
        assert!(browser.opened.borrow().is_empty());
    }

    #[test]
    fn inverted_or_zero_based_range_is_rejected() {
        let feed = StubFeed::with_links(10);
        let browser = RecordingBrowser::default();
        for range in [Range::new(4, 2), Range::new(0, 3)] {
            let (result, _) = run(&feed, &browser, Selection::OpenRange(range), "rust", 10);
            assert!(matches!(
                feed_error(result),
                FeedError::IndexOutOfRange { .. }
            ));
        }
        assert!(browser.opened.borrow().is_empty());
    }

    #[test]
    fn open_single_link() {
        let feed = StubFeed::with_links(10);
        let browser = RecordingBrowser::default();
        let (result, out) = run(&feed, &browser, Selection::Open(10), "front", 10);
        result.unwrap();
        assert_eq!(*browser.opened.borrow(), vec!["https://example.com/10"]);
        assert!(out.contains("Viewing a submission"));
        assert_eq!(*feed.calls.borrow(), vec!["front:hot:10"]);
    }

    #[test]
    fn open_out_of_range_reports_and_opens_nothing() {
        let feed = StubFeed::with_links(10);
        let browser = RecordingBrowser::default();
        for index in [0, 11, -3] {
            let (result, _) = run(&feed, &browser, Selection::Open(index), "rust", 10);
            assert!(matches!(
                feed_error(result),
                FeedError::IndexOutOfRange { message } if message.contains("between 1 and 10")
            ));
        }
        assert!(browser.opened.borrow().is_empty());
        // Only the in-bounds-looking index reached the network.
        assert_eq!(feed.calls.borrow().len(), 1);
    }

    #[test]
    fn open_against_short_listing_names_available_range() {
        let feed = StubFeed::with_links(4);
        let browser = RecordingBrowser::default();
        let (result, _) = run(&feed, &browser, Selection::Open(6), "rust", 10);
        assert!(matches!(
            feed_error(result),
            FeedError::IndexOutOfRange { message } if message.contains("between 1 and 4")
        ));
    }

    #[test]
    fn random_merges_top_new_hot() {
        let feed = StubFeed::with_links(3);
        let browser = RecordingBrowser::default();
        let (result, out) = run(&feed, &browser, Selection::Random, "rust", 10);
        result.unwrap();
        assert_eq!(
            *feed.calls.borrow(),
            vec!["rust:top:200", "rust:new:200", "rust:hot:200"]
        );
        let opened = browser.opened.borrow();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("https://example.com/"));
        assert!(out.contains("Viewing a random submission"));
    }

    #[test]
    fn random_front_uses_single_fetch() {
        let feed = StubFeed::with_links(5);
        let browser = RecordingBrowser::default();
        let (result, _) = run(&feed, &browser, Selection::Random, "front", 10);
        result.unwrap();
        assert_eq!(*feed.calls.borrow(), vec!["front:hot:200"]);
        assert_eq!(browser.opened.borrow().len(), 1);
    }

    #[test]
    fn random_on_empty_listing_is_reported() {
        let feed = StubFeed::with_links(0);
        let browser = RecordingBrowser::default();
        let (result, _) = run(&feed, &browser, Selection::Random, "tiny", 10);
        assert_eq!(feed_error(result), FeedError::EmptyListing("tiny".into()));
        assert!(browser.opened.borrow().is_empty());
    }

    #[test]
    fn list_prints_header_and_lines() {
        let feed = StubFeed::with_links(3);
        let browser = RecordingBrowser::default();
        let (result, out) = run(&feed, &browser, Selection::List, "rust", 3);
        result.unwrap();
        assert_eq!(
            out,
            "Top 3 /r/rust links:\n1 -> 1 Story 1\n2 -> 2 Story 2\n3 -> 3 Story 3\n"
        );

        let (_, out) = run(&feed, &browser, Selection::List, "front", 3);
        assert!(out.starts_with("Top 3 front page links:\n"));
        assert!(browser.opened.borrow().is_empty());
    }

    #[test]
    fn unknown_source_propagates() {
        let feed = StubFeed::with_links(3);
        let browser = RecordingBrowser::default();
        let (result, out) = run(&feed, &browser, Selection::List, "missing", 10);
        assert_eq!(
            feed_error(result),
            FeedError::UnknownSource("missing".into())
        );
        assert!(out.is_empty());
    }
}
