use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;

use crate::browser::SystemBrowser;
use crate::cli::Cli;
use crate::color::Palette;
use crate::config::Config;
use crate::controller::{Controller, Selection};
use crate::data::RedditFeedService;
use crate::format;
use crate::reddit;
use crate::update;

/// Performs the single action selected by `cli`, then self-updates if asked.
pub fn run(cli: &Cli, cfg: &Config) -> Result<()> {
    let selection = Selection::from_args(cli)?;
    let palette = Palette::new(cfg.ui.color);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // `alienfeed -U` on its own only updates.
    let update_only = cli.update && cli.subreddit.is_none() && selection == Selection::List;
    if !update_only {
        let client = reddit::Client::new(reddit::ClientConfig {
            user_agent: cfg.reddit.user_agent.clone(),
            base_url: cfg.reddit.base_url.clone(),
            timeout: Some(cfg.reddit.timeout),
            http_client: None,
        })
        .context("build reddit client")?;
        let feed = RedditFeedService::new(Arc::new(client));
        let browser = SystemBrowser;
        let width = format::terminal_width() as i64;
        debug!("terminal width {width}");

        let mut controller =
            Controller::new(&feed, &browser, rand::thread_rng(), palette, width);
        controller.run(selection, cli.source(), cli.limit, &mut out)?;
    }

    if cli.update {
        writeln!(out, "Upgrading AlienFeed...")?;
        out.flush()?;
        update::self_update(&cfg.update.command)?;
    }
    Ok(())
}
