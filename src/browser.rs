use anyhow::{Context, Result};
use log::debug;

pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens links in the user's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        debug!("opening {url}");
        webbrowser::open(url).with_context(|| format!("Failed to open {url} in your browser"))
    }
}
