use std::ffi::OsString;

use clap::Parser;

use crate::range::{parse_range, Range};

pub const DEFAULT_LIMIT: u32 = 10;

/// AlienFeed is a command-line application for displaying and interacting
/// with recent Reddit links.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "alienfeed", version)]
pub struct Cli {
    /// Subreddit to read links from; 'front' reads the front page
    #[arg(value_name = "SUBREDDIT")]
    pub subreddit: Option<String>,

    /// Limits output (default output is 10 links)
    #[arg(
        short = 'l',
        long,
        default_value_t = DEFAULT_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// Opens one link that matches the number inputted
    #[arg(short = 'o', long, value_name = "OPEN", allow_negative_numbers = true)]
    pub open: Option<i64>,

    /// Opens a range of links of the form 'x..y' (also accepted as -or)
    #[arg(long = "openrange", value_name = "OPENRANGE", value_parser = parse_range)]
    pub openrange: Option<Range>,

    /// Opens a random link (must be the only optional argument)
    #[arg(short = 'r', long)]
    pub random: bool,

    /// Automatically updates AlienFeed via cargo
    #[arg(short = 'U', long)]
    pub update: bool,
}

impl Cli {
    pub fn source(&self) -> &str {
        self.subreddit.as_deref().unwrap_or(crate::data::FRONT_PAGE)
    }

    /// Parses arguments after rewriting the two-letter `-or` flag.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// clap only knows single-letter short flags, so `-or` becomes `--openrange`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == "-or" {
                OsString::from("--openrange")
            } else if let Some(value) = arg.to_str().and_then(|s| s.strip_prefix("-or=")) {
                OsString::from(format!("--openrange={value}"))
            } else {
                arg
            }
        })
        .collect()
}
