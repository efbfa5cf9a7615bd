#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod browser;
pub mod classify;
pub mod cli;
pub mod color;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod format;
pub mod range;
pub mod reddit;
pub mod update;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
