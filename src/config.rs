use std::collections::HashMap;
use std::env;
use std::time::Duration;

use log::warn;

const DEFAULT_ENV_PREFIX: &str = "ALIENFEED";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub reddit: RedditConfig,
    pub ui: UIConfig,
    pub update: UpdateConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedditConfig {
    pub user_agent: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            base_url: None,
            timeout: default_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "AlienFeed v{} (+https://github.com/jawerty/AlienFeed)",
        crate::VERSION
    )
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UIConfig {
    pub color: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateConfig {
    pub command: Vec<String>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            command: default_update_command(),
        }
    }
}

fn default_update_command() -> Vec<String> {
    ["cargo", "install", "alienfeed", "--force", "--quiet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub env_prefix: Option<String>,
}

/// Builds the configuration from defaults overlaid with environment variables.
///
/// Variables look like `ALIENFEED_REDDIT__USER_AGENT`: the prefix, then the
/// section and key separated by a double underscore.
pub fn load(options: LoadOptions) -> Config {
    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    load_from_vars(prefix, env::vars())
}

pub fn load_from_vars<I>(prefix: &str, vars: I) -> Config
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in vars {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    let mut cfg = Config::default();
    for (key, value) in map {
        apply_env_value(&mut cfg, &key, value);
    }
    cfg
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "reddit.user_agent" => {
            if !value.trim().is_empty() {
                cfg.reddit.user_agent = value;
            }
        }
        "reddit.base_url" => {
            cfg.reddit.base_url = Some(value).filter(|v| !v.trim().is_empty());
        }
        "reddit.timeout" => match humantime::parse_duration(&value) {
            Ok(duration) => cfg.reddit.timeout = duration,
            Err(err) => warn!("ignoring reddit.timeout {value:?}: {err}"),
        },
        "ui.color" => {
            cfg.ui.color = !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        "update.command" => {
            let command: Vec<String> = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !command.is_empty() {
                cfg.update.command = command;
            }
        }
        // Consumed by the logger, not by us.
        "log" => {}
        _ => warn!("ignoring unknown setting {key}"),
    }
}
