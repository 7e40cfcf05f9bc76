//! Board configuration.
//!
//! `BoardConfig` carries the reconciler's timing knobs and the display date
//! pattern. Front ends build it from defaults, from JSON, or from `FANBOARD_*`
//! environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::normalize_text_option;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 5 * 60;
const DEFAULT_DATE_FORMAT: &str = "%-d %B %Y, %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Upper bound on one remote fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// Upper bound on one remote push, in seconds
    pub push_timeout_secs: u64,
    /// Period of the background resync, in seconds
    pub resync_interval_secs: u64,
    /// `strftime` pattern for the story date string
    pub date_format: String,
    /// Start a brand-new store from the built-in sample stories
    pub seed_samples: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            push_timeout_secs: DEFAULT_PUSH_TIMEOUT_SECS,
            resync_interval_secs: DEFAULT_RESYNC_INTERVAL_SECS,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            seed_samples: false,
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by any `FANBOARD_*` variables present.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`BoardConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(secs) = parse_secs(&lookup, "FANBOARD_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout_secs = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "FANBOARD_PUSH_TIMEOUT_SECS") {
            config.push_timeout_secs = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "FANBOARD_RESYNC_INTERVAL_SECS") {
            config.resync_interval_secs = secs;
        }
        if let Some(format) = normalize_text_option(lookup("FANBOARD_DATE_FORMAT")) {
            config.date_format = format;
        }
        if let Some(value) = normalize_text_option(lookup("FANBOARD_SEED_SAMPLES")) {
            config.seed_samples = matches!(
                value.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }

    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub const fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs)
    }

    pub const fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = normalize_text_option(lookup(name))?;
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            tracing::warn!("Ignoring {name}={raw:?}: expected a positive number of seconds");
            None
        }
    }
}
