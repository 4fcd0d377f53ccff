//! Rule configuration.
//!
//! The dates and limits the validation engine checks against. A `Config` is
//! built once (usually `Config::default()`) and passed by reference; nothing
//! in the crate mutates it afterwards.
//!
//! ```
//! use moovover::Config;
//!
//! let config = Config::from_toml_str("title_max_length = 12").unwrap();
//! assert_eq!(config.title_max_length, 12);
//! assert_eq!(config.earliest_release.to_string(), "1930-01-01");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a configuration document cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Movies released before this date are exempt from rating validation.
    pub grandfather_cutoff: NaiveDate,
    /// Movies released before this date are rejected as `too_old`.
    pub earliest_release: NaiveDate,
    /// Maximum title length in characters, counted after trimming.
    pub title_max_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grandfather_cutoff: ymd(1900, 1, 1),
            earliest_release: ymd(1930, 1, 1),
            title_max_length: 10,
        }
    }
}

impl Config {
    /// Parse a TOML document; keys that are absent keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.title_max_length == 0 {
            return Err(ConfigError::Invalid(
                "title_max_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
