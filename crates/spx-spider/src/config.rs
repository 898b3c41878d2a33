use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Number of rows scraped from the constituents table when `limit` is unset.
pub const DEFAULT_LIMIT: usize = 500;

/// Run configuration, read once at start-up.
///
/// ```yaml
/// token: finnhub-api-token
/// outputFile: spx.csv
/// delay: 3500
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Finnhub API token.
    pub token: String,

    /// Path of the CSV written by the run.
    pub output_file: PathBuf,

    /// Milliseconds slept after each listing.
    pub delay: u64,

    /// Maximum number of constituents to scrape.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Config {
    /// Read a YAML config file from `path`.
    ///
    /// `FINNHUB_TOKEN`, if present in the environment, replaces `token`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        trace!("reading config file: {path:?}");
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_yaml(&raw).map_err(|source| Error::Config {
            path: path.display().to_string(),
            source,
        })?;

        if let Ok(token) = crate::http::var("FINNHUB_TOKEN") {
            debug!("FINNHUB_TOKEN found in environment; overriding config token");
            config.token = token;
        }

        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }
}
