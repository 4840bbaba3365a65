//! Ingest job configuration
//!
//! Defaults match what the public PubChem service tolerates: 5 requests
//! every 400 ms stays under its limit of 5 requests per second.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{IngestError, Result};
use crate::fetch::DEFAULT_API_URL;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 400;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT_PATH: &str = "./data/compounds.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Ids fetched concurrently per tick
    pub batch_size: usize,
    /// Milliseconds between ticks
    pub request_interval_ms: u64,
    /// Retry round ceiling. `None` retries until every id succeeds.
    pub max_rounds: Option<u32>,
    /// PUG-View compound endpoint, without the trailing `/{cid}/JSON`
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// JSON Lines file receiving stored compounds
    pub output_path: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            request_interval_ms: DEFAULT_REQUEST_INTERVAL_MS,
            max_rounds: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// - `PUBCHEM_BATCH_SIZE`
    /// - `PUBCHEM_REQUEST_INTERVAL_MS`
    /// - `PUBCHEM_MAX_ROUNDS`
    /// - `PUBCHEM_API_URL`
    /// - `PUBCHEM_REQUEST_TIMEOUT_SECS`
    /// - `PUBCHEM_OUTPUT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(size) = env_parse("PUBCHEM_BATCH_SIZE")? {
            config.batch_size = size;
        }
        if let Some(ms) = env_parse("PUBCHEM_REQUEST_INTERVAL_MS")? {
            config.request_interval_ms = ms;
        }
        if let Some(rounds) = env_parse("PUBCHEM_MAX_ROUNDS")? {
            config.max_rounds = Some(rounds);
        }
        if let Ok(url) = std::env::var("PUBCHEM_API_URL") {
            config.api_base_url = url;
        }
        if let Some(secs) = env_parse("PUBCHEM_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }
        if let Ok(path) = std::env::var("PUBCHEM_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_request_interval_ms(mut self, ms: u64) -> Self {
        self.request_interval_ms = ms;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IngestError::config("batch size must be greater than 0"));
        }
        if self.request_interval_ms == 0 {
            return Err(IngestError::config("request interval must be greater than 0 ms"));
        }
        if self.request_timeout_secs == 0 {
            return Err(IngestError::config("request timeout must be greater than 0 s"));
        }
        if self.max_rounds == Some(0) {
            return Err(IngestError::config("max rounds must be greater than 0 when set"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(IngestError::config("API URL must not be empty"));
        }
        Ok(())
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| IngestError::config(format!("{key} has an invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}
