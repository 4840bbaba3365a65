//! Error types for the ingest engine
//!
//! Expected per-compound fetch failures are not errors: they travel as
//! [`FetchResponse::Failed`](crate::fetch::FetchResponse::Failed) values and
//! feed the retry rounds. Everything here aborts a job.

use pubchem_common::{CommonError, CompoundId};
use thiserror::Error;

/// Result type alias for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Requested CID range is empty or starts below 1
    #[error("Invalid range {from}..={to}: start must be greater than 0 and not greater than end")]
    InvalidRange { from: i64, to: i64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be turned into a compound record
    #[error("Failed to normalize compound record: {0}")]
    Normalize(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Round ceiling reached with compounds still failing
    #[error("Gave up after {rounds} rounds, {} compounds still failing", .failed.len())]
    RetriesExhausted { rounds: u32, failed: Vec<CompoundId> },

    /// Round bookkeeping received more outcomes than ids in the round
    #[error("Round accounting error: {0}")]
    RoundAccounting(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl IngestError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn normalize(msg: impl Into<String>) -> Self {
        Self::Normalize(msg.into())
    }
}
