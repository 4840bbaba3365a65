//! PubChem Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Imports a contiguous range of PubChem compounds (CIDs) through the
//! PUG-View API without tripping its rate limit, and keeps retrying the
//! compounds that failed until every one of them is stored.
//!
//! # Pipeline
//!
//! - [`range`]: validate `from..=to` into the pending set
//! - [`throttle`]: fire one batch every interval
//! - [`batch`]: fetch a batch concurrently, normalize, persist
//! - [`round`]: count outcomes, requeue failures as the next round
//! - [`job`]: the loop tying it together
//!
//! # Example
//!
//! ```no_run
//! use pubchem_ingest::{import, IngestConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::default().with_output_path("./data/aspirin.jsonl");
//!     let summary = import(2244, 2250, config).await?;
//!     println!("stored {} compounds in {} rounds", summary.succeeded, summary.rounds);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod job;
pub mod models;
pub mod normalize;
pub mod range;
pub mod round;
pub mod sink;
pub mod throttle;

use std::sync::Arc;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use job::{Job, JobSummary};
pub use range::{validate_range, PendingSet};

use fetch::PubChemClient;
use normalize::PugViewNormalizer;
use sink::JsonLinesSink;

/// Import `from..=to` from PubChem into the configured JSON Lines file.
///
/// The range is validated before anything touches the network.
pub async fn import(from: i64, to: i64, config: IngestConfig) -> Result<JobSummary> {
    let pending = validate_range(from, to)?;
    config.validate()?;

    let fetcher = Arc::new(PubChemClient::from_config(&config)?);
    let sink = Arc::new(JsonLinesSink::new(&config.output_path)?);
    let job = Job::new(config, fetcher, Arc::new(PugViewNormalizer::new()), sink);

    job.run(pending).await
}
