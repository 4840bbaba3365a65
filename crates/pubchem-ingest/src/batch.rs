//! Batch extraction and concurrent fetch

use futures::future::join_all;
use pubchem_common::{CompoundId, ParsedCompound};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::fetch::{CompoundFetcher, FetchResponse};
use crate::normalize::Normalizer;
use crate::range::PendingSet;
use crate::sink::CompoundSink;

/// Result of one compound within a batch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(ParsedCompound),
    Failure(CompoundId),
}

/// What a finished batch hands to the retry controller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub stored: usize,
    pub failed: Vec<CompoundId>,
}

/// Pop up to `batch_size` ids from the front of the pending set
pub fn extract_batch(pending: &mut PendingSet, batch_size: usize) -> Vec<CompoundId> {
    let count = batch_size.min(pending.len());
    pending.drain(..count).collect()
}

/// Fetches, normalizes and stores one batch
#[derive(Clone)]
pub struct BatchRunner {
    fetcher: Arc<dyn CompoundFetcher>,
    normalizer: Arc<dyn Normalizer>,
    sink: Arc<dyn CompoundSink>,
}

impl BatchRunner {
    pub fn new(
        fetcher: Arc<dyn CompoundFetcher>,
        normalizer: Arc<dyn Normalizer>,
        sink: Arc<dyn CompoundSink>,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            sink,
        }
    }

    async fn fetch_one(&self, cid: CompoundId) -> Result<FetchOutcome> {
        match self.fetcher.fetch_by_id(cid).await? {
            FetchResponse::Found(raw) => {
                let compound = self.normalizer.normalize(raw)?;
                debug!(cid = cid.get(), "Completed compound");
                Ok(FetchOutcome::Success(compound))
            },
            FetchResponse::Failed(failed) => {
                error!(cid = failed.get(), "Failed to fetch compound");
                Ok(FetchOutcome::Failure(failed))
            },
        }
    }

    /// Fetch every id concurrently, wait for all of them, then persist the
    /// successes. Any `Err` (transport, normalizer, sink) fails the batch.
    pub async fn run(&self, ids: Vec<CompoundId>) -> Result<BatchReport> {
        let outcomes = join_all(ids.iter().map(|&cid| self.fetch_one(cid))).await;

        let mut compounds = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome? {
                FetchOutcome::Success(compound) => compounds.push(compound),
                FetchOutcome::Failure(cid) => failed.push(cid),
            }
        }

        if !failed.is_empty() {
            let ids: Vec<u64> = failed.iter().map(|id| id.get()).collect();
            warn!(?ids, "Fails");
        }

        let stored = compounds.len();
        self.sink.create_many(compounds).await?;

        Ok(BatchReport { stored, failed })
    }
}
