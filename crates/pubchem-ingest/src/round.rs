//! Round bookkeeping and retry convergence
//!
//! A round is one pass over a set of CIDs. It closes once every id in it has
//! either been stored or recorded as failed. A closed round with failures
//! starts the next round over exactly those failures; a closed round without
//! failures ends the job.

use pubchem_common::CompoundId;
use tracing::{info, warn};

use crate::error::{IngestError, Result};
use crate::range::PendingSet;

/// How a round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundClosure {
    /// Every id succeeded
    Resolved,
    /// These ids failed and need another round
    Retry(Vec<CompoundId>),
}

/// Counters for one round. Invariant: `success_count + failed_ids.len() <= total`.
#[derive(Debug, Clone)]
pub struct RoundState {
    total: usize,
    success_count: usize,
    failed_ids: Vec<CompoundId>,
    closed: bool,
}

impl RoundState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            success_count: 0,
            failed_ids: Vec::new(),
            closed: false,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failed_ids(&self) -> &[CompoundId] {
        &self.failed_ids
    }

    pub fn resolved(&self) -> usize {
        self.success_count + self.failed_ids.len()
    }

    pub fn is_complete(&self) -> bool {
        self.resolved() == self.total
    }

    /// Fold one finished batch into the round.
    ///
    /// Returns the closure on the batch that completes the round, `None`
    /// otherwise. Outcomes beyond `total`, or arriving after closure, are
    /// accounting errors.
    pub fn record_batch(
        &mut self,
        successes: usize,
        failures: Vec<CompoundId>,
    ) -> Result<Option<RoundClosure>> {
        let incoming = successes + failures.len();
        if self.closed && incoming > 0 {
            return Err(IngestError::RoundAccounting(format!(
                "{incoming} outcomes arrived after the round closed"
            )));
        }
        if self.resolved() + incoming > self.total {
            return Err(IngestError::RoundAccounting(format!(
                "{} outcomes recorded for a round of {}",
                self.resolved() + incoming,
                self.total
            )));
        }

        self.failed_ids.extend(failures);
        self.success_count += successes;
        Ok(self.check_closed())
    }

    /// Report the closure exactly once; later calls return `None`.
    pub fn check_closed(&mut self) -> Option<RoundClosure> {
        if self.closed || !self.is_complete() {
            return None;
        }
        self.closed = true;

        if self.failed_ids.is_empty() {
            Some(RoundClosure::Resolved)
        } else {
            Some(RoundClosure::Retry(self.failed_ids.clone()))
        }
    }
}

/// What the job loop should do after a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundDecision {
    /// Round still open, keep ticking or draining
    Continue,
    /// Every id stored, the job is done
    Finished,
    /// Start a new round over these ids
    Retry(PendingSet),
}

/// Drives rounds until no failures remain (or `max_rounds` is hit)
#[derive(Debug)]
pub struct RetryController {
    round: RoundState,
    round_number: u32,
    max_rounds: Option<u32>,
    succeeded: usize,
    retried: usize,
}

impl RetryController {
    pub fn new(total: usize, max_rounds: Option<u32>) -> Self {
        Self {
            round: RoundState::new(total),
            round_number: 1,
            max_rounds,
            succeeded: 0,
            retried: 0,
        }
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// 1-based number of the current round
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Compounds stored across all rounds
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Failure occurrences across all rounds
    pub fn retried(&self) -> usize {
        self.retried
    }

    pub fn on_batch_complete(
        &mut self,
        successes: usize,
        failures: Vec<CompoundId>,
    ) -> Result<RoundDecision> {
        let closure = self.round.record_batch(successes, failures)?;
        self.succeeded += successes;
        let Some(closure) = closure else {
            return Ok(RoundDecision::Continue);
        };

        info!(
            round = self.round_number,
            succeeded = self.round.success_count(),
            failed = self.round.failed_ids().len(),
            "All requests are resolved!"
        );

        match closure {
            RoundClosure::Resolved => {
                info!(round = self.round_number, "No fails");
                Ok(RoundDecision::Finished)
            },
            RoundClosure::Retry(failed) => {
                let ids: Vec<u64> = failed.iter().map(|id| id.get()).collect();
                warn!(round = self.round_number, ?ids, "These ids were failed to fetch");
                self.retried += failed.len();

                if self.max_rounds.is_some_and(|max| self.round_number >= max) {
                    return Err(IngestError::RetriesExhausted {
                        rounds: self.round_number,
                        failed,
                    });
                }

                self.round_number += 1;
                self.round = RoundState::new(failed.len());
                info!(round = self.round_number, count = failed.len(), "Retrying...");
                Ok(RoundDecision::Retry(failed.into_iter().collect()))
            },
        }
    }
}
