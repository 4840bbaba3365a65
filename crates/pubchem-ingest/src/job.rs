//! Import job: rounds of throttled batches until every CID is stored
//!
//! The job loop is the only owner of the pending set and the round counters.
//! It reacts to two event sources:
//!
//! - ticks from the [`Throttle`], each tagged with the round that started it
//! - finished batch tasks from a `JoinSet`
//!
//! A tick pops one batch and spawns it. The tick that empties the pending set
//! stops the throttle, so the last batch still runs to completion. Finished
//! batches go to the [`RetryController`], which either waits for more
//! batches, ends the job, or hands back the failures as the next round.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, trace};

use crate::batch::{extract_batch, BatchReport, BatchRunner};
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::fetch::CompoundFetcher;
use crate::normalize::Normalizer;
use crate::range::PendingSet;
use crate::round::{RetryController, RoundDecision};
use crate::sink::CompoundSink;
use crate::throttle::Throttle;

/// Outcome of a finished job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummary {
    /// Rounds executed, including the final clean one
    pub rounds: u32,
    /// Compounds stored
    pub succeeded: usize,
    /// Failure occurrences that were retried
    pub retried: usize,
}

pub struct Job {
    config: IngestConfig,
    runner: BatchRunner,
}

impl Job {
    pub fn new(
        config: IngestConfig,
        fetcher: Arc<dyn CompoundFetcher>,
        normalizer: Arc<dyn Normalizer>,
        sink: Arc<dyn CompoundSink>,
    ) -> Self {
        Self {
            config,
            runner: BatchRunner::new(fetcher, normalizer, sink),
        }
    }

    /// Run rounds over `pending` until no CID fails.
    ///
    /// Without `max_rounds` this only returns once every id has been stored,
    /// or on a fatal error.
    pub async fn run(&self, pending: PendingSet) -> Result<JobSummary> {
        self.config.validate()?;

        let mut pending = pending;
        if pending.is_empty() {
            return Ok(JobSummary {
                rounds: 0,
                succeeded: 0,
                retried: 0,
            });
        }

        let batch_size = self.config.batch_size;
        let mut controller = RetryController::new(pending.len(), self.config.max_rounds);
        let mut throttle = Throttle::new(self.config.request_interval());
        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<u32>();
        let mut batches: JoinSet<Result<BatchReport>> = JoinSet::new();

        start_round(&mut throttle, &tick_tx, controller.round_number(), pending.len());

        loop {
            if stalled(&pending, &batches, &throttle) {
                throttle.stop();
                return Err(IngestError::RoundAccounting(format!(
                    "round {} is still open with nothing pending or in flight",
                    controller.round_number()
                )));
            }

            tokio::select! {
                Some(tick_round) = tick_rx.recv() => {
                    if tick_round != controller.round_number() || pending.is_empty() {
                        trace!(tick_round, "Ignoring tick with nothing to extract");
                        continue;
                    }

                    let ids = extract_batch(&mut pending, batch_size);
                    if pending.is_empty() {
                        throttle.stop();
                    }

                    trace!(round = tick_round, size = ids.len(), remaining = pending.len(), "Dispatching batch");
                    let runner = self.runner.clone();
                    batches.spawn(async move { runner.run(ids).await });
                },
                Some(joined) = batches.join_next() => {
                    let decision = joined
                        .map_err(IngestError::from)
                        .and_then(|batch| batch)
                        .and_then(|report| {
                            info!(
                                round = controller.round_number(),
                                stored = report.stored,
                                failed = report.failed.len(),
                                "Batch complete"
                            );
                            controller.on_batch_complete(report.stored, report.failed)
                        });

                    match decision {
                        Ok(RoundDecision::Continue) => {},
                        Ok(RoundDecision::Finished) => {
                            throttle.stop();
                            return Ok(JobSummary {
                                rounds: controller.round_number(),
                                succeeded: controller.succeeded(),
                                retried: controller.retried(),
                            });
                        },
                        Ok(RoundDecision::Retry(next)) => {
                            pending = next;
                            start_round(&mut throttle, &tick_tx, controller.round_number(), pending.len());
                        },
                        Err(e) => {
                            error!(error = %e, round = controller.round_number(), "Import job failed");
                            throttle.stop();
                            drain(&mut batches).await;
                            return Err(e);
                        },
                    }
                },
            }
        }
    }
}

fn start_round(
    throttle: &mut Throttle,
    tick_tx: &mpsc::UnboundedSender<u32>,
    round: u32,
    total: usize,
) {
    info!(round, total, "Starting round");
    let tx = tick_tx.clone();
    throttle.limit(move || {
        let _ = tx.send(round);
    });
}

/// No tick can extract anything and no batch can report back
fn stalled(
    pending: &PendingSet,
    batches: &JoinSet<Result<BatchReport>>,
    throttle: &Throttle,
) -> bool {
    pending.is_empty() && batches.is_empty() && !throttle.is_running()
}

/// Let in-flight batches finish after a fatal error; their outcomes are dropped
async fn drain(batches: &mut JoinSet<Result<BatchReport>>) {
    while let Some(joined) = batches.join_next().await {
        if let Ok(Err(e)) | Err(e) = joined.map_err(IngestError::from) {
            error!(error = %e, "Batch failed while draining");
        }
    }
}
