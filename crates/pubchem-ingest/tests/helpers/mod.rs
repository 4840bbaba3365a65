//! Test doubles for job-level tests
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use pubchem_common::{CompoundId, ParsedCompound};
use pubchem_ingest::fetch::{CompoundFetcher, FetchResponse};
use pubchem_ingest::models::{RawCompound, Record};
use pubchem_ingest::sink::CompoundSink;
use pubchem_ingest::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub fn cid(value: i64) -> CompoundId {
    CompoundId::new(value).unwrap()
}

pub fn raw_record(id: CompoundId) -> RawCompound {
    RawCompound {
        record: Record {
            record_type: Some("CID".to_string()),
            record_number: Some(id.get() as i64),
            record_title: Some(format!("Compound {id}")),
            section: Vec::new(),
        },
    }
}

/// Fails each configured CID a fixed number of times, then succeeds.
/// Records every call with the (paused) tokio clock.
#[derive(Default)]
pub struct ScriptedFetcher {
    failures_left: Mutex<HashMap<u64, usize>>,
    calls: Mutex<Vec<(Instant, u64)>>,
    latency: Option<(Duration, Duration)>,
    in_flight: Mutex<(usize, usize)>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_times(self, id: u64, times: usize) -> Self {
        self.failures_left.lock().unwrap().insert(id, times);
        self
    }

    pub fn always_fail(self, id: u64) -> Self {
        self.fail_times(id, usize::MAX)
    }

    /// Each call for `id` takes `base + id * per_id`
    pub fn with_latency(mut self, base: Duration, per_id: Duration) -> Self {
        self.latency = Some((base, per_id));
        self
    }

    /// Highest number of calls that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.in_flight.lock().unwrap().1
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().iter().map(|(_, id)| *id).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls grouped by the instant they were issued, i.e. one group per batch
    pub fn batches(&self) -> Vec<Vec<u64>> {
        self.timed_batches().into_iter().map(|(_, ids)| ids).collect()
    }

    pub fn timed_batches(&self) -> Vec<(Instant, Vec<u64>)> {
        let calls = self.calls.lock().unwrap();
        let mut groups: Vec<(Instant, Vec<u64>)> = Vec::new();
        for (at, id) in calls.iter() {
            match groups.last_mut() {
                Some((last, ids)) if last == at => ids.push(*id),
                _ => groups.push((*at, vec![*id])),
            }
        }
        groups
    }
}

#[async_trait]
impl CompoundFetcher for ScriptedFetcher {
    async fn fetch_by_id(&self, id: CompoundId) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push((Instant::now(), id.get()));

        let fails = match self.failures_left.lock().unwrap().get_mut(&id.get()) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            },
            _ => false,
        };

        if let Some((base, per_id)) = self.latency {
            {
                let mut in_flight = self.in_flight.lock().unwrap();
                in_flight.0 += 1;
                in_flight.1 = in_flight.1.max(in_flight.0);
            }
            tokio::time::sleep(base + per_id * id.get() as u32).await;
            self.in_flight.lock().unwrap().0 -= 1;
        }

        if fails {
            Ok(FetchResponse::Failed(id))
        } else {
            Ok(FetchResponse::Found(raw_record(id)))
        }
    }
}

#[derive(Default)]
pub struct MemorySink {
    stored: Mutex<Vec<ParsedCompound>>,
}

impl MemorySink {
    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.stored.lock().unwrap().iter().map(|c| c.id.get()).collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl CompoundSink for MemorySink {
    async fn create_many(&self, compounds: Vec<ParsedCompound>) -> Result<()> {
        self.stored.lock().unwrap().extend(compounds);
        Ok(())
    }
}
