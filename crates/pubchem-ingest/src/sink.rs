//! Persistence of normalized compounds

use async_trait::async_trait;
use pubchem_common::ParsedCompound;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

#[async_trait]
pub trait CompoundSink: Send + Sync {
    /// Append a batch of records. Callers never pass the same CID twice in a job.
    async fn create_many(&self, compounds: Vec<ParsedCompound>) -> Result<()>;
}

/// Appends records to a JSON Lines file, one compound per line
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    /// Create the sink, making sure the parent directory exists
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CompoundSink for JsonLinesSink {
    async fn create_many(&self, compounds: Vec<ParsedCompound>) -> Result<()> {
        if compounds.is_empty() {
            return Ok(());
        }

        let path = self.path.clone();
        let count = compounds.len();
        tokio::task::spawn_blocking(move || serde_jsonlines::append_json_lines(&path, &compounds))
            .await??;

        debug!(count, path = %self.path.display(), "Stored compounds");
        Ok(())
    }
}
