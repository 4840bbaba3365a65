//! PubChem Ingest - compound range import tool

use anyhow::Result;
use clap::Parser;
use pubchem_common::logging::{init_logging, LogConfig, LogLevel};
use pubchem_ingest::{import, IngestConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pubchem-ingest")]
#[command(author, version, about = "Import a range of PubChem compounds")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// First CID to import (inclusive)
    from: Option<String>,

    /// Last CID to import (inclusive)
    to: Option<String>,

    /// Compounds fetched concurrently per tick
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Milliseconds between batches
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Give up after this many retry rounds (default: retry until done)
    #[arg(long)]
    max_rounds: Option<u32>,

    /// JSON Lines output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PUG-View compound endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Env-derived config with command line flags on top
    fn ingest_config(&self) -> Result<IngestConfig> {
        let mut config = IngestConfig::from_env()?;

        if let Some(size) = self.batch_size {
            config = config.with_batch_size(size);
        }
        if let Some(ms) = self.interval_ms {
            config = config.with_request_interval_ms(ms);
        }
        if let Some(rounds) = self.max_rounds {
            config = config.with_max_rounds(rounds);
        }
        if let Some(ref output) = self.output {
            config = config.with_output_path(output.clone());
        }
        if let Some(ref url) = self.api_url {
            config = config.with_api_base_url(url.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Both positional ids as integers, or `None` when either is missing or
    /// not a number.
    fn range(&self) -> Option<(i64, i64)> {
        let parse = |arg: &Option<String>| arg.as_deref().and_then(|s| s.trim().parse::<i64>().ok());
        Some((parse(&self.from)?, parse(&self.to)?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("pubchem-ingest")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    let Some((from, to)) = cli.range() else {
        info!("No compound range given, nothing to import");
        return Ok(());
    };

    let config = cli.ingest_config()?;
    info!(
        from,
        to,
        batch_size = config.batch_size,
        interval_ms = config.request_interval_ms,
        output = %config.output_path.display(),
        "Importing PubChem compounds"
    );

    let summary = import(from, to, config).await?;

    info!(
        rounds = summary.rounds,
        succeeded = summary.succeeded,
        retried = summary.retried,
        "Import complete"
    );
    Ok(())
}
