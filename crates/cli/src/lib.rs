//! `pdsstac`: a command-line interface for the pdsstac mirror pipeline.
//!
//! Grounded on `Rustac`/`Command` in
//! `examples/stac-utils-rustac/crates/cli/src/lib.rs`: a `clap::Parser`
//! struct with global flags, a `clap::Subcommand` enum dispatched from
//! `run`, `tracing-subscriber` layered with `tracing-indicatif` for
//! progress-aware logging, and `anyhow` for top-level error handling
//! instead of a crate-local `thiserror` enum (every other crate in this
//! workspace defines one; the CLI is the one exception, matching the
//! teacher).

mod config;
pub mod orchestrator;

pub use config::RunConfig;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{fmt::writer::MakeWriterExt, layer::SubscriberExt, util::SubscriberInitExt};

/// pdsstac: mirrors planetary-science data from the ODE REST web service
/// and the ODE archive website into a local STAC tree.
#[derive(Debug, Parser)]
#[command(name = "pdsstac", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base directory for the registry, file cache, and STAC tree.
    #[arg(long, global = true, default_value = "./pdsstac-data")]
    database: PathBuf,

    /// Restrict to this solar-system body (e.g. `mercury`).
    #[arg(long, global = true)]
    body: Option<String>,

    /// Restrict to this dataset id.
    #[arg(long = "dataset-id", global = true)]
    dataset_id: Option<String>,

    /// Bounded worker pool size for downloads.
    #[arg(long = "nb-workers", global = true, default_value_t = 3)]
    nb_workers: usize,

    /// Caps the number of record pages downloaded per collection.
    #[arg(long, global = true)]
    sample: Option<usize>,

    /// Records-API page size.
    #[arg(long = "nb-records-per-page", global = true, default_value_t = 5000)]
    nb_records_per_page: i64,

    /// Timeout, in seconds, applied to each PDS3 label parse.
    #[arg(long = "parser-timeout", global = true, default_value_t = 30)]
    parser_timeout: u64,

    /// Render `indicatif` progress bars.
    #[arg(long = "progress-bar", global = true, default_value_t = false)]
    progress_bar: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

/// A pdsstac subcommand.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pulls data from the ODE REST web service into the local cache.
    Extract {
        #[command(subcommand)]
        kind: ExtractKind,
    },
    /// Converts cached data into the mirrored STAC tree.
    Transform {
        #[command(subcommand)]
        kind: TransformKind,
    },
    /// Checks whether any registered collection's cached record count is
    /// stale against the live ODE registry, without downloading anything.
    CheckUpdate,
}

/// `extract` kind selectors.
#[derive(Debug, Subcommand)]
pub enum ExtractKind {
    /// Queries the ODE registry and caches the resulting collection
    /// descriptors (`Extract.Registry`).
    Registry,
    /// Downloads every cached collection's record pages
    /// (`Extract.Records`).
    Records,
    /// Crawls the ODE archive website for each cached collection's PDS3
    /// catalogs (`Extract.Website`).
    Website,
}

/// `transform` kind selectors.
#[derive(Debug, Subcommand)]
pub enum TransformKind {
    /// Converts cached record pages into STAC items
    /// (`Transform.Records`).
    Records,
    /// Builds the mission/platform/instrument/dataset catalog chain
    /// (`Transform.Catalogs`).
    Catalogs,
}

impl Cli {
    /// Runs the parsed command.
    ///
    /// If `init_tracing_subscriber` is `false`, the caller has already set
    /// up logging (mirrors `Rustac::run`'s same-named parameter).
    pub async fn run(self, init_tracing_subscriber: bool) -> anyhow::Result<()> {
        if init_tracing_subscriber {
            let indicatif_layer = IndicatifLayer::new();
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(indicatif_layer.get_stderr_writer().with_max_level(self.log_level().unwrap_or(Level::WARN))),
                )
                .with(indicatif_layer)
                .init();
        }

        let config = self.config();

        let run = async {
            match self.command {
                Command::Extract { kind: ExtractKind::Registry } => orchestrator::extract_registry(config).await,
                Command::Extract { kind: ExtractKind::Records } => orchestrator::extract_records(config).await,
                Command::Extract { kind: ExtractKind::Website } => orchestrator::extract_website(config).await,
                Command::Transform { kind: TransformKind::Records } => orchestrator::transform_records(config).await,
                Command::Transform { kind: TransformKind::Catalogs } => orchestrator::transform_catalogs(config).await,
                Command::CheckUpdate => orchestrator::check_update(config).await,
            }
        };

        tokio::select! {
            result = run => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("interrupted, exiting");
                std::process::exit(2);
            }
        }
    }

    /// The parsed subcommand, for tests that check `clap` derivation
    /// without spawning a subprocess.
    pub fn command(&self) -> &Command {
        &self.command
    }

    fn config(&self) -> RunConfig {
        RunConfig {
            database: self.database.clone(),
            body: self.body.clone(),
            dataset_id: self.dataset_id.clone(),
            nb_workers: self.nb_workers,
            sample: self.sample,
            nb_records_per_page: self.nb_records_per_page,
            parser_timeout: Duration::from_secs(self.parser_timeout),
            progress_bar: self.progress_bar,
        }
    }

    fn log_level(&self) -> Option<Level> {
        match self.verbosity.log_level()? {
            clap_verbosity_flag::Level::Error => Some(Level::ERROR),
            clap_verbosity_flag::Level::Warn => Some(Level::WARN),
            clap_verbosity_flag::Level::Info => Some(Level::INFO),
            clap_verbosity_flag::Level::Debug => Some(Level::DEBUG),
            clap_verbosity_flag::Level::Trace => Some(Level::TRACE),
        }
    }
}

#[cfg(test)]
use {assert_cmd as _, rstest as _, tempfile as _};
