//! [`RunConfig`]: the immutable, by-value configuration every orchestrator
//! function runs against, built once from parsed `clap` arguments.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration shared by every `extract`/`transform`/`check-update` verb.
///
/// Built once in [`crate::Cli::run`] and passed by value into every
/// orchestrator call, rather than threading loose parameters through long
/// call chains (Design Notes §9).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base directory for the registry, file cache, and STAC tree.
    pub database: PathBuf,
    /// Restrict to this solar-system body, if given.
    pub body: Option<String>,
    /// Restrict to this dataset id, if given.
    pub dataset_id: Option<String>,
    /// Bounded worker pool size for `Http.Fetcher` downloads.
    pub nb_workers: usize,
    /// Caps the number of record pages downloaded per collection, for
    /// quick smoke runs.
    pub sample: Option<usize>,
    /// Records-API page size.
    pub nb_records_per_page: i64,
    /// Timeout applied to each PDS3 label parse.
    pub parser_timeout: Duration,
    /// Render `indicatif` progress bars.
    pub progress_bar: bool,
}

impl RunConfig {
    /// Builds the fetcher retry/backoff attempt count used by every
    /// orchestrator call (spec.md §5's default of 3, independent of
    /// `nb_workers`).
    pub const FETCH_ATTEMPTS: u32 = 3;
}
