//! Per-verb orchestration: a plain `for` loop over `Vec<CollectionDescriptor>`,
//! `await`-ing each collection's extract/transform call in turn.
//!
//! Grounded on `Cli.process`'s top-level verb dispatch in
//! `examples/original_source/pds_crawler/cli.py` (one function per verb,
//! iterating every cached collection in sequence) and on the bounded
//! worker pool already built into `pdsstac_storage::FileCache::download`/
//! `pdsstac_http::download_all` for the per-collection parallel downloads.

use crate::RunConfig;
use indicatif::{ProgressBar, ProgressStyle};
use pdsstac_extract::{registry, website};
use pdsstac_http::Fetcher;
use pdsstac_models::report::{MarkdownSink, Sink};
use pdsstac_models::{CollectionDescriptor, RecordDescriptor};
use pdsstac_storage::{FileCache, Registry, StacTree};
use pdsstac_transform::{build_catalogs, CatalogBundle};
use reqwest::Client;
use std::time::Duration;

/// Politeness delay between successive requests in a download batch,
/// matching `parallel_requests(..., time_sleep=0.001)` in
/// `examples/original_source/pds_crawler/extractor/pds_ws.py`.
const SLEEP_BETWEEN: Duration = Duration::from_millis(1);
const REPORT_FILE: &str = "report.md";

fn fetcher() -> Fetcher {
    Fetcher::new(Client::new(), RunConfig::FETCH_ATTEMPTS)
}

fn progress_bar(enabled: bool, len: u64) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}

fn cached_descriptors(store: &Registry, config: &RunConfig) -> anyhow::Result<Vec<CollectionDescriptor>> {
    Ok(registry::load_pds_collections_from_cache(store, config.body.as_deref(), config.dataset_id.as_deref())?)
}

/// Resolves the sample record used to seed website catalog discovery for
/// `desc` (state machine `S0`). Caller's responsibility per
/// `pdsstac_extract::website`'s module doc comment.
fn pick_sample_record(cache: &FileCache, desc: &CollectionDescriptor, sink: &mut dyn Sink) -> Result<RecordDescriptor, pdsstac_extract::Error> {
    let pages = pdsstac_extract::records::stream_cached_pages(cache, desc, sink)?;
    pages
        .into_iter()
        .flat_map(|page| page.records)
        .next()
        .ok_or_else(|| pdsstac_extract::Error::NoRecord(desc.identity_string()))
}

fn flush_sink(config: &RunConfig, sink: &MarkdownSink) -> anyhow::Result<()> {
    if sink.reports().is_empty() {
        return Ok(());
    }
    let path = config.database.join(REPORT_FILE);
    sink.flush(&path)?;
    tracing::warn!(path = %path.display(), count = sink.reports().len(), "wrote failure report");
    Ok(())
}

/// `extract registry`: queries the ODE registry and caches the resulting
/// descriptors.
pub async fn extract_registry(config: RunConfig) -> anyhow::Result<()> {
    let store = Registry::open(&config.database)?;
    let url = registry::registry_url(config.body.as_deref())?;
    let body = fetcher().get(&url).await?;
    let (stats, descriptors) = registry::parse_response(&body, config.dataset_id.as_deref())?;
    registry::cache_pds_collections(&store, &descriptors)?;
    tracing::info!(count = stats.count, skipped = stats.skip, errors = stats.errors, kept = descriptors.len(), nb_records = stats.nb_records, "extract registry complete");
    Ok(())
}

/// `extract records`: downloads every cached collection's record pages.
pub async fn extract_records(config: RunConfig) -> anyhow::Result<()> {
    let store = Registry::open(&config.database)?;
    let cache = FileCache::open(&config.database);
    let descriptors = cached_descriptors(&store, &config)?;

    let bar = progress_bar(config.progress_bar, descriptors.len() as u64);
    for desc in &descriptors {
        bar.set_message(desc.to_string());
        let mut urls = pdsstac_extract::records::generate_urls_collection(&store, desc, None, Some(config.nb_records_per_page))?;
        if let Some(sample) = config.sample {
            urls.truncate(sample);
        }
        let downloaded = cache.download(desc, fetcher(), &urls, config.nb_workers, SLEEP_BETWEEN).await?;
        tracing::info!(collection = %desc, downloaded, "extract records complete");
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}

/// `extract website`: crawls the ODE archive website for each cached
/// collection's PDS3 catalog files and caches them on disk.
pub async fn extract_website(config: RunConfig) -> anyhow::Result<()> {
    let store = Registry::open(&config.database)?;
    let cache = FileCache::open(&config.database);
    let descriptors = cached_descriptors(&store, &config)?;
    let mut sink = MarkdownSink::new();

    let bar = progress_bar(config.progress_bar, descriptors.len() as u64);
    for desc in &descriptors {
        bar.set_message(desc.to_string());
        match pick_sample_record(&cache, desc, &mut sink) {
            Ok(record) => {
                let discovered = website::discover_catalogs(&fetcher(), desc, &record.ihid, &record.iid, &record.data_set_id, &record.pds_volume_id).await?;
                let downloaded = website::bulk_download(fetcher(), &cache, desc, &discovered, config.nb_workers, SLEEP_BETWEEN).await?;
                tracing::info!(collection = %desc, downloaded, "extract website complete");
            }
            Err(pdsstac_extract::Error::NoRecord(id)) => tracing::warn!(collection = id, "no cached record available to seed catalog discovery, skipping"),
            Err(err) => return Err(err.into()),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    flush_sink(&config, &sink)
}

/// Re-crawls the archive website's listing for `desc` (no new files are
/// fetched that `extract website` hasn't already cached — this only
/// rebuilds the catalog-type -> filename mapping `get_ode_catalogs`
/// needs) and parses every cached catalog file into a [`CatalogBundle`].
async fn load_bundle(cache: &FileCache, desc: &CollectionDescriptor, parser_timeout: Duration, sink: &mut dyn Sink) -> Result<Option<CatalogBundle>, pdsstac_extract::Error> {
    let record = match pick_sample_record(cache, desc, sink) {
        Ok(record) => record,
        Err(pdsstac_extract::Error::NoRecord(id)) => {
            tracing::warn!(collection = id, "no cached record available, skipping");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    let discovered = website::discover_catalogs(&fetcher(), desc, &record.ihid, &record.iid, &record.data_set_id, &record.pds_volume_id).await?;
    let catalogs = website::get_ode_catalogs(cache, desc, &discovered, parser_timeout, sink)?;
    Ok(Some(CatalogBundle::from_catalogs(catalogs)))
}

/// `transform catalogs`: builds the mission/platform/instrument/dataset
/// catalog chain for every cached collection.
pub async fn transform_catalogs(config: RunConfig) -> anyhow::Result<()> {
    let store = Registry::open(&config.database)?;
    let cache = FileCache::open(&config.database);
    let tree = StacTree::open(&config.database)?;
    let descriptors = cached_descriptors(&store, &config)?;
    let mut sink = MarkdownSink::new();

    let bar = progress_bar(config.progress_bar, descriptors.len() as u64);
    for desc in &descriptors {
        bar.set_message(desc.to_string());
        if let Some(bundle) = load_bundle(&cache, desc, config.parser_timeout, &mut sink).await? {
            let build = build_catalogs(&tree, desc, &bundle)?;
            tracing::info!(collection = %desc, instruments = build.instruments.len(), datasets = build.datasets.len(), "transform catalogs complete");
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    flush_sink(&config, &sink)
}

/// `transform records`: converts every cached collection's record pages
/// into STAC items, building the catalog chain first so there is a
/// resolved dataset directory to write into.
pub async fn transform_records(config: RunConfig) -> anyhow::Result<()> {
    let store = Registry::open(&config.database)?;
    let cache = FileCache::open(&config.database);
    let tree = StacTree::open(&config.database)?;
    let descriptors = cached_descriptors(&store, &config)?;
    let mut sink = MarkdownSink::new();

    let bar = progress_bar(config.progress_bar, descriptors.len() as u64);
    for desc in &descriptors {
        bar.set_message(desc.to_string());
        if let Some(bundle) = load_bundle(&cache, desc, config.parser_timeout, &mut sink).await? {
            let build = build_catalogs(&tree, desc, &bundle)?;
            let outcome = pdsstac_transform::transform_records(&tree, &cache, desc, &build, &mut sink)?;
            tracing::info!(
                collection = %desc,
                added = outcome.items_added,
                skipped = outcome.items_skipped_existing,
                errors = outcome.conversion_errors,
                "transform records complete"
            );
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    flush_sink(&config, &sink)
}

/// `check-update`: compares cached collection descriptors against a fresh
/// ODE registry query, without downloading or transforming anything.
pub async fn check_update(config: RunConfig) -> anyhow::Result<()> {
    let store = Registry::open(&config.database)?;
    let cached = cached_descriptors(&store, &config)?;
    if cached.is_empty() {
        tracing::warn!("no cached collections to check; run `extract registry` first");
        return Ok(());
    }

    let url = registry::registry_url(config.body.as_deref())?;
    let body = fetcher().get(&url).await?;
    let (_, live) = registry::parse_response(&body, config.dataset_id.as_deref())?;

    let mut stale = 0usize;
    for desc in &cached {
        match live.iter().find(|candidate| candidate.identity_tokens() == desc.identity_tokens()) {
            Some(current) if current.product_count != desc.product_count => {
                stale += 1;
                println!("{desc} changed: {} -> {} products", desc.product_count, current.product_count);
            }
            Some(_) => {}
            None => {
                stale += 1;
                println!("{desc} no longer present in the live registry");
            }
        }
    }
    if stale == 0 {
        println!("all {} cached collections are up to date", cached.len());
    }
    Ok(())
}
