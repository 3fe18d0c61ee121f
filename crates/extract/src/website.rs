//! `Extract.Website`: the ODE archive website crawler and the catalog
//! discovery algorithm that turns a [`CollectionDescriptor`] into the set
//! of PDS3 catalog URLs that describe it.
//!
//! Grounded on `Crawler`/`PDSCatalogDescription` in
//! `examples/original_source/pds_crawler/extractor/pds_ode_website.py`.
//! The "No files exist in this folder" detection and retry/backoff already
//! live in `pdsstac-http`'s `Fetcher`, so `Crawler` here only adds the
//! directory-listing parse on top of a successful fetch.

use crate::error::Error;
use pdsstac_http::{parse_directory_listing, DirEntry, Fetcher};
use pdsstac_models::report::{Report, Sink};
use pdsstac_models::pds3::Volume;
use pdsstac_models::CollectionDescriptor;
use pdsstac_pds3::GrammarKind;
use pdsstac_storage::FileCache;
use std::collections::HashMap;
use std::time::Duration;

/// The ODE archive website's host. Threaded as a parameter through
/// discovery rather than hardcoded, so tests can point at a mock server.
pub const DATASET_EXPLORER_HOST: &str = "https://ode.rsl.wustl.edu";

/// Thin wrapper over [`Fetcher`] that parses the fetched page as a
/// directory listing. The "empty folder"/retry handling already lives in
/// `Fetcher::get`; this just adds the HTML table parse.
pub struct Crawler<'a> {
    fetcher: &'a Fetcher,
}

impl<'a> Crawler<'a> {
    /// Wraps `fetcher` as a directory-listing crawler.
    pub fn new(fetcher: &'a Fetcher) -> Crawler<'a> {
        Crawler { fetcher }
    }

    /// Fetches `url` and parses its last `<table>` as a directory listing.
    /// Returns [`Error::Http`]'s `EmptyFolder` variant unchanged when the
    /// page reports no files.
    pub async fn list(&self, url: &str) -> Result<Vec<DirEntry>, Error> {
        let body = self.fetcher.get(url).await?;
        Ok(parse_directory_listing(&String::from_utf8_lossy(&body)))
    }
}

/// Builds the ODE "dataset explorer" URL for `desc`/`record` against
/// `host`, substituting `volume_id` (which may differ from
/// `record.pds_volume_id` during the S2/S3 resolution retry).
pub fn dataset_explorer_url(host: &str, desc: &CollectionDescriptor, ihid: &str, iid: &str, data_set_id: &str, volume_id: &str) -> String {
    let body = desc.body.to_ascii_lowercase();
    format!(
        "{host}/{body}/DataSetExplorer.aspx?target={body}&instrumenthost={ihid}&instrumentid={iid}&datasetid={data_set_id}&volumeid={volume_id}"
    )
}

/// The outcome of catalog discovery for one collection: every resolved
/// catalog-type URL, plus the `voldesc.cat` URL it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredCatalogs {
    /// `voldesc.cat`'s own URL.
    pub volume_description_url: String,
    /// The volume id actually used once resolved (may differ from the
    /// sample record's reported id, see the S2/S3 retry).
    pub resolved_volume_id: String,
    /// `(catalog_type, url)` pairs for every catalog named in the volume's
    /// `CATALOG` object that could be resolved to a URL.
    pub catalog_urls: Vec<(&'static str, String)>,
}

impl DiscoveredCatalogs {
    /// Every URL that needs downloading: `voldesc.cat` plus every
    /// resolved catalog.
    pub fn all_urls(&self) -> Vec<String> {
        let mut urls = vec![self.volume_description_url.clone()];
        urls.extend(self.catalog_urls.iter().map(|(_, url)| url.clone()));
        urls
    }
}

/// Runs the catalog discovery algorithm (states S1-S6 of the spec's state
/// machine; S0's "no sample record" check is the caller's
/// responsibility — see [`crate::records::stream_cached_pages`]).
pub async fn discover_catalogs(fetcher: &Fetcher, desc: &CollectionDescriptor, ihid: &str, iid: &str, data_set_id: &str, sample_volume_id: &str) -> Result<DiscoveredCatalogs, Error> {
    discover_catalogs_at(DATASET_EXPLORER_HOST, fetcher, desc, ihid, iid, data_set_id, sample_volume_id).await
}

/// [`discover_catalogs`] against an arbitrary `host`, so tests can point it
/// at a mock server.
pub async fn discover_catalogs_at(
    host: &str,
    fetcher: &Fetcher,
    desc: &CollectionDescriptor,
    ihid: &str,
    iid: &str,
    data_set_id: &str,
    sample_volume_id: &str,
) -> Result<DiscoveredCatalogs, Error> {
    let crawler = Crawler::new(fetcher);

    // S2/S3: find voldesc.cat, retrying once with a volume id discovered
    // from the bare (no volumeid) listing if the sample record's id is
    // stale.
    let (volume_description_url, resolved_volume_id) = find_volume_description(host, &crawler, desc, ihid, iid, data_set_id, sample_volume_id).await?;

    // S4: fetch and parse voldesc.cat.
    let volume = fetch_volume_description(fetcher, &volume_description_url).await?;

    // S5: list the catalog/ subdirectory; an empty folder is not fatal.
    let catalog_url = format!(
        "{}&pathtovol=catalog/",
        dataset_explorer_url(host, desc, ihid, iid, data_set_id, &resolved_volume_id)
    );
    let listing = match crawler.list(&catalog_url).await {
        Ok(listing) => listing,
        Err(Error::Http(pdsstac_http::Error::EmptyFolder)) => Vec::new(),
        Err(err) => return Err(err),
    };
    let filename_to_url: HashMap<String, String> = listing.into_iter().map(|entry| (entry.name.to_ascii_lowercase(), entry.url)).collect();

    // S6: resolve each catalog-type's filename(s) to URL(s).
    let mut catalog_urls = Vec::new();
    for (catalog_type, filename) in volume.catalog.entries() {
        match filename_to_url.get(&filename.to_ascii_lowercase()) {
            Some(url) => catalog_urls.push((catalog_type, url.clone())),
            None => tracing::warn!(catalog_type, filename, "cannot find catalog in catalog/ listing"),
        }
    }

    Ok(DiscoveredCatalogs { volume_description_url, resolved_volume_id, catalog_urls })
}

async fn find_volume_description(host: &str, crawler: &Crawler<'_>, desc: &CollectionDescriptor, ihid: &str, iid: &str, data_set_id: &str, sample_volume_id: &str) -> Result<(String, String), Error> {
    let mut volume_id = sample_volume_id.to_string();
    for attempt in 0..2 {
        let url = dataset_explorer_url(host, desc, ihid, iid, data_set_id, &volume_id);
        let entries = crawler.list(&url).await?;
        if let Some(entry) = entries.iter().find(|entry| entry.name.eq_ignore_ascii_case("voldesc.cat")) {
            return Ok((entry.url.clone(), volume_id));
        }
        if attempt == 0 {
            let bare_url = dataset_explorer_url(host, desc, ihid, iid, data_set_id, "");
            let renamed = crawler.list(&bare_url).await?;
            match renamed.first() {
                Some(candidate) => volume_id = candidate.name.clone(),
                None => break,
            }
        }
    }
    Err(Error::NoVolumeDescription(desc.identity_string()))
}

async fn fetch_volume_description(fetcher: &Fetcher, url: &str) -> Result<Volume, Error> {
    let body = fetcher.get(url).await?;
    match pdsstac_pds3::parse_catalog(GrammarKind::VolumeDescription, String::from_utf8_lossy(&body).into_owned(), pdsstac_pds3::DEFAULT_TIMEOUT)? {
        pdsstac_pds3::ParsedCatalog::VolumeDescription(volume) => Ok(volume),
        _ => unreachable!("VolumeDescription grammar always yields ParsedCatalog::VolumeDescription"),
    }
}

/// Downloads every URL discovered for `desc` (`voldesc.cat` plus every
/// resolved catalog) through the file cache in one batch.
pub async fn bulk_download(fetcher: Fetcher, cache: &FileCache, desc: &CollectionDescriptor, discovered: &DiscoveredCatalogs, workers: usize, sleep_between: Duration) -> Result<usize, Error> {
    Ok(cache.download(desc, fetcher, &discovered.all_urls(), workers, sleep_between).await?)
}

/// `getOdeCatalogs`: parses every downloaded catalog file for `desc` into
/// its typed model, keyed by catalog type (`"volume_description"` is
/// always present). Every catalog type maps to a `Vec`, since a volume can
/// name several files under the same type (e.g. multiple
/// `DATA_SET_CATALOG` entries) — see `PDSCatalogDescription.get_ode_catalogs`
/// in `examples/original_source/pds_crawler/extractor/pds_ode_website.py`,
/// which stores a list under `cat_type` whenever the volume's `CATALOG`
/// field names more than one file. A parse failure for one file is
/// reported via `sink` and that file is skipped; the rest are still
/// returned.
pub fn get_ode_catalogs(cache: &FileCache, desc: &CollectionDescriptor, discovered: &DiscoveredCatalogs, parser_timeout: Duration, sink: &mut dyn Sink) -> Result<HashMap<String, Vec<pdsstac_pds3::ParsedCatalog>>, Error> {
    let mut catalogs: HashMap<String, Vec<pdsstac_pds3::ParsedCatalog>> = HashMap::new();

    match cache.get_volume_description(desc, parser_timeout) {
        Ok(volume) => {
            catalogs.insert("volume_description".to_string(), vec![pdsstac_pds3::ParsedCatalog::VolumeDescription(volume)]);
        }
        Err(err) => sink.report(Report::new(discovered.volume_description_url.clone(), err.to_string())),
    }

    for (catalog_type, url) in &discovered.catalog_urls {
        let Some(kind) = GrammarKind::from_catalog_type(catalog_type) else {
            continue;
        };
        let filename = pdsstac_storage::destination_filename(url);
        match cache.get_catalog(desc, &filename, kind, parser_timeout) {
            Ok(parsed) => catalogs.entry(catalog_type.to_string()).or_default().push(parsed),
            Err(err) => sink.report(Report::new(url.clone(), err.to_string())),
        }
    }

    Ok(catalogs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn dataset_explorer_url_substitutes_fields() {
        let desc = CollectionDescriptor {
            body: "mercury".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            dataset_id: "izenberg-data".to_string(),
            product_count: 1,
            has_valid_footprints: true,
            min_orbit: None,
            max_orbit: None,
            min_observation_time: None,
            max_observation_time: None,
            special_values: Vec::new(),
            valid_targets: Vec::new(),
        };
        let url = dataset_explorer_url(DATASET_EXPLORER_HOST, &desc, "MESS", "MDIS", "izenberg-data", "MSGRMDS_1001");
        assert!(url.contains("target=mercury"));
        assert!(url.contains("instrumenthost=MESS"));
        assert!(url.contains("volumeid=MSGRMDS_1001"));
    }

    fn sample_desc() -> CollectionDescriptor {
        CollectionDescriptor {
            body: "mercury".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            dataset_id: "izenberg-data".to_string(),
            product_count: 1,
            has_valid_footprints: true,
            min_orbit: None,
            max_orbit: None,
            min_observation_time: None,
            max_observation_time: None,
            special_values: Vec::new(),
            valid_targets: Vec::new(),
        }
    }

    #[tokio::test]
    async fn find_volume_description_retries_with_resolved_volume_id() {
        let mut server = mockito::Server::new_async().await;
        let stale_listing = r#"<html><body><table><tr><td><a href="/x/other.cat">other.cat</a></td></tr></table></body></html>"#;
        let bare_listing = r#"<html><body><table><tr><td><a href="/x/MSGRMDS_2001" title="">MSGRMDS_2001</a></td><td><a href="/x/MSGRMDS_2001/">MSGRMDS_2001</a></td></tr></table></body></html>"#;
        let found_listing = r#"<html><body><table><tr><td><a href="https://example.org/voldesc.cat">voldesc.cat</a></td></tr></table></body></html>"#;

        let _stale = server.mock("GET", mockito::Matcher::Regex("volumeid=STALE".to_string())).with_status(200).with_header("content-type", "text/html").with_body(stale_listing).create_async().await;
        let _bare = server.mock("GET", mockito::Matcher::Regex("volumeid=$".to_string())).with_status(200).with_header("content-type", "text/html").with_body(bare_listing).create_async().await;
        let _found = server.mock("GET", mockito::Matcher::Regex("volumeid=MSGRMDS_2001".to_string())).with_status(200).with_header("content-type", "text/html").with_body(found_listing).create_async().await;

        let fetcher = Fetcher::new(Client::new(), 3);
        let crawler = Crawler::new(&fetcher);
        let host = server.url();
        let desc = sample_desc();

        let (voldesc_url, resolved_volume_id) = find_volume_description(&host, &crawler, &desc, "MESS", "MDIS", "izenberg-data", "STALE").await.unwrap();

        assert_eq!(voldesc_url, "https://example.org/voldesc.cat");
        assert_eq!(resolved_volume_id, "MSGRMDS_2001");
    }
}
