//! `Extract.Records`: pregenerates records-API URLs for a collection,
//! downloads them through [`pdsstac_storage::FileCache`], and streams the
//! cached `.json` files back out as [`RecordsPage`]s.
//!
//! Grounded on `PdsRecords` in
//! `examples/original_source/pds_crawler/extractor/pds_ws.py` (URL
//! pregeneration, pagination loop, cache streaming) and `PdsRecordModel`/
//! `PdsRecordsModel` in
//! `examples/original_source/pds_crawler/models/ode_ws_models.py` (the
//! per-record JSON shape and the zero-count/empty-page skip rule).

use crate::flexible;
use pdsstac_http::Fetcher;
use pdsstac_models::report::{Report, Sink};
use pdsstac_models::{CollectionDescriptor, ProductFile, RecordDescriptor};
use pdsstac_storage::{FileCache, Registry as RegistryStore};
use serde::Deserialize;
use std::time::Duration;

const SERVICE_ENDPOINT: &str = "https://oderest.rsl.wustl.edu/live2/?";
const DEFAULT_OFFSET: i64 = 1;
const DEFAULT_LIMIT: i64 = 5000;

/// Builds the records-API query params for one page.
fn build_params(desc: &CollectionDescriptor, offset: i64, limit: i64) -> Vec<(String, String)> {
    vec![
        ("query".to_string(), "product".to_string()),
        ("target".to_string(), desc.body.clone()),
        ("results".to_string(), "copmf".to_string()),
        ("ihid".to_string(), desc.ihid.clone()),
        ("iid".to_string(), desc.iid.clone()),
        ("pt".to_string(), desc.pt.clone()),
        ("offset".to_string(), offset.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("output".to_string(), "json".to_string()),
    ]
}

/// Produces `[offset, offset+limit, ...]` page offsets until the
/// cumulative offset exceeds `desc.product_count`, matching
/// `_build_params_for_get_records_pds`'s `while pagination_start <= total`
/// loop.
pub fn page_offsets(desc: &CollectionDescriptor, offset: i64, limit: i64) -> Vec<i64> {
    let mut offsets = Vec::new();
    let mut pagination_start = offset;
    while pagination_start <= desc.product_count {
        offsets.push(pagination_start);
        pagination_start += limit;
    }
    offsets
}

/// Builds every page URL for `desc`, using the pipeline defaults
/// (`offset=1, limit=5000`) unless overridden.
pub fn generate_urls(desc: &CollectionDescriptor, offset: Option<i64>, limit: Option<i64>) -> Vec<String> {
    let offset = offset.unwrap_or(DEFAULT_OFFSET);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    page_offsets(desc, offset, limit)
        .into_iter()
        .map(|page_offset| {
            let query = serde_urlencoded::to_string(build_params(desc, page_offset, limit)).unwrap_or_default();
            format!("{SERVICE_ENDPOINT}{query}")
        })
        .collect()
}

/// Generates and persists the URL list for one collection (resumable:
/// re-running with the same descriptor produces the same URLs, and
/// [`pdsstac_storage::Registry::save_urls`] no-ops on an unchanged list).
pub fn generate_urls_collection(
    store: &RegistryStore,
    desc: &CollectionDescriptor,
    offset: Option<i64>,
    limit: Option<i64>,
) -> Result<Vec<String>, crate::Error> {
    let urls = generate_urls(desc, offset, limit);
    store.save_urls(desc, &urls)?;
    Ok(urls)
}

/// Generates and persists URLs for every collection in `descs`.
pub fn generate_urls_collections(
    store: &RegistryStore,
    descs: &[CollectionDescriptor],
    offset: Option<i64>,
    limit: Option<i64>,
) -> Result<(), crate::Error> {
    for desc in descs {
        generate_urls_collection(store, desc, offset, limit)?;
    }
    Ok(())
}

/// Downloads one collection's records: loads (or generates, if absent)
/// its URL list, optionally truncated to `page_limit` pages for sampling,
/// then hands the list to `Http.Fetcher` via the file cache.
pub async fn download_pds(
    store: &RegistryStore,
    cache: &FileCache,
    fetcher: Fetcher,
    desc: &CollectionDescriptor,
    page_limit: Option<usize>,
    workers: usize,
    sleep_between: Duration,
) -> Result<usize, crate::Error> {
    let mut urls = store.load_urls(desc)?;
    if urls.is_empty() {
        urls = generate_urls_collection(store, desc, None, None)?;
    }
    if let Some(limit) = page_limit {
        urls.truncate(limit);
    }
    Ok(cache.download(desc, fetcher, &urls, workers, sleep_between).await?)
}

/// One decoded records-API response page: the collection's identity plus
/// its non-empty records. `None` is returned by [`parse_cached_page`] when
/// the response reports zero products, matching the original's
/// `Count == "0" → None` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordsPage {
    /// The solar-system body (`target`/`ODEMetaDB`, lowercase).
    pub body: String,
    /// Instrument host id.
    pub ihid: String,
    /// Instrument id.
    pub iid: String,
    /// Product type.
    pub pt: String,
    /// Dataset id.
    pub dataset_id: String,
    /// The page's records, guaranteed non-empty.
    pub records: Vec<RecordDescriptor>,
}

/// Streams every cached `.json` file for `desc`, yielding one
/// [`RecordsPage`] per non-empty file. A malformed file is reported via
/// `sink` and skipped, matching `parse_pds_collection_from_cache`'s
/// `JSONDecodeError` handling.
pub fn stream_cached_pages(cache: &FileCache, desc: &CollectionDescriptor, sink: &mut dyn Sink) -> Result<Vec<RecordsPage>, crate::Error> {
    let mut pages = Vec::new();
    for path in cache.list_record_files(desc)? {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                sink.report(Report::new(path.display().to_string(), err.to_string()));
                continue;
            }
        };
        match parse_cached_page(&content, desc) {
            Ok(Some(page)) => pages.push(page),
            Ok(None) => {}
            Err(err) => sink.report(Report::new(path.display().to_string(), err.to_string())),
        }
    }
    Ok(pages)
}

/// Decodes one cached response body into a `RecordsPage`, or `None` if the
/// response's `Count` is `"0"`.
pub fn parse_cached_page(content: &str, desc: &CollectionDescriptor) -> Result<Option<RecordsPage>, crate::Error> {
    let envelope: Envelope = serde_json::from_str(content)?;
    if envelope.ode_results.count == "0" {
        return Ok(None);
    }
    let Some(products) = envelope.ode_results.products else {
        return Ok(None);
    };
    let records: Vec<RecordDescriptor> = products.product.into_vec().into_iter().map(RawProduct::into_descriptor).collect();
    if records.is_empty() {
        return Ok(None);
    }
    Ok(Some(RecordsPage {
        body: desc.body.clone(),
        ihid: desc.ihid.clone(),
        iid: desc.iid.clone(),
        pt: desc.pt.clone(),
        dataset_id: desc.dataset_id.clone(),
        records,
    }))
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "ODEResults")]
    ode_results: OdeResults,
}

#[derive(Debug, Deserialize)]
struct OdeResults {
    #[serde(rename = "Count")]
    count: String,
    #[serde(rename = "Products")]
    products: Option<Products>,
}

#[derive(Debug, Deserialize)]
struct Products {
    #[serde(rename = "Product")]
    product: pdsstac_models::pds3::OneOrMany<RawProduct>,
}

#[derive(Debug, Deserialize, Clone)]
struct RawProductFiles {
    #[serde(rename = "Product_file")]
    product_file: pdsstac_models::pds3::OneOrMany<RawProductFile>,
}

#[derive(Debug, Deserialize, Clone)]
struct RawProductFile {
    #[serde(rename = "FileName")]
    file_name: String,
    #[serde(rename = "Type")]
    r#type: Option<String>,
    #[serde(rename = "KBytes", default, deserialize_with = "flexible::f64_opt")]
    kbytes: Option<f64>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Creation_date")]
    creation_date: Option<String>,
}

impl From<RawProductFile> for ProductFile {
    fn from(raw: RawProductFile) -> ProductFile {
        ProductFile {
            name: raw.file_name,
            r#type: raw.r#type,
            url: raw.url,
            description: raw.description,
            creation_date: raw.creation_date,
            size_kb: raw.kbytes,
        }
    }
}

/// A raw `Product` entry, field names matching the ODE REST API's JSON
/// response verbatim (see `PdsRecordModel` in `ode_ws_models.py`).
#[derive(Debug, Deserialize, Clone)]
struct RawProduct {
    ode_id: String,
    pdsid: String,
    ihid: String,
    iid: String,
    pt: String,
    #[serde(rename = "LabelFileName")]
    label_file_name: String,
    #[serde(rename = "Product_creation_time")]
    product_creation_time: String,
    #[serde(rename = "Target_name")]
    target_name: String,
    #[serde(rename = "Data_Set_Id")]
    data_set_id: String,
    #[serde(rename = "PDSVolume_Id")]
    pds_volume_id: Option<String>,
    #[serde(rename = "Easternmost_longitude", deserialize_with = "flexible::f64_required")]
    easternmost_longitude: f64,
    #[serde(rename = "Maximum_latitude", deserialize_with = "flexible::f64_required")]
    maximum_latitude: f64,
    #[serde(rename = "Minimum_latitude", deserialize_with = "flexible::f64_required")]
    minimum_latitude: f64,
    #[serde(rename = "Westernmost_longitude", deserialize_with = "flexible::f64_required")]
    westernmost_longitude: f64,
    #[serde(rename = "Footprint_C0_geometry")]
    footprint_c0_geometry: Option<String>,
    #[serde(rename = "Observation_time")]
    observation_time: Option<String>,
    #[serde(rename = "Product_release_date")]
    product_release_date: Option<String>,
    #[serde(rename = "Start_orbit_number", default, deserialize_with = "flexible::i64_opt")]
    start_orbit_number: Option<i64>,
    #[serde(rename = "Stop_orbit_number", default, deserialize_with = "flexible::i64_opt")]
    stop_orbit_number: Option<i64>,
    #[serde(rename = "Emission_angle", default, deserialize_with = "flexible::f64_opt")]
    emission_angle: Option<f64>,
    #[serde(rename = "Phase_angle", default, deserialize_with = "flexible::f64_opt")]
    phase_angle: Option<f64>,
    #[serde(rename = "Incidence_angle", default, deserialize_with = "flexible::f64_opt")]
    incidence_angle: Option<f64>,
    #[serde(rename = "Map_resolution", default, deserialize_with = "flexible::f64_opt")]
    map_resolution: Option<f64>,
    #[serde(rename = "Solar_distance", default, deserialize_with = "flexible::f64_opt")]
    solar_distance: Option<f64>,
    #[serde(rename = "Solar_longitude", default, deserialize_with = "flexible::f64_opt")]
    solar_longitude: Option<f64>,
    #[serde(rename = "Center_latitude", default, deserialize_with = "flexible::f64_opt")]
    center_latitude: Option<f64>,
    #[serde(rename = "Center_longitude", default, deserialize_with = "flexible::f64_opt")]
    center_longitude: Option<f64>,
    #[serde(rename = "Product_files", default)]
    product_files: Option<RawProductFiles>,
    #[serde(rename = "Browse_url")]
    browse_url: Option<String>,
    #[serde(rename = "Thumbnail_url")]
    thumbnail_url: Option<String>,
    #[serde(rename = "External_url1")]
    external_url1: Option<String>,
    #[serde(rename = "External_url2")]
    external_url2: Option<String>,
    #[serde(rename = "External_url3")]
    external_url3: Option<String>,
}

impl RawProduct {
    fn into_descriptor(self) -> RecordDescriptor {
        let external_urls = [self.external_url1, self.external_url2, self.external_url3].into_iter().flatten().collect();
        RecordDescriptor {
            ode_id: self.ode_id,
            pdsid: self.pdsid,
            ihid: self.ihid,
            iid: self.iid,
            pt: self.pt,
            data_set_id: self.data_set_id,
            pds_volume_id: self.pds_volume_id.unwrap_or_default(),
            label_filename: self.label_file_name,
            product_creation_time: self.product_creation_time,
            target_name: self.target_name,
            westernmost_longitude: self.westernmost_longitude,
            easternmost_longitude: self.easternmost_longitude,
            minimum_latitude: self.minimum_latitude,
            maximum_latitude: self.maximum_latitude,
            footprint_c0_geometry: self.footprint_c0_geometry,
            observation_time: self.observation_time,
            product_release_date: self.product_release_date,
            start_orbit_number: self.start_orbit_number,
            stop_orbit_number: self.stop_orbit_number,
            emission_angle: self.emission_angle,
            phase_angle: self.phase_angle,
            incidence_angle: self.incidence_angle,
            map_resolution: self.map_resolution,
            solar_distance: self.solar_distance,
            solar_longitude: self.solar_longitude,
            center_latitude: self.center_latitude,
            center_longitude: self.center_longitude,
            product_files: self.product_files.map(|files| files.product_file.into_vec().into_iter().map(ProductFile::from).collect()).unwrap_or_default(),
            browse_url: self.browse_url,
            thumbnail_url: self.thumbnail_url,
            external_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdsstac_models::report::MarkdownSink;

    fn sample_descriptor() -> CollectionDescriptor {
        CollectionDescriptor {
            body: "mercury".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            dataset_id: "izenberg-data".to_string(),
            product_count: 12_000,
            has_valid_footprints: true,
            min_orbit: None,
            max_orbit: None,
            min_observation_time: None,
            max_observation_time: None,
            special_values: Vec::new(),
            valid_targets: Vec::new(),
        }
    }

    #[test]
    fn page_offsets_stop_once_past_total() {
        let mut desc = sample_descriptor();
        desc.product_count = 12_000;
        let offsets = page_offsets(&desc, 1, 5000);
        assert_eq!(offsets, vec![1, 5001, 10001]);
    }

    #[test]
    fn generate_urls_encodes_fixed_params() {
        let urls = generate_urls(&sample_descriptor(), Some(1), Some(5000));
        assert!(urls[0].contains("query=product"));
        assert!(urls[0].contains("results=copmf"));
        assert!(urls[0].contains("ihid=MESS"));
        assert!(urls[0].contains("offset=1"));
    }

    const ZERO_COUNT: &str = r#"{"ODEResults": {"Count": "0"}}"#;

    const ONE_PRODUCT: &str = r#"{
        "ODEResults": {
            "Count": "1",
            "Products": {
                "Product": {
                    "ode_id": "1",
                    "pdsid": "PDS-1",
                    "ihid": "MESS",
                    "iid": "MDIS",
                    "pt": "EDR",
                    "LabelFileName": "rec.lbl",
                    "Product_creation_time": "2020-01-01T00:00:00",
                    "Target_name": "MERCURY",
                    "Data_Set_Id": "izenberg-data",
                    "PDSVolume_Id": "MSGRMDS_1001",
                    "Easternmost_longitude": "10.0",
                    "Maximum_latitude": "5.0",
                    "Minimum_latitude": "-5.0",
                    "Westernmost_longitude": "-10.0",
                    "Footprint_C0_geometry": "POLYGON((-10 -5, 10 -5, 10 5, -10 5, -10 -5))"
                }
            }
        }
    }"#;

    #[test]
    fn parse_cached_page_returns_none_on_zero_count() {
        let result = parse_cached_page(ZERO_COUNT, &sample_descriptor()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn parse_cached_page_decodes_single_product_as_vec() {
        let page = parse_cached_page(ONE_PRODUCT, &sample_descriptor()).unwrap().unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].pds_volume_id, "MSGRMDS_1001");
        assert_eq!(page.dataset_id, "izenberg-data");
    }

    #[test]
    fn stream_cached_pages_reports_malformed_file_and_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::open(tmp.path());
        let desc = sample_descriptor();
        let dir = cache.collection_dir(&desc).unwrap();
        std::fs::write(dir.join("ok.json"), ONE_PRODUCT).unwrap();
        std::fs::write(dir.join("bad.json"), "not json").unwrap();

        let mut sink = MarkdownSink::new();
        let pages = stream_cached_pages(&cache, &desc, &mut sink).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(sink.reports().len(), 1);
    }
}
