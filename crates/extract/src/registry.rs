//! `Extract.Registry`: queries the ODE REST registry endpoint for the set
//! of georeferenced collections (`IIPTSet` entries), and persists/loads
//! them through [`pdsstac_storage::Registry`].
//!
//! Grounded on `PdsRegistry` in
//! `examples/original_source/pds_crawler/extractor/pds_ws.py` (query
//! building, response parsing, per-item invariant counting) and
//! `PdsRegistryModel.from_dict` in
//! `examples/original_source/pds_crawler/models/ode_ws_models.py` (the
//! `ValidFootprints == "F"` and `NumberProducts == 0` drop rules).

use crate::error::Error;
use pdsstac_models::{CollectionDescriptor, SpecialValueRange};
use pdsstac_storage::Registry as RegistryStore;
use serde::Deserialize;

const SERVICE_ENDPOINT: &str = "https://oderest.rsl.wustl.edu/live2/?";

/// Query-resolution statistics, mirroring `_parse_response_collection`'s
/// `stats` dict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// How many `IIPTSet` entries the response carried in total.
    pub count: usize,
    /// How many were dropped because of a missing/invalid required field.
    pub errors: usize,
    /// How many were dropped deliberately (no footprints, zero products).
    pub skip: usize,
    /// Sum of `NumberProducts` across every accepted descriptor.
    pub nb_records: i64,
}

/// Builds the ODE registry query params: `query=iipt, output=json`, plus
/// `odemetadb=<body>` when `body` is given.
pub fn build_query(body: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![("query".to_string(), "iipt".to_string()), ("output".to_string(), "json".to_string())];
    if let Some(body) = body {
        params.push(("odemetadb".to_string(), body.to_string()));
    }
    params
}

/// The full registry endpoint URL for `body` (`None` queries every body).
pub fn registry_url(body: Option<&str>) -> Result<String, Error> {
    let query = serde_urlencoded::to_string(build_query(body)).map_err(|err| {
        tracing::error!(error = %err, "failed to encode registry query");
        Error::UnrecognizedResponse("query encoding failed")
    })?;
    Ok(format!("{SERVICE_ENDPOINT}{query}"))
}

/// Parses a raw ODE registry JSON response into `(stats, descriptors)`.
///
/// Applies `dataset_id` case-insensitively after parsing, matching the
/// original's post-parse filter.
pub fn parse_response(body: &[u8], dataset_id_filter: Option<&str>) -> Result<(RegistryStats, Vec<CollectionDescriptor>), Error> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let sets = envelope.ode_results.iipt_sets.map(|sets| sets.sets.into_vec()).unwrap_or_default();

    let mut stats = RegistryStats { count: sets.len(), ..Default::default() };
    let mut descriptors = Vec::new();

    for raw in sets {
        match raw.into_descriptor() {
            Ok(Some(descriptor)) => {
                stats.nb_records += descriptor.product_count;
                descriptors.push(descriptor);
            }
            Ok(None) => stats.skip += 1,
            Err(_) => stats.errors += 1,
        }
    }

    if let Some(dataset_id) = dataset_id_filter {
        descriptors.retain(|descriptor| descriptor.dataset_id.eq_ignore_ascii_case(dataset_id));
    }

    Ok((stats, descriptors))
}

/// Persists `descriptors` into the on-disk registry.
pub fn cache_pds_collections(store: &RegistryStore, descriptors: &[CollectionDescriptor]) -> Result<bool, Error> {
    Ok(store.save_collections(descriptors)?)
}

/// Loads stored descriptors, filtered by `body`/`dataset_id`
/// case-insensitively.
pub fn load_pds_collections_from_cache(
    store: &RegistryStore,
    body: Option<&str>,
    dataset_id: Option<&str>,
) -> Result<Vec<CollectionDescriptor>, Error> {
    Ok(store.load_collections(body, dataset_id)?)
}

/// Returns the first cached descriptor whose dataset id matches, if any.
pub fn query_cache(store: &RegistryStore, dataset_id: &str) -> Result<Option<CollectionDescriptor>, Error> {
    Ok(store.query_cache(dataset_id)?)
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "ODEResults")]
    ode_results: OdeResults,
}

#[derive(Debug, Deserialize)]
struct OdeResults {
    #[serde(rename = "IIPTSets")]
    iipt_sets: Option<IiptSets>,
}

#[derive(Debug, Deserialize)]
struct IiptSets {
    #[serde(rename = "IIPTSet")]
    sets: pdsstac_models::pds3::OneOrMany<RawIiptSet>,
}

/// A raw `IIPTSet` entry, field names matching the ODE REST API's JSON
/// response verbatim (see `PdsRegistryModel` in `ode_ws_models.py`).
#[derive(Debug, Deserialize, Clone)]
struct RawIiptSet {
    #[serde(rename = "ODEMetaDB")]
    ode_meta_db: String,
    #[serde(rename = "IHID")]
    ihid: String,
    #[serde(rename = "IID")]
    iid: String,
    #[serde(rename = "PT")]
    pt: String,
    #[serde(rename = "DataSetId")]
    data_set_id: String,
    #[serde(rename = "NumberProducts")]
    number_products: String,
    #[serde(rename = "ValidFootprints")]
    valid_footprints: Option<String>,
    #[serde(rename = "MinOrbit")]
    min_orbit: Option<String>,
    #[serde(rename = "MaxOrbit")]
    max_orbit: Option<String>,
    #[serde(rename = "MinObservationTime")]
    min_observation_time: Option<String>,
    #[serde(rename = "MaxObservationTime")]
    max_observation_time: Option<String>,
    #[serde(rename = "SpecialValue1")]
    special_value1: Option<String>,
    #[serde(rename = "MinSpecialValue1")]
    min_special_value1: Option<String>,
    #[serde(rename = "MaxSpecialValue1")]
    max_special_value1: Option<String>,
    #[serde(rename = "SpecialValue2")]
    special_value2: Option<String>,
    #[serde(rename = "MinSpecialValue2")]
    min_special_value2: Option<String>,
    #[serde(rename = "MaxSpecialValue2")]
    max_special_value2: Option<String>,
    #[serde(rename = "ValidTargets", default)]
    valid_targets: Option<serde_json::Value>,
}

impl RawIiptSet {
    /// Converts a raw entry into a `CollectionDescriptor`, or `Ok(None)`
    /// for the two deliberate-skip cases (`ValidFootprints == "F"`,
    /// `NumberProducts == 0`), or `Err` for a malformed numeric field.
    fn into_descriptor(self) -> Result<Option<CollectionDescriptor>, Error> {
        if self.valid_footprints.as_deref() == Some("F") {
            return Ok(None);
        }
        let product_count: i64 = self
            .number_products
            .parse()
            .map_err(|_| Error::UnrecognizedResponse("NumberProducts is not an integer"))?;
        if product_count == 0 {
            return Ok(None);
        }

        let mut special_values = Vec::new();
        if let Some(label) = self.special_value1.clone() {
            special_values.push(SpecialValueRange {
                label,
                min: self.min_special_value1.and_then(|v| v.parse().ok()),
                max: self.max_special_value1.and_then(|v| v.parse().ok()),
            });
        }
        if let Some(label) = self.special_value2.clone() {
            special_values.push(SpecialValueRange {
                label,
                min: self.min_special_value2.and_then(|v| v.parse().ok()),
                max: self.max_special_value2.and_then(|v| v.parse().ok()),
            });
        }

        Ok(Some(CollectionDescriptor {
            body: self.ode_meta_db.to_ascii_lowercase(),
            ihid: self.ihid,
            iid: self.iid,
            pt: self.pt,
            dataset_id: self.data_set_id,
            product_count,
            has_valid_footprints: true,
            min_orbit: self.min_orbit.and_then(|v| v.parse().ok()),
            max_orbit: self.max_orbit.and_then(|v| v.parse().ok()),
            min_observation_time: self.min_observation_time,
            max_observation_time: self.max_observation_time,
            special_values,
            valid_targets: valid_targets_from_value(self.valid_targets),
        }))
    }
}

/// `ValidTargets` is reported as either a JSON object keyed by target name
/// or a plain array of target name strings; normalize both to a `Vec`.
fn valid_targets_from_value(value: Option<serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "ODEResults": {
            "IIPTSets": {
                "IIPTSet": [
                    {
                        "ODEMetaDB": "Mercury",
                        "IHID": "MESS",
                        "IID": "MDIS",
                        "PT": "EDR",
                        "DataSetId": "izenberg_pdart14_meap-data_tnmap",
                        "NumberProducts": "12",
                        "ValidFootprints": "T",
                        "ValidTargets": {"MERCURY": []}
                    },
                    {
                        "ODEMetaDB": "Mercury",
                        "IHID": "MESS",
                        "IID": "MDIS",
                        "PT": "RDR",
                        "DataSetId": "other-data",
                        "NumberProducts": "0"
                    },
                    {
                        "ODEMetaDB": "Mercury",
                        "IHID": "MESS",
                        "IID": "MDIS",
                        "PT": "CDR",
                        "DataSetId": "no-footprints",
                        "NumberProducts": "5",
                        "ValidFootprints": "F"
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn parse_response_counts_skips_and_keeps_valid() {
        let (stats, descriptors) = parse_response(SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.skip, 2);
        assert_eq!(stats.errors, 0);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].dataset_id, "izenberg_pdart14_meap-data_tnmap");
        assert_eq!(descriptors[0].body, "mercury");
        assert_eq!(stats.nb_records, 12);
    }

    #[test]
    fn parse_response_applies_dataset_filter_case_insensitively() {
        let (_, descriptors) = parse_response(SAMPLE.as_bytes(), Some("IZENBERG_PDART14_MEAP-DATA_TNMAP")).unwrap();
        assert_eq!(descriptors.len(), 1);
        let (_, none) = parse_response(SAMPLE.as_bytes(), Some("nonexistent")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn registry_url_includes_body_when_given() {
        let url = registry_url(Some("mercury")).unwrap();
        assert!(url.contains("query=iipt"));
        assert!(url.contains("odemetadb=mercury"));
    }

    #[test]
    fn registry_url_omits_body_when_absent() {
        let url = registry_url(None).unwrap();
        assert!(!url.contains("odemetadb"));
    }
}
