use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single vendor-defined numeric range reported by the ODE registry
/// response (`SpecialValue1`/`SpecialValue2` in
/// `examples/original_source/pds_crawler/models/ode_ws_models.py`'s
/// `PdsRegistryModel`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialValueRange {
    /// The vendor-supplied label for this range (e.g. `"EMISSION_ANGLE"`).
    pub label: String,
    /// The minimum value reported.
    pub min: Option<f64>,
    /// The maximum value reported.
    pub max: Option<f64>,
}

/// Describes one ODE `IIPTSet` entry: a (body, instrument-host,
/// instrument, product-type, dataset) grouping, with summary statistics
/// over its member products.
///
/// Grounded on `PdsRegistryModel` in
/// `examples/original_source/pds_crawler/models/ode_ws_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    /// The solar-system body this collection targets (`odemetadb`/`Target`).
    pub body: String,
    /// Instrument host id (`IHID`).
    pub ihid: String,
    /// Instrument id (`IID`).
    pub iid: String,
    /// Product type (`PT`).
    pub pt: String,
    /// Dataset id (`DataSetId`).
    pub dataset_id: String,

    /// Number of products in this collection.
    pub product_count: i64,
    /// Whether the ODE registry reports this collection as having valid
    /// footprints.
    pub has_valid_footprints: bool,

    /// Minimum orbit number, if orbit-addressable.
    pub min_orbit: Option<i64>,
    /// Maximum orbit number, if orbit-addressable.
    pub max_orbit: Option<i64>,
    /// Minimum observation time, as reported (ISO-8601 string, upstream
    /// format is not always a valid RFC 3339 timestamp).
    pub min_observation_time: Option<String>,
    /// Maximum observation time, as reported.
    pub max_observation_time: Option<String>,

    /// Up to two vendor-defined numeric ranges.
    pub special_values: Vec<SpecialValueRange>,

    /// Target bodies considered valid for this collection (`ValidTargets`).
    pub valid_targets: Vec<String>,
}

impl CollectionDescriptor {
    /// Validates the invariants from `spec.md` §3: `product_count >= 0`,
    /// and the collection is rejected if it is zero or lacks valid
    /// footprints.
    pub fn validate(&self) -> Result<(), Error> {
        if self.product_count < 0 {
            return Err(Error::InvariantViolation {
                id: self.identity_string(),
                reason: "negative product count",
            });
        }
        if self.product_count == 0 {
            return Err(Error::InvariantViolation {
                id: self.identity_string(),
                reason: "zero products",
            });
        }
        if !self.has_valid_footprints {
            return Err(Error::InvariantViolation {
                id: self.identity_string(),
                reason: "no valid footprints",
            });
        }
        Ok(())
    }

    /// The five raw identity tokens, in registry/filecache path order:
    /// `body/ihid/iid/pt/dataset_id`.
    pub fn identity_tokens(&self) -> [&str; 5] {
        [
            self.body.as_str(),
            self.ihid.as_str(),
            self.iid.as_str(),
            self.pt.as_str(),
            self.dataset_id.as_str(),
        ]
    }

    /// A human-readable identity string, used in diagnostics and observer
    /// messages (mirrors `PdsRegistryModel.ode_id`).
    pub fn identity_string(&self) -> String {
        self.identity_tokens().join("/")
    }

    /// Sanitizes a single path token by replacing every character outside
    /// `[A-Za-z0-9_]` with `_`, matching `Hdf5Storage.define_group_from` in
    /// `examples/original_source/pds_crawler/load/database.py`.
    pub fn sanitize_token(token: &str) -> String {
        token
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }

    /// The sanitized five-token path, usable as a registry group path or a
    /// filesystem subtree under `Storage.FileCache`.
    pub fn sanitized_path(&self) -> String {
        self.identity_tokens()
            .iter()
            .map(|token| Self::sanitize_token(token))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Builds a `CollectionDescriptor` from a flat attribute map, as
    /// returned from `Storage.Registry`'s attribute-set payload, or from a
    /// parsed ODE `IIPTSet` JSON object. Returns an invariant-violation
    /// error (not a parse error) if required fields are missing or the
    /// descriptor fails validation.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Result<CollectionDescriptor, Error> {
        let required = |name: &'static str| -> Result<String, Error> {
            attrs
                .get(name)
                .cloned()
                .ok_or(Error::MissingField(name, "CollectionDescriptor"))
        };
        let descriptor = CollectionDescriptor {
            body: required("body")?,
            ihid: required("ihid")?,
            iid: required("iid")?,
            pt: required("pt")?,
            dataset_id: required("dataset_id")?,
            product_count: attrs
                .get("product_count")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            has_valid_footprints: attrs
                .get("has_valid_footprints")
                .map(|v| v == "true")
                .unwrap_or(false),
            min_orbit: attrs.get("min_orbit").and_then(|v| v.parse().ok()),
            max_orbit: attrs.get("max_orbit").and_then(|v| v.parse().ok()),
            min_observation_time: attrs.get("min_observation_time").cloned(),
            max_observation_time: attrs.get("max_observation_time").cloned(),
            special_values: Vec::new(),
            valid_targets: attrs
                .get("valid_targets")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

/// A one-line summary used in CLI progress messages, matching the field
/// order and omissions of `PdsRegistryModel`'s default dataclass `repr`
/// in `examples/original_source/pds_crawler/models/ode_ws_models.py`
/// (only fields not marked `repr=False` are shown).
impl fmt::Display for CollectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CollectionDescriptor(body={}, ihid={}, iid={}, pt={}, dataset_id={}, product_count={})",
            self.body, self.ihid, self.iid, self.pt, self.dataset_id, self.product_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CollectionDescriptor {
        CollectionDescriptor {
            body: "mercury".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            dataset_id: "izenberg_pdart14_meap-data_tnmap".to_string(),
            product_count: 1,
            has_valid_footprints: true,
            min_orbit: None,
            max_orbit: None,
            min_observation_time: None,
            max_observation_time: None,
            special_values: Vec::new(),
            valid_targets: vec!["MERCURY".to_string()],
        }
    }

    #[test]
    fn display_matches_repr_style_summary() {
        let text = sample().to_string();
        assert_eq!(text, "CollectionDescriptor(body=mercury, ihid=MESS, iid=MDIS, pt=EDR, dataset_id=izenberg_pdart14_meap-data_tnmap, product_count=1)");
    }

    #[test]
    fn validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_products() {
        let mut descriptor = sample();
        descriptor.product_count = 0;
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_footprints() {
        let mut descriptor = sample();
        descriptor.has_valid_footprints = false;
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn sanitize_token_replaces_special_chars() {
        assert_eq!(
            CollectionDescriptor::sanitize_token("mro-m-ctx-2-edr-l0-v1.0"),
            "mro_m_ctx_2_edr_l0_v1_0"
        );
    }

    #[test]
    fn sanitized_path_joins_tokens() {
        let descriptor = sample();
        assert_eq!(
            descriptor.sanitized_path(),
            "mercury/MESS/MDIS/EDR/izenberg_pdart14_meap_data_tnmap"
        );
    }
}
