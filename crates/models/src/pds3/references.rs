use serde::{Deserialize, Serialize};

/// One `REFERENCE` entry: a citation key and its full description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// The key other catalogs cite (`REFERENCE_KEY_ID`).
    pub key: String,
    /// The full citation text (`REFERENCE_DESC`).
    pub description: String,
}

/// `REFERENCES` object from a PDS3 `reference.cat` catalog file.
///
/// Grounded on `ReferencesModel`/`ReferenceModel` in
/// `examples/original_source/pds_crawler/models/pds_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct References {
    /// The parsed reference entries.
    pub entries: Vec<ReferenceEntry>,
}

impl References {
    /// Resolves a list of reference keys to their full descriptions,
    /// silently dropping keys with no matching entry (mirrors
    /// `DataSetModel._add_citations`'s `references.get(citation)` filter).
    pub fn descriptions_for(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter_map(|key| {
                self.entries
                    .iter()
                    .find(|entry| &entry.key == key)
                    .map(|entry| entry.description.clone())
            })
            .collect()
    }
}
