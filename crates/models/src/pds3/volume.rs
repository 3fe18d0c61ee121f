use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A field that PDS3 catalogs sometimes encode as a single value and
/// sometimes as a list. `Transform.Catalogs` normalizes both shapes to a
/// `Vec` (see Design Notes "Polymorphic collection payloads").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// A list of values.
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    /// Normalizes to a `Vec`, regardless of which shape was present.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// `CATALOG` object inside a `voldesc.cat` file: maps each catalog type to
/// the filename(s) that describe it.
///
/// Grounded on `CatalogModel` in
/// `examples/original_source/pds_crawler/models/pds_models.py`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    /// Filename(s) of the dataset catalog.
    pub data_set_catalog: Option<OneOrMany<String>>,
    /// Filename of the instrument catalog.
    pub instrument_catalog: Option<String>,
    /// Filename of the instrument host catalog.
    pub instrument_host_catalog: Option<String>,
    /// Filename of the mission catalog.
    pub mission_catalog: Option<String>,
    /// Filename of the personnel catalog.
    pub personnel_catalog: Option<String>,
    /// Filename of the reference catalog.
    pub reference_catalog: Option<String>,
    /// Filename of the target catalog.
    pub target_catalog: Option<String>,
    /// Filename of the map projection catalog, when present.
    pub data_set_map_projection_catalog: Option<String>,
}

impl CatalogDescriptor {
    /// Returns every `(catalog_type, filename)` pair named in this
    /// descriptor, normalizing single/list fields to one entry per
    /// filename. `catalog_type` matches the lowercase field name, used as
    /// the key in `getOdeCatalogs`'s result map.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(filenames) = &self.data_set_catalog {
            for filename in filenames.clone().into_vec() {
                entries.push(("dataset", filename));
            }
        }
        if let Some(filename) = &self.instrument_catalog {
            entries.push(("instrument", filename.clone()));
        }
        if let Some(filename) = &self.instrument_host_catalog {
            entries.push(("instrument_host", filename.clone()));
        }
        if let Some(filename) = &self.mission_catalog {
            entries.push(("mission", filename.clone()));
        }
        if let Some(filename) = &self.personnel_catalog {
            entries.push(("personnel", filename.clone()));
        }
        if let Some(filename) = &self.reference_catalog {
            entries.push(("reference", filename.clone()));
        }
        if let Some(filename) = &self.target_catalog {
            entries.push(("target", filename.clone()));
        }
        if let Some(filename) = &self.data_set_map_projection_catalog {
            entries.push(("projection", filename.clone()));
        }
        entries
    }
}

/// A contact record shared by `DATA_SUPPLIER` and `DATA_PRODUCER` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Institution name.
    pub institution_name: String,
    /// Facility name.
    pub facility_name: String,
    /// Full contact name, used as the STAC provider name.
    pub full_name: String,
    /// Electronic mail address, if reported.
    pub electronic_mail_id: Option<String>,
}

impl Contact {
    /// Builds the STAC provider for this contact, with every remaining
    /// field folded into `additional_fields` (mirroring
    /// `DataSupplierModel.create_stac_data_provider`'s "everything except
    /// full_name" extra-fields merge).
    pub fn create_stac_provider(&self) -> pdsstac_core::Provider {
        let mut provider = pdsstac_core::Provider::new(self.full_name.clone());
        provider.roles = Some(vec!["host".to_string()]);
        provider
            .additional_fields
            .insert("institution_name".to_string(), self.institution_name.clone().into());
        provider
            .additional_fields
            .insert("facility_name".to_string(), self.facility_name.clone().into());
        if let Some(email) = &self.electronic_mail_id {
            provider
                .additional_fields
                .insert("electronic_mail_id".to_string(), email.clone().into());
        }
        provider
    }
}

/// `VOLUME` object from a PDS3 `voldesc.cat` file: the entry point for
/// catalog discovery (see `Extract.Website`'s state machine).
///
/// Grounded on `VolumeModel` in
/// `examples/original_source/pds_crawler/models/pds_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Dataset id this volume carries.
    pub data_set_id: String,
    /// Human-readable description.
    pub description: String,
    /// Volume id, as named on the archive (may be renamed upstream — see
    /// the S2/S3 resolution loop in `Extract.Website`).
    pub volume_id: String,
    /// Volume name.
    pub volume_name: String,
    /// Map of catalog type to filename(s).
    pub catalog: CatalogDescriptor,
    /// Data supplier contact, if present.
    pub data_supplier: Option<Contact>,
    /// Data producer contact, if present.
    pub data_producer: Option<Contact>,
    /// Any additional fields carried through unparsed.
    #[serde(default)]
    pub additional_fields: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_normalizes() {
        let single: OneOrMany<String> = OneOrMany::One("mission.cat".to_string());
        assert_eq!(single.into_vec(), vec!["mission.cat".to_string()]);

        let many: OneOrMany<String> =
            OneOrMany::Many(vec!["a.cat".to_string(), "b.cat".to_string()]);
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn catalog_entries_lists_every_type() {
        let catalog = CatalogDescriptor {
            mission_catalog: Some("mission.cat".to_string()),
            data_set_catalog: Some(OneOrMany::Many(vec!["ds1.cat".to_string(), "ds2.cat".to_string()])),
            ..Default::default()
        };
        let entries = catalog.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&("mission", "mission.cat".to_string())));
    }
}
