use crate::pds3::references::References;
use crate::pds3::volume::Contact;
use crate::urn;
use chrono::{DateTime, Utc};
use pdsstac_core::{Collection, Extent, SpatialExtent, TemporalExtent};
use serde::{Deserialize, Serialize};

/// `DATA_SET` object from a PDS3 dataset catalog file.
///
/// Grounded on `DataSetModel`/`DataSetInformationModel`/`DataSetHostModel`
/// in `examples/original_source/pds_crawler/models/pds_models.py`. Unlike
/// the original, `instrument_ids` is always a `Vec` — the "dataset attached
/// under each reported instrument" fan-out named in `spec.md` §4.8 requires
/// it regardless of how many instrument ids the host reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Dataset id, used to build the STAC collection id.
    pub data_set_id: String,
    /// Dataset name, used as the collection title.
    pub data_set_name: String,
    /// Abstract description, preferred over `data_set_desc` when present.
    pub abstract_desc: Option<String>,
    /// Fallback narrative description.
    pub data_set_desc: String,
    /// Dataset start time, as reported upstream.
    pub start_time: Option<String>,
    /// Dataset stop time, as reported upstream.
    pub stop_time: Option<String>,
    /// Data producers' full names.
    pub producer_full_names: Vec<String>,
    /// Target body names.
    pub targets: Vec<String>,
    /// Instrument host id this dataset is attached to.
    pub instrument_host_id: String,
    /// Instrument ids this dataset is attached to (see struct docs).
    pub instrument_ids: Vec<String>,
    /// Mission name, if this dataset belongs to one.
    pub mission_name: Option<String>,
    /// Reference keys into the accompanying `References`.
    pub reference_keys: Vec<String>,
}

impl DataSet {
    /// The STAC id for this dataset's collection node.
    pub fn stac_id(&self) -> String {
        urn::collection(&self.data_set_id)
    }

    /// The description to use on the STAC collection: `abstract_desc` if
    /// present, else `data_set_desc` (mirrors
    /// `DataSetInformationModel._get_description`).
    pub fn description(&self) -> &str {
        self.abstract_desc.as_deref().unwrap_or(&self.data_set_desc)
    }

    /// The STAC ids of every instrument this dataset should be attached
    /// under.
    pub fn instrument_stac_ids(&self) -> Vec<String> {
        self.instrument_ids.iter().map(|id| urn::instrument(id)).collect()
    }

    /// Builds the STAC collection node for this dataset.
    pub fn create_stac_collection(
        &self,
        references: &References,
        data_supplier: Option<&Contact>,
        data_producer: Option<&Contact>,
    ) -> Collection {
        let mut collection = Collection::new(self.stac_id(), self.description().to_string());
        collection.title = Some(self.data_set_name.clone());
        collection.license = "CC0-1.0".to_string();

        let start = self.start_time.as_deref().and_then(parse_loose_datetime);
        let stop = self.stop_time.as_deref().and_then(parse_loose_datetime);
        collection.extent = Extent {
            spatial: SpatialExtent::default(),
            temporal: TemporalExtent {
                interval: vec![[start, stop]],
            },
            additional_fields: Default::default(),
        };

        let mut providers = Vec::new();
        if let Some(supplier) = data_supplier {
            providers.push(supplier.create_stac_provider());
        }
        if let Some(producer) = data_producer {
            providers.push(producer.create_stac_provider());
        } else if !self.producer_full_names.is_empty() {
            providers.extend(
                self.producer_full_names
                    .iter()
                    .map(|name| pdsstac_core::Provider::new(name.clone())),
            );
        }
        if !providers.is_empty() {
            collection.providers = Some(providers);
        }

        collection
            .additional_fields
            .insert("ssys:targets".to_string(), serde_json::Value::from(self.targets.clone()));
        collection
            .additional_fields
            .insert("platform_id".to_string(), self.instrument_host_id.clone().into());
        if let Some(mission) = &self.mission_name {
            collection
                .additional_fields
                .insert("mission".to_string(), mission.clone().into());
        }

        let publications = references.descriptions_for(&self.reference_keys);
        if !publications.is_empty() {
            collection.additional_fields.insert(
                "sci:publications".to_string(),
                serde_json::Value::from(publications),
            );
        }

        collection
    }
}

fn parse_loose_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pds3::references::References;

    fn sample() -> DataSet {
        DataSet {
            data_set_id: "izenberg_pdart14_meap-data_tnmap".to_string(),
            data_set_name: "MEAP Thermal Neutron Map".to_string(),
            abstract_desc: Some("an abstract".to_string()),
            data_set_desc: "a fallback".to_string(),
            start_time: Some("2011-01-01T00:00:00Z".to_string()),
            stop_time: Some("2015-01-01T00:00:00Z".to_string()),
            producer_full_names: vec!["N. Izenberg".to_string()],
            targets: vec!["MERCURY".to_string()],
            instrument_host_id: "MESS".to_string(),
            instrument_ids: vec!["NS".to_string(), "GRS".to_string()],
            mission_name: Some("MESSENGER".to_string()),
            reference_keys: Vec::new(),
        }
    }

    #[test]
    fn description_prefers_abstract() {
        assert_eq!(sample().description(), "an abstract");
    }

    #[test]
    fn fans_out_to_every_instrument() {
        let ids = sample().instrument_stac_ids();
        assert_eq!(
            ids,
            vec![
                "urn:pdssp:pds:instru:NS".to_string(),
                "urn:pdssp:pds:instru:GRS".to_string()
            ]
        );
    }

    #[test]
    fn builds_collection_with_extent() {
        let references = References { entries: Vec::new() };
        let collection = sample().create_stac_collection(&references, None, None);
        assert_eq!(collection.id, "urn:pdssp:pds:collection:izenberg_pdart14_meap-data_tnmap");
        assert!(collection.extent.temporal.interval[0][0].is_some());
    }
}
