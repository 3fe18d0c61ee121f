use crate::urn;
use pdsstac_core::Catalog;
use serde::{Deserialize, Serialize};

/// `INSTRUMENT` object from a PDS3 `instrument.cat` catalog file.
///
/// Grounded on `InstrumentModel`/`InstrumentInformationModel` in
/// `examples/original_source/pds_crawler/models/pds_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Instrument host id this instrument is mounted on.
    pub instrument_host_id: String,
    /// Instrument id.
    pub instrument_id: String,
    /// Full instrument name.
    pub name: String,
    /// Narrative description.
    pub description: String,
    /// Instrument type (e.g. `"Imaging Camera"`).
    pub instrument_type: String,
    /// Reference keys into the accompanying `References`.
    pub reference_keys: Vec<String>,
}

impl Instrument {
    /// The STAC id for this instrument's catalog node.
    pub fn stac_id(&self) -> String {
        urn::instrument(&self.instrument_id)
    }

    /// The STAC id of this instrument's parent platform node.
    pub fn platform_stac_id(&self) -> String {
        urn::platform(&self.instrument_host_id)
    }

    /// Builds the STAC catalog node for this instrument.
    pub fn create_stac_catalog(&self) -> Catalog {
        let mut catalog = Catalog::new(self.stac_id(), self.description.clone());
        catalog.title = Some(self.name.clone());
        catalog
            .additional_fields
            .insert("instrument_type".to_string(), self.instrument_type.clone().into());
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_is_platform() {
        let instrument = Instrument {
            instrument_host_id: "MESS".to_string(),
            instrument_id: "MDIS".to_string(),
            name: "Mercury Dual Imaging System".to_string(),
            description: "d".to_string(),
            instrument_type: "Imaging Camera".to_string(),
            reference_keys: Vec::new(),
        };
        assert_eq!(instrument.platform_stac_id(), "urn:pdssp:pds:platform:MESS");
        assert_eq!(instrument.stac_id(), "urn:pdssp:pds:instru:MDIS");
    }
}
