use crate::urn;
use pdsstac_core::Catalog;
use serde::{Deserialize, Serialize};

/// `INSTRUMENT_HOST` object (platform) from a PDS3 `host.cat` catalog file.
///
/// Grounded on `InstrumentHostModel`/`InstrumentHostInformationModel` in
/// `examples/original_source/pds_crawler/models/pds_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentHost {
    /// Instrument host id.
    pub instrument_host_id: String,
    /// Full name.
    pub name: String,
    /// Narrative description.
    pub description: String,
    /// Host type (e.g. `"Spacecraft"`).
    pub host_type: String,
    /// Reference keys into the accompanying `References`.
    pub reference_keys: Vec<String>,
}

impl InstrumentHost {
    /// The STAC id for this platform's catalog node.
    pub fn stac_id(&self) -> String {
        urn::platform(&self.instrument_host_id)
    }

    /// Builds the STAC catalog node for this platform.
    pub fn create_stac_catalog(&self) -> Catalog {
        let mut catalog = Catalog::new(self.stac_id(), self.description.clone());
        catalog.title = Some(self.name.clone());
        catalog
            .additional_fields
            .insert("platform_type".to_string(), self.host_type.clone().into());
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stac_id_uses_host_id() {
        let host = InstrumentHost {
            instrument_host_id: "MESS".to_string(),
            name: "MESSENGER".to_string(),
            description: "d".to_string(),
            host_type: "Spacecraft".to_string(),
            reference_keys: Vec::new(),
        };
        assert_eq!(host.stac_id(), "urn:pdssp:pds:platform:MESS");
    }
}
