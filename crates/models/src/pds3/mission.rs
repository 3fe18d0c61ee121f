use crate::urn;
use pdsstac_core::Catalog;
use serde::{Deserialize, Serialize};

/// `MISSION` object from a PDS3 `mission.cat` catalog file.
///
/// Grounded on `MissionModel`/`MissionInformationModel`/`MissionHostModel`
/// in `examples/original_source/pds_crawler/models/pds_models.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Short alias used to build the mission's STAC id (`MISSION_ALIAS_NAME`).
    pub alias_name: String,
    /// Full mission name (`MISSION_NAME`).
    pub name: String,
    /// Narrative description (`MISSION_DESC`).
    pub description: String,
    /// One-line objectives summary.
    pub objectives_summary: String,
    /// Mission start date, as reported upstream.
    pub start_date: String,
    /// Mission stop date, as reported upstream.
    pub stop_date: String,
    /// Instrument host id operating this mission.
    pub instrument_host_id: String,
    /// Target body names visited by this mission.
    pub targets: Vec<String>,
    /// Reference keys into the accompanying `References`.
    pub reference_keys: Vec<String>,
}

impl Mission {
    /// The STAC id for this mission's catalog node.
    pub fn stac_id(&self) -> String {
        urn::mission(&self.alias_name)
    }

    /// Builds the STAC catalog node for this mission.
    pub fn create_stac_catalog(&self) -> Catalog {
        let mut catalog = Catalog::new(self.stac_id(), self.description.clone());
        catalog.title = Some(self.name.clone());
        catalog
            .additional_fields
            .insert("mission_objectives_summary".to_string(), self.objectives_summary.clone().into());
        catalog
            .additional_fields
            .insert("mission_start_date".to_string(), self.start_date.clone().into());
        catalog
            .additional_fields
            .insert("mission_stop_date".to_string(), self.stop_date.clone().into());
        catalog
            .additional_fields
            .insert("platform_id".to_string(), self.instrument_host_id.clone().into());
        catalog.additional_fields.insert(
            "mission_targets".to_string(),
            serde_json::Value::from(self.targets.clone()),
        );
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stac_id_uses_alias() {
        let mission = Mission {
            alias_name: "MGS".to_string(),
            name: "Mars Global Surveyor".to_string(),
            description: "d".to_string(),
            objectives_summary: "s".to_string(),
            start_date: "1996".to_string(),
            stop_date: "2006".to_string(),
            instrument_host_id: "MGS".to_string(),
            targets: vec!["MARS".to_string()],
            reference_keys: Vec::new(),
        };
        assert_eq!(mission.stac_id(), "urn:pdssp:pds:mission:MGS");
        let catalog = mission.create_stac_catalog();
        assert_eq!(catalog.title.as_deref(), Some("Mars Global Surveyor"));
    }
}
