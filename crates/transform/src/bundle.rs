//! Typed replacement for the stringly-keyed `HashMap<String, Vec<ParsedCatalog>>`
//! that `Extract.Website::get_ode_catalogs` returns.
//!
//! `spec.md` §4.8 describes `Transform.Catalogs`'s input as "the dict from
//! Extract.Website augmented with the originating CollectionDescriptor".
//! Rust has no use for a stringly-typed bag here: every catalog type is
//! already a distinct Rust type (`Mission`, `InstrumentHost`, ...), so
//! `CatalogBundle` sorts the parsed catalogs into one field per type once,
//! at the boundary, and every downstream handler reads a field instead of
//! a string key.

use pdsstac_core::Provider;
use pdsstac_models::pds3::{DataSet, Instrument, InstrumentHost, Mission, PersonnelList, References, Volume};
use pdsstac_pds3::ParsedCatalog;
use std::collections::HashMap;

/// Every typed catalog object discovered for one collection.
#[derive(Debug, Clone, Default)]
pub struct CatalogBundle {
    /// Parsed `mission.cat` entries (ordinarily zero or one).
    pub mission: Vec<Mission>,
    /// Parsed `host.cat` entries.
    pub instrument_host: Vec<InstrumentHost>,
    /// Parsed `instrument.cat` entries.
    pub instrument: Vec<Instrument>,
    /// Parsed dataset catalog entries (a volume may name several).
    pub dataset: Vec<DataSet>,
    /// Parsed `person.cat` entries.
    pub personnel: Vec<PersonnelList>,
    /// Parsed `reference.cat` entries.
    pub reference: Vec<References>,
    /// The parsed `voldesc.cat`, if the volume description was reachable.
    pub volume_description: Option<Volume>,
}

impl CatalogBundle {
    /// Sorts `catalogs` (as returned by
    /// `pdsstac_extract::website::get_ode_catalogs`) into a `CatalogBundle`.
    /// The map's keys are ignored — each `ParsedCatalog` already carries its
    /// own kind.
    pub fn from_catalogs(catalogs: HashMap<String, Vec<ParsedCatalog>>) -> CatalogBundle {
        let mut bundle = CatalogBundle::default();
        for parsed in catalogs.into_values().flatten() {
            match parsed {
                ParsedCatalog::Mission(mission) => bundle.mission.push(mission),
                ParsedCatalog::InstrumentHost(host) => bundle.instrument_host.push(host),
                ParsedCatalog::Instrument(instrument) => bundle.instrument.push(instrument),
                ParsedCatalog::DataSet(dataset) => bundle.dataset.push(dataset),
                ParsedCatalog::Personnel(personnel) => bundle.personnel.push(personnel),
                ParsedCatalog::Reference(reference) => bundle.reference.push(reference),
                ParsedCatalog::VolumeDescription(volume) => bundle.volume_description = Some(volume),
            }
        }
        bundle
    }

    /// Every reference entry across every parsed `reference.cat` (a volume
    /// rarely names more than one, but `DataSet::create_stac_collection`
    /// only needs one merged table regardless).
    pub fn merged_references(&self) -> References {
        References {
            entries: self.reference.iter().flat_map(|references| references.entries.clone()).collect(),
        }
    }

    /// STAC providers for every parsed personnel entry, across every
    /// `person.cat`. Consumed by the dataset-collection handler to extend
    /// a collection's `providers` list (see `DESIGN.md`'s note on
    /// `PersonnelList::create_stac_providers`).
    pub fn personnel_providers(&self) -> Vec<Provider> {
        self.personnel.iter().flat_map(|list| list.create_stac_providers()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdsstac_models::pds3::Personnel;

    fn sample_mission() -> Mission {
        Mission {
            alias_name: "MGS".to_string(),
            name: "Mars Global Surveyor".to_string(),
            description: "d".to_string(),
            objectives_summary: "s".to_string(),
            start_date: "1996".to_string(),
            stop_date: "2006".to_string(),
            instrument_host_id: "MGS".to_string(),
            targets: vec!["MARS".to_string()],
            reference_keys: Vec::new(),
        }
    }

    #[test]
    fn sorts_by_kind_ignoring_map_keys() {
        let mut catalogs = HashMap::new();
        catalogs.insert("mission".to_string(), vec![ParsedCatalog::Mission(sample_mission())]);
        catalogs.insert(
            "personnel".to_string(),
            vec![ParsedCatalog::Personnel(PersonnelList {
                entries: vec![Personnel {
                    pds_user_id: "NIZENBERG".to_string(),
                    full_name: "Noam Izenberg".to_string(),
                    institution_name: "JHU/APL".to_string(),
                    electronic_mail_id: None,
                }],
            })],
        );

        let bundle = CatalogBundle::from_catalogs(catalogs);
        assert_eq!(bundle.mission.len(), 1);
        assert_eq!(bundle.personnel_providers().len(), 1);
        assert!(bundle.instrument.is_empty());
    }

    #[test]
    fn merged_references_flattens_every_entry() {
        let bundle = CatalogBundle {
            reference: vec![
                References {
                    entries: vec![pdsstac_models::pds3::ReferenceEntry {
                        key: "A".to_string(),
                        description: "a".to_string(),
                    }],
                },
                References {
                    entries: vec![pdsstac_models::pds3::ReferenceEntry {
                        key: "B".to_string(),
                        description: "b".to_string(),
                    }],
                },
            ],
            ..Default::default()
        };
        assert_eq!(bundle.merged_references().entries.len(), 2);
    }
}
