//! Converts a generic [`crate::label::Label`] tree into the typed PDS3
//! catalog objects defined in `pdsstac_models::pds3`.
//!
//! Grounded on the `from_dict` classmethods of
//! `examples/original_source/pds_crawler/models/pds_models.py`: each
//! conversion walks the same nested-object shape the Python dataclasses
//! expect, but reads from a [`crate::label::Label`] instead of a `dict`
//! produced by a Lark transformer.

use crate::error::Error;
use crate::label::{Label, Value};
use pdsstac_models::pds3::{
    CatalogDescriptor, Contact, DataSet, Instrument, InstrumentHost, Mission, OneOrMany,
    Personnel, PersonnelList, ReferenceEntry, References, Volume,
};

fn root_or_self<'a>(label: &'a Label, key: &'static str) -> &'a Label {
    label.require_object(key).ok().unwrap_or(label)
}

fn reference_keys(label: &Label, list_keyword: &str) -> Vec<String> {
    label
        .all(list_keyword)
        .iter()
        .filter_map(|value| value.as_object())
        .filter_map(|object| object.scalar("REFERENCE_KEY_ID"))
        .collect()
}

/// Converts a parsed `mission.cat` label into a [`Mission`].
pub fn mission_from_label(label: &Label) -> Result<Mission, Error> {
    let root = root_or_self(label, "MISSION");
    let info = root.require_object("MISSION_INFORMATION")?;
    let host = root.require_object("MISSION_HOST")?;

    let mut alias_name = info.scalar("MISSION_ALIAS_NAME").unwrap_or_default();
    if alias_name == "N/A" || alias_name.is_empty() {
        alias_name = root.require_scalar("MISSION_NAME")?;
    }

    Ok(Mission {
        alias_name,
        name: root.require_scalar("MISSION_NAME")?,
        description: info.scalar("MISSION_DESC").unwrap_or_default(),
        objectives_summary: info.scalar("MISSION_OBJECTIVES_SUMMARY").unwrap_or_default(),
        start_date: info.scalar("MISSION_START_DATE").unwrap_or_default(),
        stop_date: info.scalar("MISSION_STOP_DATE").unwrap_or_default(),
        instrument_host_id: host.require_scalar("INSTRUMENT_HOST_ID")?,
        targets: host
            .all("MISSION_TARGET")
            .iter()
            .filter_map(|value| value.as_object())
            .filter_map(|object| object.scalar("TARGET_NAME"))
            .collect(),
        reference_keys: reference_keys(root, "MISSION_REFERENCE_INFORMATION"),
    })
}

/// Converts a parsed `host.cat` label into an [`InstrumentHost`].
pub fn instrument_host_from_label(label: &Label) -> Result<InstrumentHost, Error> {
    let root = root_or_self(label, "INSTRUMENT_HOST");
    let info = root.require_object("INSTRUMENT_HOST_INFORMATION")?;
    Ok(InstrumentHost {
        instrument_host_id: root.require_scalar("INSTRUMENT_HOST_ID")?,
        name: info.scalar("INSTRUMENT_HOST_NAME").unwrap_or_default(),
        description: info.scalar("INSTRUMENT_HOST_DESC").unwrap_or_default(),
        host_type: info.scalar("INSTRUMENT_HOST_TYPE").unwrap_or_default(),
        reference_keys: reference_keys(root, "INSTRUMENT_HOST_REFERENCE_INFO"),
    })
}

/// Converts a parsed `instrument.cat` label into an [`Instrument`].
pub fn instrument_from_label(label: &Label) -> Result<Instrument, Error> {
    let root = root_or_self(label, "INSTRUMENT");
    let info = root.require_object("INSTRUMENT_INFORMATION")?;
    Ok(Instrument {
        instrument_host_id: root.require_scalar("INSTRUMENT_HOST_ID")?,
        instrument_id: root.require_scalar("INSTRUMENT_ID")?,
        name: info.scalar("INSTRUMENT_NAME").unwrap_or_default(),
        description: info.scalar("INSTRUMENT_DESC").unwrap_or_default(),
        instrument_type: info.scalar("INSTRUMENT_TYPE").unwrap_or_default(),
        reference_keys: reference_keys(root, "INSTRUMENT_REFERENCE_INFO"),
    })
}

/// Converts a parsed dataset catalog label into a [`DataSet`].
pub fn dataset_from_label(label: &Label) -> Result<DataSet, Error> {
    let root = root_or_self(label, "DATA_SET");
    let info = root.require_object("DATA_SET_INFORMATION")?;
    let host = root.require_object("DATA_SET_HOST")?;
    let mission_name = root
        .get("DATA_SET_MISSION")
        .and_then(Value::as_object)
        .and_then(|object| object.scalar("MISSION_NAME"));

    let producer_full_names = info
        .get("PRODUCER_FULL_NAME")
        .cloned()
        .map(|value| value.into_vec())
        .unwrap_or_default();

    let targets = root
        .all("DATA_SET_TARGET")
        .iter()
        .filter_map(|value| value.as_object())
        .filter_map(|object| object.scalar("TARGET_NAME"))
        .collect();

    Ok(DataSet {
        data_set_id: root.require_scalar("DATA_SET_ID")?,
        data_set_name: info.scalar("DATA_SET_NAME").unwrap_or_default(),
        abstract_desc: info.scalar("ABSTRACT_DESC"),
        data_set_desc: info.scalar("DATA_SET_DESC").unwrap_or_default(),
        start_time: info.scalar("START_TIME"),
        stop_time: info.scalar("STOP_TIME"),
        producer_full_names,
        targets,
        instrument_host_id: host.require_scalar("INSTRUMENT_HOST_ID")?,
        instrument_ids: host
            .get("INSTRUMENT_ID")
            .cloned()
            .map(|value| value.into_vec())
            .unwrap_or_default(),
        mission_name,
        reference_keys: reference_keys(root, "DATA_SET_REFERENCE_INFORMATION"),
    })
}

/// Converts a parsed `reference.cat` label into a [`References`].
pub fn references_from_label(label: &Label) -> Result<References, Error> {
    let root = root_or_self(label, "REFERENCES");
    let entries = root
        .all("REFERENCE")
        .iter()
        .filter_map(|value| value.as_object())
        .filter_map(|object| {
            Some(ReferenceEntry {
                key: object.scalar("REFERENCE_KEY_ID")?,
                description: object.scalar("REFERENCE_DESC").unwrap_or_default(),
            })
        })
        .collect();
    Ok(References { entries })
}

/// Converts a parsed `person.cat` label into a [`PersonnelList`].
pub fn personnel_from_label(label: &Label) -> Result<PersonnelList, Error> {
    let entries = label
        .all("PERSONNEL")
        .iter()
        .filter_map(|value| value.as_object())
        .filter_map(|object| {
            let info = object.require_object("PERSONNEL_INFORMATION").ok()?;
            let email = object
                .get("PERSONNEL_ELECTRONIC_MAIL")
                .and_then(Value::as_object)
                .and_then(|mail| mail.scalar("ELECTRONIC_MAIL_ID"));
            Some(Personnel {
                pds_user_id: object.scalar("PDS_USER_ID")?,
                full_name: info.scalar("FULL_NAME").unwrap_or_default(),
                institution_name: info.scalar("INSTITUTION_NAME").unwrap_or_default(),
                electronic_mail_id: email,
            })
        })
        .collect();
    Ok(PersonnelList { entries })
}

fn contact_from_object(object: &Label) -> Contact {
    Contact {
        institution_name: object.scalar("INSTITUTION_NAME").unwrap_or_default(),
        facility_name: object.scalar("FACILITY_NAME").unwrap_or_default(),
        full_name: object.scalar("FULL_NAME").unwrap_or_default(),
        electronic_mail_id: object.scalar("ELECTRONIC_MAIL_ID"),
    }
}

/// Converts a parsed `voldesc.cat` label into a [`Volume`].
pub fn volume_from_label(label: &Label) -> Result<Volume, Error> {
    let root = root_or_self(label, "VOLUME");
    let catalog_object = root.require_object("CATALOG")?;

    let one_or_many = |keyword: &str| -> Option<OneOrMany<String>> {
        catalog_object.get(keyword).map(|value| match value.clone() {
            Value::Set(values) => OneOrMany::Many(values),
            other => OneOrMany::One(other.into_vec().into_iter().next().unwrap_or_default()),
        })
    };

    let catalog = CatalogDescriptor {
        data_set_catalog: one_or_many("DATA_SET_CATALOG"),
        instrument_catalog: catalog_object.scalar("INSTRUMENT_CATALOG"),
        instrument_host_catalog: catalog_object.scalar("INSTRUMENT_HOST_CATALOG"),
        mission_catalog: catalog_object.scalar("MISSION_CATALOG"),
        personnel_catalog: catalog_object.scalar("PERSONNEL_CATALOG"),
        reference_catalog: catalog_object.scalar("REFERENCE_CATALOG"),
        target_catalog: catalog_object.scalar("TARGET_CATALOG"),
        data_set_map_projection_catalog: catalog_object.scalar("DATA_SET_MAP_PROJECTION_CATALOG"),
    };

    Ok(Volume {
        data_set_id: root.require_scalar("DATA_SET_ID")?,
        description: root.scalar("DESCRIPTION").unwrap_or_default(),
        volume_id: root.require_scalar("VOLUME_ID")?,
        volume_name: root.scalar("VOLUME_NAME").unwrap_or_default(),
        catalog,
        data_supplier: root.require_object("DATA_SUPPLIER").ok().map(contact_from_object),
        data_producer: root.require_object("DATA_PRODUCER").ok().map(contact_from_object),
        additional_fields: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_conversion_reads_nested_objects() {
        let label = Label::parse(
            r#"
            MISSION_NAME = "MARS GLOBAL SURVEYOR"
            OBJECT = MISSION_HOST
              INSTRUMENT_HOST_ID = MGS
            END_OBJECT = MISSION_HOST
            OBJECT = MISSION_INFORMATION
              MISSION_ALIAS_NAME = MGS
              MISSION_DESC = "A description."
              MISSION_OBJECTIVES_SUMMARY = "Summary."
              MISSION_START_DATE = 1996
              MISSION_STOP_DATE = 2006
            END_OBJECT = MISSION_INFORMATION
            END
            "#,
        )
        .unwrap();
        let mission = mission_from_label(&label).unwrap();
        assert_eq!(mission.alias_name, "MGS");
        assert_eq!(mission.instrument_host_id, "MGS");
    }

    #[test]
    fn volume_conversion_reads_catalog_map() {
        let label = Label::parse(
            r#"
            DATA_SET_ID = IZENBERG-DATA
            VOLUME_ID = MGSC_1001
            OBJECT = CATALOG
              MISSION_CATALOG = MISSION.CAT
              DATA_SET_CATALOG = {DS1.CAT, DS2.CAT}
            END_OBJECT = CATALOG
            END
            "#,
        )
        .unwrap();
        let volume = volume_from_label(&label).unwrap();
        assert_eq!(volume.catalog.mission_catalog.as_deref(), Some("MISSION.CAT"));
        assert_eq!(volume.catalog.data_set_catalog.unwrap().into_vec().len(), 2);
    }
}
