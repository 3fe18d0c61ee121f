use serde::{Deserialize, Serialize};

/// One `PERSONNEL` entry from a PDS3 `person.cat` catalog file.
///
/// Grounded on `PersonnelModel`/`PersonnelInformationModel` in
/// `examples/original_source/pds_crawler/models/pds_models.py`; trimmed to
/// the fields the STAC mapping actually consumes (contact/address fields
/// from `PersonnelInformationModel` have no STAC counterpart and are
/// dropped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    /// PDS user id.
    pub pds_user_id: String,
    /// Full name.
    pub full_name: String,
    /// Institution name.
    pub institution_name: String,
    /// Electronic mail, if reported.
    pub electronic_mail_id: Option<String>,
}

/// `PERSONNEL` object: a list of personnel entries for a dataset or
/// mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonnelList {
    /// The parsed personnel entries.
    pub entries: Vec<Personnel>,
}

impl PersonnelList {
    /// Builds STAC providers (role `"producer"`) for every entry, used by
    /// the `PersonnelHandler` stage of `Transform.Catalogs` to merge
    /// personnel into a dataset's provider list.
    pub fn create_stac_providers(&self) -> Vec<pdsstac_core::Provider> {
        self.entries
            .iter()
            .map(|person| {
                let mut provider = pdsstac_core::Provider::new(person.full_name.clone());
                provider.roles = Some(vec!["producer".to_string()]);
                provider
                    .additional_fields
                    .insert("institution_name".to_string(), person.institution_name.clone().into());
                if let Some(email) = &person.electronic_mail_id {
                    provider
                        .additional_fields
                        .insert("electronic_mail_id".to_string(), email.clone().into());
                }
                provider
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_get_producer_role() {
        let list = PersonnelList {
            entries: vec![Personnel {
                pds_user_id: "NIZENBERG".to_string(),
                full_name: "Noam Izenberg".to_string(),
                institution_name: "JHU/APL".to_string(),
                electronic_mail_id: None,
            }],
        };
        let providers = list.create_stac_providers();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].roles.as_deref(), Some(&["producer".to_string()][..]));
    }
}
