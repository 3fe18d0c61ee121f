use crate::Fields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An Asset is an object that contains a URI to data associated with an
/// [Item](crate::Item) that can be downloaded or streamed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Asset {
    /// URI to the asset object. Relative and absolute URIs are both allowed.
    pub href: String,

    /// The displayed title for clients and users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A description of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Media type of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// The semantic roles of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Additional fields on the asset.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Asset {
    /// Creates a new asset with the provided href.
    pub fn new(href: impl ToString) -> Asset {
        Asset {
            href: href.to_string(),
            title: None,
            description: None,
            r#type: None,
            roles: None,
            additional_fields: Map::new(),
        }
    }

    /// Sets the asset's description, for use in builder chains.
    pub fn with_description(mut self, description: impl ToString) -> Asset {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the asset's media type, for use in builder chains.
    pub fn with_type(mut self, r#type: impl ToString) -> Asset {
        self.r#type = Some(r#type.to_string());
        self
    }

    /// Sets the asset's title, for use in builder chains.
    pub fn with_title(mut self, title: impl ToString) -> Asset {
        self.title = Some(title.to_string());
        self
    }
}

impl Fields for Asset {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }
    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

#[cfg(test)]
mod tests {
    use super::Asset;

    #[test]
    fn new() {
        let asset = Asset::new("an-href");
        assert_eq!(asset.href, "an-href");
        assert!(asset.title.is_none());
        assert!(asset.description.is_none());
    }

    #[test]
    fn skip_serializing() {
        let asset = Asset::new("an-href");
        let value = serde_json::to_value(asset).unwrap();
        assert!(value.get("title").is_none());
        assert!(value.get("description").is_none());
        assert!(value.get("type").is_none());
        assert!(value.get("roles").is_none());
    }

    #[test]
    fn builder() {
        let asset = Asset::new("an-href")
            .with_title("A title")
            .with_description("A description")
            .with_type("image/tiff");
        assert_eq!(asset.title.unwrap(), "A title");
        assert_eq!(asset.description.unwrap(), "A description");
        assert_eq!(asset.r#type.unwrap(), "image/tiff");
    }
}
