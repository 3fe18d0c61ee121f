use crate::{Asset, Error, Fields, Link, Links, Result, STAC_VERSION, SelfHref, Version};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const DEFAULT_LICENSE: &str = "other";
pub(crate) const COLLECTION_TYPE: &str = "Collection";

fn collection_type() -> String {
    COLLECTION_TYPE.to_string()
}

fn deserialize_collection_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type != COLLECTION_TYPE {
        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&r#type),
            &COLLECTION_TYPE,
        ))
    } else {
        Ok(r#type)
    }
}

/// The STAC `Collection` specification defines a set of common fields to
/// describe a group of [Items](crate::Item) that share properties and
/// metadata. It shares all fields with [Catalog](crate::Catalog) and adds
/// fields describing the whole dataset.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Collection {
    #[serde(
        default = "collection_type",
        deserialize_with = "deserialize_collection_type"
    )]
    r#type: String,

    /// The STAC version the `Collection` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Collection` implements.
    #[serde(rename = "stac_extensions", skip_serializing_if = "Vec::is_empty", default)]
    pub extensions: Vec<String>,

    /// Identifier for the `Collection`, unique across the provider.
    #[serde(default)]
    pub id: String,

    /// A short descriptive one-line title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description.
    #[serde(default)]
    pub description: String,

    /// List of keywords describing the `Collection`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// `Collection`'s license(s).
    #[serde(default = "default_license")]
    pub license: String,

    /// A list of providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<Provider>>,

    /// Spatial and temporal extents.
    #[serde(default)]
    pub extent: Extent,

    /// A map of property summaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Map<String, Value>>,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Dictionary of asset objects that can be downloaded, each with a unique key.
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub assets: IndexMap<String, Asset>,

    /// Additional fields not part of the `Collection` specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<String>,
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

/// Information about a data provider.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Provider {
    /// The name of the organization or individual.
    pub name: String,

    /// Multi-line description of the provider's role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Roles of the provider (`"licensor"`, `"producer"`, `"processor"`, `"host"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Homepage of the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Additional fields on the provider.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Provider {
    /// Creates a new provider with the given name.
    pub fn new(name: impl ToString) -> Provider {
        Provider {
            name: name.to_string(),
            description: None,
            roles: None,
            url: None,
            additional_fields: Map::new(),
        }
    }
}

/// The spatio-temporal extents of a [Collection].
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct Extent {
    /// Spatial extents covered by the `Collection`.
    pub spatial: SpatialExtent,
    /// Temporal extents covered by the `Collection`.
    pub temporal: TemporalExtent,

    /// Additional fields on the extent.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// The spatial extents of a [Collection].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SpatialExtent {
    /// Potential spatial extents, as `[west, south, east, north]` boxes.
    pub bbox: Vec<[f64; 4]>,
}

impl Default for SpatialExtent {
    fn default() -> Self {
        SpatialExtent {
            bbox: vec![[-180.0, -90.0, 180.0, 90.0]],
        }
    }
}

/// The temporal extents of a [Collection].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TemporalExtent {
    /// Potential temporal extents.
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

impl Default for TemporalExtent {
    fn default() -> Self {
        TemporalExtent {
            interval: vec![[None, None]],
        }
    }
}

impl Collection {
    /// Creates a new `Collection` with the given id and description.
    pub fn new(id: impl ToString, description: impl ToString) -> Collection {
        Collection {
            r#type: collection_type(),
            version: STAC_VERSION,
            extensions: Vec::new(),
            id: id.to_string(),
            title: None,
            description: description.to_string(),
            keywords: None,
            license: default_license(),
            providers: None,
            extent: Extent::default(),
            summaries: None,
            links: Vec::new(),
            assets: IndexMap::new(),
            additional_fields: Map::new(),
            self_href: None,
        }
    }

    /// Returns this collection's `type` field.
    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    /// Validates that `value`'s `type` field is `"Collection"` before
    /// deserializing, returning a typed error instead of a serde one.
    pub fn from_value(value: Value) -> Result<Collection> {
        match value.get("type").and_then(Value::as_str) {
            Some(COLLECTION_TYPE) => serde_json::from_value(value).map_err(Error::from),
            Some(other) => Err(Error::IncorrectType {
                actual: other.to_string(),
                expected: COLLECTION_TYPE.to_string(),
            }),
            None => Err(Error::MissingField("type")),
        }
    }
}

impl Links for Collection {
    fn links(&self) -> &[Link] {
        &self.links
    }
    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl SelfHref for Collection {
    fn self_href(&self) -> Option<&str> {
        self.self_href.as_deref()
    }
    fn self_href_mut(&mut self) -> &mut Option<String> {
        &mut self.self_href
    }
}

impl Fields for Collection {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }
    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;

    #[test]
    fn new() {
        let collection = Collection::new("an-id", "a description");
        assert_eq!(collection.id, "an-id");
        assert_eq!(collection.description, "a description");
        assert_eq!(collection.license, "other");
        assert_eq!(collection.extent.spatial.bbox, vec![[-180.0, -90.0, 180.0, 90.0]]);
    }

    #[test]
    fn roundtrip() {
        let collection = Collection::new("an-id", "a description");
        let value = serde_json::to_value(&collection).unwrap();
        let back = Collection::from_value(value).unwrap();
        assert_eq!(collection, back);
    }
}
