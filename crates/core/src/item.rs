use crate::{Asset, Bbox, Error, Fields, Link, Links, Result, STAC_VERSION, SelfHref, Version};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub(crate) const ITEM_TYPE: &str = "Feature";

fn item_type() -> String {
    ITEM_TYPE.to_string()
}

fn deserialize_item_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type != ITEM_TYPE {
        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&r#type),
            &ITEM_TYPE,
        ))
    } else {
        Ok(r#type)
    }
}

/// A STAC `Item` is a GeoJSON `Feature` augmented with foreign members
/// relevant to a STAC object.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Item {
    #[serde(default = "item_type", deserialize_with = "deserialize_item_type")]
    r#type: String,

    /// The STAC version the `Item` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Item` implements.
    #[serde(rename = "stac_extensions", skip_serializing_if = "Vec::is_empty", default)]
    pub extensions: Vec<String>,

    /// Provider identifier, unique within the collection.
    #[serde(default)]
    pub id: String,

    /// Defines the full footprint of the asset represented by this item,
    /// formatted according to RFC 7946, section 3.1.
    #[serde(deserialize_with = "deserialize_geometry", default)]
    pub geometry: Option<geojson::Geometry>,

    /// Bounding box of the asset represented by this item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,

    /// A dictionary of additional metadata for the item.
    #[serde(default)]
    pub properties: Properties,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Dictionary of asset objects, each with a unique key.
    #[serde(default)]
    pub assets: IndexMap<String, Asset>,

    /// The id of the collection this item belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Additional fields not part of the `Item` specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<String>,
}

fn deserialize_geometry<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<geojson::Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => geojson::Geometry::from_json_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Additional metadata fields carried on an [Item].
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct Properties {
    /// The searchable date and time of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,

    /// A human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional fields not captured above.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Item {
    /// Creates a new `Item` with the given id.
    pub fn new(id: impl ToString) -> Item {
        Item {
            r#type: item_type(),
            version: STAC_VERSION,
            extensions: Vec::new(),
            id: id.to_string(),
            geometry: None,
            bbox: None,
            properties: Properties::default(),
            links: Vec::new(),
            assets: IndexMap::new(),
            collection: None,
            additional_fields: Map::new(),
            self_href: None,
        }
    }

    /// Returns this item's `type` field.
    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    /// Sets the item's collection id, for use in builder chains.
    pub fn with_collection(mut self, collection: impl ToString) -> Item {
        self.collection = Some(collection.to_string());
        self
    }

    /// Sets the item's bounding box, for use in builder chains.
    pub fn with_bbox(mut self, bbox: Bbox) -> Item {
        self.bbox = Some(bbox);
        self
    }

    /// Sets the item's datetime, for use in builder chains.
    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Item {
        self.properties.datetime = Some(datetime);
        self
    }

    /// Validates that `value`'s `type` field is `"Feature"` before
    /// deserializing, returning a typed error instead of a serde one.
    pub fn from_value(value: Value) -> Result<Item> {
        match value.get("type").and_then(Value::as_str) {
            Some(ITEM_TYPE) => serde_json::from_value(value).map_err(Error::from),
            Some(other) => Err(Error::IncorrectType {
                actual: other.to_string(),
                expected: ITEM_TYPE.to_string(),
            }),
            None => Err(Error::MissingField("type")),
        }
    }
}

impl Links for Item {
    fn links(&self) -> &[Link] {
        &self.links
    }
    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl SelfHref for Item {
    fn self_href(&self) -> Option<&str> {
        self.self_href.as_deref()
    }
    fn self_href_mut(&mut self) -> &mut Option<String> {
        &mut self.self_href
    }
}

impl Fields for Item {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }
    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

#[cfg(test)]
mod tests {
    use super::Item;
    use crate::Bbox;

    #[test]
    fn new() {
        let item = Item::new("an-id");
        assert_eq!(item.id, "an-id");
        assert!(item.geometry.is_none());
        assert!(item.bbox.is_none());
        assert_eq!(item.r#type(), "Feature");
    }

    #[test]
    fn builder() {
        let item = Item::new("an-id")
            .with_collection("a-collection")
            .with_bbox(Bbox::new(-10.0, -10.0, 10.0, 10.0).unwrap());
        assert_eq!(item.collection.as_deref(), Some("a-collection"));
        assert!(item.bbox.is_some());
    }

    #[test]
    fn roundtrip() {
        let item = Item::new("an-id").with_collection("a-collection");
        let value = serde_json::to_value(&item).unwrap();
        let back = Item::from_value(value).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn wrong_type() {
        let value = serde_json::json!({"type": "Catalog", "id": "x"});
        assert!(Item::from_value(value).is_err());
    }
}
