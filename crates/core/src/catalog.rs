use crate::{Error, Fields, Link, Links, Result, STAC_VERSION, SelfHref, Version};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub(crate) const CATALOG_TYPE: &str = "Catalog";

fn catalog_type() -> String {
    CATALOG_TYPE.to_string()
}

fn deserialize_catalog_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type != CATALOG_TYPE {
        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&r#type),
            &CATALOG_TYPE,
        ))
    } else {
        Ok(r#type)
    }
}

/// A STAC `Catalog` object represents a logical group of other `Catalog`,
/// `Collection`, and `Item` objects.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Catalog {
    #[serde(
        default = "catalog_type",
        deserialize_with = "deserialize_catalog_type"
    )]
    r#type: String,

    /// The STAC version the `Catalog` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Catalog` implements.
    #[serde(rename = "stac_extensions", skip_serializing_if = "Vec::is_empty", default)]
    pub extensions: Vec<String>,

    /// Identifier for the `Catalog`, unique within its parent.
    #[serde(default)]
    pub id: String,

    /// A short descriptive one-line title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description.
    #[serde(default)]
    pub description: String,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Additional fields not part of the `Catalog` specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<String>,
}

impl Catalog {
    /// Creates a new `Catalog` with the given id and description.
    pub fn new(id: impl ToString, description: impl ToString) -> Catalog {
        Catalog {
            r#type: catalog_type(),
            version: STAC_VERSION,
            extensions: Vec::new(),
            id: id.to_string(),
            title: None,
            description: description.to_string(),
            links: Vec::new(),
            additional_fields: Map::new(),
            self_href: None,
        }
    }

    /// Returns this catalog's `type` field.
    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    /// Validates that `value`'s `type` field is `"Catalog"` before
    /// deserializing, returning a typed error instead of a serde one.
    pub fn from_value(value: Value) -> Result<Catalog> {
        match value.get("type").and_then(Value::as_str) {
            Some(CATALOG_TYPE) => serde_json::from_value(value).map_err(Error::from),
            Some(other) => Err(Error::IncorrectType {
                actual: other.to_string(),
                expected: CATALOG_TYPE.to_string(),
            }),
            None => Err(Error::MissingField("type")),
        }
    }
}

impl Links for Catalog {
    fn links(&self) -> &[Link] {
        &self.links
    }
    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }
}

impl SelfHref for Catalog {
    fn self_href(&self) -> Option<&str> {
        self.self_href.as_deref()
    }
    fn self_href_mut(&mut self) -> &mut Option<String> {
        &mut self.self_href
    }
}

impl Fields for Catalog {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }
    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}
