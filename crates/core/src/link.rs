use crate::Fields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `root` relation type.
pub const ROOT: &str = "root";
/// `parent` relation type.
pub const PARENT: &str = "parent";
/// `child` relation type.
pub const CHILD: &str = "child";
/// `item` relation type.
pub const ITEM: &str = "item";
/// `self` relation type.
pub const SELF: &str = "self";

/// A reference to another STAC entity.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Link {
    /// The href of the linked entity.
    pub href: String,

    /// The relationship type.
    pub rel: String,

    /// The media type of the linked entity.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// A human-readable title for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional fields on the link.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Link {
    /// Creates a new link with the given href and relation type.
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            title: None,
            additional_fields: Map::new(),
        }
    }

    /// Creates a `root` link.
    pub fn root(href: impl ToString) -> Link {
        Link::new(href, ROOT)
    }

    /// Creates a `parent` link.
    pub fn parent(href: impl ToString) -> Link {
        Link::new(href, PARENT)
    }

    /// Creates a `child` link.
    pub fn child(href: impl ToString) -> Link {
        Link::new(href, CHILD)
    }

    /// Creates an `item` link.
    pub fn item(href: impl ToString) -> Link {
        Link::new(href, ITEM)
    }

    /// Creates a `self` link.
    pub fn self_(href: impl ToString) -> Link {
        Link::new(href, SELF)
    }

    /// Returns true if this link's relation type is `root`.
    pub fn is_root(&self) -> bool {
        self.rel == ROOT
    }

    /// Returns true if this link's relation type is `parent`.
    pub fn is_parent(&self) -> bool {
        self.rel == PARENT
    }

    /// Returns true if this link's relation type is `child`.
    pub fn is_child(&self) -> bool {
        self.rel == CHILD
    }

    /// Returns true if this link's relation type is `item`.
    pub fn is_item(&self) -> bool {
        self.rel == ITEM
    }

    /// Returns true if this link's relation type is `self`.
    pub fn is_self(&self) -> bool {
        self.rel == SELF
    }

    /// Returns true if this link is a structural link (root, parent, child, or item).
    pub fn is_structural(&self) -> bool {
        self.is_root() || self.is_parent() || self.is_child() || self.is_item()
    }

    /// Sets the title, for use in builder chains.
    pub fn with_title(mut self, title: impl ToString) -> Link {
        self.title = Some(title.to_string());
        self
    }
}

impl Fields for Link {
    fn fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }
    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.additional_fields
    }
}

/// Implemented by every STAC object that owns a list of [Link]s.
pub trait Links {
    /// Returns a reference to this object's links.
    fn links(&self) -> &[Link];

    /// Returns a mutable reference to this object's links.
    fn links_mut(&mut self) -> &mut Vec<Link>;

    /// Adds a link.
    fn add_link(&mut self, link: Link) {
        self.links_mut().push(link);
    }

    /// Removes all links with the given relation type.
    fn remove_links(&mut self, rel: &str) {
        self.links_mut().retain(|link| link.rel != rel);
    }

    /// Removes the root, parent, child, and item links.
    fn remove_structural_links(&mut self) {
        self.links_mut().retain(|link| !link.is_structural());
    }

    /// Returns an iterator over this object's `child` links.
    fn child_links(&self) -> std::slice::Iter<'_, Link> {
        self.links().iter()
    }

    /// Returns the first link with the given relation type, if any.
    fn link(&self, rel: &str) -> Option<&Link> {
        self.links().iter().find(|link| link.rel == rel)
    }

    /// Returns the `root` link, if any.
    fn root_link(&self) -> Option<&Link> {
        self.link(ROOT)
    }

    /// Returns the `parent` link, if any.
    fn parent_link(&self) -> Option<&Link> {
        self.link(PARENT)
    }

    /// Returns the `self` link, if any.
    fn self_link(&self) -> Option<&Link> {
        self.link(SELF)
    }
}

#[cfg(test)]
mod tests {
    use super::{Link, Links};

    struct Holder(Vec<Link>);
    impl Links for Holder {
        fn links(&self) -> &[Link] {
            &self.0
        }
        fn links_mut(&mut self) -> &mut Vec<Link> {
            &mut self.0
        }
    }

    #[test]
    fn structural() {
        let mut holder = Holder(Vec::new());
        holder.add_link(Link::root("./catalog.json"));
        holder.add_link(Link::child("./a/catalog.json"));
        holder.add_link(Link::new("https://example.com", "describedby"));
        assert!(holder.root_link().is_some());
        holder.remove_structural_links();
        assert_eq!(holder.links().len(), 1);
        assert_eq!(holder.links()[0].rel, "describedby");
    }
}
