//! The mirrored STAC tree store, rooted at `base/stac/catalog.json`.
//!
//! Grounded on the root-catalog load-or-create pattern PySTAC and the ODE
//! crawler share (`examples/original_source/pds_crawler/load/strategy.py`'s
//! `LargeDataVolumeStrategy` plus the catalog bootstrap in
//! `pds_crawler/cli.py`), and on `pdsstac-core`'s `Links`/`SelfHref` traits
//! for how a node's structural links and on-disk path relate.

use crate::error::{self, Error};
use crate::layout;
use pdsstac_core::{Catalog, Collection, Item, Link, Links, SelfHref};
use pdsstac_models::urn;
use std::fs;
use std::path::{Path, PathBuf};

const ROOT_TITLE: &str = "Planetary Data System";
const CATALOG_FILE: &str = "catalog.json";
const COLLECTION_FILE: &str = "collection.json";

/// A STAC Catalog, Collection, or Item, as stored in the mirrored tree.
#[derive(Debug, Clone)]
pub enum StacNode {
    /// A `Catalog` node (body, mission, platform, or instrument level).
    Catalog(Catalog),
    /// A `Collection` node (one per dataset).
    Collection(Collection),
    /// An `Item` node (one per record).
    Item(Item),
}

impl StacNode {
    /// This node's STAC id.
    pub fn id(&self) -> &str {
        match self {
            StacNode::Catalog(catalog) => &catalog.id,
            StacNode::Collection(collection) => &collection.id,
            StacNode::Item(item) => &item.id,
        }
    }

    fn add_link(&mut self, link: Link) {
        match self {
            StacNode::Catalog(catalog) => catalog.add_link(link),
            StacNode::Collection(collection) => collection.add_link(link),
            StacNode::Item(item) => item.add_link(link),
        }
    }

    fn remove_links(&mut self, rel: &str) {
        match self {
            StacNode::Catalog(catalog) => catalog.remove_links(rel),
            StacNode::Collection(collection) => collection.remove_links(rel),
            StacNode::Item(item) => item.remove_links(rel),
        }
    }

    fn set_self_href(&mut self, href: &str) {
        match self {
            StacNode::Catalog(catalog) => catalog.set_self_href(href),
            StacNode::Collection(collection) => collection.set_self_href(href),
            StacNode::Item(item) => item.set_self_href(href),
        }
    }

    fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            StacNode::Catalog(catalog) => serde_json::to_value(catalog),
            StacNode::Collection(collection) => serde_json::to_value(collection),
            StacNode::Item(item) => serde_json::to_value(item),
        }
    }

    /// The fixed filename for Catalog/Collection nodes. Items have no fixed
    /// filename (their path is id-derived via [`layout::item_path`]); call
    /// sites never reach this for an `Item`.
    fn filename(&self) -> &'static str {
        match self {
            StacNode::Catalog(_) => CATALOG_FILE,
            StacNode::Collection(_) => COLLECTION_FILE,
            StacNode::Item(_) => unreachable!("item paths are computed via layout::item_path"),
        }
    }
}

/// The mirrored STAC tree, rooted at `base/stac`.
pub struct StacTree {
    root_dir: PathBuf,
    root: Catalog,
}

impl StacTree {
    /// Opens the tree at `base`, loading the existing root catalog or
    /// creating a fresh one titled `"Planetary Data System"`.
    pub fn open(base: impl AsRef<Path>) -> Result<StacTree, Error> {
        let root_dir = base.as_ref().join("stac");
        fs::create_dir_all(&root_dir).map_err(error::io(&root_dir))?;
        let root_path = root_dir.join(CATALOG_FILE);

        let root = if root_path.exists() {
            read_catalog(&root_path)?
        } else {
            let mut catalog = Catalog::new(urn::root(), ROOT_TITLE);
            catalog.title = Some(ROOT_TITLE.to_string());
            write_node(&root_path, &StacNode::Catalog(catalog.clone()))?;
            catalog
        };

        Ok(StacTree { root_dir, root })
    }

    /// The in-memory root catalog.
    pub fn root_catalog(&self) -> &Catalog {
        &self.root
    }

    /// Re-reads the root catalog from disk, discarding any in-memory
    /// changes not yet saved.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.root = read_catalog(&self.root_path())?;
        Ok(())
    }

    fn root_path(&self) -> PathBuf {
        self.root_dir.join(CATALOG_FILE)
    }

    /// Pure path-existence test: does the item for `record_id` exist under
    /// `<root>/<body>/<mission>/<platform>/<instrument>/<collection>`?
    pub fn item_exists(&self, body: &str, mission: &str, platform: &str, instrument: &str, collection: &str, record_id: &str) -> bool {
        let collection_dir = self
            .root_dir
            .join(layout::last_segment(body))
            .join(layout::last_segment(mission))
            .join(layout::last_segment(platform))
            .join(layout::last_segment(instrument))
            .join(layout::last_segment(collection));
        layout::item_path(&collection_dir, record_id).exists()
    }

    /// Normalizes `node`'s self/root links under `parent_dir` and writes it
    /// to disk. Returns the path it was written to.
    ///
    /// Catalogs and Collections are written to
    /// `<parent_dir>/<id-last-segment>/{catalog,collection}.json`; Items are
    /// written to `<parent_dir>/<bucket>/<item-id>.json` (see [`layout`]).
    ///
    /// Safe to call more than once on a node loaded back from disk (e.g. by
    /// `Transform.Catalogs`'s update path): stale `self`/`root` links are
    /// stripped before the fresh ones are added, so re-saving never
    /// accumulates duplicates.
    pub fn normalize_and_save(&self, node: &mut StacNode, parent_dir: &Path) -> Result<PathBuf, Error> {
        let path = match node {
            StacNode::Item(item) => layout::item_path(parent_dir, &item.id),
            _ => layout::node_path(parent_dir, node.id(), node.filename()),
        };

        node.remove_links(pdsstac_core::SELF);
        node.remove_links(pdsstac_core::ROOT);
        node.add_link(Link::self_(path.display().to_string()));
        node.add_link(Link::root(self.root_path().display().to_string()));
        node.set_self_href(&path.display().to_string());

        write_node(&path, node)?;
        Ok(path)
    }

    /// Writes `catalog` as the root, replacing the in-memory root.
    pub fn root_normalize_and_save(&mut self, mut catalog: Catalog) -> Result<(), Error> {
        let path = self.root_path();
        catalog.set_self_href(&path.display().to_string());
        catalog.remove_links(pdsstac_core::SELF);
        catalog.add_link(Link::self_(path.display().to_string()));
        write_node(&path, &StacNode::Catalog(catalog.clone()))?;
        self.root = catalog;
        Ok(())
    }

    /// Re-saves the current in-memory root catalog (e.g. after its
    /// `links` were mutated by the caller to add a new top-level child).
    pub fn catalog_normalize_and_save(&mut self) -> Result<(), Error> {
        let catalog = self.root.clone();
        self.root_normalize_and_save(catalog)
    }

    /// The tree's root directory (`base/stac`).
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

fn read_catalog(path: &Path) -> Result<Catalog, Error> {
    let bytes = fs::read(path).map_err(error::io(path))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_value(value)?)
}

fn write_node(path: &Path, node: &StacNode) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(error::io(parent))?;
    }
    let value = node.to_json_value().map_err(|source| Error::Decode { path: path.to_path_buf(), source })?;
    let bytes = serde_json::to_vec_pretty(&value).map_err(|source| Error::Decode { path: path.to_path_buf(), source })?;
    fs::write(path, bytes).map_err(error::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdsstac_core::Item;

    #[test]
    fn open_creates_fresh_root() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        assert_eq!(tree.root_catalog().title.as_deref(), Some(ROOT_TITLE));
        assert!(tmp.path().join("stac").join("catalog.json").exists());
    }

    #[test]
    fn open_loads_existing_root() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let _tree = StacTree::open(tmp.path()).unwrap();
        }
        let tree = StacTree::open(tmp.path()).unwrap();
        assert_eq!(tree.root_catalog().id, "urn:pdssp:pds:root");
    }

    #[test]
    fn normalize_and_save_writes_collection_under_id_segment() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let mut node = StacNode::Collection(Collection::new("urn:pdssp:pds:collection:izenberg-data", "d"));
        let path = tree.normalize_and_save(&mut node, tree.root_dir()).unwrap();
        assert!(path.ends_with("izenberg-data/collection.json"));
        assert!(path.exists());
    }

    #[test]
    fn normalize_and_save_buckets_items() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        let mut node = StacNode::Item(Item::new("urn:pdssp:pds:item:example-1"));
        let path = tree.normalize_and_save(&mut node, tree.root_dir()).unwrap();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with("example-1.json"));
    }

    #[test]
    fn item_exists_is_pure_path_check() {
        let tmp = tempfile::tempdir().unwrap();
        let tree = StacTree::open(tmp.path()).unwrap();
        assert!(!tree.item_exists("mercury", "MESS", "MESS", "MDIS", "izenberg-data", "urn:pdssp:pds:item:example-1"));
        let collection_dir = tree
            .root_dir()
            .join("mercury")
            .join("MESS")
            .join("MESS")
            .join("MDIS")
            .join("izenberg-data");
        let mut node = StacNode::Item(Item::new("urn:pdssp:pds:item:example-1"));
        tree.normalize_and_save(&mut node, &collection_dir).unwrap();
        assert!(tree.item_exists("mercury", "MESS", "MESS", "MDIS", "izenberg-data", "urn:pdssp:pds:item:example-1"));
    }
}
