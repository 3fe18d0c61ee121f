//! A hierarchical keyed store for [`CollectionDescriptor`]s and their
//! associated URL lists.
//!
//! Grounded on `Hdf5Storage` in
//! `examples/original_source/pds_crawler/load/database.py`: the original
//! keeps an HDF5 file with one group per sanitized identity path, storing
//! scalar attributes on the group and a resizable dataset for URL lists. An
//! HDF5 binding is not part of this corpus's stack, so groups become
//! directories and attribute sets/URL lists become small JSON files —
//! same contract (idempotent save, deterministic group path), plain files
//! instead of an HDF5 container.

use crate::error::{self, Error};
use pdsstac_models::CollectionDescriptor;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const ATTRIBUTES_FILE: &str = "attributes.json";
const URLS_FILE: &str = "urls.json";

/// The on-disk registry of known collections and their pregenerated record
/// URLs, rooted at `base/registry`.
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    /// Opens (and creates, if absent) the registry rooted at `base`.
    pub fn open(base: impl AsRef<Path>) -> Result<Registry, Error> {
        let root = base.as_ref().join("registry");
        fs::create_dir_all(&root).map_err(error::io(&root))?;
        Ok(Registry { root })
    }

    fn group_dir(&self, desc: &CollectionDescriptor) -> PathBuf {
        self.root.join(desc.sanitized_path())
    }

    /// Creates the group for `desc` if absent, or overwrites it if
    /// `product_count` differs from the stored value. No-ops otherwise.
    /// Returns whether anything was written.
    pub fn save_collection(&self, desc: &CollectionDescriptor) -> Result<bool, Error> {
        let dir = self.group_dir(desc);
        let attributes_path = dir.join(ATTRIBUTES_FILE);

        if let Some(existing) = self.try_load_attributes(&attributes_path)? {
            if existing.product_count == desc.product_count {
                return Ok(false);
            }
        }

        fs::create_dir_all(&dir).map_err(error::io(&dir))?;
        let bytes = serde_json::to_vec_pretty(desc).map_err(|source| Error::Decode {
            path: attributes_path.clone(),
            source,
        })?;
        fs::write(&attributes_path, bytes).map_err(error::io(&attributes_path))?;
        Ok(true)
    }

    /// Saves every descriptor, returning the AND-fold of individual save
    /// results (`true` only if every descriptor caused a write).
    pub fn save_collections(&self, descs: &[CollectionDescriptor]) -> Result<bool, Error> {
        let mut all_saved = true;
        for desc in descs {
            all_saved &= self.save_collection(desc)?;
        }
        Ok(all_saved)
    }

    fn try_load_attributes(&self, path: &Path) -> Result<Option<CollectionDescriptor>, Error> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(error::io(path))?;
        let desc = serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(desc))
    }

    /// Loads every stored descriptor matching `body_filter` and
    /// `dataset_id_filter` (case-insensitive), in directory-walk order.
    pub fn load_collections(
        &self,
        body_filter: Option<&str>,
        dataset_id_filter: Option<&str>,
    ) -> Result<Vec<CollectionDescriptor>, Error> {
        let mut descriptors = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name() == ATTRIBUTES_FILE)
        {
            let desc = match self.try_load_attributes(entry.path())? {
                Some(desc) => desc,
                None => continue,
            };
            if let Some(body) = body_filter {
                if !desc.body.eq_ignore_ascii_case(body) {
                    continue;
                }
            }
            if let Some(dataset_id) = dataset_id_filter {
                if !desc.dataset_id.eq_ignore_ascii_case(dataset_id) {
                    continue;
                }
            }
            descriptors.push(desc);
        }
        Ok(descriptors)
    }

    /// Returns the first stored descriptor whose `dataset_id` matches
    /// `dataset_id` case-insensitively.
    pub fn query_cache(&self, dataset_id: &str) -> Result<Option<CollectionDescriptor>, Error> {
        Ok(self
            .load_collections(None, Some(dataset_id))?
            .into_iter()
            .next())
    }

    /// Saves the URL list for `desc`. No-ops if the existing list is equal
    /// (as a multiset) to `urls`; otherwise overwrites.
    pub fn save_urls(&self, desc: &CollectionDescriptor, urls: &[String]) -> Result<(), Error> {
        let dir = self.group_dir(desc);
        let urls_path = dir.join(URLS_FILE);

        if let Some(existing) = self.try_load_urls(&urls_path)? {
            if multiset_eq(&existing, urls) {
                return Ok(());
            }
        }

        fs::create_dir_all(&dir).map_err(error::io(&dir))?;
        let bytes = serde_json::to_vec_pretty(urls).map_err(|source| Error::Decode {
            path: urls_path.clone(),
            source,
        })?;
        fs::write(&urls_path, bytes).map_err(error::io(&urls_path))?;
        Ok(())
    }

    /// Loads the URL list for `desc`, or an empty list if none is stored.
    pub fn load_urls(&self, desc: &CollectionDescriptor) -> Result<Vec<String>, Error> {
        let urls_path = self.group_dir(desc).join(URLS_FILE);
        Ok(self.try_load_urls(&urls_path)?.unwrap_or_default())
    }

    fn try_load_urls(&self, path: &Path) -> Result<Option<Vec<String>>, Error> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(error::io(path))?;
        let urls = serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(urls))
    }
}

fn multiset_eq(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for item in a {
        *counts.entry(item.as_str()).or_insert(0) += 1;
    }
    for item in b {
        *counts.entry(item.as_str()).or_insert(0) -= 1;
    }
    counts.values().all(|count| *count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CollectionDescriptor {
        CollectionDescriptor {
            body: "mercury".to_string(),
            ihid: "MESS".to_string(),
            iid: "MDIS".to_string(),
            pt: "EDR".to_string(),
            dataset_id: "izenberg-data".to_string(),
            product_count: 10,
            has_valid_footprints: true,
            min_orbit: None,
            max_orbit: None,
            min_observation_time: None,
            max_observation_time: None,
            special_values: Vec::new(),
            valid_targets: vec!["MERCURY".to_string()],
        }
    }

    #[test]
    fn save_collection_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = Registry::open(tmp.path()).unwrap();
        assert!(registry.save_collection(&sample()).unwrap());
        assert!(!registry.save_collection(&sample()).unwrap());
    }

    #[test]
    fn save_collection_overwrites_on_count_change() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = Registry::open(tmp.path()).unwrap();
        assert!(registry.save_collection(&sample()).unwrap());
        let mut changed = sample();
        changed.product_count = 20;
        assert!(registry.save_collection(&changed).unwrap());
        let loaded = registry.load_collections(None, None).unwrap();
        assert_eq!(loaded[0].product_count, 20);
    }

    #[test]
    fn load_collections_filters_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = Registry::open(tmp.path()).unwrap();
        registry.save_collection(&sample()).unwrap();
        assert_eq!(registry.load_collections(Some("MERCURY"), None).unwrap().len(), 1);
        assert_eq!(registry.load_collections(Some("venus"), None).unwrap().len(), 0);
    }

    #[test]
    fn save_urls_noop_on_equal_multiset() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = Registry::open(tmp.path()).unwrap();
        let desc = sample();
        registry
            .save_urls(&desc, &["a".to_string(), "b".to_string()])
            .unwrap();
        registry
            .save_urls(&desc, &["b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(registry.load_urls(&desc).unwrap().len(), 2);
    }

    #[test]
    fn load_urls_empty_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = Registry::open(tmp.path()).unwrap();
        assert!(registry.load_urls(&sample()).unwrap().is_empty());
    }
}
