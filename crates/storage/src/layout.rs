//! The fixed on-disk layout strategy for the mirrored STAC tree.
//!
//! Grounded on `LargeDataVolumeStrategy`/`_hash_storage` in
//! `examples/original_source/pds_crawler/load/strategy.py`. The original
//! buckets items with Python's built-in `hash()`, which is randomized per
//! process (`PYTHONHASHSEED`) unless explicitly disabled — unsuitable for a
//! deterministic, idempotent `itemExists` check (see `DESIGN.md`, Open
//! Question 1). This module replaces it with FNV-1a, a fixed non-cryptographic
//! hash with no process-level randomization.

use std::path::{Path, PathBuf};

/// Number of bucket subdirectories an item id is spread across.
pub const BUCKET_COUNT: u64 = 1000;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Hashes `key`'s UTF-8 bytes with FNV-1a.
pub fn fnv1a(key: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in key.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The deterministic bucket directory name for `item_id`, in `[0, 1000)`.
pub fn bucket_for(item_id: &str) -> String {
    (fnv1a(item_id) % BUCKET_COUNT).to_string()
}

/// The last `:`-delimited segment of a URN-shaped id, or the whole string
/// if it contains no colon.
pub fn last_segment(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

/// The path a Catalog or Collection node should be written to: the
/// parent's directory joined with the id's last segment and the node's
/// filename.
pub fn node_path(parent_dir: &Path, id: &str, filename: &str) -> PathBuf {
    parent_dir.join(last_segment(id)).join(filename)
}

/// The path an Item should be written to: the parent's directory joined
/// with the item's deterministic bucket and `<item-id>.json`.
pub fn item_path(parent_dir: &Path, item_id: &str) -> PathBuf {
    parent_dir.join(bucket_for(item_id)).join(format!("{}.json", last_segment(item_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_is_deterministic() {
        let a = bucket_for("urn:pdssp:pds:item:example-1");
        let b = bucket_for("urn:pdssp:pds:item:example-1");
        assert_eq!(a, b);
    }

    #[test]
    fn bucket_is_bounded() {
        for id in ["a", "b", "urn:pdssp:pds:item:xyz", ""] {
            let bucket: u64 = bucket_for(id).parse().unwrap();
            assert!(bucket < BUCKET_COUNT);
        }
    }

    #[test]
    fn last_segment_strips_urn_prefix() {
        assert_eq!(last_segment("urn:pdssp:pds:collection:izenberg-data"), "izenberg-data");
        assert_eq!(last_segment("no-colon-here"), "no-colon-here");
    }

    #[test]
    fn item_path_nests_under_bucket() {
        let path = item_path(Path::new("/root/collection"), "urn:pdssp:pds:item:example-1");
        let bucket = bucket_for("urn:pdssp:pds:item:example-1");
        assert_eq!(path, Path::new("/root/collection").join(bucket).join("example-1.json"));
    }
}
