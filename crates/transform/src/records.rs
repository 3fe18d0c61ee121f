//! `Transform.Records`: converts a collection's cached record pages into
//! STAC items and merges them into the dataset collection built by
//! [`crate::catalogs::build_catalogs`].
//!
//! Grounded on `load_pds_records`/`PdsCollections.add_items` in
//! `examples/original_source/pds_crawler/load/strategy.py`: stream pages,
//! skip records already present on disk, convert the rest, and write the
//! result back as one batch rather than one file write per item.

use crate::catalogs::BuildOutcome;
use crate::error::Error;
use pdsstac_models::report::{Report, Sink};
use pdsstac_models::CollectionDescriptor;
use pdsstac_storage::{layout, FileCache, StacNode, StacTree};

/// Outcome of one [`transform_records`] call.
#[derive(Debug, Clone, Default)]
pub struct RecordsOutcome {
    /// Number of items newly written to the tree.
    pub items_added: usize,
    /// Number of records skipped because an item already existed.
    pub items_skipped_existing: usize,
    /// Number of records whose conversion to a STAC item failed (reported
    /// to the sink and dropped, not retried).
    pub conversion_errors: usize,
}

/// Converts every not-yet-mirrored record for `desc` into a STAC item and
/// saves it under the dataset collection `build` resolved for
/// `(desc.iid, desc.dataset_id)`.
///
/// Per `spec.md` §4.9: records are read once into memory, deduplicated
/// against what's already on disk, converted, and — if any survive — saved.
/// A collection with nothing new to add is left untouched (no empty
/// re-save).
pub fn transform_records(tree: &StacTree, cache: &FileCache, desc: &CollectionDescriptor, build: &BuildOutcome, sink: &mut dyn Sink) -> Result<RecordsOutcome, Error> {
    let dataset_dir = build
        .dataset_dir(&desc.iid, &desc.dataset_id)
        .ok_or_else(|| Error::NoCollectionNode(desc.identity_string()))?
        .to_path_buf();

    let pages = pdsstac_extract::records::stream_cached_pages(cache, desc, sink)?;

    let mut outcome = RecordsOutcome::default();
    let mut new_items = Vec::new();
    for page in &pages {
        for record in &page.records {
            if layout::item_path(&dataset_dir, &record.ode_id).exists() {
                outcome.items_skipped_existing += 1;
                continue;
            }
            match record.to_stac_item() {
                Ok(item) => new_items.push(item),
                Err(err) => {
                    outcome.conversion_errors += 1;
                    sink.report(Report::new(record.ode_id.clone(), err.to_string()));
                }
            }
        }
    }

    if new_items.is_empty() {
        return Ok(outcome);
    }

    for item in new_items {
        let mut node = StacNode::Item(item);
        tree.normalize_and_save(&mut node, &dataset_dir)?;
        outcome.items_added += 1;
    }

    Ok(outcome)
}
