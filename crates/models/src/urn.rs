//! STAC node id construction, following the `urn:pdssp:pds:<kind>:<slug>`
//! scheme used throughout `examples/original_source/pds_crawler/models/pds_models.py`
//! (e.g. `get_mission_id`, `get_plateform_id`, `get_instrument_id`,
//! `collection_id`).

/// Builds the root catalog id.
pub fn root() -> String {
    "urn:pdssp:pds:root".to_string()
}

/// Builds a body catalog id, e.g. `urn:pdssp:pds:mars`.
pub fn body(body: &str) -> String {
    format!("urn:pdssp:pds:{}", body.to_lowercase())
}

/// Builds a mission catalog id.
pub fn mission(mission: &str) -> String {
    format!("urn:pdssp:pds:mission:{mission}")
}

/// Builds a platform (instrument host) catalog id. The original's spelling
/// (`plateform`) is not carried over; only the id scheme is.
pub fn platform(instrument_host_id: &str) -> String {
    format!("urn:pdssp:pds:platform:{instrument_host_id}")
}

/// Builds an instrument catalog id.
pub fn instrument(instrument_id: &str) -> String {
    format!("urn:pdssp:pds:instru:{instrument_id}")
}

/// Builds a collection id.
pub fn collection(dataset_id: &str) -> String {
    format!("urn:pdssp:pds:collection:{dataset_id}")
}

/// Returns the last `:`-delimited segment of a URN, used when deriving an
/// on-disk directory name from a node id (see
/// `pdsstac_storage::layout::Strategy`, grounded on
/// `pds_crawler/load/strategy.py`'s `_fix_parent_directory`).
pub fn last_segment(urn: &str) -> &str {
    urn.rsplit(':').next().unwrap_or(urn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme() {
        assert_eq!(mission("viking"), "urn:pdssp:pds:mission:viking");
        assert_eq!(instrument("ctx"), "urn:pdssp:pds:instru:ctx");
        assert_eq!(last_segment("urn:pdssp:pds:mission:viking"), "viking");
    }
}
