//! The "longer description wins" update heuristic shared by every
//! `Transform.Catalogs` handler.
//!
//! Grounded on the change-detection checks in
//! `examples/original_source/pds_crawler/load/database.py` and the merge
//! logic in `pds_crawler/transformer/pds_to_stac.py`: a stored node is
//! overwritten only when the incoming description is strictly longer, by
//! byte length, than what is already on disk (SPEC_FULL.md §5).

/// Returns `true` if `incoming` should replace `existing`, per the
/// byte-length comparison contract.
pub fn should_replace(existing: &str, incoming: &str) -> bool {
    incoming.len() > existing.len()
}

#[cfg(test)]
mod tests {
    use super::should_replace;

    #[test]
    fn longer_wins() {
        assert!(should_replace("short", "a much longer description"));
        assert!(!should_replace("a much longer description", "short"));
        assert!(!should_replace("same length!", "same lengthy"));
    }
}
