//! `Transform.Catalogs`/`Transform.Records`: builds and updates the
//! mirrored STAC tree from the catalogs `pdsstac-extract` discovered and
//! the record pages it cached.
//!
//! Grounded on `pds_to_stac.py`'s `StacTransformer`/`StacRecordsTransformer`
//! pair in `examples/original_source/pds_crawler/transformer/`, reshaped
//! into the fixed-order handler chain and record-merge algorithm named in
//! `spec.md` §4.8-4.9 (see [`catalogs`]/[`records`] module docs for how
//! each departs from the original's class layout).

pub mod bundle;
pub mod catalogs;
mod error;
pub mod records;

pub use bundle::CatalogBundle;
pub use catalogs::{build_catalogs, BuildOutcome, DatasetNode, InstrumentNode};
pub use error::Error;
pub use records::{transform_records, RecordsOutcome};

/// A crate-specific `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
