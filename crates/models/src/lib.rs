//! Domain models for the pdsstac mirror pipeline: the ODE collection and
//! record descriptors, typed PDS3 catalog objects, STAC node id
//! construction, the "longer description wins" merge heuristic, and the
//! failure/warning reporting sink.
//!
//! `pdsstac-core` supplies the generic STAC object model; this crate knows
//! how to derive STAC nodes from the domain-specific shapes that
//! `pdsstac-extract` downloads and `pdsstac-pds3` parses.

mod collection_descriptor;
mod error;
mod merge;
pub mod pds3;
mod record_descriptor;
pub mod report;
pub mod urn;

pub use collection_descriptor::{CollectionDescriptor, SpecialValueRange};
pub use error::Error;
pub use merge::should_replace;
pub use record_descriptor::{ProductFile, RecordDescriptor};

/// A crate-specific `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
