//! On-disk storage for the pdsstac mirror pipeline: the collection
//! registry, the downloaded-file cache, and the mirrored STAC tree.
//!
//! All three stores are rooted under a single `base` directory:
//! `base/registry` ([`Registry`]), `base/files` ([`FileCache`]), and
//! `base/stac` ([`StacTree`]).

mod cache;
mod error;
pub mod layout;
mod lock;
mod registry;
mod stac;

pub use cache::{destination_filename, FileCache};
pub use error::Error;
pub use lock::LockGuard;
pub use registry::Registry;
pub use stac::{StacNode, StacTree};

/// A crate-specific `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
