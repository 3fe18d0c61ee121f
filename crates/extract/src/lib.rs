//! ODE REST registry/records extraction and ODE archive website catalog
//! discovery, grounded on `PdsRegistry`/`PdsRecords`/`Crawler`/
//! `PDSCatalogDescription` in
//! `examples/original_source/pds_crawler/extractor/{pds_ws,pds_ode_website}.py`.

mod error;
mod flexible;
pub mod records;
pub mod registry;
pub mod website;

pub use error::Error;
pub use records::RecordsPage;
pub use registry::RegistryStats;
pub use website::{Crawler, DiscoveredCatalogs};

/// Result alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
