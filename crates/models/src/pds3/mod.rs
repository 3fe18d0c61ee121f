//! Typed representations of PDS3 catalog objects and their STAC mappings.
//!
//! These types are the output of `pdsstac-pds3`'s label parser once it has
//! classified a catalog file by type (mission, host, instrument, dataset,
//! volume, references, personnel). Each carries a `create_stac_*` factory
//! used by `pdsstac-transform`'s chain-of-responsibility builder.

mod dataset;
mod instrument;
mod instrument_host;
mod mission;
mod personnel;
mod references;
mod volume;

pub use dataset::DataSet;
pub use instrument::Instrument;
pub use instrument_host::InstrumentHost;
pub use mission::Mission;
pub use personnel::{Personnel, PersonnelList};
pub use references::{ReferenceEntry, References};
pub use volume::{CatalogDescriptor, Contact, OneOrMany, Volume};
