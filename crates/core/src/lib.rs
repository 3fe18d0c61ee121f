//! The data model for the SpatioTemporal Asset Catalog (STAC)
//! specification, used as the serialization target of the pdsstac mirror
//! pipeline.
//!
//! This crate only knows about the generic STAC object model — `Catalog`,
//! `Collection`, `Item`, `Link`, `Asset`, `Bbox` — and carries no knowledge
//! of PDS3 labels, the ODE web service, or the on-disk layout strategy used
//! to write a tree of these objects. Those concerns live in
//! `pdsstac-models`, `pdsstac-pds3`, and `pdsstac-storage` respectively.

mod asset;
mod bbox;
mod catalog;
mod collection;
mod error;
mod fields;
mod href;
mod item;
mod link;
mod version;

pub use asset::Asset;
pub use bbox::Bbox;
pub use catalog::Catalog;
pub use collection::{Collection, Extent, Provider, SpatialExtent, TemporalExtent};
pub use error::Error;
pub use fields::Fields;
pub use href::SelfHref;
pub use item::{Item, Properties};
pub use link::{Link, Links, CHILD, ITEM, PARENT, ROOT, SELF};
pub use version::Version;

/// A crate-specific `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The STAC version implemented by objects created with this crate.
pub const STAC_VERSION: Version = Version::v1_0_0;
