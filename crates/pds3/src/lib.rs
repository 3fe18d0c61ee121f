//! Parser for PDS3 catalog label files.
//!
//! Exposes a typed-grammar interface over the PDS3 object description
//! language: callers classify a catalog file by [`grammar::GrammarKind`],
//! hand its text to [`factory::parse_catalog`], and get back one of the
//! typed objects in `pdsstac_models::pds3`. The label tokenizer/parser in
//! [`label`] and the per-kind conversions in [`convert`] are internal
//! plumbing; the exact grammar is deliberately not part of this crate's
//! public surface (see the module-level docs on [`label::Label`]).

mod convert;
mod error;
mod factory;
mod grammar;
mod label;

pub use error::Error;
pub use factory::{parse_catalog, parse_catalog_default, ParsedCatalog, DEFAULT_TIMEOUT};
pub use grammar::GrammarKind;
pub use label::{Label, Value};

/// A crate-specific `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
