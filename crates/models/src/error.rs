use thiserror::Error;

/// Error enum for `pdsstac-models`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A `CollectionDescriptor` failed a mandatory invariant at parse time
    /// (negative product count, zero products, or no valid footprints).
    #[error("invariant violation on collection descriptor {id}: {reason}")]
    InvariantViolation {
        /// The descriptor's identity string, for diagnostics.
        id: String,
        /// What invariant was violated.
        reason: &'static str,
    },

    /// A `RecordDescriptor` has no usable geometry (`Footprint_C0_geometry`
    /// missing).
    #[error("record {0} has no footprint geometry")]
    MissingFootprint(String),

    /// None of `Observation_time`, `Product_creation_time`, or
    /// `Product_release_date` could be parsed into a usable datetime.
    #[error("record {0}: no usable datetime (observation/creation/release all absent or unparsable)")]
    DateConversion(String),

    /// A PDS3 model field required by a STAC factory was absent.
    #[error("missing required field \"{0}\" on {1}")]
    MissingField(&'static str, &'static str),

    /// [pdsstac_core::Error]
    #[error(transparent)]
    Core(#[from] pdsstac_core::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
