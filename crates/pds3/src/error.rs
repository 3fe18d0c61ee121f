use thiserror::Error;

/// Error enum for `pdsstac-pds3`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required keyword was absent from the label.
    #[error("missing keyword \"{0}\"")]
    MissingKeyword(&'static str),

    /// An `END_OBJECT` statement named a different object than the one it
    /// closes.
    #[error("mismatched END_OBJECT: expected {expected}, found {found}")]
    MismatchedObject {
        /// The object name that was open.
        expected: String,
        /// The object name `END_OBJECT` actually named.
        found: String,
    },

    /// An `OBJECT` block was never closed.
    #[error("unterminated OBJECT block")]
    UnterminatedObject,

    /// Parsing did not complete within the configured per-file timeout.
    #[error("parser timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// [pdsstac_models::Error]
    #[error(transparent)]
    Models(#[from] pdsstac_models::Error),
}
