use thiserror::Error;

/// Error enum for `pdsstac-extract`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The registry endpoint returned a response this crate does not
    /// understand (missing `ODEResults` wrapper, wrong `Count` shape).
    #[error("unrecognized ODE response shape: {0}")]
    UnrecognizedResponse(&'static str),

    /// No sample record was available to seed website catalog discovery
    /// (state machine terminal `NoRecord`).
    #[error("no cached record available to seed catalog discovery for {0}")]
    NoRecord(String),

    /// `voldesc.cat` could not be located on the archive, even after
    /// re-resolving the volume id from the directory listing (terminal
    /// `NoVolDesc`).
    #[error("no voldesc.cat found for {0} after volume-id resolution")]
    NoVolumeDescription(String),

    /// [pdsstac_http::Error]
    #[error(transparent)]
    Http(#[from] pdsstac_http::Error),

    /// [pdsstac_storage::Error]
    #[error(transparent)]
    Storage(#[from] pdsstac_storage::Error),

    /// [pdsstac_models::Error]
    #[error(transparent)]
    Models(#[from] pdsstac_models::Error),

    /// [pdsstac_pds3::Error]
    #[error(transparent)]
    Pds3(#[from] pdsstac_pds3::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
