use thiserror::Error;

/// Error enum for `pdsstac-storage`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O failure against the underlying filesystem.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// The path that was being read or written.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A stored JSON document failed to decode.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// The path that failed to decode.
        path: std::path::PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A requested file was not present in the file cache.
    #[error("file not found in cache: {0}")]
    NotFound(String),

    /// [pdsstac_core::Error]
    #[error(transparent)]
    Core(#[from] pdsstac_core::Error),

    /// [pdsstac_models::Error]
    #[error(transparent)]
    Models(#[from] pdsstac_models::Error),

    /// [pdsstac_pds3::Error]
    #[error(transparent)]
    Pds3(#[from] pdsstac_pds3::Error),
}

pub(crate) fn io(path: impl Into<std::path::PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io { path, source }
}
