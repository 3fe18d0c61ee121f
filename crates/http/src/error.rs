use thiserror::Error;

/// Error enum for `pdsstac-http`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The transport failed, or retries were exhausted.
    #[error("request to {url} failed after retries: {source}")]
    Request {
        /// The URL that was being fetched.
        url: String,
        /// The last transport error observed.
        #[source]
        source: reqwest::Error,
    },

    /// The server returned a non-success status that isn't retryable.
    #[error("request to {url} returned status {status}")]
    Status {
        /// The URL that was being fetched.
        url: String,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Writing the downloaded body to disk failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The destination path.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive directory listing reported no files.
    #[error("no files exist in this folder")]
    EmptyFolder,

    /// A URL could not be parsed.
    #[error("invalid URL {0}")]
    InvalidUrl(String),
}
