//! Retrying HTTP fetcher, bounded-parallelism batch downloader, and HTML
//! directory-listing crawler used to mirror the ODE archive website.

mod crawler;
mod downloader;
mod error;
mod fetcher;

pub use crawler::{parse_directory_listing, DirEntry};
pub use downloader::{download_all, DownloadOutcome};
pub use error::Error;
pub use fetcher::Fetcher;

/// A crate-specific `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
