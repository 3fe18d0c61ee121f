//! Bounded-parallelism batch downloader.
//!
//! Grounded on `PdsRecords.download_pds`'s call into `parallel_requests` in
//! `examples/original_source/pds_crawler/extractor/pds_ws.py`, a thread
//! pool with a skip-if-exists pre-filter and per-URL error isolation. Here,
//! a `tokio::sync::Semaphore` plus a `JoinSet` stand in for the thread pool.

use crate::fetcher::Fetcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The outcome of downloading one URL.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The URL that was requested.
    pub url: String,
    /// The destination path it was (or would have been) written to.
    pub path: PathBuf,
    /// `Ok(true)` if downloaded, `Ok(false)` if skipped (already present),
    /// `Err` if the request ultimately failed.
    pub result: Result<bool, crate::Error>,
}

/// Downloads every `(url, destination)` pair in `targets` with bounded
/// parallelism. Destinations that already exist are skipped without a
/// network request. A single URL's failure never aborts the batch.
pub async fn download_all(
    fetcher: Fetcher,
    targets: Vec<(String, PathBuf)>,
    workers: usize,
    sleep_between: Duration,
) -> Vec<DownloadOutcome> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let fetcher = Arc::new(fetcher);
    let mut tasks = JoinSet::new();

    for (url, path) in targets {
        if path.exists() {
            tasks.spawn(async move {
                DownloadOutcome { url, path, result: Ok(false) }
            });
            continue;
        }
        let semaphore = Arc::clone(&semaphore);
        let fetcher = Arc::clone(&fetcher);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            let result = download_one(&fetcher, &url, &path).await;
            if sleep_between > Duration::ZERO {
                tokio::time::sleep(sleep_between).await;
            }
            DownloadOutcome { url, path, result }
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(join_error) => tracing::error!(%join_error, "download task panicked"),
        }
    }
    outcomes
}

async fn download_one(fetcher: &Fetcher, url: &str, path: &Path) -> Result<bool, crate::Error> {
    match fetcher.get(url).await {
        Ok(body) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| crate::Error::Io { path: parent.to_path_buf(), source })?;
            }
            tokio::fs::write(path, &body)
                .await
                .map_err(|source| crate::Error::Io { path: path.to_path_buf(), source })?;
            Ok(true)
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "download failed, continuing batch");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[tokio::test]
    async fn skips_existing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let existing = tmp.path().join("already-there.txt");
        std::fs::write(&existing, b"cached").unwrap();

        let fetcher = Fetcher::new(Client::new(), 1);
        let outcomes = download_all(
            fetcher,
            vec![("http://example.invalid/x".to_string(), existing.clone())],
            2,
            Duration::ZERO,
        )
        .await;
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].result, Ok(false)));
    }

    #[tokio::test]
    async fn isolates_per_url_failures() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server.mock("GET", "/ok").with_status(200).with_body("hi").create_async().await;
        let _bad = server.mock("GET", "/bad").with_status(404).create_async().await;
        let tmp = tempfile::tempdir().unwrap();

        let fetcher = Fetcher::new(Client::new(), 1);
        let outcomes = download_all(
            fetcher,
            vec![
                (format!("{}/ok", server.url()), tmp.path().join("ok.txt")),
                (format!("{}/bad", server.url()), tmp.path().join("bad.txt")),
            ],
            2,
            Duration::ZERO,
        )
        .await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().any(|o| matches!(o.result, Ok(true))));
        assert!(outcomes.iter().any(|o| o.result.is_err()));
    }
}
