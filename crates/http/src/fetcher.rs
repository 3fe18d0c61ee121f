//! Single-page GET with retry, and the HTML `<meta http-equiv="refresh">`
//! follow used by the ODE archive website when a directory has moved.
//!
//! Grounded on `PdsRegistry._get_response` in
//! `examples/original_source/pds_crawler/extractor/pds_ws.py` (three
//! attempts, retry on 5xx) and on the `ExponentialBackoff`/`Backoff` wrapper
//! in `examples/estuary-flow/crates/journal-client/src/read/uncommitted/retry.rs`
//! for how to drive `exponential_backoff::Backoff` from Rust.

use crate::error::Error;
use exponential_backoff::Backoff;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const RETRYABLE: [StatusCode; 3] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::GATEWAY_TIMEOUT,
];

/// A single-page fetcher with bounded retries and exponential backoff.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    attempts: u32,
}

impl Fetcher {
    /// Builds a fetcher around `client`, retrying up to `attempts` times
    /// (the spec's default is 3) with a factor-3 exponential backoff.
    pub fn new(client: Client, attempts: u32) -> Fetcher {
        Fetcher { client, attempts }
    }

    fn backoff(&self) -> Backoff {
        let mut backoff = Backoff::new(self.attempts, Duration::from_millis(200), Some(Duration::from_secs(30)));
        backoff.set_factor(3);
        backoff
    }

    /// Fetches `url` with retry, following one HTML meta-refresh redirect
    /// if the response is `text/html` and carries one.
    pub async fn get(&self, url: &str) -> Result<bytes::Bytes, Error> {
        let body = self.get_once_with_retry(url).await?;
        if let Some(target) = meta_refresh_target(&body) {
            return self.get_once_with_retry(&target).await;
        }
        Ok(body)
    }

    async fn get_once_with_retry(&self, url: &str) -> Result<bytes::Bytes, Error> {
        let mut backoff = self.backoff();
        let mut attempt: u32 = 0;
        loop {
            match self.try_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    let retryable = matches!(&err, Error::Status { status, .. } if RETRYABLE.iter().any(|code| code.as_u16() == *status))
                        || matches!(&err, Error::Request { .. });
                    attempt += 1;
                    if !retryable {
                        return Err(err);
                    }
                    match backoff.next(attempt) {
                        Some(delay) => {
                            tracing::warn!(url, attempt, ?delay, "retrying after transient error");
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(err),
                    }
                }
            }
        }
    }

    async fn try_once(&self, url: &str) -> Result<bytes::Bytes, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Request { url: url.to_string(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { url: url.to_string(), status: status.as_u16() });
        }
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("text/html"))
            .unwrap_or(false);
        let body = response
            .bytes()
            .await
            .map_err(|source| Error::Request { url: url.to_string(), source })?;
        if is_html && looks_like_empty_folder(&body) {
            return Err(Error::EmptyFolder);
        }
        Ok(body)
    }
}

fn looks_like_empty_folder(body: &[u8]) -> bool {
    String::from_utf8_lossy(body).contains("No files exist in this folder")
}

fn meta_refresh_target(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let document = scraper::Html::parse_document(&text);
    let selector = scraper::Selector::parse(r#"meta[http-equiv="refresh" i]"#).ok()?;
    let content = document.select(&selector).next()?.value().attr("content")?;
    let (_, url_part) = content.split_once("url=").or_else(|| content.split_once("URL="))?;
    let url = url_part.trim().trim_matches('"').trim_matches('\'');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_empty_folder_marker() {
        assert!(looks_like_empty_folder(b"<html>No files exist in this folder</html>"));
        assert!(!looks_like_empty_folder(b"<html>ok</html>"));
    }

    #[test]
    fn extracts_meta_refresh_target() {
        let html = br#"<html><head><meta http-equiv="refresh" content="0;url=https://example.org/new"></head></html>"#;
        assert_eq!(meta_refresh_target(html).as_deref(), Some("https://example.org/new"));
    }

    #[test]
    fn no_meta_refresh_returns_none() {
        assert_eq!(meta_refresh_target(b"<html><body>hi</body></html>"), None);
    }

    #[tokio::test]
    async fn get_retries_on_server_error_then_succeeds() {
        let mut server = mockito::Server::new_async().await;
        let _first = server.mock("GET", "/page").with_status(502).create_async().await;
        let _second = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;
        let fetcher = Fetcher::new(Client::new(), 3);
        let url = format!("{}/page", server.url());
        let body = fetcher.get(&url).await.unwrap();
        assert_eq!(body, bytes::Bytes::from_static(b"ok"));
    }

    #[tokio::test]
    async fn get_does_not_retry_on_404() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/missing").with_status(404).create_async().await;
        let fetcher = Fetcher::new(Client::new(), 3);
        let url = format!("{}/missing", server.url());
        let result = fetcher.get(&url).await;
        assert!(matches!(result, Err(Error::Status { status: 404, .. })));
    }
}
