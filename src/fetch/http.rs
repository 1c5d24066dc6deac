//! HTTP downloads.
//!
//! Used only for the installer-repair bootstrap script.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Something that can fetch the body of a URL.
///
/// Implemented for closures so tests can stand in for the network.
pub trait Downloader {
    /// Download `url` and return the response body.
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F> Downloader for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn download(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

/// Downloads over HTTP/HTTPS.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default 30-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP fetcher with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("limpeza-installer/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Downloader for HttpFetcher {
    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        let body = response.bytes()?;
        if body.is_empty() {
            bail!("Empty response from {}", url);
        }
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn downloads_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get-pip.py");
            then.status(200).body("print('bootstrap')\n");
        });

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher.download(&server.url("/get-pip.py")).unwrap();
        assert_eq!(body, b"print('bootstrap')\n");
    }

    #[test]
    fn errors_on_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.py");
            then.status(404).body("Not Found");
        });

        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .download(&server.url("/missing.py"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("404"), "Error should mention 404: {}", err);
    }

    #[test]
    fn errors_on_empty_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty.py");
            then.status(200).body("");
        });

        let fetcher = HttpFetcher::new().unwrap();
        assert!(fetcher.download(&server.url("/empty.py")).is_err());
    }

    #[test]
    fn closures_are_downloaders() {
        let stub = |url: &str| -> Result<Vec<u8>> { Ok(url.as_bytes().to_vec()) };
        assert_eq!(stub.download("abc").unwrap(), b"abc");
    }

    #[test]
    fn custom_timeout_is_kept() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
    }
}
