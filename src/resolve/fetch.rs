//! Default image fetcher: HTTP(S), `data:` URIs and local files.

use super::ImageFetcher;
use crate::error::{Error, Result};
use base64::Engine;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fetches images over HTTP(S), from `data:` URIs, or from disk.
///
/// URLs that are neither `http(s)://` nor `data:` are treated as file
/// paths; relative paths are resolved against the base directory when one
/// is set (typically the directory of the markdown file).
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl HttpFetcher {
    /// Create a fetcher with a default HTTP client and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Apply a per-request timeout to remote fetches.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Resolve relative file paths against this directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ImageFetch(format!("HTTP {} for {}", status, url)));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_file(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.local_path(url);
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::ImageFetch(format!("{}: {}", path.display(), e)))
    }

    fn local_path(&self, url: &str) -> PathBuf {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(rest) = strip_scheme(url, "data:") {
            decode_data_uri(rest)
        } else if is_remote(url) {
            self.fetch_remote(url).await
        } else {
            self.fetch_file(url).await
        }
    }
}

fn strip_scheme<'a>(url: &'a str, scheme: &str) -> Option<&'a str> {
    let head = url.get(..scheme.len())?;
    head.eq_ignore_ascii_case(scheme)
        .then(|| &url[scheme.len()..])
}

fn is_remote(url: &str) -> bool {
    strip_scheme(url, "http://").is_some() || strip_scheme(url, "https://").is_some()
}

/// Decode the part of a `data:` URI after the scheme.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::ImageFetch("malformed data URI".into()))?;

    if meta.to_ascii_lowercase().ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| Error::ImageFetch(format!("invalid base64 in data URI: {}", e)))
    } else {
        Ok(percent_encoding::percent_decode_str(payload).collect())
    }
}
