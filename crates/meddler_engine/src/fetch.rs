//! Image downloading.
//!
//! Fetching only starts after every post has been converted: local path
//! assignment depends on conversion output. Jobs are deduplicated by source
//! URL across the whole run before any request goes out, since posts often
//! share CDN images. Per-image failures are recoverable; the caller records
//! them as warnings.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use thiserror::Error;

use engine_logging::{engine_debug, engine_warn};

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("network error: {0}")]
    Network(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ImageFetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ImageFetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageFetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestImageFetcher {
    settings: ImageFetchSettings,
}

impl ReqwestImageFetcher {
    pub fn new(settings: ImageFetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ImageFetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ImageFetchError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ImageFetcher for ReqwestImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageFetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| ImageFetchError::InvalidUrl(err.to_string()))?;
        let client = self.build_client()?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::HttpStatus(status.as_u16()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(ImageFetchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(ImageFetchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ImageFetchError {
    if err.is_timeout() {
        return ImageFetchError::Timeout;
    }
    ImageFetchError::Network(err.to_string())
}

/// One image to place on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub url: String,
    pub dest: PathBuf,
}

/// Result of a download batch. `failures` carries one `(url, message)` pair
/// per source URL that could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub downloaded: usize,
    pub failures: Vec<(String, String)>,
}

/// Drives image downloads from synchronous code over an owned runtime.
pub struct ImageDownloader {
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<dyn ImageFetcher>,
}

impl ImageDownloader {
    pub fn new(settings: ImageFetchSettings) -> Result<Self, ImageFetchError> {
        Ok(Self {
            runtime: tokio::runtime::Runtime::new()?,
            fetcher: Arc::new(ReqwestImageFetcher::new(settings)),
        })
    }

    /// Wraps a custom fetcher; used by tests.
    pub fn with_fetcher(fetcher: Arc<dyn ImageFetcher>) -> Result<Self, ImageFetchError> {
        Ok(Self {
            runtime: tokio::runtime::Runtime::new()?,
            fetcher,
        })
    }

    /// Downloads all jobs, fetching each distinct URL once. The fetched
    /// bytes are written to every destination that references the URL.
    pub fn download_all(&self, jobs: &[ImageJob]) -> DownloadOutcome {
        // First-seen order, all destinations per URL.
        let mut order: Vec<&str> = Vec::new();
        let mut dests: HashMap<&str, Vec<&PathBuf>> = HashMap::new();
        for job in jobs {
            let slot = dests.entry(job.url.as_str()).or_default();
            if slot.is_empty() {
                order.push(&job.url);
            }
            slot.push(&job.dest);
        }

        let mut outcome = DownloadOutcome::default();
        for url in order {
            let fetched = self
                .runtime
                .block_on(async { self.fetcher.fetch(url).await });
            match fetched {
                Ok(bytes) => match write_all(&dests[url], &bytes) {
                    Ok(()) => {
                        engine_debug!("downloaded {} ({} bytes)", url, bytes.len());
                        outcome.downloaded += 1;
                    }
                    Err(err) => {
                        engine_warn!("failed to store {}: {}", url, err);
                        outcome.failures.push((url.to_string(), err.to_string()));
                    }
                },
                Err(err) => {
                    engine_warn!("image download failed for {}: {}", url, err);
                    outcome
                        .failures
                        .push((url.to_string(), format!("Image download failed: {err}")));
                }
            }
        }
        outcome
    }
}

fn write_all(dests: &[&PathBuf], bytes: &[u8]) -> Result<(), std::io::Error> {
    for dest in dests {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, bytes)?;
    }
    Ok(())
}
