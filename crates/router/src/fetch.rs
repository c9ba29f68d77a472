//! Fragment retrieval.
//!
//! Fragments arrive as byte streams so large pages never need a contiguous
//! intermediate buffer at the transport layer; the navigator drains the
//! stream into markup right before mounting.

use anyhow::{Error, anyhow};
use bytes::Bytes;
use core::future::Future;
use core::pin::Pin;
use reqwest::get as reqwest_get;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::read as tokio_fs_read;
use tokio_stream::{Stream, StreamExt as _, once};
use url::Url;

pub type ByteStream = Box<dyn Stream<Item = Result<Bytes, Error>> + Send + Unpin>;

/// Future alias keeping the trait object-safe.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<ByteStream, Error>> + Send + 'a>>;

/// Where fragment markup comes from. The shell installs an [`HttpSource`];
/// tests and embedded deployments use a [`MemorySource`].
pub trait FragmentSource: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a Url) -> FetchFuture<'a>;
}

/// Fetches fragments over the network or from the local filesystem.
///
/// Supported URL schemes:
/// - `http`, `https`: fetched via `reqwest` as a streaming response
/// - `file`: read from the local filesystem (emitted as a single chunk)
///
/// No timeout is applied; a hung request stalls only its own navigation,
/// which a later navigation supersedes.
#[derive(Debug, Default)]
pub struct HttpSource;

impl FragmentSource for HttpSource {
    fn fetch<'a>(&'a self, url: &'a Url) -> FetchFuture<'a> {
        Box::pin(async move {
            Ok(match url.scheme() {
                "http" | "https" => {
                    let response = reqwest_get(url.clone())
                        .await
                        .map_err(|err| anyhow!("failed to fetch {url}: {err}"))?;

                    if !response.status().is_success() {
                        return Err(anyhow!(
                            "failed to fetch {url} (status: {})",
                            response.status()
                        ));
                    }
                    let stream = response.bytes_stream().map(|chunk| match chunk {
                        Ok(bytes) => Ok::<Bytes, Error>(bytes),
                        Err(err) => Err::<Bytes, Error>(anyhow!(err)),
                    });
                    Box::new(stream) as ByteStream
                }
                "file" => {
                    let path = url
                        .to_file_path()
                        .map_err(|()| anyhow!("invalid file path for file url: {url}"))?;
                    let data = tokio_fs_read(path).await.map(Bytes::from)?;
                    Box::new(once(Ok::<Bytes, Error>(data))) as ByteStream
                }
                _ => return Err(anyhow!("unsupported url scheme {}", url.scheme())),
            })
        })
    }
}

/// Serves registered markup straight from memory, keyed by URL path.
/// Doubles as the test double and as an embedded-assets source; counts
/// fetches so callers can observe that nothing is cached.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, String>,
    fetches: AtomicU64,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: &str, markup: &str) -> Self {
        self.entries.insert(path.to_owned(), markup.to_owned());
        self
    }

    /// Total fetch attempts, including misses.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl FragmentSource for MemorySource {
    fn fetch<'a>(&'a self, url: &'a Url) -> FetchFuture<'a> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            let Some(markup) = self.entries.get(url.path()) else {
                return Err(anyhow!("no fragment registered for {url}"));
            };
            let data = Bytes::from(markup.clone());
            Ok(Box::new(once(Ok::<Bytes, Error>(data))) as ByteStream)
        })
    }
}

/// Drain a fragment stream into markup text.
///
/// # Errors
///
/// Propagates the first stream error.
pub async fn collect_markup(mut stream: ByteStream) -> Result<String, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
