//! Image resolution for export.
//!
//! Every distinct image URL referenced by an article is fetched once,
//! decoded to learn its natural size, and collected into an [`ImageMap`].
//! Fetches run concurrently; the call returns once every attempt has
//! finished. A URL that fails to fetch or decode is left out of the map so
//! the assembler can render a visible fallback for it.

mod decode;
mod fetch;

pub use decode::decode_image;
pub use fetch::HttpFetcher;

use crate::error::Result;
use crate::model::{ImageMap, LoadedImage};
use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

/// Default number of image fetches in flight at once.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Source of raw image bytes.
///
/// Implement this trait to load images from somewhere other than the
/// network or local disk, or to stub fetching in tests.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetch and decode every distinct URL, tolerating individual failures.
///
/// Duplicate URLs are collapsed before any fetch is issued, so each
/// distinct URL is requested at most once.
pub async fn resolve_images<'a, F, I>(fetcher: &F, urls: I, concurrency: usize) -> ImageMap
where
    F: ImageFetcher,
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let distinct: Vec<&str> = urls.into_iter().filter(|url| seen.insert(*url)).collect();

    if distinct.is_empty() {
        return ImageMap::new();
    }

    log::debug!(
        "Resolving {} image(s) with concurrency {}",
        distinct.len(),
        concurrency.max(1)
    );

    let results: Vec<(&str, Result<LoadedImage>)> = stream::iter(distinct)
        .map(|url| async move { (url, load_image(fetcher, url).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut images = ImageMap::with_capacity(results.len());
    for (url, result) in results {
        match result {
            Ok(image) => {
                images.insert(url.to_string(), Arc::new(image));
            }
            Err(e) => log::warn!("Export: failed to load image {}: {}", url, e),
        }
    }

    log::debug!("Resolved {} image(s)", images.len());
    images
}

async fn load_image<F: ImageFetcher>(fetcher: &F, url: &str) -> Result<LoadedImage> {
    let bytes = fetcher.fetch(url).await?;
    decode_image(url, bytes)
}
