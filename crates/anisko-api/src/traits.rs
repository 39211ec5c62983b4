//! Seams between the fetch coordinator and the network.
//!
//! The coordinator only ever talks to these traits, so tests can swap in
//! fakes that complete on demand.

use std::future::Future;

use anisko_core::models::{AnimeSummary, AudioMode};

/// The remote anime catalog.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search shows by title in the given audio mode.
    fn search(
        &self,
        query: &str,
        mode: AudioMode,
    ) -> impl Future<Output = Result<Vec<AnimeSummary>, Self::Error>> + Send;

    /// Episode labels available for `show_id` in `mode`.
    ///
    /// Only numeric labels are returned, ascending by value.
    fn list_episodes(
        &self,
        show_id: &str,
        mode: AudioMode,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}

/// Something that can fetch cover image bytes by URL.
pub trait CoverSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}
