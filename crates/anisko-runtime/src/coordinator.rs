//! Background fetches and the rules for which results get through.
//!
//! Search and episode fetches carry a generation number. Only a completion
//! whose generation is still the latest for its key is turned into a
//! [`FetchEvent`]; anything older is dropped in [`FetchCoordinator::accept`].
//! Workers never touch UI state: each one resolves a [`Pending`] handle with
//! a [`Completion`], and the interactive thread feeds it back through
//! `accept`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use anisko_api::{CatalogService, CoverSource};
use anisko_core::models::{AnimeSummary, AudioMode, EpisodeList};
use anisko_core::storage::{cover_path_in, sanitize_cover_id};

use crate::error::FetchError;

/// Raw result of a background operation, before the staleness check.
#[derive(Debug, Clone)]
pub enum Completion {
    Search {
        generation: u64,
        query: String,
        mode: AudioMode,
        outcome: Result<Vec<AnimeSummary>, FetchError>,
    },
    Episodes {
        generation: u64,
        show_id: String,
        mode: AudioMode,
        outcome: Result<Vec<String>, FetchError>,
    },
    Cover {
        show_id: String,
        outcome: Result<PathBuf, FetchError>,
    },
}

/// One-shot handle to a running fetch.
pub struct Pending {
    task: JoinHandle<Completion>,
    fallback: Completion,
}

impl Pending {
    /// Wait for the fetch to finish. A panicked or cancelled worker resolves
    /// to an `Aborted` outcome for the same key.
    pub async fn wait(self) -> Completion {
        match self.task.await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!("Fetch worker did not finish: {e}");
                self.fallback
            }
        }
    }

    /// Stop the worker. `wait` then resolves to an `Aborted` outcome.
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// A result that passed the staleness check.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    SearchFinished {
        query: String,
        mode: AudioMode,
        outcome: Result<Vec<AnimeSummary>, FetchError>,
    },
    EpisodesFinished {
        show_id: String,
        mode: AudioMode,
        outcome: Result<EpisodeList, FetchError>,
    },
    CoverReady {
        show_id: String,
        path: PathBuf,
    },
    CoverFailed {
        show_id: String,
        error: FetchError,
    },
}

/// Result of asking for a cover.
#[derive(Debug)]
pub enum CoverLookup {
    /// Already on disk; nothing was started.
    Cached(PathBuf),
    /// A download was started.
    Fetching(Pending),
    /// A download for this id is already running.
    AlreadyFetching,
    /// The show has no cover URL.
    Unavailable,
}

#[derive(Debug, Default)]
struct SearchSlot {
    latest: u64,
    in_flight: Option<u64>,
}

#[derive(Debug, Default)]
struct EpisodeSlot {
    latest: u64,
    in_flight: Option<(u64, String, AudioMode)>,
}

/// Issues fetches and filters their results.
///
/// Owned by the interactive thread; all bookkeeping happens there, so no
/// locking is needed.
pub struct FetchCoordinator<C, S> {
    catalog: Arc<C>,
    covers: Arc<S>,
    covers_dir: PathBuf,
    handle: Handle,
    search: SearchSlot,
    episodes: EpisodeSlot,
    /// Keyed by sanitized id, the same key as the file on disk.
    covers_in_flight: HashSet<String>,
}

impl<C, S> FetchCoordinator<C, S>
where
    C: CatalogService + 'static,
    S: CoverSource + 'static,
    C::Error: Into<FetchError>,
    S::Error: Into<FetchError>,
{
    pub fn new(catalog: C, covers: S, covers_dir: impl Into<PathBuf>, handle: Handle) -> Self {
        Self {
            catalog: Arc::new(catalog),
            covers: Arc::new(covers),
            covers_dir: covers_dir.into(),
            handle,
            search: SearchSlot::default(),
            episodes: EpisodeSlot::default(),
            covers_in_flight: HashSet::new(),
        }
    }

    pub fn covers_dir(&self) -> &Path {
        &self.covers_dir
    }

    /// Whether a search that can still deliver is running.
    pub fn is_searching(&self) -> bool {
        self.search.in_flight == Some(self.search.latest)
    }

    /// Whether an episode fetch that can still deliver is running.
    pub fn is_fetching_episodes(&self) -> bool {
        matches!(&self.episodes.in_flight, Some((g, _, _)) if *g == self.episodes.latest)
    }

    pub fn is_fetching_cover(&self, show_id: &str) -> bool {
        self.covers_in_flight.contains(&sanitize_cover_id(show_id))
    }

    /// Start a search unless one is already running.
    ///
    /// Returns `None` for a blank query or while a search is in flight; the
    /// running search is never restarted.
    pub fn search(&mut self, query: &str, mode: AudioMode) -> Option<Pending> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if self.is_searching() {
            tracing::debug!(query, "Search already in flight, ignoring");
            return None;
        }

        self.search.latest += 1;
        let generation = self.search.latest;
        self.search.in_flight = Some(generation);
        tracing::debug!(operation = "search", generation, query, %mode, "Fetch started");

        let catalog = self.catalog.clone();
        let query = query.to_string();
        let fallback = Completion::Search {
            generation,
            query: query.clone(),
            mode,
            outcome: Err(FetchError::Aborted),
        };
        let task = self.handle.spawn(async move {
            let outcome = catalog.search(&query, mode).await.map_err(Into::into);
            Completion::Search {
                generation,
                query,
                mode,
                outcome,
            }
        });
        Some(Pending { task, fallback })
    }

    /// Fetch the episode list for `show_id`, superseding any earlier fetch.
    ///
    /// An earlier fetch keeps running but its result will be dropped. A call
    /// identical to the fetch already in flight returns `None`.
    pub fn fetch_episodes(&mut self, show_id: &str, mode: AudioMode) -> Option<Pending> {
        if let Some((generation, id, m)) = &self.episodes.in_flight {
            if *generation == self.episodes.latest && id == show_id && *m == mode {
                return None;
            }
        }

        self.episodes.latest += 1;
        let generation = self.episodes.latest;
        self.episodes.in_flight = Some((generation, show_id.to_string(), mode));
        tracing::debug!(operation = "episodes", generation, show_id, %mode, "Fetch started");

        let catalog = self.catalog.clone();
        let show_id = show_id.to_string();
        let fallback = Completion::Episodes {
            generation,
            show_id: show_id.clone(),
            mode,
            outcome: Err(FetchError::Aborted),
        };
        let task = self.handle.spawn(async move {
            let outcome = catalog.list_episodes(&show_id, mode).await.map_err(Into::into);
            Completion::Episodes {
                generation,
                show_id,
                mode,
                outcome,
            }
        });
        Some(Pending { task, fallback })
    }

    /// Resolve a cover: from disk if cached, otherwise by downloading it.
    pub fn fetch_cover(&mut self, show_id: &str, url: &str) -> CoverLookup {
        let path = cover_path_in(&self.covers_dir, show_id);
        if path.is_file() {
            return CoverLookup::Cached(path);
        }
        let key = sanitize_cover_id(show_id);
        if self.covers_in_flight.contains(&key) {
            return CoverLookup::AlreadyFetching;
        }
        let url = url.trim();
        if url.is_empty() {
            return CoverLookup::Unavailable;
        }

        self.covers_in_flight.insert(key);
        tracing::debug!(operation = "cover", show_id, "Fetch started");

        let source = self.covers.clone();
        let url = url.to_string();
        let show_id = show_id.to_string();
        let fallback = Completion::Cover {
            show_id: show_id.clone(),
            outcome: Err(FetchError::Aborted),
        };
        let task = self.handle.spawn(async move {
            let outcome = download_cover(source.as_ref(), &url, &path).await;
            Completion::Cover { show_id, outcome }
        });
        CoverLookup::Fetching(Pending { task, fallback })
    }

    /// Make any running search stale.
    pub fn cancel_search(&mut self) {
        self.search.latest += 1;
        tracing::debug!(operation = "search", generation = self.search.latest, "Cancelled");
    }

    /// Make any running episode fetch stale.
    pub fn cancel_episodes(&mut self) {
        self.episodes.latest += 1;
        tracing::debug!(operation = "episodes", generation = self.episodes.latest, "Cancelled");
    }

    /// Pass a completion through the staleness filter.
    ///
    /// Returns `None` for a superseded result. Each completion is delivered
    /// at most once.
    pub fn accept(&mut self, completion: Completion) -> Option<FetchEvent> {
        match completion {
            Completion::Search {
                generation,
                query,
                mode,
                outcome,
            } => {
                if self.search.in_flight == Some(generation) {
                    self.search.in_flight = None;
                }
                if generation != self.search.latest {
                    tracing::debug!(operation = "search", generation, "Dropping stale result");
                    return None;
                }
                // Consume the generation so a duplicate delivery is stale too.
                self.search.latest += 1;
                if let Err(e) = &outcome {
                    tracing::warn!(operation = "search", %query, "Fetch failed: {e}");
                }
                Some(FetchEvent::SearchFinished {
                    query,
                    mode,
                    outcome,
                })
            }
            Completion::Episodes {
                generation,
                show_id,
                mode,
                outcome,
            } => {
                if matches!(&self.episodes.in_flight, Some((g, _, _)) if *g == generation) {
                    self.episodes.in_flight = None;
                }
                if generation != self.episodes.latest {
                    tracing::debug!(
                        operation = "episodes",
                        generation,
                        %show_id,
                        "Dropping stale result"
                    );
                    return None;
                }
                self.episodes.latest += 1;
                if let Err(e) = &outcome {
                    tracing::warn!(operation = "episodes", %show_id, "Fetch failed: {e}");
                }
                let outcome = outcome.map(|raw| EpisodeList::from_labels(&show_id, mode, raw));
                Some(FetchEvent::EpisodesFinished {
                    show_id,
                    mode,
                    outcome,
                })
            }
            Completion::Cover { show_id, outcome } => {
                if !self.covers_in_flight.remove(&sanitize_cover_id(&show_id)) {
                    return None;
                }
                match outcome {
                    Ok(path) => Some(FetchEvent::CoverReady { show_id, path }),
                    Err(error) => {
                        tracing::debug!(operation = "cover", %show_id, "Fetch failed: {error}");
                        Some(FetchEvent::CoverFailed { show_id, error })
                    }
                }
            }
        }
    }
}

/// Download a cover and move it into place.
///
/// The bytes go to a sibling temp file first so a reader never sees a
/// half-written image.
async fn download_cover<S>(source: &S, url: &str, path: &Path) -> Result<PathBuf, FetchError>
where
    S: CoverSource,
    S::Error: Into<FetchError>,
{
    let bytes = source.fetch(url).await.map_err(Into::<FetchError>::into)?;
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let tmp = path.with_extension("jpg.part");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{labels, summary, FakeCatalog, FakeCovers};
    use anisko_api::CatalogError;
    use anisko_core::models::AnimeKind;

    fn coordinator(
        catalog: FakeCatalog,
        covers: FakeCovers,
    ) -> (tempfile::TempDir, FetchCoordinator<FakeCatalog, FakeCovers>) {
        let dir = tempfile::tempdir().unwrap();
        let coord =
            FetchCoordinator::new(catalog, covers, dir.path().join("covers"), Handle::current());
        (dir, coord)
    }

    #[tokio::test]
    async fn test_search_is_single_flight() {
        let catalog = FakeCatalog::default();
        let release = catalog.gate_search("naruto");
        let (_dir, mut coord) = coordinator(catalog.clone(), FakeCovers::default());

        let first = coord.search("naruto", AudioMode::Sub).expect("first search starts");
        assert!(coord.is_searching());
        assert!(coord.search("bleach", AudioMode::Sub).is_none());
        assert!(coord.search("naruto", AudioMode::Dub).is_none());

        release
            .send(Ok(vec![
                summary("1", "Naruto", AnimeKind::Tv, 220),
                summary("2", "Naruto Shippuden", AnimeKind::Tv, 500),
                summary("3", "Naruto the Movie", AnimeKind::Movie, 1),
            ]))
            .unwrap();
        let event = coord.accept(first.wait().await);
        match event {
            Some(FetchEvent::SearchFinished { query, outcome, .. }) => {
                assert_eq!(query, "naruto");
                assert_eq!(outcome.unwrap().len(), 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(catalog.search_calls(), 1);
        assert!(!coord.is_searching());
        assert!(coord.search("bleach", AudioMode::Sub).is_some());
    }

    #[tokio::test]
    async fn test_blank_query_is_noop() {
        let (_dir, mut coord) = coordinator(FakeCatalog::default(), FakeCovers::default());
        assert!(coord.search("", AudioMode::Sub).is_none());
        assert!(coord.search("   ", AudioMode::Sub).is_none());
        assert!(!coord.is_searching());
    }

    #[tokio::test]
    async fn test_failed_search_differs_from_empty() {
        let catalog = FakeCatalog::default();
        let fail = catalog.gate_search("broken");
        let (_dir, mut coord) = coordinator(catalog.clone(), FakeCovers::default());

        let pending = coord.search("broken", AudioMode::Sub).unwrap();
        fail.send(Err(CatalogError::Api {
            status: 503,
            message: "unavailable".into(),
        }))
        .unwrap();
        match coord.accept(pending.wait().await) {
            Some(FetchEvent::SearchFinished {
                outcome: Err(FetchError::Transport(msg)),
                ..
            }) => assert!(msg.contains("503")),
            other => panic!("unexpected event: {other:?}"),
        }

        // No gate: the fake answers with an empty list.
        let pending = coord.search("nothing", AudioMode::Sub).unwrap();
        match coord.accept(pending.wait().await) {
            Some(FetchEvent::SearchFinished { outcome: Ok(r), .. }) => assert!(r.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_search_is_dropped() {
        let catalog = FakeCatalog::default();
        let release = catalog.gate_search("slow");
        let (_dir, mut coord) = coordinator(catalog, FakeCovers::default());

        let pending = coord.search("slow", AudioMode::Sub).unwrap();
        coord.cancel_search();
        assert!(!coord.is_searching());
        let next = coord.search("fast", AudioMode::Sub).unwrap();

        release.send(Ok(vec![summary("s", "Slow", AnimeKind::Tv, 2)])).unwrap();
        assert!(coord.accept(pending.wait().await).is_none());
        assert!(coord.is_searching());
        assert!(coord.accept(next.wait().await).is_some());
    }

    #[tokio::test]
    async fn test_newer_episode_fetch_wins_when_older_finishes_last() {
        let catalog = FakeCatalog::default();
        let release_a = catalog.gate_episodes("A");
        let release_b = catalog.gate_episodes("B");
        let (_dir, mut coord) = coordinator(catalog, FakeCovers::default());

        let a = coord.fetch_episodes("A", AudioMode::Sub).unwrap();
        let b = coord.fetch_episodes("B", AudioMode::Sub).unwrap();

        release_b.send(Ok(labels(&["2", "1"]))).unwrap();
        match coord.accept(b.wait().await) {
            Some(FetchEvent::EpisodesFinished { show_id, outcome, .. }) => {
                assert_eq!(show_id, "B");
                assert_eq!(outcome.unwrap().labels(), &["1".to_string(), "2".to_string()]);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        release_a.send(Ok(labels(&["1"]))).unwrap();
        assert!(coord.accept(a.wait().await).is_none());
    }

    #[tokio::test]
    async fn test_newer_episode_fetch_wins_when_older_finishes_first() {
        let catalog = FakeCatalog::default();
        let release_a = catalog.gate_episodes("A");
        let release_b = catalog.gate_episodes("B");
        let (_dir, mut coord) = coordinator(catalog, FakeCovers::default());

        let a = coord.fetch_episodes("A", AudioMode::Sub).unwrap();
        let b = coord.fetch_episodes("B", AudioMode::Sub).unwrap();

        release_a.send(Ok(labels(&["1"]))).unwrap();
        assert!(coord.accept(a.wait().await).is_none());
        assert!(coord.is_fetching_episodes());

        release_b.send(Ok(labels(&["1", "2", "3"]))).unwrap();
        let event = coord.accept(b.wait().await);
        assert!(matches!(
            event,
            Some(FetchEvent::EpisodesFinished { ref show_id, .. }) if show_id == "B"
        ));
        assert!(!coord.is_fetching_episodes());
    }

    #[tokio::test]
    async fn test_identical_episode_fetch_is_noop() {
        let catalog = FakeCatalog::default();
        let _release = catalog.gate_episodes("A");
        let (_dir, mut coord) = coordinator(catalog, FakeCovers::default());

        let _a = coord.fetch_episodes("A", AudioMode::Sub).unwrap();
        assert!(coord.fetch_episodes("A", AudioMode::Sub).is_none());
        assert!(coord.fetch_episodes("A", AudioMode::Dub).is_some());
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_dropped() {
        let (_dir, mut coord) = coordinator(FakeCatalog::default(), FakeCovers::default());
        let pending = coord.fetch_episodes("A", AudioMode::Sub).unwrap();
        let completion = pending.wait().await;
        assert!(coord.accept(completion.clone()).is_some());
        assert!(coord.accept(completion).is_none());
    }

    #[tokio::test]
    async fn test_panicking_worker_resolves_aborted() {
        let catalog = FakeCatalog::default();
        catalog.panic_on_search("boom");
        let (_dir, mut coord) = coordinator(catalog, FakeCovers::default());

        let pending = coord.search("boom", AudioMode::Sub).unwrap();
        match coord.accept(pending.wait().await) {
            Some(FetchEvent::SearchFinished { outcome, .. }) => {
                assert_eq!(outcome, Err(FetchError::Aborted));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!coord.is_searching());
    }

    #[tokio::test]
    async fn test_aborted_fetch_resolves_aborted() {
        let catalog = FakeCatalog::default();
        let _release = catalog.gate_episodes("A");
        let (_dir, mut coord) = coordinator(catalog, FakeCovers::default());

        let pending = coord.fetch_episodes("A", AudioMode::Sub).unwrap();
        pending.abort();
        match coord.accept(pending.wait().await) {
            Some(FetchEvent::EpisodesFinished { outcome, .. }) => {
                assert_eq!(outcome, Err(FetchError::Aborted));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!coord.is_fetching_episodes());
    }

    #[tokio::test]
    async fn test_cover_download_is_cached_and_deduplicated() {
        let covers = FakeCovers::default();
        let release = covers.gate("https://img/x.jpg");
        let (_dir, mut coord) = coordinator(FakeCatalog::default(), covers.clone());

        let pending = match coord.fetch_cover("x", "https://img/x.jpg") {
            CoverLookup::Fetching(p) => p,
            other => panic!("unexpected lookup: {other:?}"),
        };
        assert!(coord.is_fetching_cover("x"));
        assert!(matches!(
            coord.fetch_cover("x", "https://img/x.jpg"),
            CoverLookup::AlreadyFetching
        ));

        release.send(Ok(b"jpeg".to_vec())).unwrap();
        let path = match coord.accept(pending.wait().await) {
            Some(FetchEvent::CoverReady { show_id, path }) => {
                assert_eq!(show_id, "x");
                path
            }
            other => panic!("unexpected event: {other:?}"),
        };
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
        assert_eq!(path, cover_path_in(coord.covers_dir(), "x"));

        assert!(matches!(
            coord.fetch_cover("x", "https://img/x.jpg"),
            CoverLookup::Cached(p) if p == path
        ));
        assert_eq!(covers.calls(), 1);
    }

    #[tokio::test]
    async fn test_covers_for_different_ids_are_independent() {
        let covers = FakeCovers::default();
        let release_a = covers.gate("https://img/a.jpg");
        let (_dir, mut coord) = coordinator(FakeCatalog::default(), covers);

        let a = match coord.fetch_cover("a", "https://img/a.jpg") {
            CoverLookup::Fetching(p) => p,
            other => panic!("unexpected lookup: {other:?}"),
        };
        let b = match coord.fetch_cover("b", "https://img/b.jpg") {
            CoverLookup::Fetching(p) => p,
            other => panic!("unexpected lookup: {other:?}"),
        };

        assert!(matches!(
            coord.accept(b.wait().await),
            Some(FetchEvent::CoverReady { .. })
        ));
        assert!(coord.is_fetching_cover("a"));

        release_a
            .send(Err(CatalogError::Api {
                status: 404,
                message: "missing".into(),
            }))
            .unwrap();
        assert!(matches!(
            coord.accept(a.wait().await),
            Some(FetchEvent::CoverFailed { ref show_id, .. }) if show_id == "a"
        ));
        assert!(!cover_path_in(coord.covers_dir(), "a").exists());
    }

    #[tokio::test]
    async fn test_ids_sharing_a_cover_file_share_one_download() {
        let covers = FakeCovers::default();
        let release = covers.gate("https://img/ab.jpg");
        let (_dir, mut coord) = coordinator(FakeCatalog::default(), covers.clone());

        let pending = match coord.fetch_cover("a/b", "https://img/ab.jpg") {
            CoverLookup::Fetching(p) => p,
            other => panic!("unexpected lookup: {other:?}"),
        };
        assert!(coord.is_fetching_cover("ab"));
        assert!(matches!(
            coord.fetch_cover("ab", "https://img/ab.jpg"),
            CoverLookup::AlreadyFetching
        ));

        release.send(Ok(b"jpeg".to_vec())).unwrap();
        assert!(coord.accept(pending.wait().await).is_some());
        assert!(!coord.is_fetching_cover("ab"));
        assert!(matches!(coord.fetch_cover("ab", "https://img/ab.jpg"), CoverLookup::Cached(_)));
        assert_eq!(covers.calls(), 1);
    }

    #[tokio::test]
    async fn test_cover_without_url_is_unavailable() {
        let (_dir, mut coord) = coordinator(FakeCatalog::default(), FakeCovers::default());
        assert!(matches!(coord.fetch_cover("x", ""), CoverLookup::Unavailable));
        assert!(matches!(coord.fetch_cover("x", "  "), CoverLookup::Unavailable));
        assert!(!coord.is_fetching_cover("x"));
    }
}
