//! In-memory catalog and cover source whose calls finish on demand.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use anisko_api::{CatalogError, CatalogService, CoverSource};
use anisko_core::error::AniskoError;
use anisko_core::launcher::{Launcher, PlayRequest};
use anisko_core::models::{AnimeKind, AnimeSummary, AudioMode};

type Gate<T> = oneshot::Receiver<Result<T, CatalogError>>;
pub type Release<T> = oneshot::Sender<Result<T, CatalogError>>;

pub fn summary(id: &str, title: &str, kind: AnimeKind, episodes: u32) -> AnimeSummary {
    AnimeSummary::new(id, title, episodes, format!("https://img/{id}.jpg"), kind)
}

pub fn labels(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

async fn pass<T>(gate: Option<Gate<T>>, default: T) -> Result<T, CatalogError> {
    match gate {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(CatalogError::Parse("gate dropped".into()))),
        None => Ok(default),
    }
}

/// Calls without a registered gate answer immediately with an empty result.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    search_gates: Arc<Mutex<HashMap<String, Gate<Vec<AnimeSummary>>>>>,
    episode_gates: Arc<Mutex<HashMap<String, Gate<Vec<String>>>>>,
    panics: Arc<Mutex<HashSet<String>>>,
    search_calls: Arc<AtomicUsize>,
    episode_calls: Arc<AtomicUsize>,
}

impl FakeCatalog {
    pub fn gate_search(&self, query: &str) -> Release<Vec<AnimeSummary>> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(query.into(), rx);
        tx
    }

    pub fn gate_episodes(&self, show_id: &str) -> Release<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        self.episode_gates.lock().unwrap().insert(show_id.into(), rx);
        tx
    }

    pub fn panic_on_search(&self, query: &str) {
        self.panics.lock().unwrap().insert(query.into());
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn episode_calls(&self) -> usize {
        self.episode_calls.load(Ordering::SeqCst)
    }
}

impl CatalogService for FakeCatalog {
    type Error = CatalogError;

    async fn search(
        &self,
        query: &str,
        _mode: AudioMode,
    ) -> Result<Vec<AnimeSummary>, CatalogError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.panics.lock().unwrap().contains(query) {
            panic!("search worker crashed");
        }
        let gate = self.search_gates.lock().unwrap().remove(query);
        pass(gate, Vec::new()).await
    }

    async fn list_episodes(
        &self,
        show_id: &str,
        _mode: AudioMode,
    ) -> Result<Vec<String>, CatalogError> {
        self.episode_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.episode_gates.lock().unwrap().remove(show_id);
        pass(gate, Vec::new()).await
    }
}

/// Ungated URLs answer immediately with a few fake bytes.
#[derive(Clone, Default)]
pub struct FakeCovers {
    gates: Arc<Mutex<HashMap<String, Gate<Vec<u8>>>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeCovers {
    pub fn gate(&self, url: &str) -> Release<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(url.into(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CoverSource for FakeCovers {
    type Error = CatalogError;

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(url);
        pass(gate, b"cover".to_vec()).await
    }
}

/// Records launches instead of starting a process.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    launched: Arc<Mutex<Vec<PlayRequest>>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn launched(&self) -> Vec<PlayRequest> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, request: &PlayRequest) -> Result<(), AniskoError> {
        if self.fail {
            return Err(AniskoError::Launch {
                program: "ani-cli".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }
        self.launched.lock().unwrap().push(request.clone());
        Ok(())
    }
}
