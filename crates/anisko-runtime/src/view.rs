//! Presentation state read by the screens.
//!
//! Only events that passed the coordinator's staleness filter are applied
//! here, so everything in a `ViewState` is current.

use std::collections::HashMap;
use std::path::PathBuf;

use anisko_core::filter::{self, Category};
use anisko_core::models::{AnimeSummary, AudioMode, EpisodeList, ThemeKey};

use crate::coordinator::FetchEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Search,
    Episodes,
    Library,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<AnimeSummary>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EpisodeStatus {
    #[default]
    Idle,
    Loading,
    Loaded(EpisodeList),
    Failed(String),
}

/// State of the episode screen for one show.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeView {
    pub anime: AnimeSummary,
    pub mode: AudioMode,
    pub liked: bool,
    pub status: EpisodeStatus,
    pub selected: Option<String>,
}

impl EpisodeView {
    pub fn episodes(&self) -> &[String] {
        match &self.status {
            EpisodeStatus::Loaded(list) => list.labels(),
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverState {
    Loading,
    Loaded(PathBuf),
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub page: Page,
    pub query: String,
    pub search: SearchStatus,
    pub category: Category,
    pub episodes: Option<EpisodeView>,
    pub covers: HashMap<String, CoverState>,
    pub theme: ThemeKey,
    pub mode: AudioMode,
    pub status_message: String,
}

impl ViewState {
    pub fn new(theme: ThemeKey, mode: AudioMode) -> Self {
        Self {
            theme,
            mode,
            ..Default::default()
        }
    }

    /// Apply an accepted fetch result. Returns whether anything changed.
    pub fn apply(&mut self, event: FetchEvent) -> bool {
        match event {
            FetchEvent::SearchFinished { query, outcome, .. } => {
                match outcome {
                    Ok(results) => {
                        self.status_message = if results.is_empty() {
                            format!("No results for \"{query}\"")
                        } else {
                            format!("{} results for \"{query}\"", results.len())
                        };
                        self.search = SearchStatus::Loaded(results);
                        self.category = Category::Series;
                    }
                    Err(e) => {
                        self.status_message = "Search failed".into();
                        self.search = SearchStatus::Failed(e.to_string());
                    }
                }
                true
            }
            FetchEvent::EpisodesFinished {
                show_id,
                mode,
                outcome,
            } => {
                let Some(view) = self.episodes.as_mut() else {
                    return false;
                };
                if view.anime.id != show_id || view.mode != mode {
                    return false;
                }
                view.status = match outcome {
                    Ok(list) => EpisodeStatus::Loaded(list),
                    Err(e) => EpisodeStatus::Failed(e.to_string()),
                };
                if let Some(selected) = &view.selected {
                    if !view.episodes().contains(selected) {
                        view.selected = None;
                    }
                }
                true
            }
            FetchEvent::CoverReady { show_id, path } => {
                self.covers.insert(show_id, CoverState::Loaded(path));
                true
            }
            FetchEvent::CoverFailed { show_id, .. } => {
                self.covers.insert(show_id, CoverState::Failed);
                true
            }
        }
    }

    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }

    pub fn begin_search(&mut self, query: &str) {
        self.query = query.to_string();
        self.search = SearchStatus::Loading;
        self.status_message.clear();
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.search = SearchStatus::Idle;
        self.category = Category::Series;
    }

    pub fn is_searching(&self) -> bool {
        self.search == SearchStatus::Loading
    }

    /// All results of the last successful search.
    pub fn results(&self) -> &[AnimeSummary] {
        match &self.search {
            SearchStatus::Loaded(results) => results,
            _ => &[],
        }
    }

    /// Results in the active tab.
    pub fn visible_results(&self) -> Vec<&AnimeSummary> {
        filter::partition(self.results(), self.category)
    }

    pub fn counts(&self) -> Vec<(Category, usize)> {
        filter::counts(self.results())
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Switch to the episode screen for `anime`, waiting for its list.
    pub fn open_episodes(&mut self, anime: AnimeSummary, liked: bool) {
        self.episodes = Some(EpisodeView {
            anime,
            mode: self.mode,
            liked,
            status: EpisodeStatus::Loading,
            selected: None,
        });
        self.page = Page::Episodes;
    }

    /// Select `label` if it is in the loaded list.
    pub fn select_episode(&mut self, label: &str) -> bool {
        let Some(view) = self.episodes.as_mut() else {
            return false;
        };
        if !view.episodes().iter().any(|l| l == label) {
            return false;
        }
        view.selected = Some(label.to_string());
        true
    }

    /// Update the liked flag shown for `id`, if that show is open.
    pub fn set_liked(&mut self, id: &str, liked: bool) {
        if let Some(view) = self.episodes.as_mut() {
            if view.anime.id == id {
                view.liked = liked;
            }
        }
    }

    pub fn cover(&self, id: &str) -> Option<&CoverState> {
        self.covers.get(id)
    }
}
