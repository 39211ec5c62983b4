pub mod coordinator;
pub mod error;
pub mod view;

#[cfg(test)]
mod testing;

use std::collections::HashSet;
use std::path::Path;

use anisko_api::{CatalogService, CoverSource};
use anisko_core::error::AniskoError;
use anisko_core::filter::Category;
use anisko_core::launcher::{Launcher, PlayRequest};
use anisko_core::models::{
    AnimeSummary, AudioMode, HistoryEntry, Profile, ProfileUpdate, ThemeKey,
};
use anisko_core::storage::PersistentStore;

pub use coordinator::{Completion, CoverLookup, FetchCoordinator, FetchEvent, Pending};
pub use error::FetchError;
pub use view::{CoverState, EpisodeStatus, EpisodeView, Page, SearchStatus, ViewState};

/// Everything one window needs: durable state, in-flight fetches, and what
/// the screens show.
///
/// User actions are methods; background results come back through
/// [`Session::deliver`]. Methods that start work return the [`Pending`]
/// handles for the caller to await off the interactive thread.
pub struct Session<C, S, L> {
    store: PersistentStore,
    coordinator: FetchCoordinator<C, S>,
    view: ViewState,
    launcher: L,
}

impl<C, S, L> Session<C, S, L>
where
    C: CatalogService + 'static,
    S: CoverSource + 'static,
    C::Error: Into<FetchError>,
    S::Error: Into<FetchError>,
    L: Launcher,
{
    /// The stored audio mode wins over `default_mode`.
    pub fn new(
        store: PersistentStore,
        coordinator: FetchCoordinator<C, S>,
        launcher: L,
        default_mode: AudioMode,
    ) -> Self {
        let theme = store.theme();
        let mode = store.mode().unwrap_or(default_mode);
        tracing::debug!(root = %store.root().display(), %theme, %mode, "Session opened");
        Self {
            store,
            coordinator,
            view: ViewState::new(theme, mode),
            launcher,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    pub fn navigate(&mut self, page: Page) {
        self.view.navigate(page);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.view.status_message = message.into();
    }

    /// Route a finished fetch into the view. Returns whether it was applied.
    pub fn deliver(&mut self, completion: Completion) -> bool {
        match self.coordinator.accept(completion) {
            Some(event) => self.view.apply(event),
            None => false,
        }
    }

    // ── Search ──────────────────────────────────────────────────

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.view.query = query.into();
    }

    /// Search for the current query. `None` if the query is blank or a
    /// search is already running.
    pub fn submit_search(&mut self) -> Option<Pending> {
        let query = self.view.query.trim().to_string();
        let pending = self.coordinator.search(&query, self.view.mode)?;
        self.view.begin_search(&query);
        Some(pending)
    }

    /// Drop the running search (if any) and clear the results.
    pub fn cancel_search(&mut self) {
        self.coordinator.cancel_search();
        self.view.clear_search();
    }

    pub fn set_category(&mut self, category: Category) {
        self.view.set_category(category);
    }

    // ── Covers ──────────────────────────────────────────────────

    /// Request the cover for `anime` unless its state is already known.
    pub fn request_cover(&mut self, anime: &AnimeSummary) -> Option<Pending> {
        if self.view.covers.contains_key(&anime.id) {
            return None;
        }
        let url = anime.cover_url().unwrap_or_default();
        match self.coordinator.fetch_cover(&anime.id, url) {
            CoverLookup::Cached(path) => {
                self.view
                    .covers
                    .insert(anime.id.clone(), CoverState::Loaded(path));
                None
            }
            CoverLookup::Fetching(pending) => {
                self.view
                    .covers
                    .insert(anime.id.clone(), CoverState::Loading);
                Some(pending)
            }
            CoverLookup::AlreadyFetching => None,
            CoverLookup::Unavailable => {
                self.view.covers.insert(anime.id.clone(), CoverState::Failed);
                None
            }
        }
    }

    /// Request covers for every show currently on screen.
    pub fn request_covers(&mut self) -> Vec<Pending> {
        let shows: Vec<AnimeSummary> = match self.view.page {
            Page::Search => self.view.visible_results().into_iter().cloned().collect(),
            Page::Episodes => self.view.episodes.iter().map(|e| e.anime.clone()).collect(),
            Page::Library => {
                let mut seen = HashSet::new();
                self.store
                    .likes()
                    .into_iter()
                    .chain(self.store.history().into_iter().map(|h| h.anime))
                    .filter(|anime| seen.insert(anime.id.clone()))
                    .collect()
            }
            Page::Profile => self.store.likes(),
        };
        shows
            .iter()
            .filter_map(|anime| self.request_cover(anime))
            .collect()
    }

    // ── Episodes ────────────────────────────────────────────────

    /// Open the episode screen for `anime` and start loading its list and
    /// cover.
    pub fn open_anime(&mut self, anime: AnimeSummary) -> Vec<Pending> {
        let liked = self.store.is_liked(&anime.id);
        let mut pending = Vec::new();
        pending.extend(self.request_cover(&anime));
        pending.extend(self.coordinator.fetch_episodes(&anime.id, self.view.mode));
        self.view.open_episodes(anime, liked);
        pending
    }

    /// Leave the episode screen; a running list fetch is discarded.
    pub fn close_episodes(&mut self) {
        self.coordinator.cancel_episodes();
        self.view.episodes = None;
        self.view.navigate(Page::Search);
    }

    pub fn select_episode(&mut self, label: &str) -> bool {
        self.view.select_episode(label)
    }

    /// Record the selected episode in history and start the player.
    ///
    /// Returns `Ok(false)` when no episode is selected.
    pub fn play(&mut self) -> Result<bool, AniskoError> {
        let Some(view) = &self.view.episodes else {
            return Ok(false);
        };
        let Some(episode) = view.selected.clone() else {
            return Ok(false);
        };
        let anime = view.anime.clone();
        let request = PlayRequest::new(&anime.title, &episode, view.mode);

        self.store.record_history(&anime, &episode);
        match self.launcher.launch(&request) {
            Ok(()) => {
                self.view.status_message = format!("Playing {} ep. {episode}", anime.title);
                Ok(true)
            }
            Err(e) => {
                tracing::error!(title = %anime.title, %episode, "Failed to start player: {e}");
                self.view.status_message = e.to_string();
                Err(e)
            }
        }
    }

    // ── Likes / history ─────────────────────────────────────────

    /// Flip the liked state of `anime` and return the state now persisted.
    pub fn toggle_like(&mut self, anime: &AnimeSummary) -> bool {
        let liked = self.store.toggle_like(anime);
        self.view.set_liked(&anime.id, liked);
        liked
    }

    /// Toggle the show open on the episode screen.
    pub fn toggle_like_current(&mut self) -> Option<bool> {
        let anime = self.view.episodes.as_ref()?.anime.clone();
        Some(self.toggle_like(&anime))
    }

    pub fn likes(&self) -> Vec<AnimeSummary> {
        self.store.likes()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.history()
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    // ── Preferences / profile ───────────────────────────────────

    pub fn set_theme(&mut self, theme: ThemeKey) {
        self.store.set_theme(theme);
        self.view.theme = theme;
    }

    /// Switch audio mode. On the episode screen the list is reloaded for
    /// the new mode.
    pub fn set_mode(&mut self, mode: AudioMode) -> Option<Pending> {
        if self.view.mode == mode {
            return None;
        }
        self.store.set_mode(mode);
        self.view.mode = mode;

        let view = self.view.episodes.as_mut()?;
        view.mode = mode;
        view.status = EpisodeStatus::Loading;
        view.selected = None;
        let show_id = view.anime.id.clone();
        self.coordinator.fetch_episodes(&show_id, mode)
    }

    pub fn profile(&self) -> Profile {
        self.store.profile()
    }

    pub fn set_profile(&mut self, update: ProfileUpdate) -> Profile {
        if update.is_empty() {
            return self.store.profile();
        }
        self.store.set_profile(update)
    }

    pub fn set_avatar(&mut self, source: &Path) -> Result<Profile, AniskoError> {
        self.store.set_avatar(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{labels, summary, FakeCatalog, FakeCovers, RecordingLauncher};
    use anisko_core::filter::classify;
    use anisko_core::models::AnimeKind;
    use tokio::runtime::Handle;

    type TestSession = Session<FakeCatalog, FakeCovers, RecordingLauncher>;

    fn session(
        catalog: FakeCatalog,
        launcher: RecordingLauncher,
    ) -> (tempfile::TempDir, TestSession) {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistentStore::open(dir.path());
        let coordinator = FetchCoordinator::new(
            catalog,
            FakeCovers::default(),
            store.covers_dir(),
            Handle::current(),
        );
        let session = Session::new(store, coordinator, launcher, AudioMode::Sub);
        (dir, session)
    }

    async fn run(session: &mut TestSession, pending: Vec<Pending>) {
        for p in pending {
            session.deliver(p.wait().await);
        }
    }

    #[tokio::test]
    async fn test_search_classify_like_theme_scenario() {
        let catalog = FakeCatalog::default();
        let release = catalog.gate_search("naruto");
        let (_dir, mut session) = session(catalog, RecordingLauncher::default());

        session.set_query("  naruto ");
        let pending = session.submit_search().unwrap();
        assert!(session.view().is_searching());
        release
            .send(Ok(vec![
                summary("n1", "Naruto", AnimeKind::Tv, 220),
                summary("n2", "Naruto Shippuden", AnimeKind::Tv, 500),
                summary("n3", "Naruto the Movie", AnimeKind::Movie, 1),
            ]))
            .unwrap();
        assert!(session.deliver(pending.wait().await));

        let results = session.view().results().to_vec();
        assert_eq!(results.len(), 3);
        assert_eq!(session.view().category, Category::Series);
        let series: Vec<_> = results
            .iter()
            .filter(|a| classify(a, Category::Series))
            .collect();
        assert_eq!(series.len(), 2);
        assert!(classify(&results[2], Category::Films));

        assert!(session.toggle_like(&results[1]));
        assert_eq!(session.likes(), vec![results[1].clone()]);

        session.set_theme(ThemeKey::CrystalAzure);
        assert_eq!(session.view().theme, ThemeKey::CrystalAzure);
        assert_eq!(session.store().theme(), ThemeKey::CrystalAzure);
        assert_eq!(session.likes(), vec![results[1].clone()]);
    }

    #[tokio::test]
    async fn test_submit_is_ignored_while_searching() {
        let catalog = FakeCatalog::default();
        let _release = catalog.gate_search("a");
        let (_dir, mut session) = session(catalog.clone(), RecordingLauncher::default());

        session.set_query("a");
        assert!(session.submit_search().is_some());
        session.set_query("b");
        assert!(session.submit_search().is_none());
        assert_eq!(session.view().query, "b");

        session.cancel_search();
        assert_eq!(session.view().search, SearchStatus::Idle);
        session.set_query("c");
        assert!(session.submit_search().is_some());
    }

    #[tokio::test]
    async fn test_open_anime_play_records_history() {
        let catalog = FakeCatalog::default();
        let release = catalog.gate_episodes("n1");
        let launcher = RecordingLauncher::default();
        let (_dir, mut session) = session(catalog, launcher.clone());

        let naruto = summary("n1", "Naruto", AnimeKind::Tv, 220);
        let pending = session.open_anime(naruto.clone());
        assert_eq!(pending.len(), 2);
        assert_eq!(session.view().page, Page::Episodes);
        assert!(!session.play().unwrap());

        release.send(Ok(labels(&["3", "1", "2"]))).unwrap();
        run(&mut session, pending).await;

        let view = session.view().episodes.as_ref().unwrap();
        assert_eq!(view.episodes(), &labels(&["1", "2", "3"])[..]);
        assert!(matches!(
            session.view().cover("n1"),
            Some(CoverState::Loaded(_))
        ));

        assert!(session.select_episode("2"));
        assert!(session.play().unwrap());
        assert_eq!(
            launcher.launched(),
            vec![PlayRequest::new("Naruto", "2", AudioMode::Sub)]
        );
        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].anime, naruto);
        assert_eq!(history[0].last_episode, "2");
    }

    #[tokio::test]
    async fn test_failed_launch_still_records_history() {
        let catalog = FakeCatalog::default();
        let release = catalog.gate_episodes("x");
        let (_dir, mut session) = session(catalog, RecordingLauncher::failing());

        let show = summary("x", "X", AnimeKind::Ona, 12);
        let pending = session.open_anime(show);
        release.send(Ok(labels(&["1"]))).unwrap();
        run(&mut session, pending).await;

        assert!(session.select_episode("1"));
        assert!(matches!(session.play(), Err(AniskoError::Launch { .. })));
        assert_eq!(session.history().len(), 1);
        assert!(!session.view().status_message.is_empty());
    }

    #[tokio::test]
    async fn test_play_without_episodes_is_noop() {
        let (_dir, mut session) = session(FakeCatalog::default(), RecordingLauncher::default());
        assert!(!session.play().unwrap());

        let pending = session.open_anime(summary("x", "X", AnimeKind::Ona, 12));
        run(&mut session, pending).await;

        // The fake answers with no episodes, so nothing can be selected.
        assert!(!session.select_episode("1"));
        assert!(!session.play().unwrap());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_leaving_episode_screen_discards_list() {
        let catalog = FakeCatalog::default();
        let release = catalog.gate_episodes("a");
        let (_dir, mut session) = session(catalog, RecordingLauncher::default());

        let pending = session.open_anime(summary("a", "A", AnimeKind::Tv, 2));
        session.close_episodes();
        assert_eq!(session.view().page, Page::Search);

        release.send(Ok(labels(&["1", "2"]))).unwrap();
        for p in pending {
            let completion = p.wait().await;
            if matches!(completion, Completion::Episodes { .. }) {
                assert!(!session.deliver(completion));
            }
        }
        assert!(session.view().episodes.is_none());
    }

    #[tokio::test]
    async fn test_mode_switch_reloads_episodes_and_persists() {
        let catalog = FakeCatalog::default();
        let (_dir, mut session) = session(catalog.clone(), RecordingLauncher::default());

        let pending = session.open_anime(summary("a", "A", AnimeKind::Tv, 2));
        run(&mut session, pending).await;
        assert_eq!(catalog.episode_calls(), 1);

        let reload = session.set_mode(AudioMode::Dub).expect("episode list reloads");
        assert_eq!(session.store().mode(), Some(AudioMode::Dub));
        assert!(session.deliver(reload.wait().await));
        assert_eq!(catalog.episode_calls(), 2);
        assert_eq!(
            session.view().episodes.as_ref().unwrap().mode,
            AudioMode::Dub
        );
        assert!(session.set_mode(AudioMode::Dub).is_none());
    }

    #[tokio::test]
    async fn test_like_toggle_updates_episode_view() {
        let (_dir, mut session) = session(FakeCatalog::default(), RecordingLauncher::default());
        let anime = summary("a", "A", AnimeKind::Tv, 2);
        let _pending = session.open_anime(anime.clone());

        assert_eq!(session.toggle_like_current(), Some(true));
        assert!(session.view().episodes.as_ref().unwrap().liked);
        assert_eq!(session.toggle_like_current(), Some(false));
        assert!(session.likes().is_empty());
    }

    #[tokio::test]
    async fn test_stored_mode_wins_over_default() {
        let dir = tempfile::tempdir().unwrap();
        PersistentStore::open(dir.path()).set_mode(AudioMode::Dub);

        let store = PersistentStore::open(dir.path());
        let coordinator = FetchCoordinator::new(
            FakeCatalog::default(),
            FakeCovers::default(),
            store.covers_dir(),
            Handle::current(),
        );
        let launcher = RecordingLauncher::default();
        let session = Session::new(store, coordinator, launcher, AudioMode::Sub);
        assert_eq!(session.view().mode, AudioMode::Dub);
    }

    #[tokio::test]
    async fn test_request_covers_skips_known_ids() {
        let (_dir, mut session) = session(FakeCatalog::default(), RecordingLauncher::default());
        let anime = summary("a", "A", AnimeKind::Tv, 2);
        session.toggle_like(&anime);
        session.navigate(Page::Library);

        let pending = session.request_covers();
        assert_eq!(pending.len(), 1);
        assert!(session.request_covers().is_empty());
        run(&mut session, pending).await;
        assert!(matches!(session.view().cover("a"), Some(CoverState::Loaded(_))));
    }

    #[tokio::test]
    async fn test_library_requests_history_covers() {
        let (_dir, mut session) = session(FakeCatalog::default(), RecordingLauncher::default());
        let liked = summary("a", "A", AnimeKind::Tv, 2);
        let watched = summary("h", "H", AnimeKind::Tv, 12);
        session.toggle_like(&liked);
        session.store().record_history(&liked, "1");
        session.store().record_history(&watched, "3");
        session.navigate(Page::Library);

        // "a" is both liked and watched but is fetched once.
        let pending = session.request_covers();
        assert_eq!(pending.len(), 2);
        run(&mut session, pending).await;
        assert!(matches!(session.view().cover("h"), Some(CoverState::Loaded(_))));
        assert!(matches!(session.view().cover("a"), Some(CoverState::Loaded(_))));
    }

    #[tokio::test]
    async fn test_failed_episode_list_can_be_retried() {
        let catalog = FakeCatalog::default();
        let fail = catalog.gate_episodes("a");
        let (_dir, mut session) = session(catalog.clone(), RecordingLauncher::default());
        let anime = summary("a", "A", AnimeKind::Tv, 2);

        let pending = session.open_anime(anime.clone());
        fail.send(Err(anisko_api::CatalogError::Api {
            status: 500,
            message: "boom".into(),
        }))
        .unwrap();
        run(&mut session, pending).await;
        let view = session.view().episodes.as_ref().unwrap();
        assert!(matches!(&view.status, EpisodeStatus::Failed(m) if m.contains("500")));
        assert!(!session.select_episode("1"));

        let release = catalog.gate_episodes("a");
        let retry = session.open_anime(anime);
        assert_eq!(retry.len(), 1);
        assert_eq!(
            session.view().episodes.as_ref().unwrap().status,
            EpisodeStatus::Loading
        );
        release.send(Ok(labels(&["2", "1"]))).unwrap();
        run(&mut session, retry).await;

        assert_eq!(catalog.episode_calls(), 2);
        let view = session.view().episodes.as_ref().unwrap();
        assert_eq!(view.episodes(), &labels(&["1", "2"])[..]);
        assert!(session.select_episode("2"));
    }
}
