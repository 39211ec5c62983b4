//! JSON-file storage for likes, history, profile, settings and cached covers.
//!
//! One document per concern under a single data directory. Every read is
//! fail-soft: a missing or unreadable file yields the empty/default value
//! and is logged, never returned as an error. Writes go through a temp file
//! and a rename, and each document has its own lock so concurrent callers
//! in this process cannot lose each other's updates.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AniskoError;
use crate::models::{
    push_history, AnimeSummary, AudioMode, HistoryEntry, Profile, ProfileUpdate, ThemeKey,
};

const LIKES_FILE: &str = "likes.json";
const HISTORY_FILE: &str = "history.json";
const PROFILE_FILE: &str = "profile.json";
const SETTINGS_FILE: &str = "settings.json";
const COVERS_DIR: &str = "covers";
const AVATAR_FILE: &str = "avatar.jpg";

/// Durable local state, rooted at one directory.
pub struct PersistentStore {
    root: PathBuf,
    likes_lock: Mutex<()>,
    history_lock: Mutex<()>,
    profile_lock: Mutex<()>,
    settings_lock: Mutex<()>,
}

impl PersistentStore {
    /// Open a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            likes_lock: Mutex::new(()),
            history_lock: Mutex::new(()),
            profile_lock: Mutex::new(()),
            settings_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ── Likes ───────────────────────────────────────────────────

    /// All liked shows, first-liked first.
    pub fn likes(&self) -> Vec<AnimeSummary> {
        let _guard = lock(&self.likes_lock);
        self.read_list(LIKES_FILE)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes().iter().any(|a| a.id == id)
    }

    /// Add `anime` unless already liked. Returns whether it is liked afterwards.
    pub fn add_like(&self, anime: &AnimeSummary) -> bool {
        let _guard = lock(&self.likes_lock);
        let likes = self.read_list(LIKES_FILE);
        self.write_like(likes, anime, true)
    }

    /// Remove the show with `id`. Returns whether it is liked afterwards.
    pub fn remove_like(&self, id: &str) -> bool {
        let _guard = lock(&self.likes_lock);
        let mut likes: Vec<AnimeSummary> = self.read_list(LIKES_FILE);
        let before = likes.len();
        likes.retain(|a| a.id != id);
        if likes.len() == before {
            return false;
        }
        !self.write_logged(LIKES_FILE, &likes)
    }

    /// Flip the liked state of `anime`, returning the new state.
    pub fn toggle_like(&self, anime: &AnimeSummary) -> bool {
        let _guard = lock(&self.likes_lock);
        let likes: Vec<AnimeSummary> = self.read_list(LIKES_FILE);
        let liked = likes.iter().any(|a| a.id == anime.id);
        self.write_like(likes, anime, !liked)
    }

    /// Set the liked state of `anime` in `likes` as just read. The caller
    /// holds `likes_lock`.
    fn write_like(&self, mut likes: Vec<AnimeSummary>, anime: &AnimeSummary, like: bool) -> bool {
        let present = likes.iter().any(|a| a.id == anime.id);
        if present == like {
            return present;
        }
        if like {
            likes.push(anime.clone());
        } else {
            likes.retain(|a| a.id != anime.id);
        }
        if self.write_logged(LIKES_FILE, &likes) {
            like
        } else {
            present
        }
    }

    // ── History ─────────────────────────────────────────────────

    /// Watch history, most recent first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let _guard = lock(&self.history_lock);
        self.read_list(HISTORY_FILE)
    }

    /// Record that `episode` of `anime` was played.
    pub fn record_history(&self, anime: &AnimeSummary, episode: &str) {
        let _guard = lock(&self.history_lock);
        let mut history: Vec<HistoryEntry> = self.read_list(HISTORY_FILE);
        push_history(&mut history, HistoryEntry::new(anime.clone(), episode));
        self.write_logged(HISTORY_FILE, &history);
    }

    pub fn clear_history(&self) {
        let _guard = lock(&self.history_lock);
        self.write_logged(HISTORY_FILE, &Vec::<HistoryEntry>::new());
    }

    // ── Profile ─────────────────────────────────────────────────

    pub fn profile(&self) -> Profile {
        let _guard = lock(&self.profile_lock);
        profile_from(self.read_object(PROFILE_FILE))
    }

    /// Merge `update` into the stored profile and return the result.
    ///
    /// Keys this version does not know about are kept as they are.
    pub fn set_profile(&self, update: ProfileUpdate) -> Profile {
        let _guard = lock(&self.profile_lock);
        let mut doc = self.read_object(PROFILE_FILE);
        if let Some(name) = update.display_name {
            doc.insert("name".into(), Value::String(name));
        }
        match update.avatar_path {
            Some(Some(path)) => {
                doc.insert("avatar".into(), Value::String(path.display().to_string()));
            }
            Some(None) => {
                doc.remove("avatar");
            }
            None => {}
        }
        self.write_logged(PROFILE_FILE, &doc);
        profile_from(doc)
    }

    /// Where the avatar image is kept.
    pub fn avatar_path(&self) -> PathBuf {
        self.root.join(AVATAR_FILE)
    }

    /// Copy `source` over the stored avatar and point the profile at it.
    pub fn set_avatar(&self, source: &Path) -> Result<Profile, AniskoError> {
        fs::create_dir_all(&self.root)?;
        let dest = self.avatar_path();
        fs::copy(source, &dest)?;
        tracing::debug!(source = %source.display(), "Avatar updated");
        Ok(self.set_profile(ProfileUpdate::avatar(Some(dest))))
    }

    // ── Settings ────────────────────────────────────────────────

    /// Active theme; unknown or missing keys fall back to the default.
    pub fn theme(&self) -> ThemeKey {
        let _guard = lock(&self.settings_lock);
        self.read_object(SETTINGS_FILE)
            .get("theme")
            .and_then(Value::as_str)
            .and_then(ThemeKey::from_key)
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: ThemeKey) {
        self.update_setting("theme", Value::String(theme.as_key().into()));
    }

    /// Last audio mode the user picked, if any.
    pub fn mode(&self) -> Option<AudioMode> {
        let _guard = lock(&self.settings_lock);
        self.read_object(SETTINGS_FILE)
            .get("mode")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn set_mode(&self, mode: AudioMode) {
        self.update_setting("mode", Value::String(mode.as_str().into()));
    }

    fn update_setting(&self, key: &str, value: Value) {
        let _guard = lock(&self.settings_lock);
        let mut doc = self.read_object(SETTINGS_FILE);
        doc.insert(key.into(), value);
        self.write_logged(SETTINGS_FILE, &doc);
    }

    // ── Covers ──────────────────────────────────────────────────

    pub fn covers_dir(&self) -> PathBuf {
        self.root.join(COVERS_DIR)
    }

    /// Where the cover for `id` is (or would be) cached. Does no I/O.
    pub fn cover_path_for(&self, id: &str) -> PathBuf {
        cover_path_in(&self.covers_dir(), id)
    }

    // ── File helpers ────────────────────────────────────────────

    fn read_list<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        read_json(&self.root.join(name)).unwrap_or_default()
    }

    fn read_object(&self, name: &str) -> Map<String, Value> {
        match read_json::<Value>(&self.root.join(name)) {
            Some(Value::Object(map)) => map,
            Some(_) => {
                tracing::warn!(file = name, "Expected a JSON object, starting fresh");
                Map::new()
            }
            None => Map::new(),
        }
    }

    /// Write `value` to `name`, logging failures. Returns whether it stuck.
    fn write_logged<T: Serialize>(&self, name: &str, value: &T) -> bool {
        match write_json(&self.root.join(name), value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(file = name, "Failed to save: {e}");
                false
            }
        }
    }
}

/// Cover file name for `id`: ASCII alphanumerics, `-` and `_` only.
///
/// Distinct ids that differ only in stripped characters share a file.
pub fn sanitize_cover_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Cover path for `id` inside `covers_dir`.
pub fn cover_path_in(covers_dir: &Path, id: &str) -> PathBuf {
    covers_dir.join(format!("{}.jpg", sanitize_cover_id(id)))
}

fn profile_from(doc: Map<String, Value>) -> Profile {
    serde_json::from_value(Value::Object(doc)).unwrap_or_else(|e| {
        tracing::warn!("Invalid profile, using defaults: {e}");
        Profile::default()
    })
}

fn lock(m: &Mutex<()>) -> MutexGuard<'_, ()> {
    // A panic while holding the lock leaves no partial state behind: files
    // are replaced atomically.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Cannot read store file: {e}");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Corrupt store file, starting fresh: {e}");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AniskoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
