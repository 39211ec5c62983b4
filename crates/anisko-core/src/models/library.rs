use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AnimeSummary;

/// Maximum number of entries kept in the watch history.
pub const HISTORY_LIMIT: usize = 50;

/// A watched show with the last episode played.
///
/// Stored flattened so each record reads like the show it describes plus
/// `last_episode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub anime: AnimeSummary,
    pub last_episode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn new(anime: AnimeSummary, episode: impl Into<String>) -> Self {
        Self {
            anime,
            last_episode: episode.into(),
            watched_at: Some(Utc::now()),
        }
    }
}

/// Move `entry` to the front, dropping any older record for the same show,
/// and truncate to [`HISTORY_LIMIT`].
pub fn push_history(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.retain(|h| h.anime.id != entry.anime.id);
    history.insert(0, entry);
    history.truncate(HISTORY_LIMIT);
}
