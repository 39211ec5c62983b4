use serde::Deserialize;

use anisko_core::models::{AnimeKind, AnimeSummary, AudioMode};

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// Error text of all reported errors, joined.
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Search ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ShowsResponse {
    pub shows: Option<ShowConnection>,
}

#[derive(Debug, Deserialize)]
pub struct ShowConnection {
    #[serde(default)]
    pub edges: Vec<ShowEdge>,
}

#[derive(Debug, Deserialize)]
pub struct ShowEdge {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "availableEpisodes")]
    pub available_episodes: Option<EpisodeCounts>,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EpisodeCounts {
    pub sub: Option<u32>,
    pub dub: Option<u32>,
}

impl EpisodeCounts {
    pub fn for_mode(&self, mode: AudioMode) -> u32 {
        match mode {
            AudioMode::Sub => self.sub,
            AudioMode::Dub => self.dub,
        }
        .unwrap_or(0)
    }
}

impl ShowEdge {
    /// Convert to the shared summary; the episode count is the one for `mode`.
    pub fn into_summary(self, mode: AudioMode) -> AnimeSummary {
        let episodes = self
            .available_episodes
            .as_ref()
            .map(|c| c.for_mode(mode))
            .unwrap_or(0);
        AnimeSummary {
            title: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            episode_count: episodes,
            thumbnail_url: self.thumbnail.unwrap_or_default(),
            kind: AnimeKind::from_tag(self.kind.as_deref().unwrap_or_default()),
        }
    }
}

// ── Episodes ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ShowResponse {
    pub show: Option<ShowDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ShowDetail {
    #[serde(rename = "availableEpisodesDetail", default)]
    pub episodes_detail: Option<EpisodeLabels>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EpisodeLabels {
    #[serde(default)]
    pub sub: Vec<String>,
    #[serde(default)]
    pub dub: Vec<String>,
}

impl ShowDetail {
    /// Raw labels for `mode`, unfiltered and in catalog order.
    pub fn into_labels(self, mode: AudioMode) -> Vec<String> {
        let detail = self.episodes_detail.unwrap_or_default();
        match mode {
            AudioMode::Sub => detail.sub,
            AudioMode::Dub => detail.dub,
        }
    }
}
