use serde::{Deserialize, Serialize};

/// Catalog format tag for a show.
///
/// The catalog sends this as a free-form string; anything outside the known
/// set maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnimeKind {
    Tv,
    TvShort,
    Ona,
    Ova,
    Movie,
    Special,
    Music,
    #[default]
    Unknown,
}

impl AnimeKind {
    pub const ALL: &[AnimeKind] = &[
        Self::Tv,
        Self::TvShort,
        Self::Ona,
        Self::Ova,
        Self::Movie,
        Self::Special,
        Self::Music,
        Self::Unknown,
    ];

    /// Parse a catalog type tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "TV" => Self::Tv,
            "TV_SHORT" => Self::TvShort,
            "ONA" => Self::Ona,
            "OVA" => Self::Ova,
            "MOVIE" => Self::Movie,
            "SPECIAL" => Self::Special,
            "MUSIC" => Self::Music,
            _ => Self::Unknown,
        }
    }

    /// The catalog tag. `Unknown` has an empty tag.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Tv => "TV",
            Self::TvShort => "TV_SHORT",
            Self::Ona => "ONA",
            Self::Ova => "OVA",
            Self::Movie => "MOVIE",
            Self::Special => "SPECIAL",
            Self::Music => "MUSIC",
            Self::Unknown => "",
        }
    }

    /// Short badge text shown next to a title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tv | Self::TvShort => "SERIES",
            Self::Ona => "ONA",
            Self::Ova => "OVA",
            Self::Movie => "FILM",
            Self::Special => "SPECIAL",
            Self::Music => "MUSIC",
            Self::Unknown => "",
        }
    }
}

impl From<String> for AnimeKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<AnimeKind> for String {
    fn from(kind: AnimeKind) -> Self {
        kind.as_tag().to_string()
    }
}

/// Audio track selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    #[default]
    Sub,
    Dub,
}

impl AudioMode {
    pub const ALL: &[AudioMode] = &[Self::Sub, Self::Dub];

    /// Value used for the catalog's `translationType` and per-mode fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sub => "sub",
            Self::Dub => "dub",
        }
    }
}

impl std::fmt::Display for AudioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sub => write!(f, "Sub"),
            Self::Dub => write!(f, "Dub"),
        }
    }
}

/// A show as returned by a catalog search.
///
/// Field names on disk follow the existing `likes.json` / `history.json`
/// layout, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "episodes", default)]
    pub episode_count: u32,
    #[serde(rename = "thumbnail", default)]
    pub thumbnail_url: String,
    #[serde(rename = "type", default)]
    pub kind: AnimeKind,
}

impl AnimeSummary {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        episode_count: u32,
        thumbnail_url: impl Into<String>,
        kind: AnimeKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            episode_count,
            thumbnail_url: thumbnail_url.into(),
            kind,
        }
    }

    /// Cover URL, if the catalog provided one.
    pub fn cover_url(&self) -> Option<&str> {
        let url = self.thumbnail_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

/// Episode labels for one show in one audio mode, in numeric order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeList {
    pub show_id: String,
    pub mode: AudioMode,
    labels: Vec<String>,
}

impl EpisodeList {
    /// Build from raw catalog labels: non-numeric labels are dropped and the
    /// rest are sorted by value ("2" before "10").
    pub fn from_labels(show_id: impl Into<String>, mode: AudioMode, raw: Vec<String>) -> Self {
        Self {
            show_id: show_id.into(),
            mode,
            labels: sort_episode_labels(raw),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Whether a label is a plain non-negative number with at most one `.`.
pub fn is_episode_label(label: &str) -> bool {
    let digits = label.replacen('.', "", 1);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Keep numeric labels only and order them by value.
pub fn sort_episode_labels(raw: Vec<String>) -> Vec<String> {
    let mut labels: Vec<(f64, String)> = raw
        .into_iter()
        .filter(|l| is_episode_label(l))
        .filter_map(|l| l.parse::<f64>().ok().map(|v| (v, l)))
        .collect();
    labels.sort_by(|a, b| a.0.total_cmp(&b.0));
    labels.into_iter().map(|(_, l)| l).collect()
}
