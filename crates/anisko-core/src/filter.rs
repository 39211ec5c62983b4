//! Search-result tabs.
//!
//! A show can land in several tabs at once (an ONA titled "... Special" is
//! both a series and an extra); the rules are independent predicates.

use crate::models::{AnimeKind, AnimeSummary};

/// Result tab shown above search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    All,
    #[default]
    Series,
    Films,
    Extras,
}

impl Category {
    pub const ALL: &[Category] = &[Self::Series, Self::Films, Self::Extras, Self::All];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Series => write!(f, "Series"),
            Self::Films => write!(f, "Films"),
            Self::Extras => write!(f, "Extras"),
        }
    }
}

const EXTRA_TITLE_MARKERS: &[&str] = &["OVA", "SPECIAL", "EXTRA"];

/// Whether `anime` belongs in the `category` tab.
pub fn classify(anime: &AnimeSummary, category: Category) -> bool {
    use AnimeKind::*;

    let kind = anime.kind;
    let episodes = anime.episode_count;

    match category {
        Category::All => true,
        Category::Series => {
            matches!(kind, Tv | TvShort | Ona)
                || (episodes > 1 && !matches!(kind, Movie | Ova | Special | Music))
        }
        Category::Films => {
            kind == Movie || (episodes == 1 && !matches!(kind, Ova | Special | Music))
        }
        Category::Extras => {
            if matches!(kind, Ova | Special | Music) {
                return true;
            }
            let title = anime.title.to_uppercase();
            EXTRA_TITLE_MARKERS.iter().any(|m| title.contains(m))
        }
    }
}

/// The subset of `results` in `category`, preserving order.
pub fn partition(results: &[AnimeSummary], category: Category) -> Vec<&AnimeSummary> {
    results.iter().filter(|a| classify(a, category)).collect()
}

/// Number of results per tab, in [`Category::ALL`] order.
pub fn counts(results: &[AnimeSummary]) -> Vec<(Category, usize)> {
    Category::ALL
        .iter()
        .map(|&c| (c, results.iter().filter(|a| classify(a, c)).count()))
        .collect()
}
