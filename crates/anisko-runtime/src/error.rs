use thiserror::Error;

use anisko_api::CatalogError;

/// Why a background fetch produced no data.
///
/// Cloneable so it can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("could not save: {0}")]
    Storage(String),

    #[error("fetch was aborted")]
    Aborted,
}

impl From<CatalogError> for FetchError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Parse(msg) => Self::Parse(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
