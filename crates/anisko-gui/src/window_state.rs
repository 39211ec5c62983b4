//! Window size and position, restored on the next start.
//!
//! Stored as `window.json` next to the rest of the user data.

use std::path::{Path, PathBuf};

use iced::{Point, Size};
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = "window.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 720.0,
            x: -1.0,
            y: -1.0,
        }
    }
}

impl WindowState {
    pub fn size(&self) -> Size {
        Size::new(self.width.max(720.0), self.height.max(480.0))
    }

    /// Saved position, if one was ever recorded.
    pub fn position(&self) -> Option<Point> {
        (self.x >= 0.0 && self.y >= 0.0).then(|| Point::new(self.x, self.y))
    }

    /// Load from `data_dir`, falling back to defaults on any problem.
    pub fn load(data_dir: &Path) -> Self {
        std::fs::read_to_string(state_path(data_dir))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save to `data_dir`. Errors are logged but not propagated.
    pub fn save(&self, data_dir: &Path) {
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            tracing::warn!("Failed to create data dir for window state: {e}");
            return;
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(state_path(data_dir), json) {
                    tracing::warn!("Failed to save window state: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize window state: {e}"),
        }
    }
}

fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FILE_NAME)
}
