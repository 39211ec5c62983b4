pub mod episodes;
pub mod library;
pub mod profile;
pub mod search;

use iced::Task;

use anisko_core::models::AnimeSummary;

use crate::app;

pub use anisko_runtime::Page;

/// Actions that a screen can request from the app router.
///
/// Screens return these from `update()` instead of reaching into shared
/// state; the app interprets them in one place.
pub enum Action {
    None,
    NavigateTo(Page),
    /// Open the episode screen for a show.
    OpenAnime(AnimeSummary),
    /// Re-read likes, history and profile from disk.
    RefreshLibrary,
    SetStatus(String),
    /// Run an async iced task that eventually produces an app::Message.
    RunTask(Task<app::Message>),
}
