use std::collections::HashSet;

use iced::widget::{button, column, row, text};
use iced::{Alignment, Element, Length};
use lucide_icons::iced as icons;

use anisko_core::models::{AnimeSummary, HistoryEntry};
use anisko_runtime::ViewState;

use crate::app::AppSession;
use crate::screen::Action;
use crate::style;
use crate::theme::{self, ColorScheme};
use crate::widgets;

/// Likes and watch history, read from disk on [`Library::refresh`].
///
/// The liked ids double as the source of the heart toggles on every other
/// screen, so views never touch the store directly.
#[derive(Debug, Default)]
pub struct Library {
    likes: Vec<AnimeSummary>,
    liked_ids: HashSet<String>,
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Open(AnimeSummary),
    ToggleLike(AnimeSummary),
    ClearHistory,
}

impl Library {
    pub fn refresh(&mut self, session: &AppSession) {
        self.likes = session.likes();
        self.liked_ids = self.likes.iter().map(|a| a.id.clone()).collect();
        self.history = session.history();
    }

    pub fn likes(&self) -> &[AnimeSummary] {
        &self.likes
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked_ids.contains(id)
    }

    pub fn update(&mut self, session: &mut AppSession, message: Message) -> Action {
        match message {
            Message::Open(anime) => Action::OpenAnime(anime),
            Message::ToggleLike(anime) => {
                session.toggle_like(&anime);
                Action::RefreshLibrary
            }
            Message::ClearHistory => {
                session.clear_history();
                self.history.clear();
                Action::SetStatus("History cleared".into())
            }
        }
    }

    pub fn view<'a>(&'a self, cs: &'a ColorScheme, state: &'a ViewState) -> Element<'a, Message> {
        let header = text("Library")
            .size(style::TEXT_XL)
            .font(style::FONT_HEADING)
            .line_height(style::LINE_HEIGHT_TIGHT);

        if self.likes.is_empty() && self.history.is_empty() {
            return column![
                header,
                widgets::empty_state::<Message>(
                    cs,
                    icons::icon_library()
                        .size(style::TEXT_2XL)
                        .color(cs.outline)
                        .into(),
                    "Your library is empty",
                    "Tap the heart on any show to keep it here.",
                ),
            ]
            .padding([style::SPACE_LG, style::SPACE_XL])
            .height(Length::Fill)
            .into();
        }

        let mut content = column![].spacing(style::SPACE_XS);

        content = content.push(widgets::section_label::<Message>(cs, "FAVORITES"));
        if self.likes.is_empty() {
            content = content.push(
                text("No favorites yet.")
                    .size(style::TEXT_SM)
                    .color(cs.outline)
                    .line_height(style::LINE_HEIGHT_LOOSE),
            );
        }
        for anime in &self.likes {
            content = content.push(widgets::anime_row(
                cs,
                anime,
                state.cover(&anime.id),
                true,
                None,
                Message::Open(anime.clone()),
                Message::ToggleLike(anime.clone()),
            ));
        }

        if !self.history.is_empty() {
            let clear = button(
                row![
                    icons::icon_x().size(style::TEXT_XS),
                    text("Clear")
                        .size(style::TEXT_XS)
                        .line_height(style::LINE_HEIGHT_LOOSE),
                ]
                .spacing(style::SPACE_XXS)
                .align_y(Alignment::Center),
            )
            .padding([style::SPACE_XXS, style::SPACE_SM])
            .on_press(Message::ClearHistory)
            .style(theme::ghost_button(cs));

            content = content.push(
                row![
                    widgets::section_label::<Message>(cs, "RECENTLY WATCHED"),
                    iced::widget::Space::new().width(Length::Fill),
                    clear,
                ]
                .align_y(Alignment::Center)
                .padding(iced::Padding::new(0.0).top(style::SPACE_LG)),
            );
            for entry in &self.history {
                content = content.push(widgets::anime_row(
                    cs,
                    &entry.anime,
                    state.cover(&entry.anime.id),
                    self.is_liked(&entry.anime.id),
                    Some(format!("Episode {}", entry.last_episode)),
                    Message::Open(entry.anime.clone()),
                    Message::ToggleLike(entry.anime.clone()),
                ));
            }
        }

        column![
            header,
            widgets::styled_scrollable(content, cs).height(Length::Fill),
        ]
        .spacing(style::SPACE_MD)
        .padding([style::SPACE_LG, style::SPACE_XL])
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}
