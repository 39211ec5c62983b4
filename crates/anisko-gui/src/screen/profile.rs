use std::path::PathBuf;

use iced::widget::{button, column, container, image, row, text, text_input};
use iced::{Alignment, ContentFit, Element, Length};

use anisko_core::models::{AnimeSummary, Profile, ProfileUpdate, ThemeKey};
use anisko_runtime::ViewState;

use crate::app::AppSession;
use crate::screen::library::Library;
use crate::screen::Action;
use crate::style;
use crate::theme::{self, ColorScheme};
use crate::widgets;

/// Favorites shown as covers under the profile card.
const FAVORITE_COLUMNS: usize = 5;
const FAVORITE_COVER_WIDTH: f32 = 110.0;
const FAVORITE_COVER_HEIGHT: f32 = 156.0;

/// Profile page state: the stored profile plus the unsaved form inputs.
#[derive(Debug, Default)]
pub struct ProfileScreen {
    profile: Profile,
    /// Avatar bytes, loaded eagerly; the file is rewritten in place on
    /// change, so a path-based handle would keep showing the old image.
    avatar: Option<image::Handle>,
    name_input: String,
    avatar_input: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    NameChanged(String),
    SaveName,
    AvatarPathChanged(String),
    SaveAvatar,
    RemoveAvatar,
    ThemeSelected(ThemeKey),
    Open(AnimeSummary),
}

impl ProfileScreen {
    pub fn refresh(&mut self, session: &AppSession) {
        self.set_profile(session.profile());
    }

    fn set_profile(&mut self, profile: Profile) {
        self.avatar = profile
            .avatar_path
            .as_deref()
            .and_then(|path| std::fs::read(path).ok())
            .map(image::Handle::from_bytes);
        self.name_input = profile.display_name.clone();
        self.profile = profile;
    }

    pub fn update(&mut self, session: &mut AppSession, message: Message) -> Action {
        match message {
            Message::NameChanged(name) => {
                self.name_input = name;
                Action::None
            }
            Message::SaveName => {
                let name = self.name_input.trim();
                if name.is_empty() {
                    self.name_input = self.profile.display_name.clone();
                    return Action::SetStatus("Display name cannot be empty".into());
                }
                let profile = session.set_profile(ProfileUpdate::display_name(name));
                self.set_profile(profile);
                Action::SetStatus("Profile saved".into())
            }
            Message::AvatarPathChanged(path) => {
                self.avatar_input = path;
                Action::None
            }
            Message::SaveAvatar => {
                let path = self.avatar_input.trim();
                if path.is_empty() {
                    return Action::None;
                }
                match session.set_avatar(&PathBuf::from(path)) {
                    Ok(profile) => {
                        self.set_profile(profile);
                        self.avatar_input.clear();
                        Action::SetStatus("Avatar updated".into())
                    }
                    Err(e) => {
                        tracing::warn!(path, "Failed to set avatar: {e}");
                        Action::SetStatus(format!("Could not use that image: {e}"))
                    }
                }
            }
            Message::RemoveAvatar => {
                let profile = session.set_profile(ProfileUpdate::avatar(None));
                self.set_profile(profile);
                Action::None
            }
            Message::ThemeSelected(key) => {
                session.set_theme(key);
                Action::SetStatus(format!("Theme: {}", key.name()))
            }
            Message::Open(anime) => Action::OpenAnime(anime),
        }
    }

    pub fn view<'a>(
        &'a self,
        cs: &'a ColorScheme,
        state: &'a ViewState,
        library: &'a Library,
    ) -> Element<'a, Message> {
        let content = column![
            self.profile_card(cs, library),
            widgets::section_label::<Message>(cs, "THEME"),
            theme_grid(cs, state.theme),
            widgets::section_label::<Message>(cs, "FAVORITES"),
            favorites_grid(cs, state, library),
        ]
        .spacing(style::SPACE_MD)
        .max_width(style::CONTENT_MAX_WIDTH);

        widgets::styled_scrollable(
            container(content).padding([style::SPACE_LG, style::SPACE_XL]),
            cs,
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn profile_card<'a>(&'a self, cs: &'a ColorScheme, library: &Library) -> Element<'a, Message> {
        let avatar: Element<'a, Message> = match &self.avatar {
            Some(handle) => container(
                image(handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .content_fit(ContentFit::Cover)
                    .border_radius(style::AVATAR_SIZE / 2.0),
            )
            .width(Length::Fixed(style::AVATAR_SIZE))
            .height(Length::Fixed(style::AVATAR_SIZE))
            .into(),
            None => container(
                text(self.profile.initial().to_string())
                    .size(style::TEXT_2XL)
                    .font(style::FONT_HEADING),
            )
            .center_x(Length::Fixed(style::AVATAR_SIZE))
            .center_y(Length::Fixed(style::AVATAR_SIZE))
            .style(theme::avatar(cs))
            .into(),
        };

        let stats = text(format!(
            "{} favorites  \u{00B7}  {} recently watched",
            library.likes().len(),
            library.history().len()
        ))
        .size(style::TEXT_SM)
        .color(cs.on_surface_variant)
        .line_height(style::LINE_HEIGHT_NORMAL);

        let name_row = row![
            text_input("Display name", &self.name_input)
                .on_input(Message::NameChanged)
                .on_submit(Message::SaveName)
                .size(style::TEXT_SM)
                .padding(style::INPUT_PADDING)
                .style(theme::text_input_style(cs)),
            button(text("Save").size(style::TEXT_SM))
                .padding([style::SPACE_SM, style::SPACE_MD])
                .on_press_maybe(
                    (self.name_input.trim() != self.profile.display_name)
                        .then_some(Message::SaveName),
                )
                .style(theme::primary_button(cs)),
        ]
        .spacing(style::SPACE_SM)
        .align_y(Alignment::Center);

        let mut avatar_row = row![
            text_input("Path to an image for your avatar", &self.avatar_input)
                .on_input(Message::AvatarPathChanged)
                .on_submit(Message::SaveAvatar)
                .size(style::TEXT_SM)
                .padding(style::INPUT_PADDING)
                .style(theme::text_input_style(cs)),
            button(text("Set avatar").size(style::TEXT_SM))
                .padding([style::SPACE_SM, style::SPACE_MD])
                .on_press_maybe(
                    (!self.avatar_input.trim().is_empty()).then_some(Message::SaveAvatar),
                )
                .style(theme::ghost_button(cs)),
        ]
        .spacing(style::SPACE_SM)
        .align_y(Alignment::Center);
        if self.profile.avatar_path.is_some() {
            avatar_row = avatar_row.push(
                button(text("Remove").size(style::TEXT_SM))
                    .padding([style::SPACE_SM, style::SPACE_MD])
                    .on_press(Message::RemoveAvatar)
                    .style(theme::ghost_button(cs)),
            );
        }

        let info = column![
            text(self.profile.display_name.as_str())
                .size(style::TEXT_XL)
                .font(style::FONT_HEADING)
                .line_height(style::LINE_HEIGHT_TIGHT),
            stats,
            name_row,
            avatar_row,
        ]
        .spacing(style::SPACE_SM)
        .width(Length::Fill);

        container(
            row![avatar, info]
                .spacing(style::SPACE_LG)
                .align_y(Alignment::Start),
        )
        .padding(style::SPACE_LG)
        .style(theme::card(cs))
        .width(Length::Fill)
        .into()
    }
}

fn theme_grid<'a>(cs: &ColorScheme, active: ThemeKey) -> Element<'a, Message> {
    let mut grid = column![].spacing(style::SPACE_SM);
    for chunk in ThemeKey::ALL.chunks(style::THEME_COLUMNS) {
        let tiles: Vec<Element<'a, Message>> = chunk
            .iter()
            .map(|&key| {
                let preview = theme::ColorScheme::for_key(key);
                let swatch = container(text(""))
                    .width(Length::Fixed(style::SPACE_LG))
                    .height(Length::Fixed(style::SPACE_LG))
                    .style(theme::avatar(&preview));
                let label = column![
                    text(key.name())
                        .size(style::TEXT_SM)
                        .font(style::FONT_HEADING),
                    text(if key.is_light() { "Light" } else { "Dark" })
                        .size(style::TEXT_XS)
                        .color(preview.outline),
                ]
                .spacing(style::SPACE_XXS);
                button(
                    row![swatch, label]
                        .spacing(style::SPACE_SM)
                        .align_y(Alignment::Center),
                )
                .width(Length::FillPortion(1))
                .height(Length::Fixed(style::THEME_TILE_HEIGHT))
                .padding([style::SPACE_SM, style::SPACE_MD])
                .on_press(Message::ThemeSelected(key))
                .style(theme::theme_tile(&preview, key == active, cs))
                .into()
            })
            .collect();
        grid = grid.push(row(tiles).spacing(style::SPACE_SM));
    }
    grid.into()
}

fn favorites_grid<'a>(
    cs: &'a ColorScheme,
    state: &'a ViewState,
    library: &'a Library,
) -> Element<'a, Message> {
    if library.likes().is_empty() {
        return text("Shows you like appear here.")
            .size(style::TEXT_SM)
            .color(cs.outline)
            .line_height(style::LINE_HEIGHT_LOOSE)
            .into();
    }

    let mut grid = column![].spacing(style::SPACE_MD);
    for chunk in library.likes().chunks(FAVORITE_COLUMNS) {
        let cards: Vec<Element<'a, Message>> = chunk
            .iter()
            .map(|anime| {
                button(
                    column![
                        widgets::cover::<Message>(
                            cs,
                            state.cover(&anime.id),
                            &anime.title,
                            FAVORITE_COVER_WIDTH,
                            FAVORITE_COVER_HEIGHT,
                            style::RADIUS_MD,
                        ),
                        text(anime.title.as_str())
                            .size(style::TEXT_XS)
                            .line_height(style::LINE_HEIGHT_NORMAL)
                            .width(Length::Fixed(FAVORITE_COVER_WIDTH))
                            .wrapping(text::Wrapping::None),
                    ]
                    .spacing(style::SPACE_XS)
                    .clip(true),
                )
                .padding(style::SPACE_XS)
                .on_press(Message::Open(anime.clone()))
                .style(theme::icon_button(cs))
                .into()
            })
            .collect();
        grid = grid.push(row(cards).spacing(style::SPACE_MD));
    }
    grid.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_session;

    #[tokio::test]
    async fn test_blank_name_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(dir.path());
        let mut screen = ProfileScreen::default();
        screen.refresh(&session);
        assert_eq!(screen.name_input, "Guest");

        screen.update(&mut session, Message::NameChanged("   ".into()));
        let action = screen.update(&mut session, Message::SaveName);
        assert!(matches!(action, Action::SetStatus(ref m) if m.contains("empty")));
        assert_eq!(session.profile().display_name, "Guest");
        assert_eq!(screen.name_input, "Guest");
    }

    #[tokio::test]
    async fn test_name_is_trimmed_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(dir.path());
        let mut screen = ProfileScreen::default();

        screen.update(&mut session, Message::NameChanged("  Mika ".into()));
        screen.update(&mut session, Message::SaveName);
        assert_eq!(session.profile().display_name, "Mika");
        assert_eq!(screen.profile.display_name, "Mika");
    }

    #[tokio::test]
    async fn test_avatar_from_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(dir.path());
        let mut screen = ProfileScreen::default();

        screen.update(
            &mut session,
            Message::AvatarPathChanged(dir.path().join("nope.png").display().to_string()),
        );
        let action = screen.update(&mut session, Message::SaveAvatar);
        assert!(matches!(action, Action::SetStatus(ref m) if m.starts_with("Could not")));
        assert!(session.profile().avatar_path.is_none());
    }

    #[tokio::test]
    async fn test_avatar_set_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("me.png");
        std::fs::write(&source, b"not really a png").unwrap();
        let mut session = test_session(&dir.path().join("data"));
        let mut screen = ProfileScreen::default();

        screen.update(
            &mut session,
            Message::AvatarPathChanged(source.display().to_string()),
        );
        screen.update(&mut session, Message::SaveAvatar);
        assert!(session.profile().avatar_path.is_some());
        assert!(screen.avatar.is_some());
        assert!(screen.avatar_input.is_empty());

        screen.update(&mut session, Message::RemoveAvatar);
        assert!(session.profile().avatar_path.is_none());
        assert!(screen.avatar.is_none());
    }

    #[tokio::test]
    async fn test_theme_selection_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = test_session(dir.path());
        let mut screen = ProfileScreen::default();

        screen.update(&mut session, Message::ThemeSelected(ThemeKey::SoftRose));
        assert_eq!(session.view().theme, ThemeKey::SoftRose);
        assert_eq!(session.store().theme(), ThemeKey::SoftRose);
    }
}
