use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};
use lucide_icons::iced as icons;

use anisko_runtime::{EpisodeStatus, EpisodeView, Page, ViewState};

use crate::app::AppSession;
use crate::screen::Action;
use crate::style;
use crate::theme::{self, ColorScheme};
use crate::widgets;

#[derive(Debug, Clone)]
pub enum Message {
    Back,
    ToggleLike,
    Select(String),
    Play,
    Retry,
}

/// `return_to` is the page the episode screen was opened from.
pub fn update(session: &mut AppSession, return_to: Page, message: Message) -> Action {
    match message {
        Message::Back => {
            session.close_episodes();
            Action::NavigateTo(return_to)
        }
        Message::ToggleLike => match session.toggle_like_current() {
            Some(_) => Action::RefreshLibrary,
            None => Action::None,
        },
        Message::Select(label) => {
            session.select_episode(&label);
            Action::None
        }
        Message::Play => match session.play() {
            Ok(true) => Action::RefreshLibrary,
            Ok(false) => Action::SetStatus("Pick an episode first".into()),
            // The session already put the launch error in the status bar.
            Err(_) => Action::None,
        },
        Message::Retry => match &session.view().episodes {
            Some(view) => Action::OpenAnime(view.anime.clone()),
            None => Action::None,
        },
    }
}

pub fn view<'a>(cs: &'a ColorScheme, state: &'a ViewState) -> Element<'a, Message> {
    let Some(episodes) = &state.episodes else {
        return widgets::empty_state(
            cs,
            icons::icon_film().size(style::TEXT_2XL).color(cs.outline).into(),
            "Nothing selected",
            "Open a show from search or your library.",
        );
    };

    let body: Element<'a, Message> = match &episodes.status {
        EpisodeStatus::Idle | EpisodeStatus::Loading => widgets::empty_state(
            cs,
            icons::icon_clock().size(style::TEXT_2XL).color(cs.outline).into(),
            "Loading episodes...",
            format!("{} episodes of {}", episodes.mode, episodes.anime.title),
        ),
        EpisodeStatus::Failed(error) => column![
            widgets::empty_state::<Message>(
                cs,
                icons::icon_circle_x().size(style::TEXT_2XL).color(cs.error).into(),
                "Could not load episodes",
                error.as_str(),
            ),
            container(
                button(text("Retry").size(style::TEXT_SM))
                    .padding([style::SPACE_SM, style::SPACE_LG])
                    .on_press(Message::Retry)
                    .style(theme::ghost_button(cs)),
            )
            .center_x(Length::Fill),
        ]
        .spacing(style::SPACE_MD)
        .into(),
        EpisodeStatus::Loaded(list) if list.is_empty() => widgets::empty_state(
            cs,
            icons::icon_film().size(style::TEXT_2XL).color(cs.outline).into(),
            format!("No {} episodes", episodes.mode),
            "Try switching the audio mode in the sidebar.",
        ),
        EpisodeStatus::Loaded(_) => {
            widgets::styled_scrollable(episode_grid(cs, episodes), cs)
                .height(Length::Fill)
                .into()
        }
    };

    column![
        header(cs, state, episodes),
        widgets::section_label::<Message>(cs, "EPISODES"),
        body,
    ]
    .spacing(style::SPACE_MD)
    .padding([style::SPACE_LG, style::SPACE_XL])
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn header<'a>(
    cs: &'a ColorScheme,
    state: &'a ViewState,
    episodes: &'a EpisodeView,
) -> Element<'a, Message> {
    let anime = &episodes.anime;

    let back = button(
        row![
            icons::icon_arrow_left().size(style::TEXT_SM),
            text("Back").size(style::TEXT_SM),
        ]
        .spacing(style::SPACE_XS)
        .align_y(Alignment::Center),
    )
    .padding([style::SPACE_XS, style::SPACE_SM])
    .on_press(Message::Back)
    .style(theme::ghost_button(cs));

    let cover = widgets::cover::<Message>(
        cs,
        state.cover(&anime.id),
        &anime.title,
        style::HERO_COVER_WIDTH,
        style::HERO_COVER_HEIGHT,
        style::RADIUS_LG,
    );

    let mut meta = vec![format!("{} episodes", anime.episode_count)];
    let kind = anime.kind.label();
    if !kind.is_empty() {
        meta.insert(0, kind.to_string());
    }
    meta.push(episodes.mode.to_string());

    let watch_label = match &episodes.selected {
        Some(ep) => format!("Watch episode {ep}"),
        None => "Watch".to_string(),
    };
    let watch = button(
        row![
            icons::icon_play().size(style::TEXT_SM),
            text(watch_label).size(style::TEXT_SM),
        ]
        .spacing(style::SPACE_XS)
        .align_y(Alignment::Center),
    )
    .padding([style::SPACE_SM, style::SPACE_LG])
    .on_press_maybe(episodes.selected.is_some().then_some(Message::Play))
    .style(theme::primary_button(cs));

    let info = column![
        back,
        text(anime.title.as_str())
            .size(style::TEXT_2XL)
            .font(style::FONT_HEADING)
            .line_height(style::LINE_HEIGHT_TIGHT),
        text(meta.join("  \u{00B7}  "))
            .size(style::TEXT_SM)
            .color(cs.on_surface_variant)
            .line_height(style::LINE_HEIGHT_NORMAL),
        iced::widget::Space::new().height(Length::Fill),
        row![watch, widgets::like_button(cs, episodes.liked, Message::ToggleLike)]
            .spacing(style::SPACE_SM)
            .align_y(Alignment::Center),
    ]
    .spacing(style::SPACE_SM)
    .width(Length::Fill)
    .height(Length::Fixed(style::HERO_COVER_HEIGHT));

    container(
        row![cover, info]
            .spacing(style::SPACE_LG)
            .align_y(Alignment::Start),
    )
    .padding(style::SPACE_MD)
    .style(theme::card(cs))
    .width(Length::Fill)
    .into()
}

fn episode_grid<'a>(cs: &ColorScheme, episodes: &'a EpisodeView) -> Element<'a, Message> {
    let labels = episodes.episodes();
    let mut grid = column![].spacing(style::SPACE_XS);

    for chunk in labels.chunks(style::EPISODE_COLUMNS) {
        let mut cells: Vec<Element<'a, Message>> = chunk
            .iter()
            .map(|label| {
                let selected = episodes.selected.as_deref() == Some(label.as_str());
                button(text(label.as_str()).size(style::TEXT_SM).center())
                    .width(Length::FillPortion(1))
                    .height(Length::Fixed(style::EPISODE_CELL_HEIGHT))
                    .on_press(Message::Select(label.clone()))
                    .style(theme::filter_chip(selected, cs))
                    .into()
            })
            .collect();
        // Pad the last row so its cells line up with the ones above.
        while cells.len() < style::EPISODE_COLUMNS {
            cells.push(
                iced::widget::Space::new()
                    .width(Length::FillPortion(1))
                    .into(),
            );
        }
        grid = grid.push(row(cells).spacing(style::SPACE_XS));
    }

    grid.into()
}
