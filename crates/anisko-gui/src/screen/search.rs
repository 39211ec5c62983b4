use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Element, Length};
use lucide_icons::iced as icons;

use anisko_core::filter::Category;
use anisko_core::models::AnimeSummary;
use anisko_runtime::{SearchStatus, ViewState};

use crate::app::{self, AppSession};
use crate::screen::library::Library;
use crate::screen::Action;
use crate::style;
use crate::theme::{self, ColorScheme};
use crate::widgets;

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    Submit,
    Clear,
    CategorySelected(Category),
    Open(AnimeSummary),
    ToggleLike(AnimeSummary),
}

pub fn update(session: &mut AppSession, message: Message) -> Action {
    match message {
        Message::QueryChanged(query) => {
            session.set_query(query);
            Action::None
        }
        Message::Submit => match session.submit_search() {
            Some(pending) => Action::RunTask(app::fetch(pending)),
            None => Action::None,
        },
        Message::Clear => {
            session.cancel_search();
            Action::None
        }
        Message::CategorySelected(category) => {
            session.set_category(category);
            Action::RunTask(app::fetch_all(session.request_covers()))
        }
        Message::Open(anime) => Action::OpenAnime(anime),
        Message::ToggleLike(anime) => {
            session.toggle_like(&anime);
            Action::RefreshLibrary
        }
    }
}

pub fn view<'a>(
    cs: &'a ColorScheme,
    state: &'a ViewState,
    library: &'a Library,
) -> Element<'a, Message> {
    let body: Element<'a, Message> = match &state.search {
        SearchStatus::Idle => widgets::empty_state(
            cs,
            icons::icon_search().size(style::TEXT_2XL).color(cs.outline).into(),
            "Search the catalog",
            "Type a title and press Enter.",
        ),
        SearchStatus::Loading => widgets::empty_state(
            cs,
            icons::icon_clock().size(style::TEXT_2XL).color(cs.outline).into(),
            "Searching...",
            format!("Looking up \"{}\"", state.query),
        ),
        SearchStatus::Failed(error) => widgets::empty_state(
            cs,
            icons::icon_circle_x().size(style::TEXT_2XL).color(cs.error).into(),
            "Search failed",
            error.as_str(),
        ),
        SearchStatus::Loaded(results) if results.is_empty() => widgets::empty_state(
            cs,
            icons::icon_search().size(style::TEXT_2XL).color(cs.outline).into(),
            "No results",
            format!("Nothing matched \"{}\". Try another spelling.", state.query),
        ),
        SearchStatus::Loaded(_) => column![
            category_bar(cs, state),
            result_list(cs, state, library),
        ]
        .spacing(style::SPACE_SM)
        .height(Length::Fill)
        .into(),
    };

    column![search_header(cs, state), body]
        .spacing(style::SPACE_SM)
        .padding([style::SPACE_LG, style::SPACE_XL])
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn search_header<'a>(cs: &ColorScheme, state: &'a ViewState) -> Element<'a, Message> {
    let search_icon = icons::icon_search()
        .size(style::TEXT_BASE)
        .color(cs.on_surface_variant);

    let input = text_input("Search anime...", &state.query)
        .on_input(Message::QueryChanged)
        .on_submit(Message::Submit)
        .size(style::TEXT_BASE)
        .padding([style::SPACE_XS, style::SPACE_SM])
        .width(Length::Fill)
        .style(theme::text_input_borderless(cs));

    let mut bar = row![search_icon, input]
        .spacing(style::SPACE_SM)
        .align_y(Alignment::Center);

    if !state.query.is_empty() {
        let clear_size = style::TEXT_SM + style::SPACE_XS * 2.0;
        bar = bar.push(
            button(
                container(icons::icon_x().size(style::TEXT_SM))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill),
            )
            .on_press(Message::Clear)
            .padding(0)
            .width(Length::Fixed(clear_size))
            .height(Length::Fixed(clear_size))
            .style(theme::icon_button(cs)),
        );
    }

    let submit = button(
        text("Search")
            .size(style::TEXT_SM)
            .line_height(style::LINE_HEIGHT_NORMAL),
    )
    .padding([style::SPACE_SM, style::SPACE_LG])
    .on_press_maybe((!state.is_searching()).then_some(Message::Submit))
    .style(theme::primary_button(cs));

    row![
        container(bar)
            .style(theme::search_bar(cs))
            .padding([style::SPACE_XS, style::SPACE_MD])
            .width(Length::Fill),
        submit,
    ]
    .spacing(style::SPACE_SM)
    .align_y(Alignment::Center)
    .into()
}

fn category_bar<'a>(cs: &ColorScheme, state: &ViewState) -> Element<'a, Message> {
    let chips: Vec<Element<'a, Message>> = state
        .counts()
        .into_iter()
        .map(|(category, count)| {
            let selected = state.category == category;
            let mut content = row![].spacing(style::SPACE_XXS).align_y(Alignment::Center);
            if selected {
                content = content.push(icons::icon_check().size(style::TEXT_XS));
            }
            content = content.push(
                text(format!("{category} ({count})"))
                    .size(style::TEXT_XS)
                    .line_height(style::LINE_HEIGHT_LOOSE),
            );
            button(container(content).center_y(Length::Fill))
                .height(Length::Fixed(style::CHIP_HEIGHT))
                .padding([style::SPACE_XS, style::SPACE_MD])
                .on_press(Message::CategorySelected(category))
                .style(theme::filter_chip(selected, cs))
                .into()
        })
        .collect();

    row(chips).spacing(style::SPACE_SM).into()
}

fn result_list<'a>(
    cs: &'a ColorScheme,
    state: &'a ViewState,
    library: &'a Library,
) -> Element<'a, Message> {
    let visible = state.visible_results();
    if visible.is_empty() {
        return widgets::empty_state(
            cs,
            icons::icon_list().size(style::TEXT_2XL).color(cs.outline).into(),
            format!("No {} in these results", state.category.to_string().to_lowercase()),
            "Pick another tab above.",
        );
    }

    let rows = visible.into_iter().map(|anime| {
        widgets::anime_row(
            cs,
            anime,
            state.cover(&anime.id),
            library.is_liked(&anime.id),
            None,
            Message::Open(anime.clone()),
            Message::ToggleLike(anime.clone()),
        )
    });

    widgets::styled_scrollable(column(rows).spacing(style::SPACE_XS), cs)
        .height(Length::Fill)
        .into()
}
