use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use anisko_core::models::AnimeSummary;
use anisko_runtime::CoverState;

use crate::style;
use crate::theme::{self, ColorScheme};
use crate::widgets;

/// One show in a result or library list: thumbnail, title, kind and
/// episode count, with a like toggle on the right.
///
/// `detail` replaces the episode count when set (the history list shows
/// the last watched episode there).
pub fn anime_row<'a, Message: Clone + 'static>(
    cs: &ColorScheme,
    anime: &'a AnimeSummary,
    cover: Option<&CoverState>,
    liked: bool,
    detail: Option<String>,
    on_open: Message,
    on_like: Message,
) -> Element<'a, Message> {
    let thumb = widgets::cover::<Message>(
        cs,
        cover,
        &anime.title,
        style::THUMB_WIDTH,
        style::THUMB_HEIGHT,
        style::RADIUS_SM,
    );

    let meta = detail.unwrap_or_else(|| match anime.episode_count {
        0 => "No episodes yet".to_string(),
        1 => "1 episode".to_string(),
        n => format!("{n} episodes"),
    });

    let mut meta_row = row![].spacing(style::SPACE_SM).align_y(Alignment::Center);
    let kind = anime.kind.label();
    if !kind.is_empty() {
        meta_row = meta_row.push(
            container(
                text(kind)
                    .size(style::TEXT_XS)
                    .line_height(style::LINE_HEIGHT_NORMAL),
            )
            .padding([style::SPACE_XXS, style::SPACE_SM])
            .style(theme::badge(cs)),
        );
    }
    meta_row = meta_row.push(
        text(meta)
            .size(style::TEXT_XS)
            .color(cs.outline)
            .line_height(style::LINE_HEIGHT_LOOSE),
    );

    let info = column![
        text(anime.title.as_str())
            .size(style::TEXT_BASE)
            .font(style::FONT_HEADING)
            .line_height(style::LINE_HEIGHT_NORMAL)
            .wrapping(text::Wrapping::None),
        meta_row,
    ]
    .spacing(style::SPACE_XS)
    .width(Length::Fill)
    .clip(true);

    let content = row![thumb, info, widgets::like_button(cs, liked, on_like)]
        .spacing(style::SPACE_MD)
        .align_y(Alignment::Center);

    button(content)
        .width(Length::Fill)
        .padding([style::SPACE_XS, style::SPACE_MD])
        .on_press(on_open)
        .style(theme::list_item(cs))
        .into()
}
