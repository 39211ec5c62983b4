pub mod anime_row;
pub mod cover;
pub mod empty_state;

pub use anime_row::anime_row;
pub use cover::cover;
pub use empty_state::empty_state;

use iced::widget::{button, scrollable, text};
use iced::Element;
use lucide_icons::iced as icons;

use crate::style;
use crate::theme::{self, ColorScheme};

/// A scrollable with consistent direction and style across the application.
pub fn styled_scrollable<'a, Message: 'a>(
    content: impl Into<Element<'a, Message>>,
    cs: &ColorScheme,
) -> scrollable::Scrollable<'a, Message> {
    scrollable(content)
        .direction(scrollable::Direction::Vertical(
            scrollable::Scrollbar::new()
                .width(6)
                .scroller_width(4)
                .margin(2),
        ))
        .style(theme::overlay_scrollbar(cs))
}

/// Heart toggle; filled with the accent color when liked.
pub fn like_button<'a, Message: Clone + 'a>(
    cs: &ColorScheme,
    liked: bool,
    on_press: Message,
) -> Element<'a, Message> {
    let icon = if liked {
        icons::icon_heart().color(cs.primary)
    } else {
        icons::icon_heart().color(cs.outline)
    };
    button(icon.size(style::TEXT_LG).center())
        .padding(style::SPACE_SM)
        .on_press(on_press)
        .style(theme::icon_button(cs))
        .into()
}

/// Small uppercase caption above a section.
pub fn section_label<'a, Message: 'a>(cs: &ColorScheme, label: &'a str) -> Element<'a, Message> {
    text(label)
        .size(style::TEXT_XS)
        .font(style::FONT_HEADING)
        .color(cs.outline)
        .line_height(style::LINE_HEIGHT_LOOSE)
        .into()
}
