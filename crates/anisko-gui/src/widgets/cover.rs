use iced::widget::container;
use iced::{ContentFit, Element, Length};

use anisko_runtime::CoverState;

use crate::style;
use crate::theme::{self, ColorScheme};

/// Render a cover image with rounded corners, or a styled placeholder.
///
/// The frame keeps the placeholder background so a blank or broken image
/// still shows where the cover belongs. Shows without a cover get the
/// first letter of their title.
pub fn cover<'a, Message: 'static>(
    cs: &ColorScheme,
    state: Option<&CoverState>,
    title: &str,
    width: f32,
    height: f32,
    radius: f32,
) -> Element<'a, Message> {
    let icon_size = if width <= style::THUMB_WIDTH {
        style::TEXT_BASE
    } else {
        style::TEXT_2XL
    };
    let placeholder: Element<'a, Message> = match state {
        Some(CoverState::Loaded(path)) => {
            return container(
                iced::widget::image(path.as_path())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .content_fit(ContentFit::Cover)
                    .border_radius(radius),
            )
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .style(theme::cover_placeholder(cs, radius))
            .into();
        }
        Some(CoverState::Loading) => lucide_icons::iced::icon_film()
            .size(icon_size)
            .color(cs.outline)
            .center()
            .into(),
        Some(CoverState::Failed) | None => match initial(title) {
            Some(letter) => iced::widget::text(letter)
                .size(icon_size)
                .font(style::FONT_HEADING)
                .color(cs.outline)
                .center()
                .into(),
            None => lucide_icons::iced::icon_film()
                .size(icon_size)
                .color(cs.outline)
                .center()
                .into(),
        },
    };

    container(placeholder)
        .width(Length::Fixed(width))
        .height(Length::Fixed(height))
        .center_x(Length::Fixed(width))
        .center_y(Length::Fixed(height))
        .style(theme::cover_placeholder(cs, radius))
        .into()
}

/// First letter or digit of `title`, uppercased.
fn initial(title: &str) -> Option<String> {
    title
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().to_string())
}
