//! `.style()` closures for each widget, built from a [`ColorScheme`].
//!
//! Nearly every surface here is a fill, an optional hairline and a corner
//! radius. `panel` and `pressable` build those, so the functions below
//! only decide which tokens apply in which state.

use iced::widget::{button, container, pick_list, scrollable, text_input};
use iced::{Background, Border, Color, Shadow, Theme};

use crate::style;

use super::ColorScheme;

fn edge(outline: Option<Color>, width: f32, radius: f32) -> Border {
    Border {
        color: outline.unwrap_or(Color::TRANSPARENT),
        width: if outline.is_some() { width } else { 0.0 },
        radius: radius.into(),
    }
}

fn panel(fill: Color, ink: Option<Color>, outline: Option<Color>, radius: f32) -> container::Style {
    container::Style {
        text_color: ink,
        background: Some(Background::Color(fill)),
        border: edge(outline, 1.0, radius),
        ..Default::default()
    }
}

fn pressable(fill: Option<Color>, ink: Color, outline: Option<Color>, radius: f32) -> button::Style {
    button::Style {
        background: fill.map(Background::Color),
        text_color: ink,
        border: edge(outline, 1.0, radius),
        ..Default::default()
    }
}

/// Fill and ink of a quiet button: bare until hovered.
fn quiet(cs: &ColorScheme, status: button::Status) -> (Option<Color>, Color) {
    if status == button::Status::Hovered {
        (Some(cs.surface_bright), cs.on_surface)
    } else {
        (None, cs.on_surface_variant)
    }
}

pub fn card(cs: &ColorScheme) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| panel(cs.surface_container, None, Some(cs.outline_variant), style::RADIUS_LG)
}

pub fn status_bar(cs: &ColorScheme) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| {
        panel(
            cs.surface_container_low,
            Some(cs.on_surface_variant),
            Some(cs.outline_variant),
            0.0,
        )
    }
}

pub fn sidebar_bg(cs: &ColorScheme) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| panel(cs.surface_container_low, None, None, 0.0)
}

/// Sidebar entry; the current page keeps the tonal fill.
pub fn nav_item(
    active: bool,
    cs: &ColorScheme,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    let cs = *cs;
    move |_, status| {
        let (fill, ink) = if active {
            (Some(cs.primary_container), cs.on_primary_container)
        } else {
            quiet(&cs, status)
        };
        pressable(fill, ink, None, style::RADIUS_MD)
    }
}

/// Category tab, also used for the cells of the episode grid.
pub fn filter_chip(
    selected: bool,
    cs: &ColorScheme,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    let cs = *cs;
    move |_, status| {
        if selected {
            pressable(Some(cs.primary), cs.on_primary, Some(cs.primary), style::CHIP_RADIUS)
        } else {
            let (fill, ink) = quiet(&cs, status);
            pressable(fill, ink, Some(cs.outline_variant), style::CHIP_RADIUS)
        }
    }
}

/// Row in a result or library list.
pub fn list_item(cs: &ColorScheme) -> impl Fn(&Theme, button::Status) -> button::Style {
    let cs = *cs;
    move |_, status| {
        let fill = match status {
            button::Status::Hovered => cs.surface_bright,
            _ => cs.surface_container,
        };
        pressable(Some(fill), cs.on_surface, Some(cs.outline_variant), style::RADIUS_MD)
    }
}

pub fn primary_button(cs: &ColorScheme) -> impl Fn(&Theme, button::Status) -> button::Style {
    let cs = *cs;
    move |_, status| {
        let (fill, ink) = match status {
            button::Status::Disabled => (cs.outline_variant, cs.outline),
            button::Status::Hovered => (cs.primary_hover, cs.on_primary),
            _ => (cs.primary, cs.on_primary),
        };
        pressable(Some(fill), ink, None, style::RADIUS_MD)
    }
}

pub fn ghost_button(cs: &ColorScheme) -> impl Fn(&Theme, button::Status) -> button::Style {
    let cs = *cs;
    move |_, status| {
        let (fill, ink) = quiet(&cs, status);
        pressable(fill, ink, Some(cs.outline_variant), style::RADIUS_MD)
    }
}

/// Round, borderless; only the hover fill shows.
pub fn icon_button(cs: &ColorScheme) -> impl Fn(&Theme, button::Status) -> button::Style {
    let cs = *cs;
    move |_, status| {
        let (fill, _) = quiet(&cs, status);
        pressable(fill, cs.on_surface_variant, None, style::RADIUS_FULL)
    }
}

fn field(cs: &ColorScheme, fill: Color, border: Border) -> text_input::Style {
    text_input::Style {
        background: Background::Color(fill),
        border,
        icon: cs.on_surface_variant,
        placeholder: cs.outline,
        value: cs.on_surface,
        selection: cs.primary,
    }
}

pub fn text_input_style(
    cs: &ColorScheme,
) -> impl Fn(&Theme, text_input::Status) -> text_input::Style {
    let cs = *cs;
    move |_, status| {
        let outline = match status {
            text_input::Status::Focused { .. } => cs.primary,
            text_input::Status::Hovered => cs.outline,
            _ => cs.outline_variant,
        };
        field(&cs, cs.surface_container, edge(Some(outline), 1.0, style::RADIUS_MD))
    }
}

/// For an input sitting inside [`search_bar`], which draws the frame.
pub fn text_input_borderless(
    cs: &ColorScheme,
) -> impl Fn(&Theme, text_input::Status) -> text_input::Style {
    let cs = *cs;
    move |_, _| field(&cs, Color::TRANSPARENT, edge(None, 0.0, 0.0))
}

pub fn search_bar(cs: &ColorScheme) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| panel(cs.surface_container, None, Some(cs.outline_variant), style::RADIUS_FULL)
}

pub fn pick_list_style(cs: &ColorScheme) -> impl Fn(&Theme, pick_list::Status) -> pick_list::Style {
    let cs = *cs;
    move |_, status| {
        let (outline, handle_color) = match status {
            pick_list::Status::Opened { .. } => (cs.primary, cs.primary),
            pick_list::Status::Hovered => (cs.outline, cs.on_surface),
            _ => (cs.outline_variant, cs.on_surface_variant),
        };
        pick_list::Style {
            text_color: cs.on_surface,
            placeholder_color: cs.on_surface_variant,
            handle_color,
            background: Background::Color(cs.surface_container),
            border: edge(Some(outline), 1.0, style::RADIUS_MD),
        }
    }
}

/// Shown behind a cover until its image is ready.
pub fn cover_placeholder(cs: &ColorScheme, radius: f32) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| {
        panel(
            cs.surface_container_high,
            Some(cs.outline),
            Some(cs.outline_variant),
            radius,
        )
    }
}

pub fn avatar(cs: &ColorScheme) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| panel(cs.primary, Some(cs.on_primary), None, style::RADIUS_FULL)
}

pub fn badge(cs: &ColorScheme) -> impl Fn(&Theme) -> container::Style {
    let cs = *cs;
    move |_| {
        panel(
            cs.primary_container,
            Some(cs.on_primary_container),
            None,
            style::RADIUS_SM,
        )
    }
}

/// Tile drawn in the colors of the theme it selects. The current theme is
/// ringed in the app's own accent.
pub fn theme_tile(
    preview: &ColorScheme,
    active: bool,
    cs: &ColorScheme,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    let preview = *preview;
    let ring = cs.primary;
    move |_, status| {
        let (outline, width) = match (active, status) {
            (true, _) => (ring, 2.0),
            (false, button::Status::Hovered) => (preview.primary, 1.0),
            (false, _) => (preview.outline_variant, 1.0),
        };
        button::Style {
            border: edge(Some(outline), width, style::RADIUS_LG),
            ..pressable(Some(preview.surface_container), preview.on_surface, None, 0.0)
        }
    }
}

/// Thin scroller that only darkens while hovered or dragged.
pub fn overlay_scrollbar(
    cs: &ColorScheme,
) -> impl Fn(&Theme, scrollable::Status) -> scrollable::Style {
    let cs = *cs;
    move |_, status| {
        let thumb = match status {
            scrollable::Status::Dragged { .. } => cs.primary.scale_alpha(0.7),
            scrollable::Status::Hovered {
                is_vertical_scrollbar_hovered: true,
                ..
            } => cs.on_surface.scale_alpha(0.5),
            scrollable::Status::Hovered { .. } => cs.on_surface.scale_alpha(0.25),
            _ => cs.on_surface.scale_alpha(0.15),
        };
        let rail = scrollable::Rail {
            background: None,
            border: Border::default(),
            scroller: scrollable::Scroller {
                background: Background::Color(thumb),
                border: edge(None, 0.0, style::RADIUS_FULL),
            },
        };

        scrollable::Style {
            container: container::Style::default(),
            vertical_rail: rail,
            horizontal_rail: rail,
            gap: None,
            auto_scroll: scrollable::AutoScroll {
                background: Background::Color(Color::TRANSPARENT),
                border: Border::default(),
                shadow: Shadow::default(),
                icon: cs.on_surface,
            },
        }
    }
}
