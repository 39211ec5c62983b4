//! Built-in themes, one per [`ThemeKey`].

mod catalog;
mod colors;

pub use catalog::*;
pub use colors::*;

use iced::Theme;

use anisko_core::models::ThemeKey;

/// Build the iced Theme for a color scheme.
pub fn build_theme(key: ThemeKey, cs: &ColorScheme) -> Theme {
    use iced::theme::Palette;

    Theme::custom(
        key.name(),
        Palette {
            background: cs.surface,
            text: cs.on_surface,
            primary: cs.primary,
            success: cs.success,
            warning: cs.warning,
            danger: cs.error,
        },
    )
}
