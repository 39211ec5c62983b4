//! Spacing, type scale and layout sizes shared by every screen.
//!
//! Spacing sits on a 4px grid.

// ── Spacing ──────────────────────────────────────────────────────

pub const SPACE_XXS: f32 = 2.0;
pub const SPACE_XS: f32 = 4.0;
pub const SPACE_SM: f32 = 8.0;
pub const SPACE_MD: f32 = 12.0;
pub const SPACE_LG: f32 = 16.0;
pub const SPACE_XL: f32 = 24.0;

// ── Typography ───────────────────────────────────────────────────

pub const TEXT_XS: f32 = 11.0;
pub const TEXT_SM: f32 = 12.0;
pub const TEXT_BASE: f32 = 14.0;
pub const TEXT_LG: f32 = 16.0;
pub const TEXT_XL: f32 = 22.0;
pub const TEXT_2XL: f32 = 28.0;

pub const LINE_HEIGHT_TIGHT: f32 = 1.2;
pub const LINE_HEIGHT_NORMAL: f32 = 1.45;
pub const LINE_HEIGHT_LOOSE: f32 = 1.6;

pub const FONT_HEADING: iced::Font = iced::Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Semibold,
    stretch: iced::font::Stretch::Normal,
    style: iced::font::Style::Normal,
};

// ── Layout ───────────────────────────────────────────────────────

pub const SIDEBAR_WIDTH: f32 = 200.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;
pub const THUMB_WIDTH: f32 = 48.0;
pub const THUMB_HEIGHT: f32 = 68.0;
pub const HERO_COVER_WIDTH: f32 = 160.0;
pub const HERO_COVER_HEIGHT: f32 = 228.0;
pub const AVATAR_SIZE: f32 = 88.0;
pub const CONTENT_MAX_WIDTH: f32 = 920.0;

pub const NAV_ICON_SIZE: f32 = 18.0;

pub const CHIP_HEIGHT: f32 = 32.0;
pub const CHIP_RADIUS: f32 = 8.0;

pub const INPUT_PADDING: [f32; 2] = [SPACE_SM, SPACE_MD];

/// Episode buttons per grid row.
pub const EPISODE_COLUMNS: usize = 9;
pub const EPISODE_CELL_HEIGHT: f32 = 36.0;

/// Theme tiles per row on the profile page.
pub const THEME_COLUMNS: usize = 3;
pub const THEME_TILE_HEIGHT: f32 = 64.0;

// ── Border radii ─────────────────────────────────────────────────

pub const RADIUS_SM: f32 = 4.0;
pub const RADIUS_MD: f32 = 8.0;
pub const RADIUS_LG: f32 = 12.0;
pub const RADIUS_FULL: f32 = 9999.0;
