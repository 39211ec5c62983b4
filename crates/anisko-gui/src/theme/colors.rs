//! Semantic color tokens for each selectable theme.

use iced::{color, Color};

use anisko_core::models::ThemeKey;

/// The ten swatches a theme is defined by.
struct Swatch {
    accent: Color,
    accent_alt: Color,
    background: Color,
    card: Color,
    border: Color,
    sidebar: Color,
    pill: Color,
    text: Color,
    text_dim: Color,
    hover: Color,
}

fn swatch(key: ThemeKey) -> Swatch {
    match key {
        ThemeKey::RoyalIndigo => Swatch {
            accent: color!(0x7c3aed),
            accent_alt: color!(0xc084fc),
            background: color!(0x0c0c18),
            card: color!(0x12121e),
            border: color!(0x1c1c2e),
            sidebar: color!(0x0f0f1c),
            pill: color!(0x1a1030),
            text: color!(0xdde0f0),
            text_dim: color!(0x444466),
            hover: color!(0x22223a),
        },
        ThemeKey::CrimsonBlack => Swatch {
            accent: color!(0xdc2626),
            accent_alt: color!(0xf87171),
            background: color!(0x100808),
            card: color!(0x140d0d),
            border: color!(0x2a1414),
            sidebar: color!(0x0e0808),
            pill: color!(0x2a0d0d),
            text: color!(0xf0dede),
            text_dim: color!(0x885555),
            hover: color!(0x2a1414),
        },
        ThemeKey::NeonCyan => Swatch {
            accent: color!(0x0891b2),
            accent_alt: color!(0x22d3ee),
            background: color!(0x06090c),
            card: color!(0x0a1014),
            border: color!(0x0f2430),
            sidebar: color!(0x080d10),
            pill: color!(0x082030),
            text: color!(0xcceeff),
            text_dim: color!(0x336677),
            hover: color!(0x0f2430),
        },
        ThemeKey::IndigoCloud => Swatch {
            accent: color!(0x6366f1),
            accent_alt: color!(0xa5b4fc),
            background: color!(0x0c0c1a),
            card: color!(0x101022),
            border: color!(0x1a1a30),
            sidebar: color!(0x0e0e1a),
            pill: color!(0x131330),
            text: color!(0xdde2f8),
            text_dim: color!(0x44447a),
            hover: color!(0x1a1a30),
        },
        ThemeKey::CrystalAzure => Swatch {
            accent: color!(0x2563eb),
            accent_alt: color!(0x1d4ed8),
            background: color!(0xeef2ff),
            card: color!(0xffffff),
            border: color!(0xc7d2fe),
            sidebar: color!(0xe0e7ff),
            pill: color!(0xdbeafe),
            text: color!(0x1e1b4b),
            text_dim: color!(0x4c4994),
            hover: color!(0xc7d2fe),
        },
        ThemeKey::SoftRose => Swatch {
            accent: color!(0xe11d48),
            accent_alt: color!(0xbe123c),
            background: color!(0xfff1f2),
            card: color!(0xffffff),
            border: color!(0xfecdd3),
            sidebar: color!(0xffe4e6),
            pill: color!(0xfce7f3),
            text: color!(0x4c0519),
            text_dim: color!(0x9f1239),
            hover: color!(0xfecdd3),
        },
    }
}

/// All semantic color tokens used by the style functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub surface: Color,
    pub surface_container_low: Color,
    pub surface_container: Color,
    pub surface_container_high: Color,
    pub surface_bright: Color,

    pub on_surface: Color,
    pub on_surface_variant: Color,
    pub outline: Color,
    pub outline_variant: Color,

    pub primary: Color,
    pub primary_hover: Color,
    pub on_primary: Color,
    pub primary_container: Color,
    pub on_primary_container: Color,

    pub error: Color,
    pub success: Color,
    pub warning: Color,
}

impl ColorScheme {
    pub fn for_key(key: ThemeKey) -> Self {
        let s = swatch(key);
        let light = key.is_light();
        Self {
            surface: s.background,
            surface_container_low: s.sidebar,
            surface_container: s.card,
            surface_container_high: s.pill,
            surface_bright: s.hover,

            on_surface: s.text,
            on_surface_variant: mix(s.text, s.text_dim, 0.45),
            outline: s.text_dim,
            outline_variant: s.border,

            primary: s.accent,
            primary_hover: s.accent_alt,
            on_primary: Color::WHITE,
            primary_container: s.pill,
            on_primary_container: if light { s.accent } else { s.accent_alt },

            error: if light { color!(0xb91c1c) } else { color!(0xf87171) },
            success: if light { color!(0x15803d) } else { color!(0x4ade80) },
            warning: if light { color!(0xb45309) } else { color!(0xfbbf24) },
        }
    }
}

/// Linear blend from `a` towards `b`.
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color {
        r: a.r + (b.r - a.r) * t,
        g: a.g + (b.g - a.g) * t,
        b: a.b + (b.b - a.b) * t,
        a: a.a + (b.a - a.a) * t,
    }
}
