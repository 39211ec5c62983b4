use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// The local user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "name", default = "default_display_name")]
    pub display_name: String,
    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_path: Option<PathBuf>,
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            avatar_path: None,
        }
    }
}

impl Profile {
    /// First letter of the display name, used by the avatar placeholder.
    pub fn initial(&self) -> char {
        self.display_name
            .chars()
            .find(|c| !c.is_whitespace())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}

/// Partial profile update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    /// `Some(None)` clears the avatar.
    pub avatar_path: Option<Option<PathBuf>>,
}

impl ProfileUpdate {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn avatar(path: Option<PathBuf>) -> Self {
        Self {
            avatar_path: Some(path),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.avatar_path.is_none()
    }
}

/// Persisted visual theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeKey {
    #[default]
    RoyalIndigo,
    CrimsonBlack,
    NeonCyan,
    IndigoCloud,
    CrystalAzure,
    SoftRose,
}

impl ThemeKey {
    pub const ALL: &[ThemeKey] = &[
        Self::RoyalIndigo,
        Self::CrimsonBlack,
        Self::NeonCyan,
        Self::IndigoCloud,
        Self::CrystalAzure,
        Self::SoftRose,
    ];

    /// Key stored in `settings.json`.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::RoyalIndigo => "royal_indigo",
            Self::CrimsonBlack => "crimson_black",
            Self::NeonCyan => "neon_cyan",
            Self::IndigoCloud => "indigo_cloud",
            Self::CrystalAzure => "crystal_azure",
            Self::SoftRose => "soft_rose",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_key() == key)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RoyalIndigo => "Royal Indigo",
            Self::CrimsonBlack => "Crimson Black",
            Self::NeonCyan => "Neon Cyan",
            Self::IndigoCloud => "Indigo Cloud",
            Self::CrystalAzure => "Crystal Azure",
            Self::SoftRose => "Soft Rose",
        }
    }

    pub fn is_light(self) -> bool {
        matches!(self, Self::CrystalAzure | Self::SoftRose)
    }
}

impl std::fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_keys_roundtrip() {
        for theme in ThemeKey::ALL {
            assert_eq!(ThemeKey::from_key(theme.as_key()), Some(*theme));
        }
        assert_eq!(ThemeKey::from_key("solarized"), None);
        assert_eq!(ThemeKey::default(), ThemeKey::RoyalIndigo);
    }

    #[test]
    fn test_profile_defaults_when_fields_missing() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.initial(), 'G');
    }

    #[test]
    fn test_profile_initial() {
        let profile = Profile {
            display_name: "  ayumi".into(),
            avatar_path: None,
        };
        assert_eq!(profile.initial(), 'A');
    }
}
