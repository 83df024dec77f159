// The per-request user intent: a description plus three preferences.
//
// Preferences are closed enums. The core assumes they are valid; callers
// that accept free text (the CLI) go through `parse_lenient`, which maps
// anything unrecognized to `Auto` and logs it.

use crate::error::UnknownPreference;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempoPref {
    #[default]
    Auto,
    Slow,
    Medium,
    Fast,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexturePref {
    #[default]
    Auto,
    Electronic,
    Acoustic,
}

/// Accepted for forward compatibility; no stage reads it yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraPref {
    #[default]
    Auto,
    Retro,
    Modern,
}

macro_rules! preference {
    ($ty:ident, $kind:literal, { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            pub const NAMES: &'static [&'static str] = &[$($name),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            /// Parse case-insensitively; unknown or empty input becomes `Auto`.
            pub fn parse_lenient(value: &str) -> Self {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return $ty::Auto;
                }
                trimmed.parse().unwrap_or_else(|e: UnknownPreference| {
                    warn!("{e}, using auto");
                    $ty::Auto
                })
            }
        }

        impl FromStr for $ty {
            type Err = UnknownPreference;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(UnknownPreference {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

preference!(TempoPref, "tempo", {
    "auto" => Auto,
    "slow" => Slow,
    "medium" => Medium,
    "fast" => Fast,
});

preference!(TexturePref, "texture", {
    "auto" => Auto,
    "electronic" => Electronic,
    "acoustic" => Acoustic,
});

preference!(EraPref, "era", {
    "auto" => Auto,
    "retro" => Retro,
    "modern" => Modern,
});

/// One request: what the user described and how they want it nudged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIntent {
    pub description: String,
    #[serde(default)]
    pub tempo: TempoPref,
    #[serde(default)]
    pub texture: TexturePref,
    #[serde(default)]
    pub era: EraPref,
}

impl UserIntent {
    /// An intent with every preference set to `Auto`.
    pub fn new(description: impl Into<String>) -> Self {
        UserIntent {
            description: description.into(),
            tempo: TempoPref::Auto,
            texture: TexturePref::Auto,
            era: EraPref::Auto,
        }
    }

    pub fn with_tempo(mut self, tempo: TempoPref) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn with_texture(mut self, texture: TexturePref) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_era(mut self, era: EraPref) -> Self {
        self.era = era;
        self
    }
}
