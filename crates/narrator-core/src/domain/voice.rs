//! The closed set of narration voices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A prebuilt synthesis voice.
///
/// Each voice stands for a character archetype used when casting a page.
/// The value is only a selector passed to the speech synthesizer; no
/// behavior hangs off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    /// Adult women, heroines, gentle or maternal tones.
    Kore,
    /// Children, teenagers, comic relief, hyperactive characters.
    Puck,
    /// Adult men, mentors, villains, deep or epic voices.
    Charon,
    /// Hoarse voices, monsters, rough warriors, impact shouts.
    Fenrir,
    /// Poetic scene narration when the focus is the setting.
    Zephyr,
}

impl Voice {
    /// Every voice, in casting-guide order.
    pub const ALL: [Self; 5] = [
        Self::Charon,
        Self::Kore,
        Self::Fenrir,
        Self::Puck,
        Self::Zephyr,
    ];

    /// Voice used when neither the listener nor the unit picked one.
    pub const FALLBACK: Self = Self::Zephyr;

    /// The provider-side voice name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kore => "Kore",
            Self::Puck => "Puck",
            Self::Charon => "Charon",
            Self::Fenrir => "Fenrir",
            Self::Zephyr => "Zephyr",
        }
    }

    /// Short description of the archetype this voice is cast for.
    pub const fn archetype(self) -> &'static str {
        match self {
            Self::Kore => "warm female: adult women, heroines, gentle tones",
            Self::Puck => "youthful: children, teenagers, comic relief",
            Self::Charon => "authoritative male: mentors, villains, epic voices",
            Self::Fenrir => "gruff: monsters, rough warriors, shouts",
            Self::Zephyr => "neutral poetic: scene and setting narration",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a known voice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown voice '{0}' (expected one of Kore, Puck, Charon, Fenrir, Zephyr)")]
pub struct UnknownVoice(pub String);

impl FromStr for Voice {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|voice| voice.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVoice(trimmed.to_string()))
    }
}

/// Pick the voice a unit should be spoken with.
///
/// A listener's global selection always wins over the unit's casting;
/// without one the unit's preference is used, then [`Voice::FALLBACK`].
pub fn effective_voice(selected: Option<Voice>, unit_preference: Option<Voice>) -> Voice {
    selected.or(unit_preference).unwrap_or(Voice::FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("charon".parse::<Voice>(), Ok(Voice::Charon));
        assert_eq!(" KORE ".parse::<Voice>(), Ok(Voice::Kore));
        assert!("alloy".parse::<Voice>().is_err());
    }

    #[test]
    fn serializes_as_provider_name() {
        let json = serde_json::to_string(&Voice::Fenrir).unwrap();
        assert_eq!(json, "\"Fenrir\"");
        let voice: Voice = serde_json::from_str("\"Puck\"").unwrap();
        assert_eq!(voice, Voice::Puck);
    }

    #[test]
    fn global_selection_overrides_unit_preference() {
        assert_eq!(
            effective_voice(Some(Voice::Kore), Some(Voice::Fenrir)),
            Voice::Kore
        );
        assert_eq!(effective_voice(None, Some(Voice::Fenrir)), Voice::Fenrir);
        assert_eq!(effective_voice(None, None), Voice::FALLBACK);
    }

    #[test]
    fn display_matches_name() {
        for voice in Voice::ALL {
            assert_eq!(voice.to_string(), voice.name());
        }
    }
}
