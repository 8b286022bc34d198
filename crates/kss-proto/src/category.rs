//! Detection category table.
//!
//! The sensor reports detections under a small fixed set of category keys.
//! We keep this closed: an unknown key is a protocol error surfaced at parse
//! time, not silently mapped to a placeholder string.

use serde::{Deserialize, Serialize};

/// One detection category the sensor can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Fire,
    Smoke,
    Pot,
}

/// All categories, in display order.
pub const ALL_CATEGORIES: [EventCategory; 3] =
    [EventCategory::Fire, EventCategory::Smoke, EventCategory::Pot];

impl EventCategory {
    /// Wire key as sent by the sensor.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Smoke => "smoke",
            Self::Pot => "pot",
        }
    }

    /// Human-readable display name. Total over the enum.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Smoke => "Smoke",
            Self::Pot => "Pot on stove",
        }
    }

    /// Parse a wire key. Unknown keys are rejected.
    pub fn parse(key: &str) -> anyhow::Result<Self> {
        match key {
            "fire" => Ok(Self::Fire),
            "smoke" => Ok(Self::Smoke),
            "pot" => Ok(Self::Pot),
            other => anyhow::bail!("unknown detection category: {:?}", other),
        }
    }

    /// Display label for a wire key, or the raw key when the server sends a
    /// category this build does not know. Logged once by callers.
    pub fn label_for_key(key: &str) -> String {
        match Self::parse(key) {
            Ok(cat) => cat.label().to_string(),
            Err(_) => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keys() {
        assert_eq!(EventCategory::parse("fire").unwrap(), EventCategory::Fire);
        assert_eq!(EventCategory::parse("smoke").unwrap(), EventCategory::Smoke);
        assert_eq!(EventCategory::parse("pot").unwrap(), EventCategory::Pot);
    }

    #[test]
    fn test_parse_unknown_key_rejected() {
        assert!(EventCategory::parse("toaster").is_err());
        assert!(EventCategory::parse("").is_err());
    }

    #[test]
    fn test_key_label_round_trip() {
        for cat in ALL_CATEGORIES {
            assert_eq!(EventCategory::parse(cat.key()).unwrap(), cat);
            assert!(!cat.label().is_empty());
        }
    }

    #[test]
    fn test_label_for_unknown_key_is_raw() {
        assert_eq!(EventCategory::label_for_key("kettle"), "kettle");
        assert_eq!(EventCategory::label_for_key("fire"), "Fire");
    }
}
