//! Detection preferences — the server-side settings payload plus the
//! locally persisted display settings.
//!
//! The server half travels as one JSON document over
//! `GET/POST /api/kss/preferences`. The theme flag never leaves the device;
//! it is stored beside the rest of the app data as `settings.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const THRESHOLD_MIN_SECS: u8 = 0;
pub const THRESHOLD_MAX_SECS: u8 = 10;
pub const PRECISION_MIN_PCT: u8 = 50;
pub const PRECISION_MAX_PCT: u8 = 100;

/// Per-category detection config. Keyed uniquely by `event_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeConfig {
    /// Category key ("fire", "smoke", ...).
    pub event_name: String,
    pub important: bool,
    /// Minimum confidence percentage for this category to be reported as
    /// important, 50–100.
    pub precision_threshold: u8,
}

/// The server-side preferences document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Seconds of sustained detection before an event opens, 0–10.
    #[serde(default)]
    pub input_threshold: u8,
    /// Seconds of quiet before an event closes, 0–10.
    #[serde(default)]
    pub output_threshold: u8,
    #[serde(default)]
    pub events_config: Vec<EventTypeConfig>,
}

impl Preferences {
    pub fn set_input_threshold(&mut self, secs: u8) {
        self.input_threshold = secs.clamp(THRESHOLD_MIN_SECS, THRESHOLD_MAX_SECS);
    }

    pub fn set_output_threshold(&mut self, secs: u8) {
        self.output_threshold = secs.clamp(THRESHOLD_MIN_SECS, THRESHOLD_MAX_SECS);
    }

    /// Update the entry keyed by `event_name`, replacing only its two
    /// mutable fields. An unknown name is dropped, not inserted.
    /// Returns whether an entry was updated.
    pub fn update_event_config(
        &mut self,
        event_name: &str,
        precision_threshold: u8,
        important: bool,
    ) -> bool {
        let Some(entry) = self
            .events_config
            .iter_mut()
            .find(|c| c.event_name == event_name)
        else {
            warn!("[prefs] update for unknown category {:?} dropped", event_name);
            return false;
        };
        entry.precision_threshold =
            precision_threshold.clamp(PRECISION_MIN_PCT, PRECISION_MAX_PCT);
        entry.important = important;
        true
    }

    pub fn config_for(&self, event_name: &str) -> Option<&EventTypeConfig> {
        self.events_config.iter().find(|c| c.event_name == event_name)
    }
}

// ── Local display settings ────────────────────────────────────────────────────

/// Settings that never leave the device. Written before the remote
/// preferences POST on save; the two writes are independent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    pub dark_theme: bool,
}

impl LocalSettings {
    /// Read from `path`. Missing or corrupt file yields defaults.
    pub fn load(path: &PathBuf) -> Self {
        if let Ok(content) = std::fs::read_to_string(path) {
            if let Ok(settings) = serde_json::from_str::<Self>(&content) {
                return settings;
            }
        }
        Self::default()
    }

    pub async fn save(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Preferences {
        Preferences {
            input_threshold: 2,
            output_threshold: 5,
            events_config: vec![
                EventTypeConfig {
                    event_name: "fire".into(),
                    important: true,
                    precision_threshold: 90,
                },
                EventTypeConfig {
                    event_name: "smoke".into(),
                    important: false,
                    precision_threshold: 70,
                },
            ],
        }
    }

    #[test]
    fn test_threshold_setters_clamp() {
        let mut p = Preferences::default();
        p.set_input_threshold(200);
        assert_eq!(p.input_threshold, 10);
        p.set_output_threshold(0);
        assert_eq!(p.output_threshold, 0);
    }

    #[test]
    fn test_update_event_config_touches_only_target() {
        let mut p = sample();
        let before_smoke = p.config_for("smoke").unwrap().clone();
        assert!(p.update_event_config("fire", 85, false));
        let fire = p.config_for("fire").unwrap();
        assert_eq!(fire.precision_threshold, 85);
        assert!(!fire.important);
        assert_eq!(p.config_for("smoke").unwrap(), &before_smoke);
    }

    #[test]
    fn test_update_event_config_clamps_precision() {
        let mut p = sample();
        assert!(p.update_event_config("fire", 10, true));
        assert_eq!(p.config_for("fire").unwrap().precision_threshold, 50);
        assert!(p.update_event_config("fire", 255, true));
        assert_eq!(p.config_for("fire").unwrap().precision_threshold, 100);
    }

    #[test]
    fn test_update_unknown_category_dropped() {
        let mut p = sample();
        let before = p.clone();
        assert!(!p.update_event_config("toaster", 80, true));
        assert_eq!(p, before); // no insertion, nothing else touched
    }

    #[test]
    fn test_wire_shape() {
        let p = sample();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["inputThreshold"], 2);
        assert_eq!(json["eventsConfig"][0]["eventName"], "fire");
        assert_eq!(json["eventsConfig"][0]["precisionThreshold"], 90);
        let back: Preferences = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_local_settings_missing_file_defaults() {
        let path = std::env::temp_dir().join("kss-test-no-such-settings.json");
        let s = LocalSettings::load(&path);
        assert!(!s.dark_theme);
    }
}
