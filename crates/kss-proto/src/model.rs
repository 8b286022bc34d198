//! Wire types for the KSS event feed.
//!
//! The sensor sends camelCase JSON. Fields the backend omits for older
//! events (`read`, `imageId`) default rather than fail the whole page.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One category-level detection within an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    /// Category key ("fire", "smoke", ...).
    pub name: String,
    pub count: u32,
    /// Average confidence over the detections in this category, 0..1.
    pub avg_confidence: f64,
}

/// One detection record produced by the backend. Read-only on this side;
/// the server flips `read` when any client has fetched the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    /// Detection timestamp as sent by the server. Kept raw; see
    /// [`Event::timestamp`] for the parsed form.
    pub date: String,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    /// Average confidence across all objects, 0..1.
    pub avg_confidence: f64,
    pub important: bool,
    #[serde(default)]
    pub read: bool,
    /// Server-side image identifier, when a frame was captured.
    #[serde(default)]
    pub image_id: Option<i64>,
    /// Full image URL, computed client-side from `image_id` after fetch.
    /// Never present on the wire.
    #[serde(skip)]
    pub image_url: Option<String>,
}

impl Event {
    /// Parse `date` leniently: RFC 3339 first, then a couple of formats the
    /// backend has been seen to emit. `None` when unparseable.
    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(dt.with_timezone(&Local));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(&self.date, fmt) {
                return naive.and_local_timezone(Local).earliest();
            }
        }
        if let Ok(d) = chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest();
        }
        None
    }

    /// Display stamp for the feed: parsed timestamp when possible, raw
    /// server string otherwise.
    pub fn date_display(&self) -> String {
        match self.timestamp() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.date.clone(),
        }
    }

    /// Confidence as a percentage for display, e.g. 92.00.
    pub fn confidence_pct(&self) -> f64 {
        self.avg_confidence * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_feed_scenario() {
        // Shape the backend sends for one fire detection.
        let body = r#"[{"id":1,"date":"2024-01-01","important":true,"avgConfidence":0.92,
            "objects":[{"name":"fire","count":1,"avgConfidence":0.92}]}]"#;
        let events: Vec<Event> = serde_json::from_str(body).unwrap();
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.id, 1);
        assert!(ev.important);
        assert!(!ev.read); // absent on the wire → default
        assert!(ev.image_id.is_none());
        assert_eq!(ev.objects.len(), 1);
        assert_eq!(ev.objects[0].name, "fire");
        assert_eq!(ev.objects[0].count, 1);
        assert!((ev.avg_confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_timestamp_date_only() {
        let ev = Event {
            id: 1,
            date: "2024-01-01".into(),
            objects: Vec::new(),
            avg_confidence: 0.5,
            important: false,
            read: false,
            image_id: None,
            image_url: None,
        };
        let ts = ev.timestamp().unwrap();
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-01-01");
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let ev = Event {
            id: 2,
            date: "2024-03-05T12:30:00Z".into(),
            objects: Vec::new(),
            avg_confidence: 0.7,
            important: false,
            read: true,
            image_id: Some(7),
            image_url: None,
        };
        assert!(ev.timestamp().is_some());
    }

    #[test]
    fn test_timestamp_garbage_is_none() {
        let ev = Event {
            id: 3,
            date: "yesterday-ish".into(),
            objects: Vec::new(),
            avg_confidence: 0.0,
            important: false,
            read: false,
            image_id: None,
            image_url: None,
        };
        assert!(ev.timestamp().is_none());
        assert_eq!(ev.date_display(), "yesterday-ish");
    }
}
