//! HTTP client for the KSS device API.
//!
//! Stateless request/response mapping — no caching, no retry. The probe
//! endpoints (`check_health`, `unread_count`) fold every failure kind into
//! their status sentinel; the feed and preferences calls surface a typed
//! [`ApiError`] so callers can tell a failure from an empty result.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::Event;
use crate::prefs::Preferences;
use crate::status::UNREAD_FAILED;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Parse(String),
}

/// Parse the plain-text unread-count body. The backend sends a bare integer.
pub fn parse_unread(body: &str) -> Option<i64> {
    body.trim().parse().ok()
}

#[derive(Clone)]
pub struct KssClient {
    http: reqwest::Client,
    base_url: String,
}

impl KssClient {
    pub fn new(base_url: &str, connect_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("kss-client/0.1")
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── Probes ────────────────────────────────────────────────────────────────

    /// One health probe. 200 = connected; any transport failure or non-200
    /// status = not connected. Never retries, never errors.
    pub async fn check_health(&self) -> bool {
        match self.http.get(self.url("/api/kss/health")).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                debug!("[health] probe failed: {}", e);
                false
            }
        }
    }

    /// One unread-count probe. Any failure — transport, non-200, or a body
    /// that is not an integer — yields the [`UNREAD_FAILED`] sentinel.
    pub async fn unread_count(&self) -> i64 {
        match self.try_unread_count().await {
            Ok(n) => n,
            Err(e) => {
                debug!("[unread] probe failed: {}", e);
                UNREAD_FAILED
            }
        }
    }

    async fn try_unread_count(&self) -> Result<i64, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/kss/events/unread"))
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ApiError::Status(resp.status()));
        }
        let body = resp.text().await?;
        parse_unread(&body)
            .ok_or_else(|| ApiError::Parse(format!("not an integer: {:?}", body.trim())))
    }

    // ── Event feed ────────────────────────────────────────────────────────────

    /// Fetch one page of events. Each event that carries an image id gets
    /// its full image URL computed here, so the UI never builds URLs.
    pub async fn list_events(&self, page: u32, limit: u32) -> Result<Vec<Event>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/kss/events/latest"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ApiError::Status(resp.status()));
        }
        let mut events: Vec<Event> = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        for event in &mut events {
            event.image_url = event.image_id.map(|id| self.image_url(id));
        }
        debug!("[feed] page={} limit={} -> {} events", page, limit, events.len());
        Ok(events)
    }

    pub fn image_url(&self, image_id: i64) -> String {
        format!("{}/api/kss/events/image?imageId={}", self.base_url, image_id)
    }

    pub async fn fetch_image(&self, image_id: i64) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/kss/events/image"))
            .query(&[("imageId", image_id)])
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp.bytes().await?.to_vec())
    }

    // ── Preferences ───────────────────────────────────────────────────────────

    pub async fn get_preferences(&self) -> Result<Preferences, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/kss/preferences"))
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ApiError::Status(resp.status()));
        }
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// POST the full preferences document as one payload.
    pub async fn save_preferences(&self, prefs: &Preferences) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/api/kss/preferences"))
            .json(prefs)
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(())
    }

    // ── Push token ────────────────────────────────────────────────────────────

    /// Forward the platform push token to the sensor. Called once at
    /// startup when a token is configured.
    pub async fn register_push_token(&self, token: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/api/kss/preferences/pushToken"))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            warn!("[push] registration rejected: {}", resp.status());
            return Err(ApiError::Status(resp.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unread() {
        assert_eq!(parse_unread("7"), Some(7));
        assert_eq!(parse_unread(" 42\n"), Some(42));
        assert_eq!(parse_unread("0"), Some(0));
        assert_eq!(parse_unread("seven"), None);
        assert_eq!(parse_unread(""), None);
        assert_eq!(parse_unread("7.5"), None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = KssClient::new("http://kss.local:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://kss.local:8080");
        assert_eq!(
            client.image_url(3),
            "http://kss.local:8080/api/kss/events/image?imageId=3"
        );
    }
}
