//! AppState — shared read-only data passed to all components during
//! render/event handling.
//!
//! Components read this; only the App event-loop writes to it. Every field
//! has exactly one writer: the health probe owns `connectivity`, the unread
//! probe owns `unread`, feed responses flow through `feed`, and the
//! settings screen's dispatched actions own `prefs`/`dark_theme`.

use std::path::PathBuf;
use std::time::Instant;

use kss_proto::feed::EventFeedStore;
use kss_proto::prefs::Preferences;
use kss_proto::status::ConnectivityStatus;

use crate::action::Screen;
use crate::theme::{self, Palette};

/// How long a status-line message stays visible.
pub const STATUS_TTL_SECS: u64 = 5;

pub struct AppState {
    // ── Device ──────────────────────────────────────────────────────────────
    pub connectivity: ConnectivityStatus,
    /// Latest unread count; `kss_proto::status::UNREAD_FAILED` after a
    /// failed probe.
    pub unread: i64,

    // ── Event feed ──────────────────────────────────────────────────────────
    pub feed: EventFeedStore,

    // ── Preferences ─────────────────────────────────────────────────────────
    pub prefs: Preferences,
    /// True once a remote fetch has populated `prefs`.
    pub prefs_loaded: bool,
    /// Last preferences fetch/save error, shown on the settings screen.
    pub prefs_error: Option<String>,
    pub dark_theme: bool,

    // ── UI ──────────────────────────────────────────────────────────────────
    pub screen: Screen,
    /// Transient status-line message with its expiry deadline.
    pub status_line: Option<(String, Instant)>,

    // ── Paths ───────────────────────────────────────────────────────────────
    pub images_dir: PathBuf,
}

impl AppState {
    pub fn theme(&self) -> &'static Palette {
        theme::palette(self.dark_theme)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let deadline = Instant::now() + std::time::Duration::from_secs(STATUS_TTL_SECS);
        self.status_line = Some((message.into(), deadline));
    }

    /// Drop the status line once its deadline passes. Returns whether it
    /// changed (a redraw is needed).
    pub fn expire_status(&mut self) -> bool {
        match &self.status_line {
            Some((_, deadline)) if Instant::now() >= *deadline => {
                self.status_line = None;
                true
            }
            _ => false,
        }
    }
}
