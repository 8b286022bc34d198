//! Action enum — all user-initiated intents flowing from components to the App.

/// Unique identifier for a screen component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Home,
    Events,
    Settings,
}

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Events,
    Settings,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::Events,
            Self::Events => Self::Settings,
            Self::Settings => Self::Home,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Events => "Events",
            Self::Settings => "Settings",
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    SwitchScreen(Screen),

    // ── Event feed ───────────────────────────────────────────────────────────
    NextPage,
    PrevPage,
    RefreshFeed,
    SaveImage(i64), // image id of the selected event

    // ── Preferences ──────────────────────────────────────────────────────────
    ReloadPreferences,
    SavePreferences,
    SetDarkTheme(bool),
    SetInputThreshold(u8),
    SetOutputThreshold(u8),
    UpdateEventConfig {
        event_name: String,
        precision_threshold: u8,
        important: bool,
    },

    // ── System ───────────────────────────────────────────────────────────────
    Status(String), // transient status-line message
    Quit,
    Noop,
}
