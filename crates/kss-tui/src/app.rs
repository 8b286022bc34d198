//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for
//!   components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks; fetches are spawned, never awaited inline.
//! - Two fixed-period probes run as `tokio::time::interval` arms of the
//!   select loop: health every `polling.health_interval_secs`, unread count
//!   every `polling.unread_interval_secs`. The unread tick is a no-op while
//!   the last health probe said "disconnected". Neither probe backs off or
//!   dedupes in-flight requests — the latest response simply overwrites.
//! - Feed responses are fenced by the store's fetch sequence, so a stale
//!   page can never overwrite a newer one.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use kss_proto::client::KssClient;
use kss_proto::config::Config;
use kss_proto::feed::EventFeedStore;
use kss_proto::model::Event;
use kss_proto::prefs::{LocalSettings, Preferences};
use kss_proto::status::{ConnectivityStatus, UNREAD_FAILED};

use crate::{
    action::{Action, Screen},
    app_state::AppState,
    component::Component,
    components::{events::EventsScreen, home::HomeScreen, settings::SettingsScreen},
    download,
    theme::{style_error, style_header, style_muted, style_ok},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Term(TermEvent),
    HealthChecked(bool),
    UnreadLoaded(i64),
    EventsLoaded {
        seq: u64,
        result: Result<Vec<Event>, String>,
    },
    PrefsLoaded(Result<Preferences, String>),
    PrefsSaved(Result<(), String>),
    ImageSaved(Result<PathBuf, String>),
    PushRegistered(Result<(), String>),
}

pub struct App {
    state: AppState,
    client: KssClient,

    home_screen: HomeScreen,
    events_screen: EventsScreen,
    settings_screen: SettingsScreen,

    settings_file: PathBuf,
    push_token: Option<String>,
    health_period: Duration,
    unread_period: Duration,

    msg_tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, client: KssClient) -> Self {
        // Theme applies before anything remote is fetched.
        let local = LocalSettings::load(&config.paths.settings_file);

        let state = AppState {
            connectivity: ConnectivityStatus::default(),
            unread: 0,
            feed: EventFeedStore::new(config.feed.page_size),
            prefs: Preferences::default(),
            prefs_loaded: false,
            prefs_error: None,
            dark_theme: local.dark_theme,
            screen: Screen::Home,
            status_line: None,
            images_dir: config.paths.images_dir.clone(),
        };

        Self {
            state,
            client,
            home_screen: HomeScreen::new(),
            events_screen: EventsScreen::new(),
            settings_screen: SettingsScreen::new(),
            settings_file: config.paths.settings_file.clone(),
            push_token: config.push.token.clone(),
            health_period: Duration::from_secs(config.polling.health_interval_secs.max(1)),
            unread_period: Duration::from_secs(config.polling.unread_interval_secs.max(1)),
            msg_tx: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.msg_tx = Some(tx.clone());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Term(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Startup work ──────────────────────────────────────────────────────
        self.refresh_feed();
        self.reload_preferences();
        self.register_push_token();

        // ── Periodic probes ───────────────────────────────────────────────────
        let mut health_tick = tokio::time::interval(self.health_period);
        health_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut unread_tick = tokio::time::interval(self.unread_period);
        unread_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Status-line expiry check.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(250));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg).await;
                }

                _ = health_tick.tick() => {
                    // Unconditional: a slow previous probe does not stop a
                    // new one; last writer wins.
                    let client = self.client.clone();
                    let probe_tx = tx.clone();
                    tokio::spawn(async move {
                        let up = client.check_health().await;
                        let _ = probe_tx.send(AppMessage::HealthChecked(up)).await;
                    });
                }

                _ = unread_tick.tick() => {
                    // Gated on the connectivity snapshot at tick time.
                    if self.state.connectivity.allows_unread_poll() {
                        let client = self.client.clone();
                        let probe_tx = tx.clone();
                        tokio::spawn(async move {
                            let count = client.unread_count().await;
                            let _ = probe_tx.send(AppMessage::UnreadLoaded(count)).await;
                        });
                    }
                }

                _ = ui_tick.tick() => {
                    needs_redraw = self.state.expire_status();
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        // In-flight probe responses resolve into a dropped channel; no-op.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Term(ev) => match ev {
                TermEvent::Key(key) => {
                    let actions = self.handle_key(key);
                    for action in actions {
                        self.dispatch(action).await;
                    }
                    true
                }
                TermEvent::Resize(_, _) => true,
                _ => false,
            },

            AppMessage::HealthChecked(up) => {
                if up != self.state.connectivity.connected {
                    info!("[health] device {}", if up { "reachable" } else { "unreachable" });
                }
                self.state.connectivity.record(up);
                true
            }

            AppMessage::UnreadLoaded(count) => {
                if count == UNREAD_FAILED && self.state.unread != UNREAD_FAILED {
                    debug!("[unread] probe failed, showing sentinel");
                }
                let changed = self.state.unread != count;
                self.state.unread = count;
                changed
            }

            AppMessage::EventsLoaded { seq, result } => self.state.feed.apply(seq, result),

            AppMessage::PrefsLoaded(Ok(prefs)) => {
                info!("[prefs] loaded {} category configs", prefs.events_config.len());
                self.state.prefs = prefs;
                self.state.prefs_loaded = true;
                self.state.prefs_error = None;
                true
            }

            AppMessage::PrefsLoaded(Err(e)) => {
                // Reported once per fetch; defaults stay in place.
                warn!("[prefs] fetch failed: {}", e);
                self.state.prefs_error = Some(e.clone());
                self.state.set_status(format!("Failed to load preferences: {}", e));
                true
            }

            AppMessage::PrefsSaved(Ok(())) => {
                info!("[prefs] saved");
                self.state.prefs_error = None;
                self.state.set_status("Preferences saved");
                true
            }

            AppMessage::PrefsSaved(Err(e)) => {
                warn!("[prefs] save failed: {}", e);
                self.state.set_status(format!("Failed to save preferences: {}", e));
                true
            }

            AppMessage::ImageSaved(Ok(path)) => {
                self.state.set_status(format!("Image saved to {}", path.display()));
                true
            }

            AppMessage::ImageSaved(Err(e)) => {
                warn!("[image] save failed: {}", e);
                self.state.set_status(format!("Image save failed: {}", e));
                true
            }

            AppMessage::PushRegistered(Ok(())) => {
                info!("[push] token registered");
                false
            }

            AppMessage::PushRegistered(Err(e)) => {
                warn!("[push] registration failed: {}", e);
                self.state.set_status(format!("Push registration failed: {}", e));
                true
            }
        }
    }

    // ── Key routing ───────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Global keys, unless the settings form is capturing typed input.
        let capturing =
            self.state.screen == Screen::Settings && self.settings_screen.is_editing();
        if !capturing {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Tab => return vec![Action::SwitchScreen(self.state.screen.next())],
                KeyCode::Char('1') => return vec![Action::SwitchScreen(Screen::Home)],
                KeyCode::Char('2') => return vec![Action::SwitchScreen(Screen::Events)],
                KeyCode::Char('3') => return vec![Action::SwitchScreen(Screen::Settings)],
                _ => {}
            }
        }

        match self.state.screen {
            Screen::Home => self.home_screen.handle_key(key, &self.state),
            Screen::Events => self.events_screen.handle_key(key, &self.state),
            Screen::Settings => self.settings_screen.handle_key(key, &self.state),
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        match action {
            Action::SwitchScreen(screen) => {
                self.state.screen = screen;
            }

            Action::NextPage => {
                if self.state.feed.next_page() {
                    self.refresh_feed();
                }
            }

            Action::PrevPage => {
                // Clamped at page 1 — no change means no fetch.
                if self.state.feed.prev_page() {
                    self.refresh_feed();
                }
            }

            Action::RefreshFeed => self.refresh_feed(),

            Action::SaveImage(image_id) => self.save_image(image_id),

            Action::ReloadPreferences => self.reload_preferences(),

            Action::SavePreferences => self.save_preferences(),

            Action::SetDarkTheme(dark) => {
                self.state.dark_theme = dark;
            }

            Action::SetInputThreshold(secs) => {
                self.state.prefs.set_input_threshold(secs);
            }

            Action::SetOutputThreshold(secs) => {
                self.state.prefs.set_output_threshold(secs);
            }

            Action::UpdateEventConfig {
                event_name,
                precision_threshold,
                important,
            } => {
                self.state
                    .prefs
                    .update_event_config(&event_name, precision_threshold, important);
            }

            Action::Status(message) => self.state.set_status(message),

            Action::Quit => self.should_quit = true,

            Action::Noop => {}
        }
    }

    // ── Background work ───────────────────────────────────────────────────────

    fn refresh_feed(&mut self) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        let seq = self.state.feed.begin_fetch();
        let page = self.state.feed.page();
        let limit = self.state.feed.limit();
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .list_events(page, limit)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::EventsLoaded { seq, result }).await;
        });
    }

    fn reload_preferences(&mut self) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.get_preferences().await.map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::PrefsLoaded(result)).await;
        });
    }

    /// Persist the theme flag locally, then POST the server-side fields as
    /// one payload. The local write is attempted first and is not rolled
    /// back when the remote write fails.
    fn save_preferences(&mut self) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        let client = self.client.clone();
        let prefs = self.state.prefs.clone();
        let local = LocalSettings {
            dark_theme: self.state.dark_theme,
        };
        let settings_file = self.settings_file.clone();
        tokio::spawn(async move {
            if let Err(e) = local.save(&settings_file).await {
                warn!("[prefs] local settings write failed: {}", e);
            }
            let result = client
                .save_preferences(&prefs)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::PrefsSaved(result)).await;
        });
    }

    fn save_image(&mut self, image_id: i64) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        let client = self.client.clone();
        let dir = self.state.images_dir.clone();
        tokio::spawn(async move {
            let result = download::save_event_image(&client, image_id, &dir)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::ImageSaved(result)).await;
        });
    }

    fn register_push_token(&mut self) {
        let (Some(tx), Some(token)) = (self.msg_tx.clone(), self.push_token.clone()) else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .register_push_token(&token)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::PushRegistered(result)).await;
        });
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let p = self.state.theme();
        let area = frame.area();
        frame.render_widget(
            ratatui::widgets::Block::default().style(Style::default().bg(p.background)),
            area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        // Header: tabs + connectivity badge + unread.
        let mut spans: Vec<Span> = vec![Span::styled(" KSS ", style_header(p))];
        for screen in [Screen::Home, Screen::Events, Screen::Settings] {
            let style = if screen == self.state.screen {
                style_header(p).add_modifier(ratatui::style::Modifier::BOLD)
            } else {
                Style::default().fg(p.muted).bg(p.header)
            };
            spans.push(Span::styled(format!(" {} ", screen.title()), style));
        }
        spans.push(Span::styled(" ", Style::default().bg(p.header)));
        if self.state.connectivity.connected {
            spans.push(Span::styled("●", style_ok().bg(p.header)));
        } else {
            spans.push(Span::styled("✕", style_error().bg(p.header)));
        }
        if self.state.unread > 0 {
            spans.push(Span::styled(
                format!(" {} unread", self.state.unread),
                style_header(p),
            ));
        }
        let header =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(p.header));
        frame.render_widget(header, chunks[0]);

        match self.state.screen {
            Screen::Home => self.home_screen.draw(frame, chunks[1], &self.state),
            Screen::Events => self.events_screen.draw(frame, chunks[1], &self.state),
            Screen::Settings => self.settings_screen.draw(frame, chunks[1], &self.state),
        }

        // Status line.
        let status = match &self.state.status_line {
            Some((msg, _)) => Line::from(Span::styled(format!(" {}", msg), style_muted(p))),
            None => Line::from(Span::styled(
                " [tab] switch screen  [q] quit",
                style_muted(p),
            )),
        };
        frame.render_widget(Paragraph::new(status), chunks[2]);
    }
}
