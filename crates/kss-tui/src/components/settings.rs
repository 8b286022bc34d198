//! Settings screen — the combined detection-preferences form.
//!
//! One editable form over two stores: the locally persisted dark-theme
//! flag and the server-side thresholds/per-category config. Numeric rows
//! adjust with +/- or take typed input via an inline edit field; `w`
//! saves both halves.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use kss_proto::category::EventCategory;
use kss_proto::prefs::{PRECISION_MAX_PCT, PRECISION_MIN_PCT, THRESHOLD_MAX_SECS};

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_error, style_muted, style_selected},
};

/// One selectable row of the form.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Row {
    DarkTheme,
    InputThreshold,
    OutputThreshold,
    /// Index into `prefs.events_config`.
    Category(usize),
}

pub struct SettingsScreen {
    selected: usize,
    /// Inline numeric edit field, active on the selected row.
    editing: Option<Input>,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            selected: 0,
            editing: None,
        }
    }

    /// True while the inline edit field is capturing typed input. The app
    /// suspends global single-letter keys while this holds.
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn rows(state: &AppState) -> Vec<Row> {
        let mut rows = vec![Row::DarkTheme, Row::InputThreshold, Row::OutputThreshold];
        rows.extend((0..state.prefs.events_config.len()).map(Row::Category));
        rows
    }

    fn selected_row(&self, state: &AppState) -> Row {
        let rows = Self::rows(state);
        rows[self.selected.min(rows.len() - 1)]
    }

    /// +/- adjustment for the selected row. Bounds are enforced by the
    /// preferences setters; the component only proposes the value.
    fn adjust(&self, state: &AppState, delta: i16) -> Vec<Action> {
        let step = |v: u8, max: u8| -> u8 {
            if delta >= 0 {
                v.saturating_add(1).min(max)
            } else {
                v.saturating_sub(1)
            }
        };
        match self.selected_row(state) {
            Row::DarkTheme => vec![Action::SetDarkTheme(!state.dark_theme)],
            Row::InputThreshold => vec![Action::SetInputThreshold(step(
                state.prefs.input_threshold,
                THRESHOLD_MAX_SECS,
            ))],
            Row::OutputThreshold => vec![Action::SetOutputThreshold(step(
                state.prefs.output_threshold,
                THRESHOLD_MAX_SECS,
            ))],
            Row::Category(i) => {
                let Some(cfg) = state.prefs.events_config.get(i) else {
                    return vec![];
                };
                let next = step(cfg.precision_threshold, PRECISION_MAX_PCT)
                    .max(PRECISION_MIN_PCT);
                vec![Action::UpdateEventConfig {
                    event_name: cfg.event_name.clone(),
                    precision_threshold: next,
                    important: cfg.important,
                }]
            }
        }
    }

    fn commit_edit(&mut self, state: &AppState) -> Vec<Action> {
        let Some(input) = self.editing.take() else {
            return vec![];
        };
        let Ok(value) = input.value().trim().parse::<u8>() else {
            return vec![Action::Status(format!(
                "Not a number: {:?}",
                input.value().trim()
            ))];
        };
        match self.selected_row(state) {
            Row::DarkTheme => vec![],
            Row::InputThreshold => vec![Action::SetInputThreshold(value)],
            Row::OutputThreshold => vec![Action::SetOutputThreshold(value)],
            Row::Category(i) => match state.prefs.events_config.get(i) {
                Some(cfg) => vec![Action::UpdateEventConfig {
                    event_name: cfg.event_name.clone(),
                    precision_threshold: value,
                    important: cfg.important,
                }],
                None => vec![],
            },
        }
    }

    fn row_line(&self, row: Row, idx: usize, state: &AppState) -> Line<'static> {
        let p = state.theme();
        let selected = idx == self.selected;
        let base = if selected {
            style_selected(p)
        } else {
            style_default(p)
        };

        let value = if selected && self.editing.is_some() {
            let input = self.editing.as_ref().map(|i| i.value()).unwrap_or("");
            format!("[{}_]", input)
        } else {
            match row {
                Row::DarkTheme => (if state.dark_theme { "on" } else { "off" }).to_string(),
                Row::InputThreshold => format!("{} s", state.prefs.input_threshold),
                Row::OutputThreshold => format!("{} s", state.prefs.output_threshold),
                Row::Category(i) => match state.prefs.events_config.get(i) {
                    Some(cfg) => format!(
                        "{} %  important: {}",
                        cfg.precision_threshold,
                        if cfg.important { "yes" } else { "no" }
                    ),
                    None => String::new(),
                },
            }
        };

        let label = match row {
            Row::DarkTheme => " Dark theme".to_string(),
            Row::InputThreshold => " Input threshold".to_string(),
            Row::OutputThreshold => " Output threshold".to_string(),
            Row::Category(i) => match state.prefs.events_config.get(i) {
                Some(cfg) => format!("   {}", EventCategory::label_for_key(&cfg.event_name)),
                None => String::new(),
            },
        };

        Line::from(vec![
            Span::styled(format!("{:<24}", label), base),
            Span::styled(value, base),
        ])
    }
}

impl Component for SettingsScreen {
    fn id(&self) -> ComponentId {
        ComponentId::Settings
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        // Inline edit mode swallows everything except commit/cancel.
        if self.editing.is_some() {
            return match key.code {
                KeyCode::Enter => self.commit_edit(state),
                KeyCode::Esc => {
                    self.editing = None;
                    vec![]
                }
                _ => {
                    if let Some(input) = self.editing.as_mut() {
                        input.handle_event(&ratatui::crossterm::event::Event::Key(key));
                    }
                    vec![]
                }
            };
        }

        let row_count = Self::rows(state).len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < row_count {
                    self.selected += 1;
                }
                vec![]
            }
            KeyCode::Char('+') | KeyCode::Right => self.adjust(state, 1),
            KeyCode::Char('-') | KeyCode::Left => self.adjust(state, -1),
            KeyCode::Char(' ') => match self.selected_row(state) {
                Row::DarkTheme => vec![Action::SetDarkTheme(!state.dark_theme)],
                Row::Category(i) => match state.prefs.events_config.get(i) {
                    Some(cfg) => vec![Action::UpdateEventConfig {
                        event_name: cfg.event_name.clone(),
                        precision_threshold: cfg.precision_threshold,
                        important: !cfg.important,
                    }],
                    None => vec![],
                },
                _ => vec![],
            },
            KeyCode::Enter => match self.selected_row(state) {
                Row::DarkTheme => vec![Action::SetDarkTheme(!state.dark_theme)],
                _ => {
                    self.editing = Some(Input::default());
                    vec![]
                }
            },
            KeyCode::Char('w') => vec![Action::SavePreferences],
            KeyCode::Char('g') => vec![Action::ReloadPreferences],
            KeyCode::Char('h') | KeyCode::Esc => vec![Action::SwitchScreen(Screen::Home)],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let p = state.theme();
        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            " Settings",
            style_default(p).add_modifier(Modifier::BOLD),
        )));

        if let Some(err) = &state.prefs_error {
            lines.push(Line::from(Span::styled(
                format!(" Device preferences unavailable: {}", err),
                style_error(),
            )));
        } else if !state.prefs_loaded {
            lines.push(Line::from(Span::styled(
                " Loading device preferences…",
                style_muted(p),
            )));
        }
        lines.push(Line::default());

        for (idx, row) in Self::rows(state).into_iter().enumerate() {
            lines.push(self.row_line(row, idx, state));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            " [±] adjust  [space] toggle  [enter] type value  [w] save  [g] reload",
            style_muted(p),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_muted(p))
            .title(" Settings ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
