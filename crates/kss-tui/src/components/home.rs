//! Home screen — connectivity badge, unread badge, navigation hints.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use kss_proto::status::UNREAD_FAILED;

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_error, style_muted, style_ok},
};

pub struct HomeScreen;

impl HomeScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Component for HomeScreen {
    fn id(&self) -> ComponentId {
        ComponentId::Home
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('e') | KeyCode::Enter => vec![Action::SwitchScreen(Screen::Events)],
            KeyCode::Char('s') => vec![Action::SwitchScreen(Screen::Settings)],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let p = state.theme();
        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            " Welcome to KSS",
            style_default(p).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());

        if state.connectivity.connected {
            lines.push(Line::from(vec![
                Span::styled(" ● ", style_ok()),
                Span::styled("Connected to the device", style_default(p)),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(" ✕ ", style_error()),
                Span::styled("No connection to the device", style_default(p)),
            ]));
        }

        match &state.connectivity.last_checked {
            Some(ts) => lines.push(Line::from(Span::styled(
                format!("   Last checked: {}", ts.format("%Y-%m-%d %H:%M:%S")),
                style_muted(p),
            ))),
            None => lines.push(Line::from(Span::styled(
                "   Waiting for the first health check…",
                style_muted(p),
            ))),
        }

        lines.push(Line::default());
        let unread_line = if state.unread == UNREAD_FAILED {
            Line::from(Span::styled(" Unread events: unavailable", style_muted(p)))
        } else if state.unread > 0 {
            Line::from(vec![
                Span::styled(" Unread events: ", style_default(p)),
                Span::styled(
                    state.unread.to_string(),
                    style_default(p).add_modifier(Modifier::BOLD),
                ),
            ])
        } else {
            Line::from(Span::styled(" No unread events", style_muted(p)))
        };
        lines.push(unread_line);

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            " [e] Event history   [s] Settings   [q] Quit",
            style_muted(p),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_muted(p))
            .title(" KSS ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
