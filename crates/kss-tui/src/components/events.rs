//! Events screen — the paginated detection history.
//!
//! Shows the current page of events with unread/important markers, the
//! per-category detections and confidence, and a pagination footer. A
//! failed fetch is displayed as such — it is not dressed up as an empty
//! page.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use kss_proto::category::EventCategory;
use kss_proto::feed::FeedError;
use kss_proto::model::Event;

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_error, style_muted, style_selected, C_IMPORTANT, C_UNREAD},
};

pub struct EventsScreen {
    selected: usize,
    scroll: usize,
}

impl EventsScreen {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
        }
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn event_lines(&self, event: &Event, selected: bool, state: &AppState) -> Vec<Line<'static>> {
        let p = state.theme();
        let base = if selected {
            style_selected(p)
        } else {
            style_default(p)
        };
        let mut header: Vec<Span> = Vec::new();

        if !event.read {
            header.push(Span::styled(
                "NEW ",
                Style::default().fg(C_UNREAD).add_modifier(Modifier::BOLD),
            ));
        }
        if event.important {
            header.push(Span::styled(
                "! ",
                Style::default().fg(C_IMPORTANT).add_modifier(Modifier::BOLD),
            ));
        }
        header.push(Span::styled(event.date_display(), base));
        header.push(Span::styled(
            format!("  {:.2}%", event.confidence_pct()),
            base,
        ));
        if event.image_url.is_some() {
            header.push(Span::styled("  [img]", style_muted(p)));
        }

        let detections = if event.objects.is_empty() {
            "no object details".to_string()
        } else {
            event
                .objects
                .iter()
                .map(|o| {
                    format!(
                        "{} ×{} ({:.0}%)",
                        EventCategory::label_for_key(&o.name),
                        o.count,
                        o.avg_confidence * 100.0
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        vec![
            Line::from(header),
            Line::from(Span::styled(format!("    {}", detections), style_muted(p))),
        ]
    }

    fn footer_line(&self, state: &AppState) -> Line<'static> {
        let p = state.theme();
        let feed = &state.feed;
        let mut spans: Vec<Span> = Vec::new();

        if feed.page() > 1 {
            spans.push(Span::styled(" ← prev ", style_default(p)));
        } else {
            // Backing out of page 1 is a no-op; show the key as disabled.
            spans.push(Span::styled(" ← prev ", style_muted(p)));
        }
        spans.push(Span::styled(
            format!("· Page {} ·", feed.page()),
            style_default(p).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(" next → ", style_default(p)));
        if feed.is_loading() {
            spans.push(Span::styled("  loading…", style_muted(p)));
        }
        spans.push(Span::styled(
            "  [r] refresh  [i] save image",
            style_muted(p),
        ));
        Line::from(spans)
    }
}

impl Component for EventsScreen {
    fn id(&self) -> ComponentId {
        ComponentId::Events
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.feed.events().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
                vec![]
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.selected = 0;
                vec![Action::PrevPage]
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.selected = 0;
                vec![Action::NextPage]
            }
            KeyCode::Char('r') => vec![Action::RefreshFeed],
            KeyCode::Char('i') => {
                self.clamp_selection(len);
                match state
                    .feed
                    .events()
                    .get(self.selected)
                    .and_then(|e| e.image_id)
                {
                    Some(image_id) => vec![Action::SaveImage(image_id)],
                    None => vec![Action::Status("Selected event has no image".into())],
                }
            }
            KeyCode::Char('h') | KeyCode::Esc => vec![Action::SwitchScreen(Screen::Home)],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let p = state.theme();
        let events = state.feed.events();
        self.clamp_selection(events.len());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let mut lines: Vec<Line> = Vec::new();
        match state.feed.error() {
            FeedError::Fetch(msg) => {
                lines.push(Line::from(Span::styled(
                    format!(" Fetch failed: {}", msg),
                    style_error(),
                )));
                if !events.is_empty() {
                    lines.push(Line::from(Span::styled(
                        " Showing the last page that loaded.",
                        style_muted(p),
                    )));
                }
                lines.push(Line::default());
            }
            FeedError::None if events.is_empty() && !state.feed.is_loading() => {
                lines.push(Line::from(Span::styled(
                    " No events on this page.",
                    style_muted(p),
                )));
            }
            FeedError::None => {}
        }

        for (idx, event) in events.iter().enumerate() {
            lines.extend(self.event_lines(event, idx == self.selected, state));
        }

        // Keep the selected event visible: two lines per event.
        let visible = chunks[0].height.saturating_sub(2) as usize;
        let selected_top = self.selected * 2;
        if selected_top < self.scroll {
            self.scroll = selected_top;
        } else if visible > 0 && selected_top + 2 > self.scroll + visible {
            self.scroll = selected_top + 2 - visible;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_muted(p))
            .title(" Event history ");
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .scroll((self.scroll as u16, 0)),
            chunks[0],
        );
        frame.render_widget(Paragraph::new(self.footer_line(state)), chunks[1]);
    }
}
