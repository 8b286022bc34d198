//! Component trait — the interface every screen implements.
//!
//! Design principles:
//! - Components are self-contained: they own their cursor/edit state and
//!   render themselves.
//! - Components receive `AppState` (read-only) for data they don't own.
//! - Components produce `Vec<Action>` — they never mutate shared state
//!   directly. The App event-loop dispatches those actions.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    /// Which screen is this?
    fn id(&self) -> ComponentId;

    /// Handle a key event. Returns actions to be dispatched.
    /// Only called while this screen is active (global keys are handled by
    /// the App before delegation).
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Render the screen into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}
