//! The component abstraction shared by every view in the TUI.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::app::{App, Effect};

/// A UI element that handles its own input and renders into a `Rect`.
///
/// Components keep long-lived state in [`App`] and report side effects as
/// [`Effect`]s instead of performing I/O themselves.
pub(crate) trait Component {
    /// Handle a key while this component is the active view.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Whether the component is capturing free text, in which case global
    /// shortcuts are suspended.
    fn is_capturing_text(&self, _app: &App) -> bool {
        false
    }

    /// Draw into `rect`. Implementations must not mutate app state beyond
    /// view bookkeeping such as scroll clamping.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
