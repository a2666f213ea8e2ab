//! Bottom line: the newest toast, or key hints for the current context.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{App, PanelFocus, Tab},
    theme,
    ui::components::Component,
};

#[derive(Debug, Default)]
pub struct StatusBarComponent;

impl StatusBarComponent {
    fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
        if app.editing_target {
            return &[("Enter", " save  "), ("Esc", " cancel  "), ("Ctrl-U", " clear")];
        }
        let focus = app
            .tab
            .panel()
            .and_then(|panel| app.panels.get(&panel))
            .map(|view| view.focus);
        match (app.tab, focus) {
            (Tab::Logs, _) => &[("←/→", " page  "), ("r", " refresh  "), ("Tab", " next tab  "), ("q", " quit")],
            (Tab::Dependencies, _) => &[("r", " refresh  "), ("Tab", " next tab  "), ("q", " quit")],
            (_, Some(PanelFocus::Editing)) => &[("Enter", " save  "), ("Esc", " discard  "), ("Ctrl-U", " clear")],
            (_, Some(PanelFocus::Fields)) => &[("↑/↓", " field  "), ("Enter", " edit  "), ("e", " run  "), ("Esc", " back")],
            _ => &[
                ("↑/↓", " move  "),
                ("Enter", " expand  "),
                ("e", " run  "),
                ("c", " category  "),
                ("u/x", " target url  "),
                ("Tab/1-9", " tabs  "),
                ("q", " quit"),
            ],
        }
    }
}

impl Component for StatusBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let line = match app.toasts.latest() {
            Some(toast) => Line::from(Span::styled(toast.message.clone(), theme::toast_style(toast.level))),
            None => Line::from(
                Self::hints(app)
                    .iter()
                    .flat_map(|(key, label)| [Span::styled(*key, theme::key_style()), Span::styled(*label, theme::text_muted())])
                    .collect::<Vec<_>>(),
            ),
        };
        frame.render_widget(Paragraph::new(line), rect);
    }
}
