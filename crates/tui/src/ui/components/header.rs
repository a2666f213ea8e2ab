//! Header: API mode banner, system health summary and the global target URL.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::{App, Effect},
    theme,
    ui::components::Component,
};

#[derive(Debug, Default)]
pub struct HeaderComponent;

impl Component for HeaderComponent {
    fn is_capturing_text(&self, app: &App) -> bool {
        app.editing_target
    }

    /// Keys for the target URL editor; only routed here while editing.
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter => {
                app.commit_target_edit();
                return Vec::new();
            }
            KeyCode::Esc => {
                app.cancel_target_edit();
                return Vec::new();
            }
            _ => {}
        }
        let input = &mut app.target_input;
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => input.clear(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert_char(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let config = app.session.client().config();
        let mode = if config.mock_mode {
            vec![
                Span::styled(" DEMO MODE ", theme::key_style().bg(theme::BG_SELECT)),
                Span::styled("  mock data, no backend calls", theme::text_muted()),
            ]
        } else {
            vec![
                Span::styled(" LIVE ", theme::key_style().bg(theme::BG_SELECT)),
                Span::styled(format!("  {}", config.base_url), theme::text_muted()),
            ]
        };

        let mut status = mode;
        status.push(Span::raw("   "));
        status.extend(health_spans(app));
        if app.executing {
            status.push(Span::styled(
                format!("   {} running", crate::app::THROBBER[app.throbber_idx]),
                theme::key_style(),
            ));
        }

        let target_line = if app.editing_target {
            Line::from(vec![
                Span::styled("Target URL: ", theme::title_style()),
                Span::styled(app.target_input.input().to_string(), theme::text_style()),
            ])
        } else {
            let target = app.session.target_url();
            Line::from(vec![
                Span::styled("Target URL: ", theme::title_style()),
                match target {
                    Some(url) => Span::styled(url, theme::text_style()),
                    None => Span::styled("(none, operations use their own URL field)", theme::text_muted()),
                },
            ])
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(app.editing_target))
            .title(Span::styled(" Seodeck ", theme::title_style()));
        let inner = block.inner(rect);
        frame.render_widget(Paragraph::new(vec![Line::from(status), target_line]).block(block), rect);

        if app.editing_target {
            let offset = "Target URL: ".len() + app.target_input.cursor_column();
            let x = inner.x.saturating_add(offset as u16).min(inner.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y + 1));
        }
    }
}

fn health_spans(app: &App) -> Vec<Span<'static>> {
    let Some(health) = app.dashboard.health.as_ref() else {
        return vec![Span::styled("Health: loading", theme::text_muted())];
    };
    vec![
        Span::styled("Health: ", theme::title_style()),
        Span::styled(
            health.health_status.clone(),
            theme::text_style().fg(theme::status_color(&health.health_status)),
        ),
        Span::styled(
            format!(
                "  {}/{} agents ok ({:.0}%)  {} failed  uptime {}",
                health.successful_agents,
                health.total_agents,
                health.success_percentage,
                health.failed_agents,
                health.uptime.as_deref().unwrap_or("-")
            ),
            theme::text_muted(),
        ),
    ]
}
