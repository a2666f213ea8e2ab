//! Paginated execution log.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::{
    app::{App, Effect},
    theme,
    ui::components::Component,
};

#[derive(Debug, Default)]
pub struct LogsComponent;

impl Component for LogsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let mut pager = app.dashboard.pager;
        let moved = match key.code {
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => pager.next(),
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => pager.prev(),
            _ => false,
        };
        if moved {
            vec![Effect::LoadLogs(pager)]
        } else {
            Vec::new()
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let pager = app.dashboard.pager;
        let title = format!(
            " Execution log · page {}/{} · {} entries (←/→) ",
            pager.page + 1,
            pager.total_pages().max(1),
            pager.total_entries
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(true))
            .title(Span::styled(title, theme::title_style()));

        let rows: Vec<Row> = app
            .dashboard
            .logs
            .iter()
            .flat_map(|log| log.logs.iter())
            .map(|entry| {
                let time = entry
                    .parsed_timestamp()
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| entry.timestamp.clone());
                let (outcome, color) = if entry.success {
                    ("ok", theme::SUCCESS)
                } else {
                    ("failed", theme::ERROR)
                };
                Row::new(vec![
                    Cell::from(Span::styled(time, theme::text_muted())),
                    Cell::from(Span::styled(entry.agent.clone(), theme::text_style())),
                    Cell::from(Span::styled(outcome, theme::text_style().fg(color))),
                    Cell::from(Span::styled(entry.message.clone(), theme::text_style())),
                ])
            })
            .collect();

        let header = Row::new(vec!["Time", "Agent", "Result", "Message"]).style(theme::title_style());
        let table = Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(24),
                Constraint::Length(7),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, rect);
    }
}
