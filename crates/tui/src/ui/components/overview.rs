//! Dashboard summary: agent status counts and execution order.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use seodeck_types::AgentStatus;

use crate::{app::App, theme, ui::components::Component};

#[derive(Debug, Default)]
pub struct OverviewComponent;

impl Component for OverviewComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [counts_area, order_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(rect);

        let counts: Vec<Line> = match app.dashboard.agents.as_ref() {
            Some(listing) => [AgentStatus::Success, AgentStatus::Failed, AgentStatus::NotRun]
                .iter()
                .map(|status| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:<8}", status.as_str()),
                            theme::text_style().fg(theme::status_color(status.as_str())),
                        ),
                        Span::styled(listing.count_with_status(status).to_string(), theme::text_style()),
                    ])
                })
                .chain(std::iter::once(Line::from(Span::styled(
                    format!(
                        "{} agents, {} with dependencies",
                        listing.total_agents, listing.agents_with_dependencies
                    ),
                    theme::text_muted(),
                ))))
                .collect(),
            None => match app.dashboard.last_error.as_deref() {
                Some(error) => vec![Line::from(Span::styled(error.to_string(), theme::text_style().fg(theme::ERROR)))],
                None => vec![Line::from(Span::styled("Loading agents...", theme::text_muted()))],
            },
        };
        frame.render_widget(
            Paragraph::new(counts).block(titled(" Agents ")),
            counts_area,
        );

        let order = app
            .dashboard
            .agents
            .as_ref()
            .filter(|listing| !listing.execution_order.is_empty())
            .map(|listing| listing.execution_order.join(" → "))
            .unwrap_or_else(|| "Not reported".to_string());
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(order, theme::text_style())))
                .wrap(Wrap { trim: true })
                .block(titled(" Execution order ")),
            order_area,
        );
    }
}

fn titled(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .title(Span::styled(title, theme::title_style()))
}
