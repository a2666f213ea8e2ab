//! Agent dependency graph as a table of upstream and downstream agents.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Row, Table},
};

use crate::{app::App, theme, ui::components::Component};

#[derive(Debug, Default)]
pub struct DependenciesComponent;

impl Component for DependenciesComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let graph = app.dashboard.dependencies.as_ref();
        let title = match graph {
            Some(graph) => format!(
                " Dependencies · {} agents · {} independent ",
                graph.total_agents,
                graph.independent_agents().count()
            ),
            None => " Dependencies · loading ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(true))
            .title(Span::styled(title, theme::title_style()));

        let rows: Vec<Row> = graph
            .into_iter()
            .flat_map(|graph| graph.dependency_graph.iter())
            .map(|(agent, node)| {
                Row::new(vec![
                    agent.clone(),
                    list_or_dash(&node.dependencies),
                    list_or_dash(&node.dependents),
                ])
                .style(theme::text_style())
            })
            .collect();

        let header = Row::new(vec!["Agent", "Depends on", "Required by"]).style(theme::title_style());
        let table = Table::new(
            rows,
            [Constraint::Percentage(30), Constraint::Percentage(35), Constraint::Percentage(35)],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, rect);
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() { "-".to_string() } else { items.join(", ") }
}
