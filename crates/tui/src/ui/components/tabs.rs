use ratatui::{Frame, layout::Rect, text::Span, widgets::Tabs};

use crate::{
    app::{App, Tab},
    theme,
    ui::components::Component,
};

#[derive(Debug, Default)]
pub struct TabsComponent;

impl Component for TabsComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(index, tab)| Span::raw(format!("{} {}", index + 1, tab.title())));
        let tabs = Tabs::new(titles)
            .select(app.tab.index())
            .style(theme::text_muted())
            .highlight_style(theme::key_style())
            .divider(Span::styled("│", theme::text_muted()));
        frame.render_widget(tabs, rect);
    }
}
