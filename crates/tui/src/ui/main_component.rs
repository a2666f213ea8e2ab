//! Root view: routes keys to the header editor, the active tab's body or the
//! global shortcuts, and lays out every component.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    app::{App, Effect, Tab},
    ui::components::{
        Component, DependenciesComponent, HeaderComponent, LogsComponent, OverviewComponent, PanelComponent,
        StatusBarComponent, TabsComponent,
    },
};

#[derive(Debug, Default)]
pub struct MainView {
    header: HeaderComponent,
    tabs: TabsComponent,
    overview: OverviewComponent,
    panel: PanelComponent,
    logs: LogsComponent,
    dependencies: DependenciesComponent,
    status_bar: StatusBarComponent,
}

impl MainView {
    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        if self.header.is_capturing_text(app) {
            return self.header.handle_key_events(app, key);
        }
        if self.panel.is_capturing_text(app) {
            return self.panel.handle_key_events(app, key);
        }

        match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
                Vec::new()
            }
            KeyCode::Tab => app.switch_to(app.tab.next()),
            KeyCode::BackTab => app.switch_to(app.tab.prev()),
            KeyCode::Char(digit) if digit.is_ascii_digit() => {
                Tab::from_digit(digit).map(|tab| app.switch_to(tab)).unwrap_or_default()
            }
            KeyCode::Char('u') => {
                app.begin_target_edit();
                Vec::new()
            }
            KeyCode::Char('x') => {
                app.clear_target();
                Vec::new()
            }
            KeyCode::Char('r') => match app.tab {
                Tab::Logs => vec![Effect::LoadLogs(app.dashboard.pager)],
                Tab::Dependencies => vec![Effect::LoadDependencies],
                _ => vec![Effect::RefreshDashboard],
            },
            _ => match app.tab {
                Tab::Logs => self.logs.handle_key_events(app, key),
                Tab::Dependencies => Vec::new(),
                _ => self.panel.handle_key_events(app, key),
            },
        }
    }

    pub fn render(&mut self, frame: &mut Frame, app: &mut App) {
        let [header, tabs, body, status] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.header.render(frame, header, app);
        self.tabs.render(frame, tabs, app);
        match app.tab {
            Tab::Dashboard => {
                let [overview, panel] = Layout::vertical([Constraint::Length(6), Constraint::Min(5)]).areas(body);
                self.overview.render(frame, overview, app);
                self.panel.render(frame, panel, app);
            }
            Tab::Logs => self.logs.render(frame, body, app),
            Tab::Dependencies => self.dependencies.render(frame, body, app),
            _ => self.panel.render(frame, body, app),
        }
        self.status_bar.render(frame, status, app);
    }
}
