//! Application state and logic for the Seodeck TUI.
//!
//! `App` owns everything the views render: the active tab, per-panel cursor
//! and editing state, the latest dashboard projections and the toast queue.
//! Panel execution state itself lives in the engine's controllers; views read
//! it through `PanelController::snapshot` at render time.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use seodeck_engine::{ExecuteOutcome, LogPager, PanelEvent, Session};
use seodeck_types::{AgentListing, Catalog, DependencyGraph, ExecutionLog, FieldKind, HealthSnapshot, PanelId};

use crate::ui::components::common::TextInputState;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Top-level tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Agents,
    Phases,
    Technical,
    OnPage,
    Local,
    OffPage,
    Logs,
    Dependencies,
}

impl Tab {
    pub const ALL: [Tab; 9] = [
        Tab::Dashboard,
        Tab::Agents,
        Tab::Phases,
        Tab::Technical,
        Tab::OnPage,
        Tab::Local,
        Tab::OffPage,
        Tab::Logs,
        Tab::Dependencies,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Agents => "Agents",
            Tab::Phases => "Phases",
            Tab::Technical => "Technical SEO",
            Tab::OnPage => "On-Page SEO",
            Tab::Local => "Local SEO",
            Tab::OffPage => "Off-Page SEO",
            Tab::Logs => "Logs",
            Tab::Dependencies => "Dependencies",
        }
    }

    /// The operation panel shown on this tab. The dashboard hosts the
    /// orchestration controls.
    pub fn panel(self) -> Option<PanelId> {
        match self {
            Tab::Dashboard => Some(PanelId::Orchestration),
            Tab::Agents => Some(PanelId::Agents),
            Tab::Phases => Some(PanelId::Phases),
            Tab::Technical => Some(PanelId::Technical),
            Tab::OnPage => Some(PanelId::OnPage),
            Tab::Local => Some(PanelId::Local),
            Tab::OffPage => Some(PanelId::OffPage),
            Tab::Logs | Tab::Dependencies => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tabs are reachable with the number keys `1`..`9`.
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

/// Where keystrokes go inside a panel tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelFocus {
    #[default]
    Operations,
    Fields,
    /// Typing into the field at `field_cursor`.
    Editing,
}

/// Cursor and editor state for one panel tab.
#[derive(Debug, Clone, Default)]
pub struct PanelViewState {
    pub cursor: usize,
    pub focus: PanelFocus,
    pub field_cursor: usize,
    pub editor: TextInputState,
    pub result_scroll: u16,
}

impl PanelViewState {
    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        self.cursor = step(self.cursor, delta, len);
    }

    pub fn move_field_cursor(&mut self, delta: isize, len: usize) {
        self.field_cursor = step(self.field_cursor, delta, len);
    }

    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// The category after `current` in `catalog`, wrapping back to "all".
pub fn next_category(catalog: &Catalog, current: Option<&str>) -> Option<String> {
    let position = current.and_then(|id| catalog.categories.iter().position(|category| category.id == id));
    let next = match position {
        None => 0,
        Some(index) => index + 1,
    };
    catalog.categories.get(next).map(|category| category.id.clone())
}

/// The option after `current` for an enum field, wrapping.
pub fn next_option(options: &[String], current: &str) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = options
        .iter()
        .position(|option| option == current)
        .map_or(0, |index| (index + 1) % options.len());
    Some(options[next].clone())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Transient notifications, newest last.
#[derive(Debug, Default)]
pub struct ToastState {
    toasts: Vec<Toast>,
}

impl ToastState {
    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel, now: Instant) {
        self.toasts.push(Toast {
            message: message.into(),
            level,
            expires_at: now + TOAST_TTL,
        });
    }

    /// Drop expired toasts; returns whether anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        before != self.toasts.len()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Latest backend projections shown on the dashboard, logs and
/// dependencies tabs.
#[derive(Debug, Default)]
pub struct DashboardData {
    pub health: Option<HealthSnapshot>,
    pub agents: Option<AgentListing>,
    pub dependencies: Option<DependencyGraph>,
    pub logs: Option<ExecutionLog>,
    pub pager: LogPager,
    pub last_error: Option<String>,
}

/// Messages delivered to the app from input handling and background tasks.
#[derive(Debug)]
pub enum Msg {
    Tick,
    HealthLoaded(Result<HealthSnapshot, String>),
    AgentsLoaded(Result<AgentListing, String>),
    DependenciesLoaded(Result<DependencyGraph, String>),
    LogsLoaded(Result<(ExecutionLog, LogPager), String>),
    ExecutionFinished {
        panel: PanelId,
        operation: String,
        outcome: ExecuteOutcome,
    },
    Panel(PanelEvent),
}

/// Side effects requested by state updates; `cmd` turns them into work.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Re-fetch health, agents and the current log page.
    RefreshDashboard,
    LoadLogs(LogPager),
    LoadDependencies,
    Execute { panel: PanelId, operation: String },
}

pub struct App {
    pub session: Arc<Session>,
    pub tab: Tab,
    pub editing_target: bool,
    pub target_input: TextInputState,
    pub panels: HashMap<PanelId, PanelViewState>,
    pub dashboard: DashboardData,
    pub toasts: ToastState,
    pub executing: bool,
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            tab: Tab::default(),
            editing_target: false,
            target_input: TextInputState::new(),
            panels: HashMap::new(),
            dashboard: DashboardData::default(),
            toasts: ToastState::default(),
            executing: false,
            throbber_idx: 0,
            should_quit: false,
        }
    }

    pub fn panel_view(&mut self, panel: PanelId) -> &mut PanelViewState {
        self.panels.entry(panel).or_default()
    }

    /// Switch tabs and return whatever the new tab needs loaded.
    pub fn switch_to(&mut self, tab: Tab) -> Vec<Effect> {
        self.tab = tab;
        match tab {
            Tab::Logs => vec![Effect::LoadLogs(self.dashboard.pager)],
            Tab::Dependencies => vec![Effect::LoadDependencies],
            Tab::Agents if self.dashboard.agents.is_none() => vec![Effect::RefreshDashboard],
            _ => Vec::new(),
        }
    }

    pub fn begin_target_edit(&mut self) {
        self.editing_target = true;
        let current = self.session.target_url().unwrap_or_default();
        self.target_input.set_input(current.clone());
        self.target_input.set_cursor(current.len());
    }

    pub fn commit_target_edit(&mut self) {
        self.editing_target = false;
        self.session.set_target_url(self.target_input.input());
    }

    pub fn cancel_target_edit(&mut self) {
        self.editing_target = false;
    }

    pub fn clear_target(&mut self) {
        self.session.clear_target_url();
        self.target_input.set_input("");
        self.toasts.push("Target URL cleared", ToastLevel::Info, Instant::now());
    }

    /// Apply a message and return any follow-up effects.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let now = Instant::now();
        match msg {
            Msg::Tick => {
                self.toasts.prune(now);
                self.executing = self.session.panels().any(|panel| panel.is_executing());
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER.len();
                }
                Vec::new()
            }
            Msg::HealthLoaded(result) => {
                match result {
                    Ok(health) => self.dashboard.health = Some(health),
                    Err(error) => self.record_load_error("health", error, now),
                }
                Vec::new()
            }
            Msg::AgentsLoaded(result) => {
                match result {
                    Ok(agents) => self.dashboard.agents = Some(agents),
                    Err(error) => self.record_load_error("agents", error, now),
                }
                Vec::new()
            }
            Msg::DependenciesLoaded(result) => {
                match result {
                    Ok(graph) => self.dashboard.dependencies = Some(graph),
                    Err(error) => self.record_load_error("dependencies", error, now),
                }
                Vec::new()
            }
            Msg::LogsLoaded(result) => {
                match result {
                    Ok((log, pager)) => {
                        self.dashboard.pager = pager;
                        self.dashboard.logs = Some(log);
                    }
                    Err(error) => self.record_load_error("execution log", error, now),
                }
                Vec::new()
            }
            Msg::ExecutionFinished { panel, outcome, .. } => {
                self.panel_view(panel).result_scroll = 0;
                match outcome {
                    ExecuteOutcome::Busy => {
                        self.toasts.push("An operation is already running on this panel", ToastLevel::Info, now)
                    }
                    ExecuteOutcome::UnknownOperation => {
                        self.toasts.push("Operation is no longer available", ToastLevel::Error, now)
                    }
                    _ => {}
                }
                Vec::new()
            }
            Msg::Panel(event) => {
                let level = if event.is_error() {
                    ToastLevel::Error
                } else if matches!(event, PanelEvent::Succeeded { .. }) {
                    ToastLevel::Success
                } else {
                    ToastLevel::Info
                };
                match event {
                    PanelEvent::RefreshRequested { .. } => vec![Effect::RefreshDashboard],
                    other => {
                        self.toasts.push(other.summary(), level, now);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn record_load_error(&mut self, what: &str, error: String, now: Instant) {
        let message = format!("Failed to load {what}: {error}");
        self.toasts.push(message.clone(), ToastLevel::Error, now);
        self.dashboard.last_error = Some(message);
    }

    /// Enum option cycling for the focused field of `panel`.
    pub fn cycle_enum_field(&mut self, panel: PanelId, operation_id: &str) -> bool {
        let Some(controller) = self.session.panel(panel).cloned() else {
            return false;
        };
        let catalog = controller.catalog();
        let Some(operation) = catalog.find(operation_id) else {
            return false;
        };
        let field_cursor = self.panel_view(panel).field_cursor;
        let names = operation.editable_field_names();
        let Some(field) = names.get(field_cursor).and_then(|name| operation.field(name)) else {
            return false;
        };
        if field.kind != FieldKind::Enum {
            return false;
        }
        let current = controller.field_value(operation_id, &field.name);
        let current = if current.is_empty() { field.default.clone().unwrap_or_default() } else { current };
        if let Some(next) = next_option(&field.options, &current) {
            controller.update_field(operation_id, &field.name, next);
        }
        true
    }
}

pub const THROBBER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[cfg(test)]
mod tests {
    use super::*;
    use seodeck_types::Category;

    fn catalog_with(categories: &[&str]) -> Catalog {
        Catalog {
            panel: PanelId::Technical,
            title: "Technical".into(),
            description: String::new(),
            categories: categories
                .iter()
                .map(|id| Category {
                    id: id.to_string(),
                    label: id.to_string(),
                })
                .collect(),
            operations: Vec::new(),
        }
    }

    #[test]
    fn tabs_wrap_both_ways() {
        assert_eq!(Tab::Dependencies.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Dependencies);
        assert_eq!(Tab::from_digit('4'), Some(Tab::Technical));
        assert_eq!(Tab::from_digit('0'), None);
    }

    #[test]
    fn dashboard_tab_hosts_orchestration_panel() {
        assert_eq!(Tab::Dashboard.panel(), Some(PanelId::Orchestration));
        assert_eq!(Tab::Logs.panel(), None);
    }

    #[test]
    fn category_cycle_returns_to_all() {
        let catalog = catalog_with(&["crawl", "speed"]);
        assert_eq!(next_category(&catalog, None).as_deref(), Some("crawl"));
        assert_eq!(next_category(&catalog, Some("crawl")).as_deref(), Some("speed"));
        assert_eq!(next_category(&catalog, Some("speed")), None);
    }

    #[test]
    fn enum_options_wrap() {
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(next_option(&options, "").as_deref(), Some("a"));
        assert_eq!(next_option(&options, "a").as_deref(), Some("b"));
        assert_eq!(next_option(&options, "b").as_deref(), Some("a"));
        assert_eq!(next_option(&[], "a"), None);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut view = PanelViewState::default();
        view.move_cursor(-1, 3);
        assert_eq!(view.cursor, 0);
        view.move_cursor(5, 3);
        assert_eq!(view.cursor, 2);
        view.clamp(1);
        assert_eq!(view.cursor, 0);
        view.move_cursor(1, 0);
        assert_eq!(view.cursor, 0);
    }

    #[test]
    fn toasts_expire() {
        let now = Instant::now();
        let mut toasts = ToastState::default();
        toasts.push("hello", ToastLevel::Info, now);
        assert!(!toasts.prune(now));
        assert!(toasts.prune(now + TOAST_TTL));
        assert!(toasts.is_empty());
    }
}
