//! # Command Execution Layer
//!
//! Translates application [`Effect`]s into [`Cmd`]s and runs them as
//! background tasks. Each task resolves to a [`Msg`] that the runtime feeds
//! back into [`App::update`](crate::app::App::update), so state changes stay
//! in the app and all I/O stays here.

use std::sync::Arc;

use seodeck_engine::{LogPager, Session};
use seodeck_types::PanelId;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{App, Effect, Msg};

/// Side-effectful work executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    FetchHealth,
    /// Fetch `/agents` and rebuild the agents panel catalog.
    FetchAgents,
    FetchDependencies,
    FetchLogs(LogPager),
    Execute { panel: PanelId, operation: String },
}

/// Convert effects into commands. Duplicate commands in one batch collapse.
pub fn from_effects(app: &App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands: Vec<Cmd> = Vec::new();
    for effect in effects {
        let effect_commands = match effect {
            Effect::RefreshDashboard => vec![Cmd::FetchHealth, Cmd::FetchAgents, Cmd::FetchLogs(app.dashboard.pager)],
            Effect::LoadLogs(pager) => vec![Cmd::FetchLogs(pager)],
            Effect::LoadDependencies => vec![Cmd::FetchDependencies],
            Effect::Execute { panel, operation } => vec![Cmd::Execute { panel, operation }],
        };
        for command in effect_commands {
            if !commands.contains(&command) {
                commands.push(command);
            }
        }
    }
    commands
}

/// Spawn each command; the handles resolve to the message to deliver.
pub fn spawn_cmds(session: &Arc<Session>, commands: Vec<Cmd>) -> Vec<JoinHandle<Msg>> {
    commands
        .into_iter()
        .map(|command| {
            debug!(?command, "spawning command");
            let session = Arc::clone(session);
            tokio::spawn(async move { run_cmd(&session, command).await })
        })
        .collect()
}

async fn run_cmd(session: &Session, command: Cmd) -> Msg {
    let dashboard = session.dashboard();
    match command {
        Cmd::FetchHealth => Msg::HealthLoaded(dashboard.health().await.map_err(|error| error.to_string())),
        Cmd::FetchAgents => Msg::AgentsLoaded(session.refresh_agents().await.map_err(|error| error.to_string())),
        Cmd::FetchDependencies => {
            Msg::DependenciesLoaded(dashboard.dependencies().await.map_err(|error| error.to_string()))
        }
        Cmd::FetchLogs(mut pager) => {
            let result = dashboard.logs(&mut pager).await;
            Msg::LogsLoaded(result.map(|log| (log, pager)).map_err(|error| error.to_string()))
        }
        Cmd::Execute { panel, operation } => {
            let outcome = match session.panel(panel) {
                Some(controller) => controller.execute(&operation).await,
                None => seodeck_engine::ExecuteOutcome::UnknownOperation,
            };
            Msg::ExecutionFinished {
                panel,
                operation,
                outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use seodeck_api::{ApiClient, Config};
    use seodeck_registry::CatalogRegistry;

    use super::*;

    fn app() -> App {
        let client = ApiClient::new(Config::default().with_mock_mode(true)).expect("client");
        let registry = Arc::new(CatalogRegistry::from_embedded().expect("catalogs"));
        App::new(Arc::new(Session::new(client, registry)))
    }

    #[test]
    fn refresh_expands_to_health_agents_and_logs() {
        let app = app();
        let commands = from_effects(&app, vec![Effect::RefreshDashboard]);
        assert_eq!(
            commands,
            vec![Cmd::FetchHealth, Cmd::FetchAgents, Cmd::FetchLogs(LogPager::default())]
        );
    }

    #[test]
    fn repeated_effects_collapse() {
        let app = app();
        let commands = from_effects(
            &app,
            vec![Effect::RefreshDashboard, Effect::RefreshDashboard, Effect::LoadDependencies],
        );
        assert_eq!(commands.len(), 4);
    }

    #[tokio::test]
    async fn execute_command_reports_outcome() {
        let app = app();
        let msg = run_cmd(
            &app.session,
            Cmd::Execute {
                panel: PanelId::Orchestration,
                operation: "reset_agents".into(),
            },
        )
        .await;
        let Msg::ExecutionFinished { outcome, .. } = msg else {
            panic!("unexpected message {msg:?}");
        };
        assert!(matches!(outcome, seodeck_engine::ExecuteOutcome::Completed(_)));
    }
}
