use std::{fs::OpenOptions, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use seodeck_api::{ApiClient, Config};
use seodeck_engine::{ExecuteOutcome, Session};
use seodeck_registry::{CatalogRegistry, RegistryError};
use seodeck_types::PanelId;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// Terminal dashboard and CLI for the SEO agents backend.
///
/// Without a subcommand the interactive dashboard starts.
#[derive(Debug, Parser)]
#[command(name = "seodeck", version, about)]
struct Cli {
    /// Backend base URL (overrides SEODECK_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Serve every request from built-in mock data
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show system health
    Health,
    /// List registered agents and their status
    Agents,
    /// Show the agent dependency graph
    Deps,
    /// Show a page of the execution log
    Logs {
        #[arg(long, default_value_t = seodeck_engine::LOG_PAGE_SIZE)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// List or search catalog operations
    Catalog {
        #[arg(long)]
        panel: Option<PanelId>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Run one catalog operation
    Run {
        panel: PanelId,
        operation: String,
        /// Target site URL
        #[arg(long)]
        url: Option<String>,
        /// Input field value, repeatable
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Trigger a single agent
    TriggerAgent {
        name: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Trigger one orchestration phase
    TriggerPhase {
        phase: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Run the orchestration core
    Orchestrate {
        #[arg(long)]
        url: Option<String>,
    },
    /// Trigger every agent in execution order
    TriggerAll {
        #[arg(long)]
        no_retry_failed: bool,
        #[arg(long, default_value_t = 3)]
        max_retries: u32,
    },
    /// Clear all agent state and logs
    Reset,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none())?;

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config = config.with_base_url(api_url);
    }
    if cli.mock {
        config = config.with_mock_mode(true);
    }
    debug!(base_url = %config.base_url, mock_mode = config.mock_mode, "resolved configuration");

    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    let registry = Arc::new(CatalogRegistry::from_embedded().context("failed to load operation catalogs")?);
    let session = Arc::new(Session::new(client, registry));

    match cli.command {
        None => seodeck_tui::run(session).await,
        Some(command) => run_command(&session, command).await,
    }
}

/// Logs go to stderr for subcommands and to a file while the TUI owns the
/// terminal.
fn init_tracing(tui: bool) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if tui {
        let path = log_file_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        let _ = builder.with_ansi(false).with_writer(std::sync::Mutex::new(file)).try_init();
    } else {
        let _ = builder.with_writer(std::io::stderr).try_init();
    }
    Ok(())
}

fn log_file_path() -> PathBuf {
    std::env::temp_dir().join("seodeck.log")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(session: &Session, command: Command) -> Result<()> {
    let client = session.client();
    match command {
        Command::Health => print_json(&client.health().await?),
        Command::Agents => print_json(&client.agents().await?),
        Command::Deps => print_json(&client.agent_dependencies().await?),
        Command::Logs { limit, offset } => print_json(&client.execution_log(limit, offset).await?),
        Command::Catalog {
            panel,
            category,
            search,
        } => list_catalog(session, panel, category.as_deref(), search.as_deref()).await,
        Command::Run {
            panel,
            operation,
            url,
            fields,
        } => run_operation(session, panel, &operation, url.as_deref(), fields).await,
        Command::TriggerAgent { name, url } => print_json(&client.trigger_agent(&name, url.as_deref()).await?.raw),
        Command::TriggerPhase { phase, url } => print_json(&client.trigger_phase(&phase, url.as_deref()).await?.raw),
        Command::Orchestrate { url } => print_json(&client.orchestrate(url.as_deref()).await?.raw),
        Command::TriggerAll {
            no_retry_failed,
            max_retries,
        } => print_json(&client.trigger_all_agents(!no_retry_failed, max_retries).await?),
        Command::Reset => print_json(&client.reset_agents().await?),
    }
}

async fn list_catalog(
    session: &Session,
    panel: Option<PanelId>,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    if let Some(query) = search {
        return print_json(&session.registry().search(query));
    }
    if panel == Some(PanelId::Agents) {
        session.refresh_agents().await.context("failed to load agents")?;
    }

    let mut rows = Vec::new();
    for controller in session.panels() {
        if panel.is_some_and(|wanted| wanted != controller.panel()) {
            continue;
        }
        let catalog = controller.catalog();
        rows.extend(catalog.filter(category).map(|operation| {
            json!({
                "panel": catalog.panel,
                "id": operation.id,
                "label": operation.label,
                "category": operation.category,
                "method": operation.method,
                "endpoint": operation.endpoint,
            })
        }));
    }
    print_json(&rows)
}

async fn run_operation(
    session: &Session,
    panel: PanelId,
    operation: &str,
    url: Option<&str>,
    fields: Vec<(String, String)>,
) -> Result<()> {
    if panel == PanelId::Agents {
        session.refresh_agents().await.context("failed to load agents")?;
    }
    let controller = session
        .panel(panel)
        .ok_or(RegistryError::UnknownPanel { panel })?;
    let catalog = controller.catalog();
    let descriptor = catalog.find(operation).ok_or_else(|| RegistryError::UnknownOperation {
        panel,
        operation: operation.to_string(),
    })?;
    let editable = descriptor.editable_field_names();
    if let Some((name, _)) = fields.iter().find(|(name, _)| !editable.contains(&name.as_str())) {
        return Err(RegistryError::UnknownInput {
            panel,
            operation: operation.to_string(),
            field: name.clone(),
            expected: if editable.is_empty() { "none".to_string() } else { editable.join(", ") },
        }
        .into());
    }

    if let Some(url) = url {
        session.set_target_url(url);
    }
    for (name, value) in fields {
        controller.update_field(operation, &name, value);
    }

    match controller.execute(operation).await {
        ExecuteOutcome::Completed(result) => print_json(&result.raw),
        ExecuteOutcome::Failed(error) => Err(anyhow!(error)).with_context(|| format!("{operation} failed")),
        ExecuteOutcome::Rejected(error) => Err(anyhow!(error)).context("invalid input"),
        ExecuteOutcome::Busy => bail!("{operation} is already running"),
        ExecuteOutcome::Cancelled => bail!("{operation} was cancelled"),
        ExecuteOutcome::UnknownOperation => bail!("unknown operation '{operation}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_arguments_split_on_first_equals() {
        assert_eq!(parse_field("settings={\"a\":1}").unwrap(), ("settings".into(), "{\"a\":1}".into()));
        assert_eq!(parse_field("keywords=").unwrap(), ("keywords".into(), String::new()));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn run_subcommand_parses_panel_aliases_and_fields() {
        let cli = Cli::try_parse_from([
            "seodeck",
            "--mock",
            "run",
            "technical-seo",
            "ssl_https_check",
            "--field",
            "depth=2",
            "--field",
            "mode=fast",
        ])
        .unwrap();
        assert!(cli.mock);
        let Some(Command::Run { panel, fields, .. }) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(panel, PanelId::Technical);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["seodeck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn run_in_mock_mode_completes() {
        let client = ApiClient::new(Config::default().with_mock_mode(true)).unwrap();
        let session = Session::new(client, Arc::new(CatalogRegistry::from_embedded().unwrap()));
        run_operation(&session, PanelId::Technical, "ssl_https_check", Some("https://example.com"), Vec::new())
            .await
            .unwrap();
        let error = run_operation(&session, PanelId::Technical, "nope", None, Vec::new())
            .await
            .unwrap_err();
        assert!(error.to_string().contains("no operation 'nope'"));
    }

    #[tokio::test]
    async fn run_rejects_undeclared_field_names() {
        let client = ApiClient::new(Config::default().with_mock_mode(true)).unwrap();
        let session = Session::new(client, Arc::new(CatalogRegistry::from_embedded().unwrap()));
        let error = run_operation(
            &session,
            PanelId::Technical,
            "ssl_https_check",
            Some("https://example.com"),
            vec![("typo".into(), "x".into())],
        )
        .await
        .unwrap_err();
        let message = error.to_string();
        assert!(message.contains("no input 'typo'"), "{message}");
        assert!(!session.panel(PanelId::Technical).unwrap().is_executing());
    }
}
