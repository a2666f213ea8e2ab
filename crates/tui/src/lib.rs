//! # Seodeck TUI
//!
//! Terminal dashboard for the SEO agents backend, built on Ratatui.
//!
//! - Header with the API mode banner, system health and the global target URL
//! - One tab per operation panel plus logs and the dependency graph
//! - Operations are expanded, filled in and run from the keyboard; results
//!   render as pretty-printed JSON
//!
//! State lives in [`app::App`]; side effects are described as `Effect`s and
//! executed by the `cmd` layer on background tasks.

mod app;
mod cmd;
mod theme;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use seodeck_engine::Session;

/// Run the TUI until the user quits. The session is torn down on exit.
pub async fn run(session: Arc<Session>) -> Result<()> {
    ui::runtime::run_app(session).await
}
