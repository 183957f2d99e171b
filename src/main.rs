// Main entry point - Dependency injection and command dispatch
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::query_service::QueryService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::gnuplot::GnuPlot;
use crate::infrastructure::grafana_client::GrafanaClient;
use crate::presentation::app_state::AppState;
use crate::presentation::cli::{Cli, Command};
use crate::presentation::handlers::{list_panels, print_tables, render_dashboard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for plots and tables
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_config(cli.config.as_deref(), &cli.overrides())?;

    // Create backend client (infrastructure layer)
    let backend = Arc::new(GrafanaClient::new(&config.grafana)?);

    // Create services (application layer)
    let state = AppState {
        dashboard_service: DashboardService::new(backend.clone()),
        query_service: QueryService::new(backend, config.query.step()),
        renderer: Arc::new(GnuPlot::default()),
    };

    match &cli.command {
        Command::Render(args) => render_dashboard(&state, args).await?,
        Command::Table(selection) => print_tables(&state, selection, &mut std::io::stdout()).await?,
        Command::Panels { uid } => list_panels(&state, uid, &mut std::io::stdout()).await?,
    }

    Ok(())
}
