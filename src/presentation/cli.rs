// Command line interface
use crate::application::plot_renderer::TerminalSize;
use crate::infrastructure::config::ConfigOverrides;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ascii-grafana",
    version,
    about = "Show grafana dashboards in a terminal"
)]
pub struct Cli {
    /// Config file; defaults to config/grafana.{toml,yaml,json} when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Grafana base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Grafana API key, sent as a bearer token
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Id of the Prometheus datasource proxied by Grafana
    #[arg(long, global = true)]
    pub datasource_id: Option<u32>,

    /// Range query step in seconds
    #[arg(long, global = true)]
    pub step: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plot every graph panel of a dashboard
    Render(RenderArgs),
    /// Print each graph panel's aligned data as tab separated text
    Table(PanelSelection),
    /// List the dashboard's time window, variables and panels
    Panels {
        /// Dashboard uid
        uid: String,
    },
}

#[derive(Args, Debug)]
pub struct PanelSelection {
    /// Dashboard uid
    pub uid: String,

    /// Only panels with this title (repeatable)
    #[arg(long = "panel")]
    pub panels: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub selection: PanelSelection,

    /// Plot height in character rows
    #[arg(long, default_value_t = 24)]
    pub rows: u16,

    /// Plot width in character columns
    #[arg(long, default_value_t = 80)]
    pub cols: u16,
}

impl RenderArgs {
    pub fn size(&self) -> TerminalSize {
        TerminalSize {
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            datasource_id: self.datasource_id,
            step_seconds: self.step,
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_arguments() {
        let cli = Cli::parse_from([
            "ascii-grafana",
            "render",
            "abc",
            "--panel",
            "CPU",
            "--panel",
            "Memory",
            "--cols",
            "120",
            "--url",
            "http://grafana:3000",
            "-vv",
        ]);

        assert_eq!(cli.log_level(), "trace");
        assert_eq!(cli.overrides().url.as_deref(), Some("http://grafana:3000"));
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.selection.uid, "abc");
        assert_eq!(args.selection.panels, vec!["CPU", "Memory"]);
        assert_eq!(args.size(), TerminalSize { rows: 24, cols: 120 });
    }

    #[test]
    fn test_panels_command() {
        let cli = Cli::parse_from(["ascii-grafana", "--step", "30", "panels", "abc"]);
        assert_eq!(cli.overrides().step_seconds, Some(30));
        assert!(matches!(cli.command, Command::Panels { uid } if uid == "abc"));
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
