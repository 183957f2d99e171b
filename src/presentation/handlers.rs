// Command handlers
use crate::application::plot_renderer::PlotRequest;
use crate::domain::dashboard::{Dashboard, GraphPanel};
use crate::domain::series::AlignedTable;
use crate::presentation::app_state::AppState;
use crate::presentation::cli::{PanelSelection, RenderArgs};
use chrono::SecondsFormat;
use std::io::Write;

/// Plot each selected panel; failed panels are logged and the rest still render
pub async fn render_dashboard(state: &AppState, args: &RenderArgs) -> anyhow::Result<()> {
    let dashboard = state
        .dashboard_service
        .load(&args.selection.uid)
        .await?;
    let panels = select_panels(&dashboard, &args.selection.panels)?;

    let mut failures = 0;
    for panel in panels {
        let table = match state.query_service.query(&dashboard, panel).await {
            Ok(table) => table,
            Err(e) => {
                tracing::error!("Error querying panel {}: {}", panel.display_title(), e);
                failures += 1;
                continue;
            }
        };

        let request = PlotRequest {
            title: panel.title.as_deref(),
            table: &table,
            axis_log_scale: panel.axis_log_scale,
            size: args.size(),
        };
        if let Err(e) = state.renderer.render(&request).await {
            tracing::error!("Error rendering panel {}: {:#}", panel.display_title(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} panel(s) of dashboard {} failed", failures, dashboard.uid());
    }
    Ok(())
}

/// Print each selected panel's aligned table; the first failing panel aborts
pub async fn print_tables(
    state: &AppState,
    selection: &PanelSelection,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let dashboard = state.dashboard_service.load(&selection.uid).await?;

    for panel in select_panels(&dashboard, &selection.panels)? {
        let table = state.query_service.query(&dashboard, panel).await?;
        tracing::debug!(
            "Panel {}: {} timestamps, {} series, {} gaps",
            panel.display_title(),
            table.timestamps.len(),
            table.rows.len(),
            table.gap_count()
        );
        writeln!(out, "# {}", panel.display_title())?;
        out.write_all(format_table(&table).as_bytes())?;
        writeln!(out)?;
    }
    Ok(())
}

pub async fn list_panels(state: &AppState, uid: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let dashboard = state.dashboard_service.load(uid).await?;
    out.write_all(describe_dashboard(&dashboard).as_bytes())?;
    Ok(())
}

fn select_panels<'a>(
    dashboard: &'a Dashboard,
    titles: &[String],
) -> anyhow::Result<Vec<&'a GraphPanel>> {
    if titles.is_empty() {
        return Ok(dashboard.panels().iter().collect());
    }

    let selected: Vec<&GraphPanel> = dashboard
        .panels()
        .iter()
        .filter(|panel| {
            panel
                .title
                .as_deref()
                .is_some_and(|title| titles.iter().any(|t| t.trim() == title))
        })
        .collect();

    if selected.is_empty() {
        anyhow::bail!(
            "Dashboard {} has no graph panel titled {:?}",
            dashboard.uid(),
            titles
        );
    }
    Ok(selected)
}

/// Tab separated rendering: a `time` column then one column per legend entry
pub fn format_table(table: &AlignedTable) -> String {
    let mut out = String::from("time");
    for label in table.legend() {
        out.push('\t');
        out.push_str(label);
    }
    out.push('\n');

    for (i, time) in table.timestamps.iter().enumerate() {
        out.push_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true));
        for row in &table.rows {
            out.push('\t');
            if let Some(sample) = row.values.get(i) {
                out.push_str(&sample.to_string());
            }
        }
        out.push('\n');
    }
    out
}

pub fn describe_dashboard(dashboard: &Dashboard) -> String {
    let window = dashboard.time_window();
    let mut lines = vec![
        format!(
            "Dashboard {} {}",
            dashboard.uid(),
            dashboard.title().unwrap_or("")
        )
        .trim_end()
        .to_string(),
        format!(
            "Time window: {} .. {}",
            window.from.to_rfc3339_opts(SecondsFormat::Secs, true),
            window.to.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    ];

    if !dashboard.variables().is_empty() {
        lines.push("Variables:".to_string());
        for variable in dashboard.variables() {
            let label = match variable.label.as_str() {
                "" => String::new(),
                label => format!(" \"{}\"", label),
            };
            let all = if variable.is_wildcard() { " (all)" } else { "" };
            let options: Vec<&str> = variable
                .options
                .iter()
                .map(|option| match option.text.as_str() {
                    "" => option.value.as_str(),
                    text => text,
                })
                .collect();
            lines.push(format!(
                "  ${}{} = {}{} [{}]",
                variable.name,
                label,
                variable.value,
                all,
                options.join(", ")
            ));
        }
    }

    lines.push("Graph panels:".to_string());
    for panel in dashboard.panels() {
        lines.push(format!("  {}", panel.display_title()));
        if let Some(description) = panel.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("    ({})", description));
        }
        for target in &panel.targets {
            lines.push(format!("    {}", target.expression));
        }
    }

    for skipped in dashboard.skipped_panels() {
        lines.push(format!(
            "Skipped {} panel {}",
            skipped.kind,
            skipped.title.as_deref().unwrap_or("(untitled)")
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
