// Dashboard service - Use case for loading a dashboard definition
use crate::application::metrics_backend::MetricsBackend;
use crate::domain::dashboard::{
    AxisLogScale, Dashboard, GraphPanel, PanelKind, QueryTarget, SkippedPanel, TimeWindow,
};
use crate::domain::error::{DashboardError, Result};
use crate::domain::schema::{AxisDocument, PanelDocument};
use crate::domain::templating::extract_variables;
use crate::domain::time_spec;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const GRAPH_PANEL: &str = "graph";
const TIME_SERIES_FORMAT: &str = "time_series";

#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn MetricsBackend>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    pub async fn load(&self, uid: &str) -> Result<Dashboard> {
        self.load_at(uid, Utc::now()).await
    }

    /// Load a dashboard resolving both ends of its time window against `now`
    pub async fn load_at(&self, uid: &str, now: DateTime<Utc>) -> Result<Dashboard> {
        let document = self.backend.dashboard_by_uid(uid).await?;

        let from = time_spec::resolve(&document.time.from, now)?;
        let to = time_spec::resolve(&document.time.to, now)?;
        let variables = extract_variables(&document.templating)?;

        let mut panels = Vec::new();
        let mut skipped = Vec::new();
        for panel in document.panels {
            match read_panel(panel)? {
                PanelKind::Graph(graph) => panels.push(graph),
                PanelKind::Unsupported(panel) => {
                    tracing::debug!(
                        "Skipping panel {:?} of type {}",
                        panel.title.as_deref().unwrap_or(""),
                        panel.kind
                    );
                    skipped.push(panel);
                }
            }
        }

        tracing::debug!(
            "Loaded dashboard {}: {} variables, {} graph panels, {} skipped",
            uid,
            variables.len(),
            panels.len(),
            skipped.len()
        );

        Ok(Dashboard::new(
            document.uid.unwrap_or_else(|| uid.to_string()),
            document.title.map(|t| t.trim().to_string()),
            TimeWindow::new(from, to),
            variables,
            panels,
            skipped,
        ))
    }
}

/// Classify a panel definition, building a [`GraphPanel`] for `graph` panels
pub fn read_panel(panel: PanelDocument) -> Result<PanelKind> {
    let title = panel.title.map(|t| t.trim().to_string());

    if panel.kind != GRAPH_PANEL {
        return Ok(PanelKind::Unsupported(SkippedPanel {
            title,
            kind: panel.kind,
        }));
    }

    let description = panel.description.map(|d| d.trim().to_string());
    let axis_log_scale = panel.yaxes.as_deref().and_then(read_axes);

    let mut targets = Vec::new();
    for target in panel.targets {
        let format = target.format.as_deref().unwrap_or(TIME_SERIES_FORMAT);
        if format != TIME_SERIES_FORMAT {
            return Err(DashboardError::UnsupportedPanelFormat {
                panel: title.clone().unwrap_or_default(),
                format: format.to_string(),
            });
        }

        if target.hide.unwrap_or(false) {
            continue;
        }

        targets.push(QueryTarget {
            expression: target.expr,
            legend_template: target.legend_format.filter(|f| !f.trim().is_empty()),
        });
    }

    Ok(PanelKind::Graph(GraphPanel {
        title,
        description,
        axis_log_scale,
        targets,
    }))
}

fn read_axes(axes: &[AxisDocument]) -> Option<AxisLogScale> {
    let log_base = |index: usize| {
        axes.get(index)
            .and_then(|axis| axis.log_base)
            .unwrap_or(1.0)
    };

    if axes.is_empty() {
        return None;
    }

    Some(AxisLogScale {
        primary: log_base(0),
        secondary: log_base(1),
    })
}
