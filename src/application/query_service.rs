// Query service - Executes a panel's targets and aligns the returned series
use crate::application::metrics_backend::{MetricsBackend, RangeQuery};
use crate::domain::dashboard::{Dashboard, GraphPanel};
use crate::domain::error::{DashboardError, Result};
use crate::domain::legend::legend_label;
use crate::domain::schema::{MatrixSeries, RangeQueryEnvelope};
use crate::domain::series::{from_unix_seconds, AlignedTable, SeriesResult};
use crate::domain::templating::substitute;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_STEP: Duration = Duration::from_secs(10);

const SUCCESS_STATUS: &str = "success";
const MATRIX_RESULT: &str = "matrix";

#[derive(Clone)]
pub struct QueryService {
    backend: Arc<dyn MetricsBackend>,
    step: Duration,
}

impl QueryService {
    pub fn new(backend: Arc<dyn MetricsBackend>, step: Duration) -> Self {
        Self { backend, step }
    }

    /// Run every target of `panel` in order and merge the series into one table.
    ///
    /// Any failing target aborts the whole panel.
    pub async fn query(&self, dashboard: &Dashboard, panel: &GraphPanel) -> Result<AlignedTable> {
        let (start, end) = dashboard.time_window().bounds();
        let mut series = Vec::new();

        for target in &panel.targets {
            let expression = substitute(&target.expression, dashboard.variables());
            tracing::debug!(
                "Querying {} for panel {}",
                expression,
                panel.display_title()
            );

            let query = RangeQuery {
                expression,
                start,
                end,
                step: self.step,
            };
            let envelope = self.backend.query_range(&query).await?;

            for matrix in matrix_result(envelope, &query.expression)? {
                let result = read_series(matrix, &query.expression)?;
                let label = legend_label(target.legend_template.as_deref(), &result.labels);
                series.push((label, result));
            }
        }

        if series.is_empty() {
            return Err(DashboardError::EmptySeriesResult(format!(
                "panel {}",
                panel.display_title()
            )));
        }

        Ok(AlignedTable::align(series))
    }
}

/// Validate a range query envelope and return its series
fn matrix_result(envelope: RangeQueryEnvelope, expression: &str) -> Result<Vec<MatrixSeries>> {
    match envelope.status.as_deref() {
        Some(SUCCESS_STATUS) => {}
        Some(status) => {
            return Err(DashboardError::BackendQuery {
                status: status.to_string(),
                detail: format!(
                    "{}: {}",
                    envelope.error_type.unwrap_or_default(),
                    envelope.error.unwrap_or_default()
                ),
            });
        }
        None => {
            return Err(DashboardError::BackendQuery {
                status: "missing".to_string(),
                detail: format!("no status in response to `{}`", expression),
            });
        }
    }

    let data = envelope.data.ok_or_else(|| {
        DashboardError::UnsupportedResultShape(format!("no data in response to `{}`", expression))
    })?;

    match data.result_type.as_deref() {
        Some(MATRIX_RESULT) => {}
        other => {
            return Err(DashboardError::UnsupportedResultShape(format!(
                "don't know how to handle {} data",
                other.unwrap_or("untyped")
            )));
        }
    }

    let series: Vec<MatrixSeries> = serde_json::from_value(data.result)
        .map_err(|e| DashboardError::UnsupportedResultShape(e.to_string()))?;

    if series.is_empty() {
        return Err(DashboardError::EmptySeriesResult(expression.to_string()));
    }

    Ok(series)
}

fn read_series(matrix: MatrixSeries, expression: &str) -> Result<SeriesResult> {
    let mut result = SeriesResult::new(matrix.metric);

    for (timestamp, value) in matrix.values {
        let time = from_unix_seconds(timestamp).ok_or_else(|| DashboardError::MalformedSample {
            value: timestamp.to_string(),
            expression: expression.to_string(),
        })?;
        let value: f64 = value.parse().map_err(|_| DashboardError::MalformedSample {
            value: value.clone(),
            expression: expression.to_string(),
        })?;
        result.insert(time, value);
    }

    Ok(result)
}
