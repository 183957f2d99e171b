// Error kinds raised while loading dashboards and querying panels
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Unsupported time spec `{spec}`{}", unit_suffix(.unit))]
    UnsupportedTimeSpec { spec: String, unit: Option<String> },

    #[error("Unsupported templating schema: {0}")]
    UnsupportedTemplatingSchema(String),

    #[error("Unable to find dashboard `{0}`")]
    DashboardNotFound(String),

    #[error("Backend request failed with status {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Backend query failed ({status}): {detail}")]
    BackendQuery { status: String, detail: String },

    #[error("Panel `{panel}` has unsupported target format `{format}`, only time_series is supported")]
    UnsupportedPanelFormat { panel: String, format: String },

    #[error("Unsupported query result shape: {0}")]
    UnsupportedResultShape(String),

    #[error("Query `{0}` returned no series")]
    EmptySeriesResult(String),

    #[error("Malformed sample `{value}` in result of `{expression}`")]
    MalformedSample { value: String, expression: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

fn unit_suffix(unit: &Option<String>) -> String {
    match unit {
        Some(unit) => format!(" (unit `{}`)", unit),
        None => String::new(),
    }
}
