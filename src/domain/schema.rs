// Wire documents returned by the dashboard lookup and range query endpoints
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `GET /api/dashboards/uid/<uid>` response body
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardEnvelope {
    pub dashboard: DashboardDocument,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardDocument {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub time: TimeDocument,
    /// Kept loosely typed so the key set can be validated before decoding
    #[serde(default)]
    pub templating: Map<String, Value>,
    #[serde(default)]
    pub panels: Vec<PanelDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeDocument {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDocument {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub current: CurrentSelection,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentSelection {
    pub value: SelectionValue,
}

/// Grafana stores the current selection either as a scalar or as a list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SelectionValue {
    Single(String),
    Multi(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionDocument {
    pub value: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelDocument {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub yaxes: Option<Vec<AxisDocument>>,
    #[serde(default)]
    pub targets: Vec<TargetDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AxisDocument {
    #[serde(rename = "logBase", default)]
    pub log_base: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetDocument {
    #[serde(default)]
    pub expr: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub hide: Option<bool>,
    #[serde(rename = "legendFormat", default)]
    pub legend_format: Option<String>,
}

/// Prometheus `query_range` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQueryEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<RangeQueryData>,
    #[serde(rename = "errorType", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeQueryData {
    #[serde(rename = "resultType", default)]
    pub result_type: Option<String>,
    #[serde(default)]
    pub result: Value,
}

/// One element of a `matrix` result
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixSeries {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_value_accepts_scalar_and_list() {
        let single: SelectionValue = serde_json::from_value(json!("prod")).unwrap();
        assert_eq!(single, SelectionValue::Single("prod".to_string()));

        let multi: SelectionValue = serde_json::from_value(json!(["$__all"])).unwrap();
        assert_eq!(multi, SelectionValue::Multi(vec!["$__all".to_string()]));
    }

    #[test]
    fn test_panel_document_optional_fields() {
        let panel: PanelDocument = serde_json::from_value(json!({
            "type": "row",
            "title": "Section"
        }))
        .unwrap();

        assert_eq!(panel.kind, "row");
        assert!(panel.description.is_none());
        assert!(panel.yaxes.is_none());
        assert!(panel.targets.is_empty());
    }

    #[test]
    fn test_matrix_series_decodes_prometheus_samples() {
        let series: MatrixSeries = serde_json::from_value(json!({
            "metric": {"job": "node"},
            "values": [[1435781430.781, "1"], [1435781445.781, "NaN"]]
        }))
        .unwrap();

        assert_eq!(series.metric.get("job").map(String::as_str), Some("node"));
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.values[1].1, "NaN");
    }
}
