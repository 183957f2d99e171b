// Backend trait for dashboard lookup and range queries
use crate::domain::error::Result;
use crate::domain::schema::{DashboardDocument, RangeQueryEnvelope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Parameters of one range query
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub expression: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Fetch a dashboard definition by uid.
    /// Fails with `DashboardNotFound` when the backend reports it missing.
    async fn dashboard_by_uid(&self, uid: &str) -> Result<DashboardDocument>;

    /// Execute a range query and return the raw response envelope
    async fn query_range(&self, query: &RangeQuery) -> Result<RangeQueryEnvelope>;
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::domain::error::DashboardError;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory backend serving canned documents and query envelopes
    #[derive(Default)]
    pub struct FakeBackend {
        dashboards: HashMap<String, Value>,
        responses: HashMap<String, Value>,
        queries: Mutex<Vec<RangeQuery>>,
    }

    impl FakeBackend {
        pub fn with_dashboard(mut self, uid: &str, document: Value) -> Self {
            self.dashboards.insert(uid.to_string(), document);
            self
        }

        pub fn with_response(mut self, expression: &str, envelope: Value) -> Self {
            self.responses.insert(expression.to_string(), envelope);
            self
        }

        pub fn recorded_queries(&self) -> Vec<RangeQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetricsBackend for FakeBackend {
        async fn dashboard_by_uid(&self, uid: &str) -> Result<DashboardDocument> {
            let document = self
                .dashboards
                .get(uid)
                .ok_or_else(|| DashboardError::DashboardNotFound(uid.to_string()))?;
            Ok(serde_json::from_value(document.clone())?)
        }

        async fn query_range(&self, query: &RangeQuery) -> Result<RangeQueryEnvelope> {
            self.queries.lock().unwrap().push(query.clone());
            let envelope = self.responses.get(&query.expression).ok_or_else(|| {
                DashboardError::BackendQuery {
                    status: "404".to_string(),
                    detail: format!("no canned response for `{}`", query.expression),
                }
            })?;
            Ok(serde_json::from_value(envelope.clone())?)
        }
    }
}
