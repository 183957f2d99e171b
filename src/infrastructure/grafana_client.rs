// Grafana HTTP API client implementation
use crate::application::metrics_backend::{MetricsBackend, RangeQuery};
use crate::domain::error::{DashboardError, Result};
use crate::domain::schema::{DashboardDocument, DashboardEnvelope, RangeQueryEnvelope};
use crate::infrastructure::config::GrafanaSettings;
use async_trait::async_trait;
use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    client: reqwest::Client,
    host: String,
    api_key: String,
    datasource_id: u32,
}

impl GrafanaClient {
    pub fn new(settings: &GrafanaSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            host: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            datasource_id: settings.datasource_id,
        })
    }

    fn dashboard_url(&self, uid: &str) -> String {
        format!("{}/api/dashboards/uid/{}", self.host, urlencoding::encode(uid))
    }

    fn query_range_url(&self) -> String {
        format!(
            "{}/api/datasources/proxy/{}/api/v1/query_range",
            self.host, self.datasource_id
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl MetricsBackend for GrafanaClient {
    async fn dashboard_by_uid(&self, uid: &str) -> Result<DashboardDocument> {
        let response = self.get(&self.dashboard_url(uid)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DashboardError::DashboardNotFound(uid.to_string()));
        }

        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("Error retrieving dashboard {}: {} {}", uid, status, body);
            return Err(DashboardError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: DashboardEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.dashboard)
    }

    async fn query_range(&self, query: &RangeQuery) -> Result<RangeQueryEnvelope> {
        let params = [
            ("query", query.expression.clone()),
            ("start", query.start.timestamp().to_string()),
            ("end", query.end.timestamp().to_string()),
            ("step", query.step.as_secs().to_string()),
        ];

        let response = self
            .get(&self.query_range_url())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Prometheus reports query errors as 4xx with a JSON envelope
        match serde_json::from_str::<RangeQueryEnvelope>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => {
                tracing::error!("Range query {} failed: {} {}", query.expression, status, body);
                Err(DashboardError::BackendQuery {
                    status: status.as_u16().to_string(),
                    detail: body,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
