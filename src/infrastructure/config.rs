use crate::application::query_service::DEFAULT_STEP;
use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config/grafana";
const ENV_PREFIX: &str = "ASCII_GRAFANA";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub grafana: GrafanaSettings,
    #[serde(default)]
    pub query: QuerySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrafanaSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_datasource_id")]
    pub datasource_id: u32,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl GrafanaSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuerySettings {
    #[serde(default = "default_step_seconds")]
    pub step_seconds: u64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            step_seconds: default_step_seconds(),
        }
    }
}

impl QuerySettings {
    pub fn step(&self) -> Duration {
        Duration::from_secs(self.step_seconds)
    }
}

fn default_datasource_id() -> u32 {
    1
}

fn default_step_seconds() -> u64 {
    DEFAULT_STEP.as_secs()
}

/// Values given on the command line, applied over file and environment
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub datasource_id: Option<u32>,
    pub step_seconds: Option<u64>,
}

pub fn load_config(file: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder();
    let builder = match file {
        Some(path) => builder.add_source(File::from(path)),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    };
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    );

    build(builder, overrides)
}

fn build(
    builder: ConfigBuilder<DefaultState>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<AppConfig> {
    let settings = builder
        .set_override_option("grafana.url", overrides.url.clone())?
        .set_override_option("grafana.api_key", overrides.api_key.clone())?
        .set_override_option("grafana.datasource_id", overrides.datasource_id)?
        .set_override_option("query.step_seconds", overrides.step_seconds)?
        .build()?;

    let config: AppConfig = settings
        .try_deserialize()
        .context("grafana.url and grafana.api_key must be configured")?;

    if config.query.step_seconds == 0 {
        anyhow::bail!("query.step_seconds must be positive");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str, overrides: &ConfigOverrides) -> anyhow::Result<AppConfig> {
        let builder = config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        build(builder, overrides)
    }

    #[test]
    fn test_defaults_fill_optional_settings() {
        let config = from_toml(
            r#"
            [grafana]
            url = "https://grafana.example.com/"
            api_key = "secret"
            "#,
            &ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.grafana.url, "https://grafana.example.com/");
        assert_eq!(config.grafana.datasource_id, 1);
        assert_eq!(config.grafana.timeout(), None);
        assert_eq!(config.query.step(), Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let overrides = ConfigOverrides {
            url: Some("http://localhost:3000".to_string()),
            datasource_id: Some(4),
            step_seconds: Some(60),
            ..Default::default()
        };
        let config = from_toml(
            r#"
            [grafana]
            url = "https://grafana.example.com"
            api_key = "secret"
            timeout_seconds = 5

            [query]
            step_seconds = 15
            "#,
            &overrides,
        )
        .unwrap();

        assert_eq!(config.grafana.url, "http://localhost:3000");
        assert_eq!(config.grafana.api_key, "secret");
        assert_eq!(config.grafana.datasource_id, 4);
        assert_eq!(config.grafana.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.query.step_seconds, 60);
    }

    #[test]
    fn test_missing_credentials_fail() {
        assert!(from_toml("", &ConfigOverrides::default()).is_err());

        let overrides = ConfigOverrides {
            url: Some("http://localhost:3000".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(from_toml("", &overrides).is_ok());
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let overrides = ConfigOverrides {
            url: Some("http://localhost:3000".to_string()),
            api_key: Some("key".to_string()),
            step_seconds: Some(0),
            ..Default::default()
        };
        assert!(from_toml("", &overrides).is_err());
    }
}
