// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod gnuplot;
pub mod grafana_client;
