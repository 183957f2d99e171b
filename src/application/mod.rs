// Application layer - Dashboard loading, panel queries and rendering seams
pub mod dashboard_service;
pub mod metrics_backend;
pub mod plot_renderer;
pub mod query_service;
