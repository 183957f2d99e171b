// Application state shared by command handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::plot_renderer::PlotRenderer;
use crate::application::query_service::QueryService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub query_service: QueryService,
    pub renderer: Arc<dyn PlotRenderer>,
}
