// Renderer trait for drawing aligned panel data
use crate::domain::dashboard::AxisLogScale;
use crate::domain::series::AlignedTable;
use async_trait::async_trait;

/// Character cell size of the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub rows: u16,
    pub cols: u16,
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

pub struct PlotRequest<'a> {
    pub title: Option<&'a str>,
    pub table: &'a AlignedTable,
    /// `None` draws both axes linear
    pub axis_log_scale: Option<AxisLogScale>,
    pub size: TerminalSize,
}

#[async_trait]
pub trait PlotRenderer: Send + Sync {
    async fn render(&self, request: &PlotRequest<'_>) -> anyhow::Result<()>;
}
