// Dashboard domain model
use super::templating::TemplatingVariable;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// `(start, end)` for querying, whatever order the dashboard declared
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.from.min(self.to), self.from.max(self.to))
    }
}

/// Logarithmic scale base per y-axis; `1` means linear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLogScale {
    pub primary: f64,
    pub secondary: f64,
}

impl Default for AxisLogScale {
    fn default() -> Self {
        Self {
            primary: 1.0,
            secondary: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryTarget {
    pub expression: String,
    pub legend_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphPanel {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `None` when the panel carries no y-axis config; treat both axes as linear
    pub axis_log_scale: Option<AxisLogScale>,
    pub targets: Vec<QueryTarget>,
}

impl GraphPanel {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

/// A panel of a kind other than `graph`, recorded when it is dropped
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPanel {
    pub title: Option<String>,
    pub kind: String,
}

/// Outcome of reading one panel definition
#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    Graph(GraphPanel),
    Unsupported(SkippedPanel),
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    uid: String,
    title: Option<String>,
    time_window: TimeWindow,
    variables: Vec<TemplatingVariable>,
    panels: Vec<GraphPanel>,
    skipped: Vec<SkippedPanel>,
}

impl Dashboard {
    pub fn new(
        uid: String,
        title: Option<String>,
        time_window: TimeWindow,
        variables: Vec<TemplatingVariable>,
        panels: Vec<GraphPanel>,
        skipped: Vec<SkippedPanel>,
    ) -> Self {
        Self {
            uid,
            title,
            time_window,
            variables,
            panels,
            skipped,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn variables(&self) -> &[TemplatingVariable] {
        &self.variables
    }

    pub fn panels(&self) -> &[GraphPanel] {
        &self.panels
    }

    pub fn skipped_panels(&self) -> &[SkippedPanel] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_bounds_ignore_declared_order() {
        let now = Utc::now();
        let earlier = now - Duration::hours(1);

        let forward = TimeWindow::new(earlier, now);
        let reversed = TimeWindow::new(now, earlier);

        assert_eq!(forward.bounds(), (earlier, now));
        assert_eq!(reversed.bounds(), (earlier, now));
    }

    #[test]
    fn test_display_title_falls_back() {
        let panel = GraphPanel {
            title: None,
            description: None,
            axis_log_scale: None,
            targets: Vec::new(),
        };
        assert_eq!(panel.display_title(), "(untitled)");
    }
}
