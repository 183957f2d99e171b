// Gnuplot renderer - draws aligned tables with the `dumb` terminal
use crate::application::plot_renderer::{PlotRenderer, PlotRequest};
use crate::domain::series::{unix_seconds, AlignedTable, GAP_MARKER};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const DATA_FILE: &str = "data.txt";

/// Spawns one `gnuplot` process per rendered panel
#[derive(Debug, Clone)]
pub struct GnuPlot {
    program: PathBuf,
}

impl Default for GnuPlot {
    fn default() -> Self {
        Self::new("gnuplot")
    }
}

impl GnuPlot {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, script: &str) -> anyhow::Result<()> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        let mut stdin = child
            .stdin
            .take()
            .context("gnuplot stdin was not captured")?;
        stdin.write_all(script.as_bytes()).await?;
        stdin.flush().await?;
        drop(stdin);

        let status = child.wait().await?;
        if !status.success() {
            anyhow::bail!("gnuplot exited with {}", status);
        }
        Ok(())
    }
}

#[async_trait]
impl PlotRenderer for GnuPlot {
    async fn render(&self, request: &PlotRequest<'_>) -> anyhow::Result<()> {
        let dir = tempfile::tempdir().context("Failed to create plot data directory")?;
        let data_path = dir.path().join(DATA_FILE);

        tokio::fs::write(&data_path, data_file(request.table))
            .await
            .with_context(|| format!("Failed to write {}", data_path.display()))?;

        self.run(&script(request, &data_path)).await
    }
}

/// One line per timestamp: unix seconds followed by one column per row
pub fn data_file(table: &AlignedTable) -> String {
    let mut out = String::new();
    for (i, time) in table.timestamps.iter().enumerate() {
        let _ = write!(out, "{}", unix_seconds(time));
        for row in &table.rows {
            match row.values.get(i) {
                Some(sample) => {
                    let _ = write!(out, " {}", sample);
                }
                None => {
                    let _ = write!(out, " {}", GAP_MARKER);
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Gnuplot command sequence drawing `data_path`
pub fn script(request: &PlotRequest<'_>, data_path: &Path) -> String {
    let mut commands = vec![
        format!(
            "set terminal dumb size {}, {} enhanced",
            request.size.cols, request.size.rows
        ),
        "set autoscale".to_string(),
        format!("set datafile missing \"{}\"", GAP_MARKER),
        "set xdata time".to_string(),
        "set timefmt \"%s\"".to_string(),
    ];

    if let Some(title) = request.title {
        commands.push(format!("set title \"{}\"", quote(title)));
    }

    if let Some(scale) = request.axis_log_scale {
        if scale.primary > 1.0 {
            commands.push(format!("set logscale y {}", scale.primary));
        }
        if scale.secondary > 1.0 {
            commands.push(format!("set logscale y2 {}", scale.secondary));
        }
    }

    let file = quote(&data_path.display().to_string());
    let plots: Vec<String> = request
        .table
        .legend()
        .iter()
        .enumerate()
        .map(|(i, label)| format!("\"{}\" using 1:{} title \"{}\"", file, i + 2, quote(label)))
        .collect();
    commands.push(format!("plot {}", plots.join(", ")));

    let mut script = String::new();
    for command in commands {
        script.push_str(&command);
        script.push_str(";\n");
    }
    script
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::plot_renderer::TerminalSize;
    use crate::domain::dashboard::AxisLogScale;
    use crate::domain::series::{AlignedRow, Sample};
    use chrono::DateTime;

    fn table() -> AlignedTable {
        AlignedTable {
            timestamps: vec![
                DateTime::from_timestamp(100, 0).unwrap(),
                DateTime::from_timestamp_millis(110_500).unwrap(),
            ],
            rows: vec![
                AlignedRow {
                    label: "{'job': 'x'}".to_string(),
                    values: vec![Sample::Value(1.0), Sample::Gap],
                },
                AlignedRow {
                    label: "say \"hi\"".to_string(),
                    values: vec![Sample::Gap, Sample::Value(2.5)],
                },
            ],
        }
    }

    #[test]
    fn test_data_file_layout() {
        assert_eq!(data_file(&table()), "100 1 ?\n110.5 ? 2.5\n");
    }

    #[test]
    fn test_script_commands() {
        let table = table();
        let request = PlotRequest {
            title: Some("CPU \"busy\""),
            table: &table,
            axis_log_scale: Some(AxisLogScale { primary: 10.0, secondary: 1.0 }),
            size: TerminalSize { rows: 30, cols: 120 },
        };

        let script = script(&request, Path::new("/tmp/plot/data.txt"));
        let lines: Vec<&str> = script.lines().collect();

        assert_eq!(
            lines,
            vec![
                "set terminal dumb size 120, 30 enhanced;",
                "set autoscale;",
                "set datafile missing \"?\";",
                "set xdata time;",
                "set timefmt \"%s\";",
                "set title \"CPU \\\"busy\\\"\";",
                "set logscale y 10;",
                "plot \"/tmp/plot/data.txt\" using 1:2 title \"{'job': 'x'}\", \"/tmp/plot/data.txt\" using 1:3 title \"say \\\"hi\\\"\";",
            ]
        );
    }

    #[test]
    fn test_script_without_axes_or_title_is_linear() {
        let table = table();
        let request = PlotRequest {
            title: None,
            table: &table,
            axis_log_scale: None,
            size: TerminalSize::default(),
        };

        let script = script(&request, Path::new("data.txt"));
        assert!(script.starts_with("set terminal dumb size 80, 24 enhanced;\n"));
        assert!(!script.contains("logscale"));
        assert!(!script.contains("set title"));
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let table = table();
        let request = PlotRequest {
            title: None,
            table: &table,
            axis_log_scale: None,
            size: TerminalSize::default(),
        };

        let renderer = GnuPlot::new("/nonexistent/gnuplot-binary");
        let err = renderer.render(&request).await.unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }
}
