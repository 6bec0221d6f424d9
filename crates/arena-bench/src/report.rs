use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

use crate::runner::StatRow;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}

const CSV_HEADER: &str = "formula,class,count,mean,std,min,25%,50%,75%,max";

/// Writes the comparison table as delimited text, one row per
/// (formula, class) combination.
pub fn write_csv(rows: &[StatRow], path: impl AsRef<Path>) -> Result<(), ReportError> {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&csv_line(row));
        out.push('\n');
    }

    fs::write(path.as_ref(), out).map_err(|e| ReportError::Io {
        context: "writing stats csv",
        source: e,
    })
}

fn csv_line(row: &StatRow) -> String {
    let s = &row.statistics;
    format!(
        "{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
        row.formula, row.class, s.count, s.mean, s.std, s.min, s.p25, s.p50, s.p75, s.max
    )
}

/// Writes the comparison table as a markdown summary page.
pub fn write_markdown(
    rows: &[StatRow],
    run_id: &str,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let mut out = String::new();
    out.push_str("# Draft Sweep Summary\n\n");
    out.push_str(&format!("Run `{run_id}`: {} combinations\n\n", rows.len()));
    out.push_str("| Formula | Class | Rounds | Mean | Std | Min | 25% | 50% | 75% | Max |\n");
    out.push_str("|---------|-------|--------|------|-----|-----|-----|-----|-----|-----|\n");

    for row in rows {
        let s = &row.statistics;
        out.push_str(&format!(
            "| {formula} | {class} | {count} | {mean:.3} | {std:.3} | {min:.1} | {p25:.2} | {p50:.2} | {p75:.2} | {max:.1} |\n",
            formula = row.formula,
            class = row.class,
            count = s.count,
            mean = s.mean,
            std = s.std,
            min = s.min,
            p25 = s.p25,
            p50 = s.p50,
            p75 = s.p75,
            max = s.max,
        ));
    }

    fs::write(path.as_ref(), out).map_err(|e| ReportError::Io {
        context: "writing summary markdown",
        source: e,
    })
}

/// Renders a bar chart of the mean picked score per combination.
pub fn render_plot(rows: &[StatRow], dir: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
    let dir = dir.as_ref();
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(|e| ReportError::Io {
            context: "creating plots directory",
            source: e,
        })?;
    }

    let output_path = dir.join("mean_score.png");
    let rows_snapshot = rows.to_vec();

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let plot_attempt = std::panic::catch_unwind(move || {
        let root = BitMapBackend::new(&output_path, (960, 480)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        let y_max = rows_snapshot
            .iter()
            .map(|row| row.statistics.mean)
            .fold(0.0f64, |acc, v| acc.max(v));
        let margin = (y_max * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption("Mean drafted score by formula and class", ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 80)
            .build_cartesian_2d(0..rows_snapshot.len(), 0.0..(y_max + margin))
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .y_desc("Mean picked score")
            .x_desc("Formula / class")
            .x_label_formatter(&|idx| {
                rows_snapshot
                    .get(*idx)
                    .map(|row| format!("{}/{}", row.formula, row.class))
                    .unwrap_or_default()
            })
            .draw()
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        chart
            .draw_series(rows_snapshot.iter().enumerate().map(|(idx, row)| {
                Rectangle::new([(idx, 0.0), (idx + 1, row.statistics.mean)], BLUE.filled())
            }))
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        drop(chart);

        root.present()
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        drop(root);

        Ok(output_path)
    });

    std::panic::set_hook(prev_hook);

    match plot_attempt {
        Ok(result) => result,
        Err(_) => Err(ReportError::Plot(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{CSV_HEADER, csv_line, write_csv, write_markdown};
    use crate::runner::StatRow;
    use arena_core::stats::DraftStatistics;

    fn sample_row() -> StatRow {
        StatRow {
            formula: "linear".to_string(),
            class: "MAGE".to_string(),
            statistics: DraftStatistics::from_scores(&[1.0, 2.0, 3.0, 4.0]).unwrap(),
        }
    }

    #[test]
    fn csv_line_matches_column_order() {
        let line = csv_line(&sample_row());
        assert_eq!(
            line,
            "linear,MAGE,4,2.500000,1.290994,1.000000,1.750000,2.500000,3.250000,4.000000"
        );
    }

    #[test]
    fn csv_file_has_header_and_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        write_csv(&[sample_row(), sample_row()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
    }

    #[test]
    fn markdown_contains_the_table_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        write_markdown(&[sample_row()], "demo_run", &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# Draft Sweep Summary"));
        assert!(contents.contains("`demo_run`"));
        assert!(contents.contains("| linear | MAGE | 4 |"));
    }
}
