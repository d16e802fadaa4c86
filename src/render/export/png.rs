//! Bitmap line chart through `plotters`.

use std::path::Path;

use plotters::prelude::*;

use crate::{
    core::{
        constants::{SCORE_MAX, SCORE_MIN},
        error::ExportError,
    },
    render::export::{ChartExporter, ExportFormat, segments},
    stats::DailySeries,
};

const SIZE: (u32, u32) = (900, 400);
const LINE: RGBColor = RGBColor(230, 160, 40);

pub struct PngExporter;

fn render_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

impl ChartExporter for PngExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Png
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn export(&self, series: &DailySeries, title: &str, path: &Path) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let x_max = (series.len().max(2) - 1) as f64;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(36)
            .build_cartesian_2d(0f64..x_max, f64::from(SCORE_MIN)..f64::from(SCORE_MAX))
            .map_err(render_err)?;

        let day_label = |x: &f64| {
            series
                .days
                .get(x.round().max(0.0) as usize)
                .map(|d| d.format("%m-%d").to_string())
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .x_labels(10)
            .y_labels(10)
            .x_label_formatter(&day_label)
            .draw()
            .map_err(render_err)?;

        for run in segments(series) {
            chart
                .draw_series(LineSeries::new(
                    run.iter().map(|&(i, v)| (i as f64, v)),
                    LINE.stroke_width(2),
                ))
                .map_err(render_err)?;
            chart
                .draw_series(
                    run.iter()
                        .map(|&(i, v)| Circle::new((i as f64, v), 3, LINE.filled())),
                )
                .map_err(render_err)?;
        }
        root.present().map_err(render_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_writes_png_with_gap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.png");
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let series = DailySeries {
            days: start.iter_days().take(5).collect(),
            values: vec![Some(3.0), Some(7.5), None, Some(9.0), Some(1.0)],
        };
        PngExporter.export(&series, "Mood, last 5 days", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
