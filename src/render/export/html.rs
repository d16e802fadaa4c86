//! Self-contained HTML page with an inline SVG line chart.

use std::{fs, path::Path};

use crate::{
    core::{
        constants::{SCORE_MAX, SCORE_MIN},
        error::ExportError,
    },
    render::export::{ChartExporter, ExportFormat, segments},
    stats::DailySeries,
};

const W: f64 = 800.0;
const H: f64 = 320.0;
const PAD_L: f64 = 40.0;
const PAD_R: f64 = 20.0;
const PAD_T: f64 = 20.0;
const PAD_B: f64 = 40.0;
/// At most this many x-axis labels.
const MAX_X_LABELS: usize = 10;

pub struct HtmlExporter;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn x_of(i: usize, n: usize) -> f64 {
    let span = (n.max(2) - 1) as f64;
    PAD_L + (W - PAD_L - PAD_R) * i as f64 / span
}

fn y_of(v: f64) -> f64 {
    let (lo, hi) = (f64::from(SCORE_MIN), f64::from(SCORE_MAX));
    let t = (v.clamp(lo, hi) - lo) / (hi - lo);
    PAD_T + (H - PAD_T - PAD_B) * (1.0 - t)
}

pub(crate) fn render_page(series: &DailySeries, title: &str) -> String {
    let n = series.len();
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {W} {H}" width="{W}" height="{H}">"#
    ));
    for score in [SCORE_MIN, 5, SCORE_MAX] {
        let y = y_of(f64::from(score));
        svg.push_str(&format!(
            r##"<line x1="{PAD_L}" x2="{}" y1="{y:.1}" y2="{y:.1}" stroke="#ddd"/><text x="{}" y="{:.1}" font-size="11" text-anchor="end">{score}</text>"##,
            W - PAD_R,
            PAD_L - 6.0,
            y + 4.0
        ));
    }
    let step = n.div_ceil(MAX_X_LABELS).max(1);
    for (i, d) in series.days.iter().enumerate().step_by(step) {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{}" font-size="11" text-anchor="middle">{}</text>"#,
            x_of(i, n),
            H - PAD_B + 18.0,
            d.format("%m-%d")
        ));
    }
    for run in segments(series) {
        let pts: Vec<String> = run
            .iter()
            .map(|&(i, v)| format!("{:.1},{:.1}", x_of(i, n), y_of(v)))
            .collect();
        svg.push_str(&format!(
            r##"<polyline fill="none" stroke="#e6a028" stroke-width="2" points="{}"/>"##,
            pts.join(" ")
        ));
        for &(i, v) in &run {
            svg.push_str(&format!(
                r##"<circle cx="{:.1}" cy="{:.1}" r="3" fill="#e6a028"><title>{}: {v:.2}</title></circle>"##,
                x_of(i, n),
                y_of(v),
                series.days[i]
            ));
        }
    }
    svg.push_str("</svg>");

    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{svg}\n</body>\n</html>\n"
    )
}

impl ChartExporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn export(&self, series: &DailySeries, title: &str, path: &Path) -> Result<(), ExportError> {
        fs::write(path, render_page(series, title)).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
