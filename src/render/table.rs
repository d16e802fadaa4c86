//! Recent-days table printed after each entry.

use crate::{
    render::{
        TableStyle,
        sparkline::{bar_len, summary_line, trend_lines},
    },
    stats::DailySeries,
};

const DATE_W: usize = 5;
const MEAN_W: usize = 5;

fn rule(left: &str, mid: &str, right: &str, bar_w: usize) -> String {
    format!(
        "{left}{}{mid}{}{mid}{}{right}",
        "─".repeat(DATE_W + 2),
        "─".repeat(MEAN_W + 2),
        "─".repeat(bar_w + 2)
    )
}

fn boxed(series: &DailySeries, heading: &str) -> Vec<String> {
    let bar_w = series
        .values
        .iter()
        .flatten()
        .map(|v| bar_len(*v))
        .max()
        .unwrap_or(0)
        .max(3);

    let mut out = Vec::with_capacity(series.len() + 6);
    out.push(heading.to_owned());
    out.push(rule("┌", "┬", "┐", bar_w));
    out.push(format!(
        "│ {:^DATE_W$} │ {:>MEAN_W$} │ {:<bar_w$} │",
        "Date", "Mean", "Bar"
    ));
    out.push(rule("├", "┼", "┤", bar_w));
    for (d, v) in series.days.iter().zip(&series.values) {
        let (mean, bar) = match v {
            Some(v) => (format!("{v:.2}"), "█".repeat(bar_len(*v))),
            None => ("-".to_owned(), String::new()),
        };
        // `{:<w$}` pads by char count, which is what box glyphs need
        out.push(format!(
            "│ {} │ {mean:>MEAN_W$} │ {bar:<bar_w$} │",
            d.format("%m-%d")
        ));
    }
    out.push(rule("└", "┴", "┘", bar_w));
    match series.summary() {
        Some(s) => out.push(summary_line(&s)),
        None => out.push("No entries in this range.".to_owned()),
    }
    out
}

/// Table for the table capability, sparkline text otherwise.
#[must_use]
pub fn stats_table(series: &DailySeries, heading: &str, style: TableStyle, width: usize) -> Vec<String> {
    match style {
        TableStyle::Boxed => boxed(series, heading),
        TableStyle::Plain => trend_lines(series, heading, width),
    }
}
