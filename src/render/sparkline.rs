//! One-line sparkline and per-day bar chart.

use crate::{
    core::constants::{BAR_MAX_LEN, SCORE_MAX, SCORE_MIN},
    stats::{DailySeries, SeriesSummary},
};

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const MISSING: char = '·';

/// Column width of one `MM-DD` label plus its separator.
const DATE_CELL: usize = 6;

/// One glyph per value, `·` for days without data.
#[must_use]
pub fn sparkline(values: &[Option<f64>]) -> String {
    let lo = f64::from(SCORE_MIN);
    let span = f64::from(SCORE_MAX) - lo;
    values
        .iter()
        .map(|v| match v {
            None => MISSING,
            Some(v) => {
                let t = (v.clamp(lo, f64::from(SCORE_MAX)) - lo) / span;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let idx = (t * (BLOCKS.len() - 1) as f64).round() as usize;
                BLOCKS[idx.min(BLOCKS.len() - 1)]
            }
        })
        .collect()
}

/// `Days logged: 3/7 | mean 6.33 | low 4.00 | high 9.00`
#[must_use]
pub fn summary_line(s: &SeriesSummary) -> String {
    format!(
        "Days logged: {}/{} | mean {:.2} | low {:.2} | high {:.2}",
        s.available, s.total, s.mean, s.min, s.max
    )
}

/// Date axis for the sparkline; collapses to `first … last` when the full
/// list would not fit in `width` columns.
fn date_axis(series: &DailySeries, width: usize) -> String {
    let prefix = "Dates: ";
    if prefix.len() + series.len() * DATE_CELL <= width {
        let days: Vec<String> = series.days.iter().map(|d| d.format("%m-%d").to_string()).collect();
        return format!("{prefix}{}", days.join(" "));
    }
    match (series.days.first(), series.days.last()) {
        (Some(a), Some(b)) => format!("{prefix}{} … {}", a.format("%m-%d"), b.format("%m-%d")),
        _ => prefix.trim_end().to_owned(),
    }
}

/// Sparkline, dates and summary for a trailing window.
#[must_use]
pub fn trend_lines(series: &DailySeries, heading: &str, width: usize) -> Vec<String> {
    let mut out = vec![heading.to_owned(), format!("Trend: {}", sparkline(&series.values))];
    out.push(date_axis(series, width));
    match series.summary() {
        Some(s) => out.push(summary_line(&s)),
        None => out.push("No entries in this range.".to_owned()),
    }
    out
}

/// One row per day: `MM-DD | ███████`, `(none)` for missing days.
#[must_use]
pub fn bar_lines(series: &DailySeries, heading: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(series.len() + 1);
    out.push(heading.to_owned());
    for (d, v) in series.days.iter().zip(&series.values) {
        let bar = match v {
            None => "(none)".to_owned(),
            Some(v) => "█".repeat(bar_len(*v)),
        };
        out.push(format!("{} | {bar}", d.format("%m-%d")));
    }
    out
}

/// Rounded mean clamped to `1..=BAR_MAX_LEN` blocks.
#[inline]
pub(crate) fn bar_len(v: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = v.round().max(1.0) as usize;
    n.clamp(1, BAR_MAX_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: Vec<Option<f64>>) -> DailySeries {
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        DailySeries {
            days: start.iter_days().take(values.len()).collect(),
            values,
        }
    }

    #[test]
    fn test_sparkline_maps_range_and_gaps() {
        assert_eq!(
            sparkline(&[Some(1.0), None, Some(10.0), Some(5.5), Some(42.0)]),
            "▁·█▅█"
        );
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_trend_lines_with_and_without_data() {
        let lines = trend_lines(&series(vec![Some(4.0), None, Some(8.0)]), "== t ==", 80);
        assert_eq!(lines[0], "== t ==");
        assert_eq!(lines[1], "Trend: ▃·▆");
        assert_eq!(lines[2], "Dates: 06-01 06-02 06-03");
        assert_eq!(lines[3], "Days logged: 2/3 | mean 6.00 | low 4.00 | high 8.00");

        let empty = trend_lines(&series(vec![None, None]), "h", 80);
        assert_eq!(empty[3], "No entries in this range.");
    }

    #[test]
    fn test_date_axis_collapses_when_narrow() {
        let lines = trend_lines(&series(vec![Some(5.0); 30]), "h", 80);
        assert_eq!(lines[2], "Dates: 06-01 … 06-30");
    }

    #[test]
    fn test_bar_lines() {
        let lines = bar_lines(&series(vec![Some(6.6), None, Some(0.2), Some(10.0)]), "bars");
        assert_eq!(
            lines,
            vec![
                "bars".to_owned(),
                "06-01 | ███████".to_owned(),
                "06-02 | (none)".to_owned(),
                "06-03 | █".to_owned(),
                "06-04 | ██████████".to_owned(),
            ]
        );
    }
}
