//! Output for each menu action, as ready-to-print lines.

use crate::{
    core::{
        config::AppConfig,
        constants::RECENT_STATS_DAYS,
        entry::MoodEntry,
        error::{ExportError, StatsError},
    },
    render::{
        AsciiChart, Capabilities, ExportFormat, RenderContext, bar_lines, diary_lines,
        stats_table, trend_lines,
    },
    stats::Aggregator,
};

/// What the visualize submenu can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Sparkline,
    Bars,
    Braille,
    Export(ExportFormat),
}

/// Everything a handler needs besides the entries.
pub struct HandlerEnv<'a> {
    pub config: &'a AppConfig,
    pub ctx: &'a RenderContext,
    pub caps: &'a Capabilities,
    pub agg: Aggregator,
}

/// Table printed right after an entry is saved.
pub fn recent(entries: &[MoodEntry], env: &HandlerEnv<'_>) -> Result<Vec<String>, StatsError> {
    let days = i64::from(RECENT_STATS_DAYS);
    let series = env.agg.daily_series(entries, days)?;
    let mut out = stats_table(
        &series,
        &format!("=== Last {RECENT_STATS_DAYS} days ==="),
        env.ctx.table,
        env.ctx.width,
    );
    let stats = env.agg.recent_stats(entries, days)?;
    if !stats.no_data {
        out.push(format!(
            "{} entries in the last {RECENT_STATS_DAYS} days | average {:.2} | min {} | max {}",
            stats.count, stats.average, stats.min, stats.max
        ));
    }
    Ok(out)
}

/// One visualization over the last `days` days.
pub fn visualize(
    entries: &[MoodEntry],
    view: View,
    days: u32,
    env: &HandlerEnv<'_>,
) -> Result<Vec<String>, StatsError> {
    let series = env.agg.daily_series(entries, i64::from(days))?;
    let heading = format!("=== Last {days} days ===");
    let lines = match view {
        View::Sparkline => trend_lines(&series, &heading, env.ctx.width),
        View::Bars => bar_lines(&series, &heading),
        View::Braille if !series.has_data() => {
            vec![heading, "No entries in this range.".to_owned()]
        }
        View::Braille if env.ctx.width < AsciiChart::min_width() => {
            tracing::info!(width = env.ctx.width, "terminal too narrow for the braille chart");
            let mut out = vec!["Terminal too narrow for the chart; showing the text trend instead.".to_owned()];
            out.extend(trend_lines(&series, &heading, env.ctx.width));
            out
        }
        View::Braille => {
            let chart = AsciiChart::new(&series, format!("Mood, last {days} days"), env.ctx);
            chart.lines().collect()
        }
        View::Export(format) => {
            let path = env.config.export_path(days, format.extension());
            let title = format!("Mood, last {days} days");
            match env.caps.export(format, &series, &title, &path) {
                Ok(p) => vec![format!("{format} chart written to {}", p.display())],
                Err(e @ ExportError::Unavailable(_)) => {
                    tracing::info!(%format, "exporter missing, falling back to text");
                    let mut out = vec![format!("{e}; showing the text trend instead.")];
                    out.extend(trend_lines(&series, &heading, env.ctx.width));
                    out
                }
                Err(e) => {
                    tracing::warn!(%format, error = %e, "export failed");
                    vec![format!("Export failed: {e}")]
                }
            }
        }
    };
    Ok(lines)
}

/// Last `k` noted entries.
pub fn diary(entries: &[MoodEntry], k: usize) -> Vec<String> {
    diary_lines(entries, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::{Score, parse_timestamp};
    use crate::render::TableStyle;

    fn entries() -> Vec<MoodEntry> {
        [("2026-06-14 09:00:00", 4), ("2026-06-15 10:00:00", 8)]
            .iter()
            .map(|(ts, s)| {
                MoodEntry::at(parse_timestamp(ts).unwrap(), Score::try_from(*s).unwrap(), "ok")
            })
            .collect()
    }

    fn agg() -> Aggregator {
        Aggregator::at(parse_timestamp("2026-06-15 12:00:00").unwrap())
    }

    #[test]
    fn test_recent_has_table_and_entry_summary() {
        let cfg = AppConfig::builder().build().unwrap();
        let ctx = RenderContext::plain(80);
        let caps = Capabilities::none();
        let env = HandlerEnv { config: &cfg, ctx: &ctx, caps: &caps, agg: agg() };
        let lines = recent(&entries(), &env).unwrap();
        assert_eq!(lines[0], "=== Last 7 days ===");
        assert_eq!(
            lines.last().unwrap(),
            "2 entries in the last 7 days | average 6.00 | min 4 | max 8"
        );
    }

    #[test]
    fn test_unavailable_export_falls_back_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::builder().data_dir(dir.path()).build().unwrap();
        let ctx = RenderContext::plain(80);
        let caps = Capabilities::none();
        let env = HandlerEnv { config: &cfg, ctx: &ctx, caps: &caps, agg: agg() };
        let lines = visualize(&entries(), View::Export(ExportFormat::Png), 30, &env).unwrap();
        assert_eq!(
            lines[0],
            "PNG export is not available in this build; showing the text trend instead."
        );
        assert!(lines[2].starts_with("Trend: "));
        assert!(!cfg.export_path(30, "png").exists());
    }

    #[test]
    fn test_braille_fits_width() {
        let cfg = AppConfig::builder().build().unwrap();
        let ctx = RenderContext::plain(40);
        assert_eq!(ctx.table, TableStyle::Plain);
        let caps = Capabilities::none();
        let env = HandlerEnv { config: &cfg, ctx: &ctx, caps: &caps, agg: agg() };
        let lines = visualize(&entries(), View::Braille, 30, &env).unwrap();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn test_braille_too_narrow_falls_back_to_text() {
        let cfg = AppConfig::builder().build().unwrap();
        let ctx = RenderContext::plain(5);
        let caps = Capabilities::none();
        let env = HandlerEnv { config: &cfg, ctx: &ctx, caps: &caps, agg: agg() };
        let lines = visualize(&entries(), View::Braille, 30, &env).unwrap();
        assert!(lines[0].starts_with("Terminal too narrow"));
        assert!(lines.iter().all(|l| !l.contains('┌') && !l.contains('│')));
    }
}
