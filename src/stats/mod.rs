//! Windowed statistics over logged entries.
//!
//! Windows are calendar days in local time: a window of `n` days ending
//! today covers `today - (n - 1) ..= today`.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, Local, NaiveDate};

use crate::core::{constants::MAX_WINDOW_DAYS, entry::MoodEntry, error::StatsError};

/// Summary of the entries inside a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentStats {
    pub count: usize,
    pub average: f64,
    pub min: u8,
    pub max: u8,
    /// Set when the window holds no entries; every other field is zero.
    pub no_data: bool,
}

impl RecentStats {
    const EMPTY: Self = Self {
        count: 0,
        average: 0.0,
        min: 0,
        max: 0,
        no_data: true,
    };
}

/// Per-day mean scores over a trailing window, oldest day first.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub days: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// Mean / extremes of the days that have data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub available: usize,
    pub total: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl DailySeries {
    #[inline]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// True when at least one day in the window has an entry.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    pub fn summary(&self) -> Option<SeriesSummary> {
        let avail: Vec<f64> = self.values.iter().flatten().copied().collect();
        if avail.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = avail.iter().sum::<f64>() / avail.len() as f64;
        Some(SeriesSummary {
            available: avail.len(),
            total: self.len(),
            mean,
            min: avail.iter().copied().fold(f64::INFINITY, f64::min),
            max: avail.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Aggregation anchored at a fixed "today".
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    today: NaiveDate,
}

impl Aggregator {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at(now: DateTime<Local>) -> Self {
        Self {
            today: now.date_naive(),
        }
    }

    #[inline]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// First day of a `days`-day window ending today.
    fn window_start(&self, days: i64) -> Result<NaiveDate, StatsError> {
        if days <= 0 {
            return Err(StatsError::NonPositiveWindow(days));
        }
        if days > MAX_WINDOW_DAYS {
            return Err(StatsError::WindowTooLarge(days));
        }
        // a window reaching past the calendar's start just covers everything
        #[allow(clippy::cast_sign_loss)]
        let start = self
            .today
            .checked_sub_days(Days::new(days as u64 - 1))
            .unwrap_or(NaiveDate::MIN);
        Ok(start)
    }

    /// Count / mean / extremes of the entries logged in the last `days`
    /// calendar days, today included.
    pub fn recent_stats(&self, entries: &[MoodEntry], days: i64) -> Result<RecentStats, StatsError> {
        let start = self.window_start(days)?;
        let in_window = entries.iter().filter(|e| (start..=self.today).contains(&e.date()));

        let (mut count, mut sum, mut min, mut max) = (0usize, 0u64, u8::MAX, u8::MIN);
        for e in in_window {
            let s = e.score.get();
            count += 1;
            sum += u64::from(s);
            min = min.min(s);
            max = max.max(s);
        }
        if count == 0 {
            return Ok(RecentStats::EMPTY);
        }
        #[allow(clippy::cast_precision_loss)]
        let average = sum as f64 / count as f64;
        Ok(RecentStats {
            count,
            average,
            min,
            max,
            no_data: false,
        })
    }

    /// Mean score per day over the last `days` days; days without entries
    /// are `None`.
    pub fn daily_series(&self, entries: &[MoodEntry], days: i64) -> Result<DailySeries, StatsError> {
        let start = self.window_start(days)?;

        let mut per_day: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
        for e in entries.iter().filter(|e| (start..=self.today).contains(&e.date())) {
            let slot = per_day.entry(e.date()).or_default();
            slot.0 += u32::from(e.score.get());
            slot.1 += 1;
        }

        let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= self.today).collect();
        let values = days
            .iter()
            .map(|d| {
                per_day
                    .get(d)
                    .map(|&(sum, n)| f64::from(sum) / f64::from(n))
            })
            .collect();
        Ok(DailySeries { days, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::Score;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).earliest().unwrap()
    }

    fn entry(days_ago: i64, score: i64) -> MoodEntry {
        MoodEntry::at(
            now() - Duration::days(days_ago),
            Score::try_from(score).unwrap(),
            "",
        )
    }

    #[test]
    fn test_empty_window_flags_no_data() {
        let agg = Aggregator::at(now());
        let stats = agg.recent_stats(&[], 7).unwrap();
        assert!(stats.no_data);
        assert_eq!(stats.count, 0);
        assert!(stats.average.abs() < f64::EPSILON);

        // entries exist but all are too old
        let stats = agg.recent_stats(&[entry(30, 5)], 7).unwrap();
        assert!(stats.no_data);
    }

    #[test]
    fn test_mean_min_max_in_window() {
        let agg = Aggregator::at(now());
        let entries = [entry(0, 7), entry(1, 4), entry(6, 9), entry(7, 1), entry(2, 5)];
        let stats = agg.recent_stats(&entries, 7).unwrap();
        assert!(!stats.no_data);
        assert_eq!(stats.count, 4);
        assert!((stats.average - 25.0 / 4.0).abs() < 1e-9);
        assert_eq!((stats.min, stats.max), (4, 9));
    }

    #[test]
    fn test_single_day_window_is_today_only() {
        let agg = Aggregator::at(now());
        let stats = agg.recent_stats(&[entry(0, 3), entry(1, 10)], 1).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.max, 3);
    }

    #[test]
    fn test_non_positive_window_is_an_error() {
        let agg = Aggregator::at(now());
        assert_eq!(
            agg.recent_stats(&[], 0),
            Err(StatsError::NonPositiveWindow(0))
        );
        assert_eq!(
            agg.daily_series(&[], -3),
            Err(StatsError::NonPositiveWindow(-3))
        );
    }

    #[test]
    fn test_window_is_capped() {
        let agg = Aggregator::at(now());
        assert_eq!(
            agg.daily_series(&[], i64::MAX),
            Err(StatsError::WindowTooLarge(i64::MAX))
        );
        assert_eq!(
            agg.recent_stats(&[], MAX_WINDOW_DAYS + 1),
            Err(StatsError::WindowTooLarge(MAX_WINDOW_DAYS + 1))
        );
        let series = agg.daily_series(&[entry(0, 4)], MAX_WINDOW_DAYS).unwrap();
        assert_eq!(series.len(), 36_500);
        assert_eq!(series.values.last(), Some(&Some(4.0)));
    }

    #[test]
    fn test_daily_series_aligns_and_averages() {
        let agg = Aggregator::at(now());
        let entries = [entry(0, 8), entry(0, 6), entry(2, 3), entry(9, 10)];
        let series = agg.daily_series(&entries, 5).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.days[0], NaiveDate::from_ymd_opt(2026, 6, 11).unwrap());
        assert_eq!(series.days[4], NaiveDate::from_ymd_opt(2026, 6, 15).unwrap());
        assert_eq!(series.values, vec![None, None, Some(3.0), None, Some(7.0)]);

        let sum = series.summary().unwrap();
        assert_eq!(sum.available, 2);
        assert_eq!(sum.total, 5);
        assert!((sum.mean - 5.0).abs() < 1e-9);
        assert!((sum.min - 3.0).abs() < 1e-9);
        assert!((sum.max - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_without_data_has_no_summary() {
        let agg = Aggregator::at(now());
        let series = agg.daily_series(&[], 3).unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.has_data());
        assert!(series.summary().is_none());
    }
}
