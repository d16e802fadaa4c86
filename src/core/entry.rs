//! The logged record and its validated score.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::core::{
    constants::{SCORE_MAX, SCORE_MIN},
    error::ValidationError,
};

/// Timestamp layout written to the log (RFC 3339, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A mood score, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ValidationError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        if (i64::from(SCORE_MIN)..=i64::from(SCORE_MAX)).contains(&v) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(Self(v as u8))
        } else {
            Err(ValidationError::OutOfRange(v))
        }
    }
}

impl FromStr for Score {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = parse_int(s).ok_or_else(|| ValidationError::NotANumber(s.trim().to_owned()))?;
        Self::try_from(n)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whole-number parse shared by the menu and the CSV reader.
#[inline]
pub(crate) fn parse_int(s: &str) -> Option<i64> {
    let t = s.trim();
    let t = t.strip_prefix('+').unwrap_or(t);
    lexical_core::parse::<i64>(t.as_bytes()).ok()
}

/// One logging event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub timestamp: DateTime<Local>,
    pub score: Score,
    pub note: String,
}

impl MoodEntry {
    /// Entry stamped with the current local time.
    pub fn now(score: Score, note: impl Into<String>) -> Self {
        Self::at(Local::now(), score, note)
    }

    /// Entry with an explicit timestamp, truncated to whole seconds so it
    /// survives a write/read cycle unchanged.
    pub fn at(timestamp: DateTime<Local>, score: Score, note: impl Into<String>) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            score,
            note: note.into().trim().to_owned(),
        }
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    #[inline]
    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }

    pub fn timestamp_field(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD`
/// (local midnight).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Local.from_local_datetime(&naive).earliest();
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accepts_full_range() {
        for n in 1..=10 {
            assert_eq!(n.to_string().parse::<Score>().unwrap().get(), n);
        }
        assert_eq!(" +7 ".parse::<Score>().unwrap().get(), 7);
    }

    #[test]
    fn test_score_rejects_out_of_range_and_text() {
        assert_eq!("0".parse::<Score>(), Err(ValidationError::OutOfRange(0)));
        assert_eq!("11".parse::<Score>(), Err(ValidationError::OutOfRange(11)));
        assert_eq!("-3".parse::<Score>(), Err(ValidationError::OutOfRange(-3)));
        assert_eq!(
            "seven".parse::<Score>(),
            Err(ValidationError::NotANumber("seven".into()))
        );
        assert!(matches!(
            "7.5".parse::<Score>(),
            Err(ValidationError::NotANumber(_))
        ));
        assert!(matches!("".parse::<Score>(), Err(ValidationError::NotANumber(_))));
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let rfc = parse_timestamp("2026-03-01T08:30:00+00:00").unwrap();
        assert_eq!(rfc.timestamp(), 1_772_353_800);

        let spaced = parse_timestamp("2026-03-01 08:30:00").unwrap();
        assert_eq!(spaced.format("%H:%M").to_string(), "08:30");

        let day = parse_timestamp("2026-03-01").unwrap();
        assert_eq!(day.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(day.format("%H:%M:%S").to_string(), "00:00:00");

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_entry_trims_note_and_drops_subseconds() {
        let ts = parse_timestamp("2026-03-01T08:30:00.750+00:00").unwrap();
        let e = MoodEntry::at(ts, Score::try_from(5).unwrap(), "  hi  ");
        assert_eq!(e.note, "hi");
        assert_eq!(e.timestamp.timestamp_subsec_nanos(), 0);
        assert!(parse_timestamp(&e.timestamp_field()).is_some());
    }
}
