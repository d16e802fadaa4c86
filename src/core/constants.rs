//! A collection of constants.

/// Lowest score a user can log.
pub const SCORE_MIN: u8 = 1;
/// Highest score a user can log.
pub const SCORE_MAX: u8 = 10;

/// File name of the log inside the data directory.
pub const LOG_FILE_NAME: &str = "mood_log.csv";
/// Canonical header row.
pub const CSV_HEADER: [&str; 3] = ["timestamp", "score", "note"];

/// Window used by the sparkline, bar chart and exports.
pub const DEFAULT_TREND_DAYS: u32 = 30;
/// Window of the table printed after every entry.
pub const RECENT_STATS_DAYS: u32 = 7;
/// Custom trend windows are clamped to this range.
pub const TREND_DAYS_MIN: u32 = 7;
pub const TREND_DAYS_MAX: u32 = 180;
/// Longest window the aggregator accepts, about a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Diary view shows this many notes unless told otherwise.
pub const DEFAULT_DIARY_COUNT: usize = 10;
pub const DIARY_COUNT_MIN: usize = 1;
pub const DIARY_COUNT_MAX: usize = 100;

/// Longest bar drawn by the bar chart, one block per score point.
pub const BAR_MAX_LEN: usize = 10;

/// The left and right border characters
pub const BORDER_WIDTH: usize = 2;
/// One character of space between y axis labels and the plotted data
pub const LABEL_GUTTER: usize = 1;

/// Graph must be at least 14 characters wide
pub const MIN_GRAPH_WIDTH: usize = 14;
/// Braille line chart height in character rows.
pub const CHART_HEIGHT: usize = 8;

/// Braille has 2 horizontal dots and four vertical dots that can be either off or on
pub const BRAILLE_HORIZONTAL_RESOLUTION: usize = 2;
/// Braille has 2 horizontal dots and four vertical dots that can be either off or on
pub const BRAILLE_VERTICAL_RESOLUTION: usize = 4;

/// Numbers are rounded to the first decimal place.
///
/// 7.25 becomes 7.2
pub const DECIMAL_PRECISION: usize = 1;

/// Terminal width assumed when stdout is not a terminal.
pub const FALLBACK_WIDTH: usize = 80;
