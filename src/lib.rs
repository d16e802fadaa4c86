//! Public-facing crate root: daily mood log, aggregation and terminal charts.

pub mod cli;
pub mod core;
pub mod render;
pub mod stats;
pub mod store;

pub use crate::core::{
    AnsiCode, AppConfig, AppConfigBuilder, ColorError, ConfigError, ExportError, Messages,
    MoodEntry, MoodError, ParseCsvError, Score, StatsError, StoreError, ValidationError,
    colorize,
};

pub use render::{AsciiChart, Capabilities, ChartExporter, ExportFormat, RenderContext, TableStyle};
pub use stats::{Aggregator, DailySeries, RecentStats, SeriesSummary};
pub use store::{LoadReport, LogStore, SchemaStatus};
