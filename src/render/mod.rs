pub mod binner;
pub mod braille;
pub mod diary;
pub mod export;
pub mod frame;
pub mod sparkline;
pub mod table;

pub use braille::{BraillePlot, ChartPoint, preprocess_to_braille};
pub use diary::diary_lines;
pub use export::{Capabilities, ChartExporter, ExportFormat};
pub use frame::AsciiChart;
pub use sparkline::{bar_lines, sparkline, trend_lines};
pub use table::stats_table;

use crate::core::{bounds, color::AnsiCode, config::AppConfig};

/// How the recent-days table is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Box-drawing table; needs a terminal.
    Boxed,
    /// Sparkline text that survives pipes and log files.
    Plain,
}

/// Output surroundings shared by every renderer.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub width: usize,
    pub color: AnsiCode,
    pub table: TableStyle,
}

impl RenderContext {
    /// Resolve width, colour and table style from the real stdout.
    #[must_use]
    pub fn detect(cfg: &AppConfig) -> Self {
        let tty = bounds::detect_terminal().is_some();
        let ctx = Self {
            width: bounds::terminal_width(),
            color: if tty { cfg.color } else { AnsiCode::none() },
            table: if tty && !cfg.plain {
                TableStyle::Boxed
            } else {
                TableStyle::Plain
            },
        };
        tracing::debug!(width = ctx.width, table = ?ctx.table, tty, "render context");
        ctx
    }

    /// No colour, no box table.
    #[must_use]
    pub fn plain(width: usize) -> Self {
        Self {
            width,
            color: AnsiCode::none(),
            table: TableStyle::Plain,
        }
    }
}
