//! Boxed braille line chart with y labels and title chrome.
//!
//! ```text
//! ┌──────  Mood, last 30 days ──────┐
//! │10.0 ⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀│
//! │     ⠀⠀⠀⠀⠀⠀⠀⠀⡀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀│
//! │ 1.0 ⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀⠀│
//! └──────  05-17 … 06-15 ───────────┘
//! ```
//!
//! Rows are produced on demand by `AsciiChart::lines`, so a caller can
//! stream them straight to the terminal; calling `lines` again starts over.

use crate::{
    core::{
        bounds::y_label_width,
        color::{AnsiCode, colorize},
        constants::{
            BORDER_WIDTH, CHART_HEIGHT, DECIMAL_PRECISION, LABEL_GUTTER, MIN_GRAPH_WIDTH,
            SCORE_MAX, SCORE_MIN,
        },
    },
    render::{
        RenderContext,
        binner::fit_to_width,
        braille::{BraillePlot, ChartPoint, encode_row, preprocess_to_braille},
    },
    stats::DailySeries,
};

/// Two spaces in front, one space behind
const TITLE_PADDING: usize = 3;

// Box-drawing glyphs
const TL: &str = "┌";
const TR: &str = "┐";
const BL: &str = "└";
const BR: &str = "┘";
const H: &str = "─";
const V: &str = "│";

/// Write centred colored text between horizontal rules.
fn push_centered(buf: &mut String, text: &str, width: usize, color: &AnsiCode) {
    let inner = width.saturating_sub(TITLE_PADDING);
    let len = text.chars().count();
    if len == 0 || len > inner {
        buf.push_str(&H.repeat(width));
        return;
    }
    let pad_left = (inner - len) / 2;
    let pad_right = inner - len - pad_left;

    buf.push_str(&H.repeat(pad_left));
    buf.push_str("  "); // 2-char left padding
    buf.push_str(&colorize(color, text));
    buf.push(' '); // 1-char right padding
    buf.push_str(&H.repeat(pad_right));
}

/// A ready-to-print chart of a daily series.
#[derive(Debug, Clone)]
pub struct AsciiChart {
    plot: BraillePlot,
    title: String,
    subtitle: String,
    color: AnsiCode,
    high_label: String,
    low_label: String,
    label_width: usize,
    x_chars: usize,
    y_chars: usize,
}

fn chrome_width() -> usize {
    let y_range = (f64::from(SCORE_MIN), f64::from(SCORE_MAX));
    BORDER_WIDTH + y_label_width(y_range, DECIMAL_PRECISION) + LABEL_GUTTER
}

impl AsciiChart {
    /// Narrowest context the chart fits in: the chrome plus one plot column.
    /// Below it `new` still draws a one-column plot, wider than the context.
    #[inline]
    pub fn min_width() -> usize {
        chrome_width() + 1
    }

    /// Every line is at most `ctx.width` columns wide when
    /// `ctx.width >= AsciiChart::min_width()`.
    pub fn new(series: &DailySeries, title: impl Into<String>, ctx: &RenderContext) -> Self {
        let y_range = (f64::from(SCORE_MIN), f64::from(SCORE_MAX));
        let label_width = y_label_width(y_range, DECIMAL_PRECISION);

        // widest plot that keeps every line within the context width
        let max_x = ctx.width.saturating_sub(chrome_width()).max(1);
        let points: Vec<Option<ChartPoint>> =
            series.values.iter().map(|v| v.map(ChartPoint::flat)).collect();
        let (points, used_x) = fit_to_width(&points, max_x);
        let x_chars = used_x.max(MIN_GRAPH_WIDTH).min(max_x);

        let plot = preprocess_to_braille(&points, y_range, CHART_HEIGHT, true);

        let subtitle = match (series.days.first(), series.days.last()) {
            (Some(a), Some(b)) if a != b => {
                format!("{} … {}", a.format("%m-%d"), b.format("%m-%d"))
            }
            (Some(a), _) => a.format("%m-%d").to_string(),
            _ => String::new(),
        };

        Self {
            plot,
            title: title.into(),
            subtitle,
            color: ctx.color,
            high_label: format!("{:.*}", DECIMAL_PRECISION, y_range.1),
            low_label: format!("{:.*}", DECIMAL_PRECISION, y_range.0),
            label_width,
            x_chars,
            y_chars: CHART_HEIGHT,
        }
    }

    /// Visible width of every line, in terminal columns.
    #[inline]
    pub fn width(&self) -> usize {
        BORDER_WIDTH + self.label_width + LABEL_GUTTER + self.x_chars
    }

    fn inner_width(&self) -> usize {
        self.width() - BORDER_WIDTH
    }

    fn top(&self) -> String {
        let mut s = String::with_capacity(self.width() * 3);
        s.push_str(TL);
        push_centered(&mut s, &self.title, self.inner_width(), &self.color);
        s.push_str(TR);
        s
    }

    fn bottom(&self) -> String {
        let mut s = String::with_capacity(self.width() * 3);
        s.push_str(BL);
        push_centered(&mut s, &self.subtitle, self.inner_width(), &AnsiCode::none());
        s.push_str(BR);
        s
    }

    fn row(&self, r: usize) -> String {
        let label = if r == 0 {
            self.high_label.as_str()
        } else if r + 1 == self.y_chars {
            self.low_label.as_str()
        } else {
            ""
        };
        let mut s = String::with_capacity(self.width() * 3 + 16);
        s.push_str(V);
        s.push_str(&format!("{label:>w$}", w = self.label_width));
        s.push_str(&" ".repeat(LABEL_GUTTER));
        s.push_str(self.color.as_str());
        encode_row(&self.plot, r, self.x_chars, &mut s);
        if !self.color.is_none() {
            s.push_str(AnsiCode::reset().as_str());
        }
        s.push_str(V);
        s
    }

    /// Top chrome, one line per character row, bottom chrome.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once_with(|| self.top())
            .chain((0..self.y_chars).map(|r| self.row(r)))
            .chain(std::iter::once_with(|| self.bottom()))
    }
}
