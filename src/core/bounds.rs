//! Geometry helpers: score axis labels + terminal size plumbing.

use terminal_size::{Height, Width, terminal_size};

use crate::core::constants::FALLBACK_WIDTH;

/// Current terminal geometry, `None` when stdout is not a terminal.
#[inline]
#[must_use]
pub fn detect_terminal() -> Option<(Width, Height)> {
    terminal_size()
}

/// Usable output width in columns (80 fallback).
#[inline]
#[must_use]
pub fn terminal_width() -> usize {
    detect_terminal().map_or(FALLBACK_WIDTH, |(w, _)| usize::from(w.0))
}

/// How wide will the y-axis labels be for the given range?
#[inline]
#[must_use]
pub fn y_label_width((low, high): (f64, f64), decimals: usize) -> usize {
    let lo = format!("{low:.decimals$}").len();
    let hi = format!("{high:.decimals$}").len();
    lo.max(hi)
}
