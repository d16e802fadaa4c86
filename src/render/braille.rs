//! Daily scores to UTF-8 braille rows.
//!
//! ### Workflow
//! 1. `preprocess_to_braille` maps each chart point into pixel-space
//!    extrema (`PixelSpan`), one entry per *half* column. Days without data
//!    stay empty, and with `bridge` set each column is stretched towards
//!    its left neighbour so consecutive days read as a connected line.
//! 2. `encode_row` turns one character row of the plot into braille.
//!
//! The intersection of a contiguous vertical range with a 4-pixel braille
//! cell is always one of 11 canonical patterns (full, three top/bottom
//! triplets and pairs, four single dots, empty). The bit-mask for each
//! pattern is pre-computed for both half-columns and looked up at run-time.

use crate::core::constants::BRAILLE_VERTICAL_RESOLUTION as VR;

/// One plotted column: the score range it covers, or a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub min: f64,
    pub max: f64,
}

impl ChartPoint {
    #[inline]
    pub fn flat(v: f64) -> Self {
        Self { min: v, max: v }
    }
}

/// Pixel-space min/max inside one half-column (0 = top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSpan {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone)]
pub struct BraillePlot {
    pub steps: Vec<Option<PixelSpan>>,
}

// --- Pre-Computed Masks ---

/// Pattern enumeration (11 entries):
///
/// 0 empty (⠀), 1 full (⡇), 2 top-three (⠇), 3 bottom-three(⡆), 4 top-two (⠃), 5 middle-two (⠆), 6 bottom-two (⡄),
/// 7 dot-zero (⠁), 8 dot-one (⠂), 9 dot-two (⠄), 10 dot-three (⡀)
const LEFT_MASKS: [u8; 11] = [
    0x00, 0x47, 0x07, 0x46, 0x03, 0x06, 0x44, 0x01, 0x02, 0x04, 0x40,
];
/// Pattern enumeration (11 entries):
///
/// 0 empty (⠀), 1 full (⢸), 2 top-three (⠸), 3 bottom-three(⢰), 4 top-two (⠘), 5 middle-two (⠰), 6 bottom-two (⢠),
/// 7 dot-zero (⠈), 8 dot-one (⠐), 9 dot-two (⠠), 10 dot-three (⢀)
const RIGHT_MASKS: [u8; 11] = [
    0x00, 0xB8, 0x38, 0xB0, 0x18, 0x30, 0xA0, 0x08, 0x10, 0x20, 0x80,
];

/// Map `(low, high)` --- pixel offsets inside a 4-row cell --- to the pattern id.
#[inline]
const fn pattern_id(low: usize, high: usize) -> usize {
    match (low, high) {
        (0, 3) => 1,  // full
        (0, 2) => 2,  // top-3
        (1, 3) => 3,  // bottom-3
        (0, 1) => 4,  // top-2
        (1, 2) => 5,  // middle-2
        (2, 3) => 6,  // bottom-2
        (0, 0) => 7,  // single-0
        (1, 1) => 8,  // single-1
        (2, 2) => 9,  // single-2
        (3, 3) => 10, // single-3
        _ => 0,       // empty / no overlap
    }
}

/// Map points into pixel space for a plot `y_chars` rows tall spanning
/// `y_range` (low, high), `low < high`.
pub fn preprocess_to_braille(
    points: &[Option<ChartPoint>],
    y_range: (f64, f64),
    y_chars: usize,
    bridge: bool,
) -> BraillePlot {
    let vert_px = (y_chars * VR).max(1);
    let (y_min, y_max) = y_range;
    let y_span = (y_max - y_min).max(f64::EPSILON);

    // λ : ℝ → [0,vert_px-1]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let map = |y: f64| -> usize {
        let r = ((y - y_min) / y_span).clamp(0.0, 1.0) * (vert_px - 1) as f64;
        (vert_px - 1) - r.round() as usize
    };

    let mut steps: Vec<Option<PixelSpan>> = points
        .iter()
        .map(|p| {
            p.map(|p| {
                let (mut lo, mut hi) = (map(p.min), map(p.max));
                if lo > hi {
                    std::mem::swap(&mut lo, &mut hi);
                }
                PixelSpan { min: lo, max: hi }
            })
        })
        .collect();

    if bridge {
        for i in 1..steps.len() {
            if let (Some(prev), Some(curr)) = (steps[i - 1], steps[i]) {
                let mut next = curr;
                if prev.max < curr.min {
                    next.min = prev.max + 1;
                } else if prev.min > curr.max {
                    next.max = prev.min - 1;
                }
                steps[i] = Some(next);
            }
        }
    }

    BraillePlot { steps }
}

#[inline]
fn cell_pattern(step: Option<&Option<PixelSpan>>, row_top: usize) -> usize {
    let row_bottom = row_top + VR - 1;
    match step {
        Some(Some(s)) if s.max >= row_top && s.min <= row_bottom => pattern_id(
            s.min.max(row_top) - row_top,
            s.max.min(row_bottom) - row_top,
        ),
        _ => 0,
    }
}

/// Append the braille glyphs of character row `row` (0 = top) to `out`.
pub fn encode_row(plot: &BraillePlot, row: usize, x_chars: usize, out: &mut String) {
    let row_top = row * VR;
    for col in 0..x_chars {
        let left = cell_pattern(plot.steps.get(col * 2), row_top);
        let right = cell_pattern(plot.steps.get(col * 2 + 1), row_top);
        // https://en.wikipedia.org/wiki/Braille_Patterns
        let mask = LEFT_MASKS[left] | RIGHT_MASKS[right];
        out.push(char::from_u32(0x2800 + u32::from(mask)).unwrap_or(' '));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_land_on_top_and_bottom_pixels() {
        let pts = [Some(ChartPoint::flat(10.0)), Some(ChartPoint::flat(1.0)), None];
        let plot = preprocess_to_braille(&pts, (1.0, 10.0), 2, false);
        assert_eq!(plot.steps[0], Some(PixelSpan { min: 0, max: 0 }));
        assert_eq!(plot.steps[1], Some(PixelSpan { min: 7, max: 7 }));
        assert_eq!(plot.steps[2], None);
    }

    #[test]
    fn test_encode_rows() {
        let pts = [Some(ChartPoint::flat(10.0)), Some(ChartPoint::flat(1.0))];
        let plot = preprocess_to_braille(&pts, (1.0, 10.0), 2, false);
        let mut top = String::new();
        encode_row(&plot, 0, 2, &mut top);
        let mut bottom = String::new();
        encode_row(&plot, 1, 2, &mut bottom);
        // left dot 0 on top row; right dot 3 on bottom row; second cell empty
        assert_eq!(top, "⠁⠀");
        assert_eq!(bottom, "⢀⠀");
    }

    #[test]
    fn test_bridge_fills_vertical_gap() {
        let pts = [Some(ChartPoint::flat(10.0)), Some(ChartPoint::flat(1.0))];
        let plot = preprocess_to_braille(&pts, (1.0, 10.0), 2, true);
        assert_eq!(plot.steps[1], Some(PixelSpan { min: 1, max: 7 }));

        let gap = [Some(ChartPoint::flat(10.0)), None, Some(ChartPoint::flat(1.0))];
        let plot = preprocess_to_braille(&gap, (1.0, 10.0), 2, true);
        assert_eq!(plot.steps[2], Some(PixelSpan { min: 7, max: 7 }));
    }
}
