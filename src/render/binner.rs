//! Fit a daily series onto the available half-columns.
//!
//! * more points than columns: consecutive points are merged into
//!   min/max buckets by index, so no extreme is lost;
//! * fewer points: each point is repeated (up to `MAX_STRETCH` times) so
//!   short windows do not huddle in the left corner.

use crate::{
    core::constants::BRAILLE_HORIZONTAL_RESOLUTION as HR,
    render::braille::ChartPoint,
};

/// Widest a single day is drawn, in half-columns.
const MAX_STRETCH: usize = 4;

/// Merge a run of points into one; gaps only survive if the whole run is a gap.
fn merge(run: &[Option<ChartPoint>]) -> Option<ChartPoint> {
    run.iter().flatten().fold(None, |acc, p| {
        Some(match acc {
            None => *p,
            Some(a) => ChartPoint {
                min: a.min.min(p.min),
                max: a.max.max(p.max),
            },
        })
    })
}

/// Resample `data` to at most `max_x_chars` character columns.
/// Returns the points to plot (one per half-column) and the column count.
pub fn fit_to_width(data: &[Option<ChartPoint>], max_x_chars: usize) -> (Vec<Option<ChartPoint>>, usize) {
    let capacity = max_x_chars.max(1) * HR;
    let n = data.len();
    if n == 0 {
        return (Vec::new(), max_x_chars.max(1));
    }

    if n > capacity {
        // index binning: bucket i covers [i*n/capacity, (i+1)*n/capacity)
        let out: Vec<Option<ChartPoint>> = (0..capacity)
            .map(|i| merge(&data[i * n / capacity..(i + 1) * n / capacity]))
            .collect();
        return (out, max_x_chars.max(1));
    }

    let stretch = (capacity / n).clamp(1, MAX_STRETCH);
    let out: Vec<Option<ChartPoint>> = data
        .iter()
        .flat_map(|p| std::iter::repeat_n(*p, stretch))
        .collect();
    let x_chars = out.len().div_ceil(HR);
    (out, x_chars)
}
