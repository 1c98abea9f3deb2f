//! Speed chart geometry.
//!
//! Speeds are scaled against the fastest value in the visible window, not the
//! all-time maximum, so the scale shifts as new runs push old ones out.

/// Placeholder shown when there are no runs to plot.
pub const NO_DATA: &str = "No run history yet";

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Drawing surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Surface width.
    pub width: f64,
    /// Surface height.
    pub height: f64,
    /// Inset on every side.
    pub padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 150.0,
            padding: 10.0,
        }
    }
}

/// A point on the drawing surface. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// What to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Nothing to plot; show the message instead of an empty chart.
    Empty {
        /// Placeholder text.
        message: &'static str,
    },
    /// A polyline through one point per speed.
    Line {
        /// Start and end of the x axis.
        baseline: (Point, Point),
        /// Points in chronological order.
        points: Vec<Point>,
    },
}

/// Scale each speed to the window maximum, giving values in `0.0..=1.0`.
///
/// A window whose maximum is zero is scaled by 1.
#[must_use]
pub fn normalize(speeds: &[f64]) -> Vec<f64> {
    let max = speeds.iter().copied().fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    speeds.iter().map(|s| s / max).collect()
}

/// Lay out a speed series on a surface.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn plot(speeds: &[f64], layout: ChartLayout) -> Chart {
    if speeds.is_empty() {
        return Chart::Empty { message: NO_DATA };
    }

    let ChartLayout {
        width: w,
        height: h,
        padding: pad,
    } = layout;
    let gaps = speeds.len().saturating_sub(1).max(1) as f64;
    let step_x = (w - pad * 2.0) / gaps;

    let points = normalize(speeds)
        .into_iter()
        .enumerate()
        .map(|(i, n)| Point {
            x: pad + i as f64 * step_x,
            y: h - pad - n * (h - pad * 2.0),
        })
        .collect();

    Chart::Line {
        baseline: (
            Point { x: pad, y: h - pad },
            Point {
                x: w - pad,
                y: h - pad,
            },
        ),
        points,
    }
}

/// Render a series as a one-line block sparkline.
///
/// Returns `None` for an empty series.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn sparkline(speeds: &[f64]) -> Option<String> {
    if speeds.is_empty() {
        return None;
    }
    let top = (SPARK_LEVELS.len() - 1) as f64;
    Some(
        normalize(speeds)
            .into_iter()
            .map(|n| {
                let level = (n.clamp(0.0, 1.0) * top).round() as usize;
                SPARK_LEVELS[level]
            })
            .collect(),
    )
}
