//! Rolling quadratic smoothing for freehand segments.

use kurbo::{ParamCurve, Point, QuadBez};

/// Maximum distance between flattened samples, in canvas pixels.
const SAMPLE_SPACING: f64 = 2.0;
const MAX_SAMPLES: usize = 64;

/// Rolling quadratic ending at the current point.
///
/// Starts at `start` (the point before `previous`) and uses the midpoint of
/// `previous` and `current` as its control point. For the first segment of a
/// stroke `start == previous`.
pub fn smoothed_segment(start: Point, previous: Point, current: Point) -> QuadBez {
    QuadBez::new(start, previous.midpoint(current), current)
}

/// Flatten a quadratic into a polyline suitable for rasterization.
pub fn flatten(quad: &QuadBez) -> Vec<Point> {
    // Control polygon length bounds the arc length from above.
    let approx_len = quad.p0.distance(quad.p1) + quad.p1.distance(quad.p2);
    let samples = ((approx_len / SAMPLE_SPACING).ceil() as usize).clamp(1, MAX_SAMPLES);
    (0..=samples)
        .map(|i| quad.eval(i as f64 / samples as f64))
        .collect()
}
