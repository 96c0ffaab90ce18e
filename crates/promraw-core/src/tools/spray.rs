//! Stochastic spray fill.

use crate::style::Rgba;
use crate::surface::RasterSurface;
use kurbo::{Point, Vec2};
use rand::Rng;

/// Spray radius for a given stroke width.
pub fn spray_radius(width: u32) -> i64 {
    2 * width as i64
}

/// Number of offsets sampled per spray invocation.
pub fn spray_density(width: u32) -> usize {
    2 * width as usize
}

/// Sample `density` integer offsets from `[-r, r]²` and keep those inside the circle.
pub fn sample_offsets<R: Rng + ?Sized>(width: u32, rng: &mut R) -> Vec<Vec2> {
    let radius = spray_radius(width);
    (0..spray_density(width))
        .filter_map(|_| {
            let dx = rng.gen_range(-radius..=radius);
            let dy = rng.gen_range(-radius..=radius);
            (dx * dx + dy * dy <= radius * radius).then(|| Vec2::new(dx as f64, dy as f64))
        })
        .collect()
}

/// Spray once around `center` and return the centers of the pixels painted.
///
/// Each offset lands on the pixel containing `center + offset`; a pixel whose
/// center falls outside the `2w` circle is skipped, so every painted pixel
/// center lies within `2w` of `center`.
pub fn spray<R: Rng + ?Sized>(
    surface: &mut RasterSurface,
    center: Point,
    width: u32,
    color: Rgba,
    rng: &mut R,
) -> Vec<Point> {
    let radius = spray_radius(width) as f64;
    let points: Vec<Point> = sample_offsets(width, rng)
        .into_iter()
        .map(|offset| {
            let p = center + offset;
            Point::new(p.x.floor() + 0.5, p.y.floor() + 0.5)
        })
        .filter(|pixel_center| pixel_center.distance(center) <= radius)
        .collect();
    for point in &points {
        surface.plot(*point, color, 1.0);
    }
    points
}
