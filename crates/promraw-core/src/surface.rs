//! Fixed-size RGBA8 raster surface.

use crate::style::Rgba;
use kurbo::{Point, Rect, Size};

/// Default surface width in pixels.
pub const SURFACE_WIDTH: u32 = 800;
/// Default surface height in pixels.
pub const SURFACE_HEIGHT: u32 = 600;

const BYTES_PER_PIXEL: usize = 4;

/// A mutable pixel buffer with immutable dimensions.
///
/// Pixel `(x, y)` covers the square `[x, x + 1) × [y, y + 1)`; coverage is
/// sampled at pixel centers. All drawing primitives clip to the surface, so
/// geometry partially or entirely outside the bounds is safe to pass in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    background: Rgba,
    pixels: Vec<u8>,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT, Rgba::WHITE)
    }
}

impl RasterSurface {
    /// Create a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        let mut surface = Self {
            width,
            height,
            background,
            pixels: vec![0; len],
        };
        surface.clear();
        surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    /// The full surface rectangle in canvas space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Overwrite the whole buffer. Returns false if the length does not match.
    pub fn restore(&mut self, pixels: &[u8]) -> bool {
        if pixels.len() != self.pixels.len() {
            log::warn!(
                "Refusing to restore {} bytes onto a {}x{} surface",
                pixels.len(),
                self.width,
                self.height
            );
            return false;
        }
        self.pixels.copy_from_slice(pixels);
        true
    }

    /// Read a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x as i64, y as i64)?;
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Fill every pixel with the background color.
    pub fn clear(&mut self) {
        self.fill(self.background);
    }

    /// True iff every pixel equals the background color.
    pub fn is_blank(&self) -> bool {
        let bg = [
            self.background.r,
            self.background.g,
            self.background.b,
            self.background.a,
        ];
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .all(|px| px == bg)
    }

    /// Number of pixels that differ from the background.
    pub fn painted_pixels(&self) -> usize {
        let bg = [
            self.background.r,
            self.background.g,
            self.background.b,
            self.background.a,
        ];
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|px| *px != bg)
            .count()
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Source-over composite `color` onto one pixel with the given coverage.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        let Some(i) = self.offset(x, y) else { return };
        let alpha = coverage.clamp(0.0, 1.0) * (color.a as f32 / 255.0);
        if alpha <= 0.0 {
            return;
        }

        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        let src = [color.r, color.g, color.b];
        for (c, &s) in src.iter().enumerate() {
            let d = self.pixels[i + c] as f32;
            let value = if out_a > 0.0 {
                (s as f32 * alpha + d * dst_a * (1.0 - alpha)) / out_a
            } else {
                0.0
            };
            self.pixels[i + c] = value.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Paint a single-pixel mark at the pixel containing `point`.
    pub fn plot(&mut self, point: Point, color: Rgba, opacity: f32) {
        self.blend(point.x.floor() as i64, point.y.floor() as i64, color, opacity);
    }

    /// Fill an anti-aliased disc.
    pub fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba, opacity: f32) {
        self.composite_coverage(&[center], radius, color, opacity);
    }

    /// Stroke a polyline with round caps and joins.
    ///
    /// The whole polyline is composited once, so overlapping parts of the same
    /// polyline do not accumulate opacity; separate calls do.
    pub fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba, opacity: f32) {
        self.composite_coverage(points, width / 2.0, color, opacity);
    }

    fn composite_coverage(&mut self, points: &[Point], radius: f64, color: Rgba, opacity: f32) {
        if points.is_empty() || radius <= 0.0 || opacity <= 0.0 {
            return;
        }

        let Some((x0, y0, x1, y1)) = self.clip_box(points, radius + 1.0) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let dist = distance_to_polyline(center, points);
                let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0) as f32;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage * opacity);
                }
            }
        }
    }

    /// Integer pixel box around `points` grown by `pad`, clipped to the surface.
    fn clip_box(&self, points: &[Point], pad: f64) -> Option<(i64, i64, i64, i64)> {
        let mut bounds = Rect::from_points(points[0], points[0]);
        for p in &points[1..] {
            bounds = bounds.union_pt(*p);
        }
        let bounds = bounds.inflate(pad, pad).intersect(self.bounds());
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return None;
        }
        Some((
            bounds.x0.floor() as i64,
            bounds.y0.floor() as i64,
            bounds.x1.ceil() as i64,
            bounds.y1.ceil() as i64,
        ))
    }
}

/// Distance from `p` to the nearest point of the polyline.
fn distance_to_polyline(p: Point, points: &[Point]) -> f64 {
    if points.len() == 1 {
        return p.distance(points[0]);
    }
    points
        .windows(2)
        .map(|w| distance_to_segment(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
