//! Viewport module for the device → canvas transform.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Smallest zoom the viewport accepts.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom the viewport accepts.
pub const MAX_ZOOM: f64 = 3.0;
/// Increment used by `zoom_in` / `zoom_out`.
pub const ZOOM_STEP: f64 = 0.1;

/// Viewport maps device-space input onto the fixed canvas grid.
///
/// A device point goes through three steps, in order:
/// 1. element pixels → surface pixels, using the ratio of the surface
///    resolution to the on-screen element rectangle;
/// 2. division by `zoom`;
/// 3. subtraction of `pan`.
///
/// The viewport never touches pixel data and is never recorded in history.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Current zoom level, always within `[min_zoom, max_zoom]`.
    zoom: f64,
    /// Current pan offset in canvas units. Unconstrained.
    pan: Vec2,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    /// Resolution of the surface being displayed.
    surface_size: Size,
    /// Rectangle the surface occupies on screen, in device pixels.
    element: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Viewport {
    /// Create a viewport whose element rectangle matches the surface 1:1.
    pub fn new(surface_size: Size) -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            surface_size,
            element: Rect::from_origin_size(Point::ZERO, surface_size),
        }
    }

    /// Override the zoom limits and step. Current zoom is re-clamped.
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom_step = zoom_step;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan
    }

    pub fn element_rect(&self) -> Rect {
        self.element
    }

    /// Update where the surface is displayed on screen.
    ///
    /// Degenerate rectangles are ignored and the previous one is kept.
    pub fn set_element_rect(&mut self, element: Rect) -> bool {
        if element.width() <= 0.0 || element.height() <= 0.0 {
            log::debug!("Ignoring degenerate element rect {:?}", element);
            return false;
        }
        self.element = element;
        true
    }

    /// Surface pixels per element pixel, per axis.
    pub fn surface_to_element_scale(&self) -> Vec2 {
        Vec2::new(
            self.surface_size.width / self.element.width(),
            self.surface_size.height / self.element.height(),
        )
    }

    /// Affine transform from device space to canvas space.
    pub fn canvas_transform(&self) -> Affine {
        let scale = self.surface_to_element_scale();
        Affine::translate(-self.pan)
            * Affine::scale(1.0 / self.zoom)
            * Affine::scale_non_uniform(scale.x, scale.y)
            * Affine::translate(-self.element.origin().to_vec2())
    }

    /// Affine transform from canvas space back to device space.
    pub fn device_transform(&self) -> Affine {
        self.canvas_transform().inverse()
    }

    /// Convert a device point to canvas coordinates.
    pub fn to_canvas_space(&self, device_point: Point) -> Point {
        self.canvas_transform() * device_point
    }

    /// Convert a canvas point to device coordinates.
    pub fn to_device_space(&self, canvas_point: Point) -> Point {
        self.device_transform() * canvas_point
    }

    /// Set an absolute zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Add a signed delta to the zoom level, clamped to the allowed range.
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-self.zoom_step);
    }

    /// Pan by a delta in canvas units.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Pan by a delta in device pixels, as produced by a pointer drag.
    pub fn pan_by_device_delta(&mut self, delta: Vec2) {
        self.pan += delta / self.zoom;
    }

    /// Reset zoom to 1.0 and pan to the origin.
    pub fn reset(&mut self) {
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.pan = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point, tolerance: f64) {
        assert!(
            (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(viewport.pan_offset(), Vec2::ZERO);
        let p = Point::new(123.0, 456.0);
        assert_close(viewport.to_canvas_space(p), p, 1e-9);
    }

    #[test]
    fn test_zoom_then_pan_formula() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.0);
        viewport.pan(Vec2::new(50.0, 50.0));

        let canvas = viewport.to_canvas_space(Point::new(400.0, 300.0));
        assert_close(canvas, Point::new(150.0, 100.0), 1e-9);
        assert_close(viewport.to_device_space(canvas), Point::new(400.0, 300.0), 1e-6);
    }

    #[test]
    fn test_element_scaling() {
        let mut viewport = Viewport::default();
        // Displayed at half size, offset by (10, 20) on screen.
        assert!(viewport.set_element_rect(Rect::new(10.0, 20.0, 410.0, 320.0)));
        let scale = viewport.surface_to_element_scale();
        assert!((scale.x - 2.0).abs() < f64::EPSILON);
        assert!((scale.y - 2.0).abs() < f64::EPSILON);

        let canvas = viewport.to_canvas_space(Point::new(110.0, 70.0));
        assert_close(canvas, Point::new(200.0, 100.0), 1e-9);
    }

    #[test]
    fn test_degenerate_element_rect_ignored() {
        let mut viewport = Viewport::default();
        let before = viewport.element_rect();
        assert!(!viewport.set_element_rect(Rect::new(0.0, 0.0, 0.0, 100.0)));
        assert_eq!(viewport.element_rect(), before);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let pans = [
            Vec2::ZERO,
            Vec2::new(37.0, -12.0),
            Vec2::new(-400.0, 250.0),
        ];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(400.0, 300.0),
            Point::new(-25.5, 913.25),
        ];

        for zoom in [0.5, 1.0, 1.8, 3.0] {
            for pan in pans {
                let mut viewport = Viewport::default();
                viewport.set_element_rect(Rect::new(12.0, 34.0, 652.0, 514.0));
                viewport.set_zoom(zoom);
                viewport.pan(pan);
                for p in points {
                    let back = viewport.to_device_space(viewport.to_canvas_space(p));
                    assert_close(back, p, 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(0.01);
        assert!((viewport.zoom() - MIN_ZOOM).abs() < f64::EPSILON);
        viewport.zoom_out();
        assert!((viewport.zoom() - MIN_ZOOM).abs() < f64::EPSILON);

        viewport.set_zoom(100.0);
        assert!((viewport.zoom() - MAX_ZOOM).abs() < f64::EPSILON);
        viewport.zoom_in();
        assert!((viewport.zoom() - MAX_ZOOM).abs() < f64::EPSILON);

        viewport.set_zoom(f64::NAN);
        assert!((viewport.zoom() - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_steps() {
        let mut viewport = Viewport::default();
        viewport.zoom_in();
        viewport.zoom_in();
        assert!((viewport.zoom() - 1.2).abs() < 1e-9);
        viewport.zoom_out();
        assert!((viewport.zoom() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_pan_by_device_delta_scales_with_zoom() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.0);
        viewport.pan_by_device_delta(Vec2::new(20.0, -10.0));
        assert_eq!(viewport.pan_offset(), Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.5);
        viewport.pan(Vec2::new(-400.0, 250.0));
        viewport.reset();
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(viewport.pan_offset(), Vec2::ZERO);
    }
}
