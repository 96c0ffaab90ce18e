//! Stroke synthesis for the drawing tools.

pub mod smoothing;
pub mod spray;

use crate::style::{Rgba, StrokeStyle, ToolKind};
use crate::surface::RasterSurface;
use kurbo::Point;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Opacity the marker composites at.
pub const MARKER_OPACITY: f32 = 0.3;
/// Hue advance per rainbow draw event, in degrees.
pub const RAINBOW_HUE_STEP: u16 = 5;

/// Resolved paint parameters for one synthesized segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgba,
    pub width: f64,
    pub opacity: f32,
}

/// An in-progress stroke. Never persisted; its effect lives on in history.
#[derive(Debug, Clone)]
pub struct Stroke {
    /// Canvas-space points received so far, starting with the begin point.
    points: Vec<Point>,
    /// Style active when the stroke began.
    style: StrokeStyle,
}

impl Stroke {
    fn new(start: Point, style: StrokeStyle) -> Self {
        Self {
            points: vec![start],
            style,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Last point received; the next segment's control point is the
    /// midpoint of this and the incoming point.
    pub fn anchor(&self) -> Point {
        // A stroke is always created with its start point.
        self.points[self.points.len() - 1]
    }

    /// Start of the next smoothed segment: the point before the anchor, or
    /// the anchor itself while the stroke has a single point.
    pub fn segment_start(&self) -> Point {
        match self.points.len() {
            0 | 1 => self.anchor(),
            n => self.points[n - 2],
        }
    }
}

/// Per-stroke state machine: Idle → Drawing → Idle.
#[derive(Debug, Clone, Default)]
pub enum ToolPhase {
    #[default]
    Idle,
    Drawing(Stroke),
}

/// Synthesizes raster mutations from a canvas-space point stream.
#[derive(Debug, Clone)]
pub struct ToolEngine {
    style: StrokeStyle,
    phase: ToolPhase,
    /// Rainbow hue in degrees, `0..360`. Advances only on rainbow draw events.
    rainbow_hue: u16,
    rng: StdRng,
}

impl Default for ToolEngine {
    fn default() -> Self {
        Self::new(StrokeStyle::default())
    }
}

impl ToolEngine {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            phase: ToolPhase::Idle,
            rainbow_hue: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose spray output is reproducible.
    pub fn with_seed(style: StrokeStyle, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(style)
        }
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Replace the style. Takes effect from the next synthesized segment.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.style = self.style.with_tool(tool);
    }

    pub fn rainbow_hue(&self) -> u16 {
        self.rainbow_hue
    }

    pub fn phase(&self) -> &ToolPhase {
        &self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, ToolPhase::Drawing(_))
    }

    /// Paint parameters the current tool would use right now.
    pub fn paint(&self, background: Rgba) -> Paint {
        let width = self.style.width() as f64;
        match self.style.tool() {
            ToolKind::Brush => Paint {
                color: self.style.color(),
                width,
                opacity: 1.0,
            },
            ToolKind::Pencil => Paint {
                color: self.style.color(),
                width: width / 2.0,
                opacity: 1.0,
            },
            ToolKind::Marker => Paint {
                color: self.style.color(),
                width,
                opacity: MARKER_OPACITY,
            },
            ToolKind::Eraser => Paint {
                color: background,
                width,
                opacity: 1.0,
            },
            ToolKind::Rainbow => Paint {
                color: Rgba::from_hsl(self.rainbow_hue as f64, 1.0, 0.5),
                width,
                opacity: 1.0,
            },
            ToolKind::Spray => Paint {
                color: self.style.color(),
                width: 1.0,
                opacity: 1.0,
            },
        }
    }

    /// Start a stroke at `point`.
    ///
    /// Paints a start disc (or an initial spray burst) so a tap with no
    /// movement still leaves a mark. Ignored while already drawing.
    pub fn begin(&mut self, surface: &mut RasterSurface, point: Point) -> bool {
        if self.is_drawing() {
            log::debug!("Ignoring begin while a stroke is already active");
            return false;
        }

        if self.style.tool() == ToolKind::Spray {
            self.spray_at(surface, point);
        } else {
            let paint = self.paint(surface.background());
            surface.fill_disc(point, paint.width / 2.0, paint.color, paint.opacity);
        }

        self.phase = ToolPhase::Drawing(Stroke::new(point, self.style));
        true
    }

    /// Extend the active stroke to `point`. Ignored while idle.
    pub fn update(&mut self, surface: &mut RasterSurface, point: Point) -> bool {
        let (start, anchor) = match &self.phase {
            ToolPhase::Drawing(stroke) => (stroke.segment_start(), stroke.anchor()),
            ToolPhase::Idle => return false,
        };

        match self.style.tool() {
            ToolKind::Spray => self.spray_at(surface, point),
            tool => {
                if tool == ToolKind::Rainbow {
                    self.advance_hue();
                }
                let paint = self.paint(surface.background());
                let segment = smoothing::flatten(&smoothing::smoothed_segment(start, anchor, point));
                surface.stroke_polyline(&segment, paint.width, paint.color, paint.opacity);
            }
        }

        if let ToolPhase::Drawing(stroke) = &mut self.phase {
            stroke.points.push(point);
        }
        true
    }

    /// Finish the active stroke and hand it back, or `None` while idle.
    pub fn end(&mut self) -> Option<Stroke> {
        match std::mem::take(&mut self.phase) {
            ToolPhase::Drawing(stroke) => Some(stroke),
            ToolPhase::Idle => None,
        }
    }

    fn advance_hue(&mut self) {
        self.rainbow_hue = (self.rainbow_hue + RAINBOW_HUE_STEP) % 360;
    }

    fn spray_at(&mut self, surface: &mut RasterSurface, point: Point) {
        let color = self.style.color();
        let width = self.style.width();
        spray::spray(surface, point, width, color, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(tool: ToolKind, color: &str, width: u32) -> ToolEngine {
        ToolEngine::with_seed(StrokeStyle::new(tool, color, width).unwrap(), 1)
    }

    #[test]
    fn test_state_machine() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Brush, "#000000", 4);
        assert!(!tools.is_drawing());
        assert!(!tools.update(&mut surface, Point::new(10.0, 10.0)));
        assert!(tools.end().is_none());

        assert!(tools.begin(&mut surface, Point::new(10.0, 10.0)));
        assert!(tools.is_drawing());
        assert!(!tools.begin(&mut surface, Point::new(50.0, 50.0)));
        assert!(tools.update(&mut surface, Point::new(20.0, 10.0)));

        let stroke = tools.end().unwrap();
        assert_eq!(stroke.points(), &[Point::new(10.0, 10.0), Point::new(20.0, 10.0)]);
        assert!(!tools.is_drawing());
    }

    #[test]
    fn test_begin_paints_start_dot() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Brush, "#FF5722", 8);
        tools.begin(&mut surface, Point::new(100.0, 100.0));
        assert_eq!(surface.pixel(100, 100), Some(Rgba::opaque(255, 87, 34)));
    }

    #[test]
    fn test_segment_curves_through_previous_points() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Brush, "#000000", 4);
        tools.begin(&mut surface, Point::new(100.0, 100.0));
        tools.update(&mut surface, Point::new(150.0, 100.0));
        tools.update(&mut surface, Point::new(150.0, 150.0));

        // Quadratic (100,100) -> (150,125) -> (150,150) passes (137.5, 125) at t = 0.5.
        assert_ne!(surface.pixel(137, 125), Some(Rgba::WHITE));
        // The straight chord from (100,100) to the corner would cover this pixel.
        assert_eq!(surface.pixel(125, 125), Some(Rgba::WHITE));
    }

    #[test]
    fn test_segment_start() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Brush, "#000000", 4);
        tools.begin(&mut surface, Point::new(1.0, 1.0));
        let ToolPhase::Drawing(stroke) = tools.phase() else {
            panic!("expected an active stroke");
        };
        assert_eq!(stroke.segment_start(), Point::new(1.0, 1.0));

        tools.update(&mut surface, Point::new(5.0, 1.0));
        tools.update(&mut surface, Point::new(9.0, 4.0));
        let ToolPhase::Drawing(stroke) = tools.phase() else {
            panic!("expected an active stroke");
        };
        assert_eq!(stroke.segment_start(), Point::new(5.0, 1.0));
        assert_eq!(stroke.anchor(), Point::new(9.0, 4.0));
    }

    #[test]
    fn test_pencil_is_half_width() {
        let tools = engine(ToolKind::Pencil, "#000000", 10);
        let paint = tools.paint(Rgba::WHITE);
        assert!((paint.width - 5.0).abs() < f64::EPSILON);

        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Pencil, "#000000", 10);
        tools.begin(&mut surface, Point::new(100.0, 100.0));
        tools.update(&mut surface, Point::new(200.0, 100.0));
        // Brush of width 10 would reach 4px above the line; the pencil does not.
        assert_eq!(surface.pixel(150, 95), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(150, 99), Some(Rgba::BLACK));
    }

    #[test]
    fn test_marker_is_translucent_and_darkens() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Marker, "#000000", 10);
        tools.begin(&mut surface, Point::new(50.0, 50.0));
        tools.update(&mut surface, Point::new(150.0, 50.0));
        tools.end();
        let once = surface.pixel(100, 50).unwrap();
        assert!(once.r > 0 && once.r < 255);

        tools.begin(&mut surface, Point::new(50.0, 50.0));
        tools.update(&mut surface, Point::new(150.0, 50.0));
        tools.end();
        let twice = surface.pixel(100, 50).unwrap();
        assert!(twice.r < once.r);
    }

    #[test]
    fn test_eraser_ignores_palette_color() {
        let mut surface = RasterSurface::default();
        surface.fill(Rgba::BLACK);
        let mut tools = engine(ToolKind::Eraser, "#FF5722", 10);
        tools.begin(&mut surface, Point::new(100.0, 100.0));
        tools.update(&mut surface, Point::new(140.0, 100.0));
        assert_eq!(surface.pixel(120, 100), Some(Rgba::WHITE));
        assert_eq!(tools.paint(Rgba::WHITE).color, Rgba::WHITE);
    }

    #[test]
    fn test_rainbow_hue_advances_per_draw_event() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Rainbow, "#000000", 6);
        let hue_0 = tools.rainbow_hue();
        tools.begin(&mut surface, Point::new(10.0, 10.0));
        assert_eq!(tools.rainbow_hue(), hue_0);

        for i in 1..=100u16 {
            tools.update(&mut surface, Point::new(10.0 + i as f64, 10.0));
            assert_eq!(tools.rainbow_hue(), (hue_0 + RAINBOW_HUE_STEP * i) % 360);
        }
    }

    #[test]
    fn test_rainbow_paints_current_hue() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Rainbow, "#000000", 10);
        tools.begin(&mut surface, Point::new(100.0, 100.0));
        tools.update(&mut surface, Point::new(160.0, 100.0));
        // First draw event: hue 5.
        let expected = Rgba::from_hsl(5.0, 1.0, 0.5);
        assert_eq!(surface.pixel(130, 100), Some(expected));
    }

    #[test]
    fn test_hue_frozen_for_other_tools() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Brush, "#000000", 6);
        tools.begin(&mut surface, Point::new(10.0, 10.0));
        for i in 0..10 {
            tools.update(&mut surface, Point::new(20.0 + i as f64, 10.0));
        }
        assert_eq!(tools.rainbow_hue(), 0);
    }

    #[test]
    fn test_spray_begin_has_no_disc() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Spray, "#000000", 10);
        tools.begin(&mut surface, Point::new(300.0, 300.0));
        // Spray marks are single pixels, never a filled 10px disc.
        assert!(surface.painted_pixels() <= spray::spray_density(10));
    }

    #[test]
    fn test_style_change_applies_to_next_segment() {
        let mut surface = RasterSurface::default();
        let mut tools = engine(ToolKind::Brush, "#000000", 6);
        tools.begin(&mut surface, Point::new(100.0, 100.0));
        tools.update(&mut surface, Point::new(150.0, 100.0));
        tools.update(&mut surface, Point::new(200.0, 100.0));
        tools.set_style(tools.style().with_color(Rgba::opaque(255, 0, 0)));
        // Runs from (150, 100); the first segment keeps its color.
        tools.update(&mut surface, Point::new(250.0, 100.0));

        assert_eq!(surface.pixel(125, 100), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(225, 100), Some(Rgba::opaque(255, 0, 0)));
        let stroke = tools.end().unwrap();
        assert_eq!(stroke.style().color(), Rgba::BLACK);
    }
}
