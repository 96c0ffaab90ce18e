//! Canvas session: owns the surface and drives tools, history and viewport.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::export;
use crate::history::{HistoryStack, Snapshot};
use crate::input::{InputNormalizer, PointerEvent, PointerPhase};
use crate::style::{Rgba, StrokeStyle, StyleConfig, ToolKind};
use crate::surface::RasterSurface;
use crate::tools::ToolEngine;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What pointer gestures do. Selected by the host, mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Pointer drags draw with the current tool.
    #[default]
    Draw,
    /// Pointer drags move the viewport.
    Pan,
    /// Pointer input is ignored; zoom is changed through explicit calls.
    Zoom,
}

/// A drawing ready to hand to an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Prompt text, carried as-is.
    pub prompt: String,
    /// `data:image/png;base64,...` URI of the surface.
    pub image_data_uri: String,
}

/// A single drawing session around one raster surface.
///
/// Every mutation of the surface goes through this type. A finished stroke in
/// draw mode commits exactly one history entry; pan and zoom never do.
#[derive(Debug, Clone)]
pub struct CanvasSession {
    id: String,
    config: EngineConfig,
    surface: RasterSurface,
    viewport: Viewport,
    tools: ToolEngine,
    history: HistoryStack,
    mode: InteractionMode,
    /// Last device position of an active pan drag.
    pan_anchor: Option<Point>,
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSession {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        let config = EngineConfig::default();
        let style = StrokeStyle::try_from(&config.default_style).unwrap_or_default();
        Self::assemble(config, ToolEngine::new(style))
    }

    /// Create a session from a validated configuration.
    pub fn with_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let style = StrokeStyle::try_from(&config.default_style)?;
        Ok(Self::assemble(config, ToolEngine::new(style)))
    }

    /// Like [`with_config`](Self::with_config), with reproducible spray output.
    pub fn with_seed(config: EngineConfig, seed: u64) -> EngineResult<Self> {
        config.validate()?;
        let style = StrokeStyle::try_from(&config.default_style)?;
        Ok(Self::assemble(config, ToolEngine::with_seed(style, seed)))
    }

    fn assemble(config: EngineConfig, tools: ToolEngine) -> Self {
        let surface = RasterSurface::new(
            config.surface_width,
            config.surface_height,
            config.background_color(),
        );
        let viewport = Viewport::new(surface.size()).with_zoom_limits(
            config.min_zoom,
            config.max_zoom,
            config.zoom_step,
        );
        let history = HistoryStack::new(Snapshot::capture(&surface), config.history_limit);
        let id = Uuid::new_v4().to_string();
        log::info!(
            "Created canvas session {} ({}x{})",
            id,
            surface.width(),
            surface.height()
        );

        Self {
            id,
            config,
            surface,
            viewport,
            tools,
            history,
            mode: InteractionMode::Draw,
            pan_anchor: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the live surface.
    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tools(&self) -> &ToolEngine {
        &self.tools
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Whether a stroke or pan drag is in flight.
    pub fn is_drawing(&self) -> bool {
        self.tools.is_drawing() || self.pan_anchor.is_some()
    }

    /// Switch interaction mode. An in-flight gesture is finalized first.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode == self.mode {
            return;
        }
        self.end_stroke();
        log::debug!("Interaction mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    // --- Gestures ---

    /// Start a gesture at a device-space point.
    ///
    /// In draw mode the point must land on the surface; a press outside it
    /// is ignored.
    pub fn begin_stroke(&mut self, device_point: Point) -> bool {
        match self.mode {
            InteractionMode::Draw => {
                let point = self.viewport.to_canvas_space(device_point);
                if !self.surface.bounds().contains(point) {
                    log::debug!("Ignoring stroke start outside the surface at {:?}", point);
                    return false;
                }
                let started = self.tools.begin(&mut self.surface, point);
                if started {
                    log::debug!("Stroke started with {} at {:?}", self.tools.style().tool(), point);
                }
                started
            }
            InteractionMode::Pan => {
                if self.pan_anchor.is_some() {
                    return false;
                }
                self.pan_anchor = Some(device_point);
                true
            }
            InteractionMode::Zoom => false,
        }
    }

    /// Extend the current gesture to a device-space point.
    pub fn continue_stroke(&mut self, device_point: Point) -> bool {
        match self.mode {
            InteractionMode::Draw => {
                let point = self.viewport.to_canvas_space(device_point);
                self.tools.update(&mut self.surface, point)
            }
            InteractionMode::Pan => {
                let Some(anchor) = self.pan_anchor else {
                    return false;
                };
                self.viewport.pan_by_device_delta(device_point - anchor);
                self.pan_anchor = Some(device_point);
                true
            }
            InteractionMode::Zoom => false,
        }
    }

    /// Finish the current gesture.
    ///
    /// Returns `true` when a history entry was committed.
    pub fn end_stroke(&mut self) -> bool {
        self.pan_anchor = None;
        let Some(stroke) = self.tools.end() else {
            return false;
        };
        if self.mode != InteractionMode::Draw {
            return false;
        }

        self.history.commit(Snapshot::capture(&self.surface));
        log::debug!(
            "Committed {} stroke with {} points (history {}/{})",
            stroke.style().tool(),
            stroke.points().len(),
            self.history.index(),
            self.history.len()
        );
        true
    }

    /// Finalize an interrupted gesture (touch-cancel, pointer left the document).
    ///
    /// Treated exactly like [`end_stroke`](Self::end_stroke) so the surface
    /// never holds paint without a matching history entry.
    pub fn cancel_stroke(&mut self) -> bool {
        if self.is_drawing() {
            log::debug!("Gesture interrupted, finalizing");
        }
        self.end_stroke()
    }

    /// Route a raw pointer event by phase and mode.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let Some(sample) = InputNormalizer::normalize(event) else {
            return false;
        };
        match (sample.phase, sample.position) {
            (PointerPhase::Down, Some(point)) => self.begin_stroke(point),
            (PointerPhase::Move, Some(point)) => self.continue_stroke(point),
            (PointerPhase::Up, _) => self.end_stroke(),
            (PointerPhase::Cancel, _) => self.cancel_stroke(),
            _ => false,
        }
    }

    // --- Style ---

    pub fn style(&self) -> &StrokeStyle {
        self.tools.style()
    }

    /// Replace the style. Applies from the next synthesized segment.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.tools.set_style(style);
    }

    /// Apply a host-supplied style. An invalid style is rejected and the
    /// previous one stays active.
    pub fn apply_style(&mut self, config: &StyleConfig) -> EngineResult<()> {
        let style = StrokeStyle::try_from(config).inspect_err(|e| {
            log::warn!("Rejected style {:?}: {}", config, e);
        })?;
        self.tools.set_style(style);
        Ok(())
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    pub fn set_color(&mut self, color: &str) -> EngineResult<()> {
        let color = Rgba::from_hex(color).inspect_err(|e| log::warn!("Rejected color: {}", e))?;
        self.tools.set_style(self.tools.style().with_color(color));
        Ok(())
    }

    pub fn set_width(&mut self, width: u32) -> EngineResult<()> {
        let style = self
            .tools
            .style()
            .with_width(width)
            .inspect_err(|e| log::warn!("Rejected width: {}", e))?;
        self.tools.set_style(style);
        Ok(())
    }

    // --- History ---

    /// Restore the previous snapshot. No-op at the blank base.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let Some(snapshot) = self.history.undo() else {
            log::debug!("Nothing to undo");
            return false;
        };
        snapshot.restore_into(&mut self.surface)
    }

    /// Restore the next snapshot. No-op at the tip.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        let Some(snapshot) = self.history.redo() else {
            log::debug!("Nothing to redo");
            return false;
        };
        snapshot.restore_into(&mut self.surface)
    }

    /// Fill the surface with the background and record it as an undoable entry.
    pub fn clear(&mut self) {
        self.end_stroke();
        self.surface.clear();
        self.history.commit(Snapshot::capture(&self.surface));
        log::info!("Canvas cleared");
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Snapshots held, including the blank base.
    pub fn snapshot_count(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    /// Committed entries above the blank base.
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    /// Approximate bytes held by history snapshots.
    pub fn history_memory_usage(&self) -> usize {
        self.history.memory_usage()
    }

    // --- Viewport ---

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.viewport.zoom_by(delta);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Pan by a delta in canvas units.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(Vec2::new(dx, dy));
    }

    pub fn reset_viewport(&mut self) {
        self.viewport.reset();
    }

    /// Tell the session where the surface is displayed on screen.
    pub fn set_element_rect(&mut self, element: Rect) -> bool {
        self.viewport.set_element_rect(element)
    }

    // --- Output ---

    /// True iff every pixel equals the background color.
    pub fn is_empty(&self) -> bool {
        self.surface.is_blank()
    }

    /// Encode the live surface as PNG bytes.
    pub fn export_png(&self) -> EngineResult<Vec<u8>> {
        let png_data = export::surface_to_png(&self.surface)?;
        log::debug!("Exported {} byte PNG", png_data.len());
        Ok(png_data)
    }

    /// Encode the live surface as a `data:image/png;base64,...` URI.
    pub fn export_image(&self) -> EngineResult<String> {
        Ok(export::png_data_uri(&self.export_png()?))
    }

    /// Package the drawing with its prompt.
    ///
    /// Fails when the prompt is blank or nothing has been drawn.
    pub fn prepare_submission(&self, prompt: &str) -> EngineResult<Submission> {
        if prompt.trim().is_empty() {
            return Err(EngineError::MissingPrompt);
        }
        if self.is_empty() {
            return Err(EngineError::EmptyCanvas);
        }
        Ok(Submission {
            prompt: prompt.to_string(),
            image_data_uri: self.export_image()?,
        })
    }
}
