//! Gesture script format and replay.

use anyhow::Context;
use kurbo::Point;
use promraw_core::{CanvasSession, InteractionMode, PointerEvent, PointerPhase, StyleConfig, ToolKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A recorded sequence of host interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub ops: Vec<ScriptOp>,
}

/// One host interaction, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    /// Raw pointer event in device pixels.
    Pointer { event: PointerEvent },
    /// Mouse down at the first point, moves through the rest, then up.
    Stroke { points: Vec<Point> },
    Style { style: StyleConfig },
    Tool { tool: ToolKind },
    Color { color: String },
    Width { width: u32 },
    Mode { mode: InteractionMode },
    Undo,
    Redo,
    Clear,
    ZoomIn,
    ZoomOut,
    SetZoom { zoom: f64 },
    Pan { dx: f64, dy: f64 },
    ResetViewport,
}

impl Script {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing script {}", path.display()))
    }
}

/// Outcome counts of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Ops that changed session state.
    pub applied: usize,
    /// Ops the session treated as no-ops.
    pub ignored: usize,
    /// Ops rejected as invalid (bad style values).
    pub rejected: usize,
}

/// Replay `script` against `session`.
///
/// A gesture still open when the script ends is finalized.
pub fn run(session: &mut CanvasSession, script: &Script) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (idx, op) in script.ops.iter().enumerate() {
        match apply(session, op) {
            Ok(true) => summary.applied += 1,
            Ok(false) => {
                log::debug!("op {} had no effect: {:?}", idx, op);
                summary.ignored += 1;
            }
            Err(e) => {
                log::warn!("op {} rejected: {}", idx, e);
                summary.rejected += 1;
            }
        }
    }
    if session.is_drawing() {
        log::debug!("Script ended mid-gesture");
        session.cancel_stroke();
    }
    summary
}

fn apply(session: &mut CanvasSession, op: &ScriptOp) -> promraw_core::EngineResult<bool> {
    let changed = match op {
        ScriptOp::Pointer { event } => session.handle_pointer(event),
        ScriptOp::Stroke { points } => replay_stroke(session, points),
        ScriptOp::Style { style } => {
            session.apply_style(style)?;
            true
        }
        ScriptOp::Tool { tool } => {
            session.set_tool(*tool);
            true
        }
        ScriptOp::Color { color } => {
            session.set_color(color)?;
            true
        }
        ScriptOp::Width { width } => {
            session.set_width(*width)?;
            true
        }
        ScriptOp::Mode { mode } => {
            session.set_mode(*mode);
            true
        }
        ScriptOp::Undo => session.undo(),
        ScriptOp::Redo => session.redo(),
        ScriptOp::Clear => {
            session.clear();
            true
        }
        ScriptOp::ZoomIn => {
            session.zoom_in();
            true
        }
        ScriptOp::ZoomOut => {
            session.zoom_out();
            true
        }
        ScriptOp::SetZoom { zoom } => {
            session.set_zoom(*zoom);
            true
        }
        ScriptOp::Pan { dx, dy } => {
            session.pan(*dx, *dy);
            true
        }
        ScriptOp::ResetViewport => {
            session.reset_viewport();
            true
        }
    };
    Ok(changed)
}

fn replay_stroke(session: &mut CanvasSession, points: &[Point]) -> bool {
    let Some((first, rest)) = points.split_first() else {
        return false;
    };
    session.handle_pointer(&PointerEvent::mouse(PointerPhase::Down, first.x, first.y));
    for p in rest {
        session.handle_pointer(&PointerEvent::mouse(PointerPhase::Move, p.x, p.y));
    }
    let end = rest.last().unwrap_or(first);
    session.handle_pointer(&PointerEvent::mouse(PointerPhase::Up, end.x, end.y))
}
