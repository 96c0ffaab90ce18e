//! Pointer input normalization for mouse and touch events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Gesture phase carried by a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The gesture was interrupted (touch-cancel, pointer left the document).
    Cancel,
}

impl PointerPhase {
    /// Whether this phase ends the current gesture.
    pub fn is_terminal(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Cancel)
    }
}

/// Raw pointer event as delivered by the host, in client (device) pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Mouse {
        phase: PointerPhase,
        position: Point,
    },
    Touch {
        phase: PointerPhase,
        /// Active touch points. Only the first is read.
        #[serde(default)]
        touches: Vec<Point>,
    },
}

impl PointerEvent {
    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        PointerEvent::Mouse {
            phase,
            position: Point::new(x, y),
        }
    }

    pub fn touch(phase: PointerPhase, touches: impl Into<Vec<Point>>) -> Self {
        PointerEvent::Touch {
            phase,
            touches: touches.into(),
        }
    }

    pub fn phase(&self) -> PointerPhase {
        match self {
            PointerEvent::Mouse { phase, .. } | PointerEvent::Touch { phase, .. } => *phase,
        }
    }
}

/// Canonical pointer sample: a phase plus an optional device-space position.
///
/// Only terminal phases may lack a position; a `Down`/`Move` without one is
/// dropped by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub position: Option<Point>,
}

/// Converts heterogeneous mouse/touch events into [`PointerSample`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputNormalizer;

impl InputNormalizer {
    /// Read the device-space position of an event, if it has one.
    pub fn position(event: &PointerEvent) -> Option<Point> {
        let position = match event {
            PointerEvent::Mouse { position, .. } => Some(*position),
            PointerEvent::Touch { touches, .. } => touches.first().copied(),
        };
        position.filter(|p| p.is_finite())
    }

    /// Normalize an event.
    ///
    /// Returns `None` when the event carries no usable position and is not a
    /// terminal phase; such events cause no state change. Terminal phases are
    /// always returned so the gesture can be finalized.
    pub fn normalize(event: &PointerEvent) -> Option<PointerSample> {
        let phase = event.phase();
        let position = Self::position(event);
        if position.is_none() && !phase.is_terminal() {
            log::trace!("Dropping {:?} event without position data", phase);
            return None;
        }
        Some(PointerSample { phase, position })
    }
}
