//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the drawing engine.
///
/// Expected interaction edge cases (undo at the base snapshot, a pointer-down
/// outside the surface, an event without position data) are not errors; they
/// are reported as `false`/`None` by the operation that ignored them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid stroke width: {0} (expected 1..=50)")]
    InvalidWidth(u32),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Canvas is blank")]
    EmptyCanvas,
    #[error("No prompt supplied")]
    MissingPrompt,
    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
