//! Promraw Core Library
//!
//! Raster drawing engine for the Promraw canvas: pointer normalization,
//! viewport mapping, tool stroke synthesis, snapshot history and PNG export
//! around a single owned pixel surface.

pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod session;
pub mod style;
pub mod surface;
pub mod tools;
pub mod viewport;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use export::{DEFAULT_EXPORT_FILENAME, PNG_DATA_URI_PREFIX};
pub use history::{HistoryStack, Snapshot};
pub use input::{InputNormalizer, PointerEvent, PointerPhase, PointerSample};
pub use session::{CanvasSession, InteractionMode, Submission};
pub use style::{PALETTE, Rgba, StrokeStyle, StyleConfig, ToolKind};
pub use surface::RasterSurface;
pub use tools::{ToolEngine, ToolPhase};
pub use viewport::Viewport;
