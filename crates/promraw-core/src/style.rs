//! Tool kinds, stroke styles and color handling.

use crate::error::{EngineError, EngineResult};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted stroke width.
pub const MIN_WIDTH: u32 = 1;
/// Largest accepted stroke width.
pub const MAX_WIDTH: u32 = 50;
/// Width selected when a session starts.
pub const DEFAULT_WIDTH: u32 = 8;
/// Color selected when a session starts.
pub const DEFAULT_COLOR: &str = "#FF5722";

/// Predefined palette offered to the user.
pub const PALETTE: [&str; 14] = [
    "#FF5722", // Orange
    "#E91E63", // Pink
    "#9C27B0", // Purple
    "#673AB7", // Deep Purple
    "#3F51B5", // Indigo
    "#2196F3", // Blue
    "#00BCD4", // Cyan
    "#009688", // Teal
    "#4CAF50", // Green
    "#CDDC39", // Lime
    "#FFEB3B", // Yellow
    "#FF9800", // Amber
    "#000000", // Black
    "#FFFFFF", // White
];

/// RGBA8 color as stored in the raster surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(input: &str) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidColor(input.to_string());
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => Ok(Self::opaque(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            6 => Ok(Self::opaque(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Build an opaque color from HSL components.
    ///
    /// `hue` is in degrees, `saturation` and `lightness` in `0.0..=1.0`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::opaque(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let to_u8 = |t: f64| (hue_to_channel(p, q, t) * 255.0).round() as u8;
        Self::opaque(to_u8(h + 1.0 / 3.0), to_u8(h), to_u8(h - 1.0 / 3.0))
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Pencil,
    Marker,
    Spray,
    Rainbow,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Brush,
        ToolKind::Pencil,
        ToolKind::Marker,
        ToolKind::Spray,
        ToolKind::Rainbow,
        ToolKind::Eraser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Pencil => "pencil",
            ToolKind::Marker => "marker",
            ToolKind::Spray => "spray",
            ToolKind::Rainbow => "rainbow",
            ToolKind::Eraser => "eraser",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownTool(s.to_string()))
    }
}

/// A validated tool/color/width selection.
///
/// Construction goes through [`StrokeStyle::new`] or the `with_*` builders,
/// which reject widths outside `MIN_WIDTH..=MAX_WIDTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    tool: ToolKind,
    color: Rgba,
    width: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Rgba::opaque(0xFF, 0x57, 0x22),
            width: DEFAULT_WIDTH,
        }
    }
}

impl StrokeStyle {
    /// Create a style from the boundary representation (hex color, integer width).
    pub fn new(tool: ToolKind, color: &str, width: u32) -> EngineResult<Self> {
        Ok(Self {
            tool,
            color: Rgba::from_hex(color)?,
            width: validate_width(width)?,
        })
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }

    /// Replace the color. Alpha is forced opaque; tools apply their own opacity.
    pub fn with_color(mut self, color: impl Into<Rgba>) -> Self {
        let color = color.into();
        self.color = Rgba::opaque(color.r, color.g, color.b);
        self
    }

    pub fn with_width(mut self, width: u32) -> EngineResult<Self> {
        self.width = validate_width(width)?;
        Ok(self)
    }

    /// Boundary representation of this style.
    pub fn to_config(&self) -> StyleConfig {
        StyleConfig {
            tool: self.tool,
            color: self.color.to_hex(),
            width: self.width,
        }
    }
}

fn validate_width(width: u32) -> EngineResult<u32> {
    if (MIN_WIDTH..=MAX_WIDTH).contains(&width) {
        Ok(width)
    } else {
        Err(EngineError::InvalidWidth(width))
    }
}

/// Style configuration as received from the host: `{ tool, color, width }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub tool: ToolKind,
    pub color: String,
    pub width: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StrokeStyle::default().to_config()
    }
}

impl TryFrom<&StyleConfig> for StrokeStyle {
    type Error = EngineError;

    fn try_from(config: &StyleConfig) -> Result<Self, Self::Error> {
        StrokeStyle::new(config.tool, &config.color, config.width)
    }
}
