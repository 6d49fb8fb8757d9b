use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const GRAY: Self = Self::from_rgb8(0x88, 0x88, 0x88);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_argb8(0xFF, red, green, blue)
    }

    #[must_use]
    pub const fn from_argb8(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
            alpha as f64 / 255.0,
        )
    }

    /// Parses `#RRGGBB`, `#AARRGGBB` or a CSS-style color name.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        let invalid = || ChartError::InvalidColor {
            value: input.to_owned(),
        };

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            let [a, r, g, b] = packed.to_be_bytes();
            return match hex.len() {
                6 => Ok(Self::from_rgb8(r, g, b)),
                8 => Ok(Self::from_argb8(a, r, g, b)),
                _ => Err(invalid()),
            };
        }

        named_color(&trimmed.to_ascii_lowercase()).ok_or_else(invalid)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::from_rgb8(0x00, 0x00, 0x00),
        "darkgray" | "darkgrey" => Color::from_rgb8(0x44, 0x44, 0x44),
        "gray" | "grey" => Color::from_rgb8(0x88, 0x88, 0x88),
        "lightgray" | "lightgrey" => Color::from_rgb8(0xCC, 0xCC, 0xCC),
        "white" => Color::from_rgb8(0xFF, 0xFF, 0xFF),
        "red" => Color::from_rgb8(0xFF, 0x00, 0x00),
        "green" => Color::from_rgb8(0x00, 0xFF, 0x00),
        "blue" => Color::from_rgb8(0x00, 0x00, 0xFF),
        "yellow" => Color::from_rgb8(0xFF, 0xFF, 0x00),
        "cyan" | "aqua" => Color::from_rgb8(0x00, 0xFF, 0xFF),
        "magenta" | "fuchsia" => Color::from_rgb8(0xFF, 0x00, 0xFF),
        "lime" => Color::from_rgb8(0x00, 0xFF, 0x00),
        "maroon" => Color::from_rgb8(0x80, 0x00, 0x00),
        "navy" => Color::from_rgb8(0x00, 0x00, 0x80),
        "olive" => Color::from_rgb8(0x80, 0x80, 0x00),
        "purple" => Color::from_rgb8(0x80, 0x00, 0x80),
        "silver" => Color::from_rgb8(0xC0, 0xC0, 0xC0),
        "teal" => Color::from_rgb8(0x00, 0x80, 0x80),
        _ => return None,
    };
    Some(color)
}

/// Stroke shared by every segment of one batched line call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStroke {
    pub width: f64,
    pub color: Color,
}

impl LineStroke {
    #[must_use]
    pub const fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
///
/// `(x, y)` is the baseline anchor. A non-zero `rotation_deg` rotates the
/// label around that anchor; negative angles tilt it counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Axis-aligned pixel rectangle; used for the plot area the surface is
/// blitted into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::Color;
    use crate::error::ChartError;

    #[test]
    fn parses_rgb_and_argb_hex() {
        assert_eq!(
            Color::parse("#FF0000").expect("rgb hex"),
            Color::rgb(1.0, 0.0, 0.0)
        );
        let translucent = Color::parse("#800000ff").expect("argb hex");
        assert_eq!(translucent.blue, 1.0);
        assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Color::parse("Teal").expect("named"), Color::from_rgb8(0, 0x80, 0x80));
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["", "#12345", "#GG0000", "rebeccapurple", "#+12345"] {
            assert!(matches!(
                Color::parse(input),
                Err(ChartError::InvalidColor { .. })
            ));
        }
    }
}
