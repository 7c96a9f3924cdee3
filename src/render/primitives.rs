use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as a CSS-like string: `#rrggbb`, `#rrggbbaa`, `rgba(r,g,b,a)`
/// or `transparent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

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
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    pub fn parse(input: &str) -> ChartResult<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ChartError::InvalidColor(input.to_owned()));
        }
        if let Some(body) = input
            .strip_prefix("rgba(")
            .or_else(|| input.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgba(body).ok_or_else(|| ChartError::InvalidColor(input.to_owned()));
        }
        Err(ChartError::InvalidColor(input.to_owned()))
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

    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |index: usize| -> Option<f64> {
        u8::from_str_radix(hex.get(index..index + 2)?, 16)
            .ok()
            .map(|value| f64::from(value) / 255.0)
    };
    match hex.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

fn parse_rgba(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut channels = [0.0; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let value: f64 = part.parse().ok()?;
        if !(0.0..=255.0).contains(&value) {
            return None;
        }
        *slot = value / 255.0;
    }
    let alpha = match parts.get(3) {
        Some(part) => part.parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))?,
        None => 1.0,
    };
    Some(Color::rgba(channels[0], channels[1], channels[2], alpha))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to_byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            write!(
                f,
                "#{:02x}{:02x}{:02x}",
                to_byte(self.red),
                to_byte(self.green),
                to_byte(self.blue)
            )
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                to_byte(self.red),
                to_byte(self.green),
                to_byte(self.blue),
                to_byte(self.alpha)
            )
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
}

/// Paint mode shared by rects and polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolygonType {
    #[default]
    Fill,
    Stroke,
    StrokeFill,
}

/// Horizontal text alignment relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Start,
    Center,
    Right,
    End,
}

impl TextAlign {
    /// Offset applied to the anchor x for a box of `width`.
    #[must_use]
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Self::Left | Self::Start => 0.0,
            Self::Right | Self::End => -width,
            Self::Center => -width / 2.0,
        }
    }
}

/// Vertical text baseline relative to the anchor y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    #[default]
    Top,
    Hanging,
    Middle,
    Bottom,
    Ideographic,
    Alphabetic,
}

impl TextBaseline {
    /// Offset applied to the anchor y for a box of `height`.
    #[must_use]
    pub fn offset(self, height: f64) -> f64 {
        match self {
            Self::Top | Self::Hanging => 0.0,
            Self::Bottom | Self::Ideographic | Self::Alphabetic => -height,
            Self::Middle => -height / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub size: f64,
    pub family: String,
    pub weight: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            size: 12.0,
            family: "Helvetica Neue".to_owned(),
            weight: "normal".to_owned(),
        }
    }
}

impl Font {
    #[must_use]
    pub fn new(size: f64, family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
            weight: weight.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, TextAlign, TextBaseline};

    #[test]
    fn parses_css_like_colors() {
        assert_eq!(Color::parse("#ff0000").expect("hex"), Color::rgb(1.0, 0.0, 0.0));
        let translucent = Color::parse("#00ff0080").expect("hex alpha");
        assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(
            Color::parse("rgba(0, 0, 255, 0.5)").expect("rgba"),
            Color::rgba(0.0, 0.0, 1.0, 0.5)
        );
        assert!(Color::parse("transparent").expect("keyword").is_transparent());
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("rgba(300, 0, 0, 1)").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = Color::parse("#2dc08e").expect("hex");
        assert_eq!(color.to_string(), "#2dc08e");
    }

    #[test]
    fn anchor_offsets() {
        assert_eq!(TextAlign::Right.offset(30.0), -30.0);
        assert_eq!(TextAlign::Center.offset(30.0), -15.0);
        assert_eq!(TextAlign::Start.offset(30.0), 0.0);
        assert_eq!(TextBaseline::Alphabetic.offset(12.0), -12.0);
        assert_eq!(TextBaseline::Middle.offset(12.0), -6.0);
        assert_eq!(TextBaseline::Hanging.offset(12.0), 0.0);
    }
}
