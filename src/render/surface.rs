use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Coordinate;

use super::primitives::{Color, Font, LineType};

/// Dash pattern, usually two entries.
pub type DashPattern = SmallVec<[f64; 4]>;

/// Axis-aligned rectangle in the surface's current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectShape {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive hit-test.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Stroke parameters for lines, rect borders and polygon outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: DashPattern,
}

impl Stroke {
    #[must_use]
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: DashPattern::new(),
        }
    }

    #[must_use]
    pub fn with_line_type(color: Color, width: f64, line_type: LineType, dashed_value: &[f64]) -> Self {
        let dash = match line_type {
            LineType::Solid => DashPattern::new(),
            LineType::Dashed => dashed_value.iter().copied().collect(),
        };
        Self { color, width, dash }
    }

    #[must_use]
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// Text metrics used by layout code.
pub trait TextMeasurer {
    /// Advance width of `text` in logical pixels.
    fn measure_text(&self, text: &str, font: &Font) -> f64;
}

/// Immediate-mode 2D painting interface the drawing pipeline targets.
///
/// Text is always painted with its top-left corner at `(x, y)`; anchor
/// resolution happens in the text figure.
pub trait DrawingSurface: TextMeasurer {
    fn pixel_ratio(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn clip_rect(&mut self, rect: RectShape);

    fn fill_rect(&mut self, rect: RectShape, radius: f64, color: Color);
    fn stroke_rect(&mut self, rect: RectShape, radius: f64, stroke: &Stroke);
    fn fill_polygon(&mut self, points: &[Coordinate], color: Color);
    fn stroke_polygon(&mut self, points: &[Coordinate], stroke: &Stroke);
    fn stroke_line(&mut self, points: &[Coordinate], stroke: &Stroke);
    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &Font,
        color: Color,
        max_width: Option<f64>,
    );
}

/// Width estimate from character count; stable across platforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasurer {
    pub char_width_ratio: f64,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
        }
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size * self.char_width_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::{EstimatedTextMeasurer, RectShape, Stroke, TextMeasurer};
    use crate::core::Coordinate;
    use crate::render::{Color, Font, LineType};

    #[test]
    fn estimated_width_scales_with_font_size() {
        let measurer = EstimatedTextMeasurer::default();
        let font = Font {
            size: 10.0,
            ..Font::default()
        };
        assert!((measurer.measure_text("ABC", &font) - 18.0).abs() < 1e-12);
    }

    #[test]
    fn solid_line_type_drops_dash_pattern() {
        let stroke = Stroke::with_line_type(Color::BLACK, 1.0, LineType::Solid, &[4.0, 4.0]);
        assert!(!stroke.is_dashed());
        let stroke = Stroke::with_line_type(Color::BLACK, 1.0, LineType::Dashed, &[4.0, 4.0]);
        assert_eq!(stroke.dash.as_slice(), &[4.0, 4.0]);
    }

    #[test]
    fn rect_contains_edges() {
        let rect = RectShape::new(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(Coordinate::new(15.0, 15.0)));
        assert!(!rect.contains(Coordinate::new(9.9, 12.0)));
    }
}
