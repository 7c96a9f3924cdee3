use smallvec::SmallVec;

use crate::api::store::ChartStore;
use crate::api::styles::StyleValue;
use crate::core::Coordinate;
use crate::render::primitives::{Color, LineType, PolygonType};
use crate::render::surface::{DrawingSurface, RectShape, Stroke, TextMeasurer};

use super::{FIGURE_RECT, FigureAttrs, FigureStyles, FigureTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectAttrs {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalizes negative extents so the shape always grows right and down.
    #[must_use]
    pub fn shape(&self) -> RectShape {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        RectShape::new(x, y, width, height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectStyle {
    pub style: PolygonType,
    pub color: StyleValue<Color>,
    pub border_style: LineType,
    pub border_color: StyleValue<Color>,
    pub border_size: f64,
    pub border_dashed_value: SmallVec<[f64; 4]>,
    pub border_radius: f64,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            style: PolygonType::Fill,
            color: StyleValue::Static(Color::BLACK),
            border_style: LineType::Solid,
            border_color: StyleValue::Static(Color::BLACK),
            border_size: 1.0,
            border_dashed_value: SmallVec::from_slice(&[2.0, 2.0]),
            border_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectFigure;

impl FigureTemplate for RectFigure {
    fn name(&self) -> &str {
        FIGURE_RECT
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
        _measurer: &dyn TextMeasurer,
    ) -> bool {
        let (FigureAttrs::Rect(items), FigureStyles::Rect(_)) = (attrs, styles) else {
            return false;
        };
        items.iter().any(|item| item.shape().contains(coordinate))
    }

    fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        store: &dyn ChartStore,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) {
        let (FigureAttrs::Rect(items), FigureStyles::Rect(style)) = (attrs, styles) else {
            return;
        };
        let fill = style.color.resolve(&*surface, "", store);
        let border = style.border_color.resolve(&*surface, "", store);
        let stroke = Stroke::with_line_type(
            border,
            style.border_size,
            style.border_style,
            &style.border_dashed_value,
        );
        for item in items {
            let shape = item.shape();
            if style.style != PolygonType::Stroke {
                surface.fill_rect(shape, style.border_radius, fill);
            }
            if style.style != PolygonType::Fill && style.border_size > 0.0 {
                surface.stroke_rect(shape, style.border_radius, &stroke);
            }
        }
    }
}
