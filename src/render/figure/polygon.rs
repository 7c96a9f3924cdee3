use smallvec::SmallVec;

use crate::api::store::ChartStore;
use crate::api::styles::StyleValue;
use crate::core::Coordinate;
use crate::render::primitives::{Color, LineType, PolygonType};
use crate::render::surface::{DrawingSurface, Stroke, TextMeasurer};

use super::{FIGURE_POLYGON, FigureAttrs, FigureStyles, FigureTemplate};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonAttrs {
    pub coordinates: Vec<Coordinate>,
}

impl PolygonAttrs {
    #[must_use]
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub style: PolygonType,
    pub color: StyleValue<Color>,
    pub border_style: LineType,
    pub border_color: StyleValue<Color>,
    pub border_size: f64,
    pub border_dashed_value: SmallVec<[f64; 4]>,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            style: PolygonType::Fill,
            color: StyleValue::Static(Color::BLACK),
            border_style: LineType::Solid,
            border_color: StyleValue::Static(Color::BLACK),
            border_size: 1.0,
            border_dashed_value: SmallVec::from_slice(&[2.0, 2.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonFigure;

impl FigureTemplate for PolygonFigure {
    fn name(&self) -> &str {
        FIGURE_POLYGON
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
        _measurer: &dyn TextMeasurer,
    ) -> bool {
        let (FigureAttrs::Polygon(items), FigureStyles::Polygon(_)) = (attrs, styles) else {
            return false;
        };
        items
            .iter()
            .any(|item| contains_point(&item.coordinates, coordinate))
    }

    fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        store: &dyn ChartStore,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) {
        let (FigureAttrs::Polygon(items), FigureStyles::Polygon(style)) = (attrs, styles) else {
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
            if item.coordinates.len() < 3 {
                continue;
            }
            if style.style != PolygonType::Stroke {
                surface.fill_polygon(&item.coordinates, fill);
            }
            if style.style != PolygonType::Fill && style.border_size > 0.0 {
                surface.stroke_polygon(&item.coordinates, &stroke);
            }
        }
    }
}

/// Even-odd ray casting.
fn contains_point(vertices: &[Coordinate], point: Coordinate) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut previous = vertices[vertices.len() - 1];
    for &current in vertices {
        let crosses = (current.y > point.y) != (previous.y > point.y);
        if crosses {
            let x_at_y =
                (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y) + current.x;
            if point.x < x_at_y {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}
