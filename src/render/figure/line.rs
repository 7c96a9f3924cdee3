use smallvec::SmallVec;

use crate::api::store::ChartStore;
use crate::api::styles::StyleValue;
use crate::core::Coordinate;
use crate::render::primitives::{Color, LineType};
use crate::render::surface::{DrawingSurface, Stroke, TextMeasurer};

use super::{FIGURE_LINE, FigureAttrs, FigureStyles, FigureTemplate};

const HIT_TOLERANCE_PX: f64 = 2.0;

/// Polyline through `coordinates`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineAttrs {
    pub coordinates: Vec<Coordinate>,
}

impl LineAttrs {
    #[must_use]
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }

    #[must_use]
    pub fn segment(from: Coordinate, to: Coordinate) -> Self {
        Self {
            coordinates: vec![from, to],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub style: LineType,
    pub color: StyleValue<Color>,
    pub size: f64,
    pub dashed_value: SmallVec<[f64; 4]>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            style: LineType::Solid,
            color: StyleValue::Static(Color::BLACK),
            size: 1.0,
            dashed_value: SmallVec::from_slice(&[2.0, 2.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineFigure;

impl FigureTemplate for LineFigure {
    fn name(&self) -> &str {
        FIGURE_LINE
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
        _measurer: &dyn TextMeasurer,
    ) -> bool {
        let (FigureAttrs::Line(items), FigureStyles::Line(style)) = (attrs, styles) else {
            return false;
        };
        let tolerance = HIT_TOLERANCE_PX.max(style.size / 2.0);
        items.iter().any(|item| {
            item.coordinates
                .windows(2)
                .any(|pair| distance_to_segment(coordinate, pair[0], pair[1]) <= tolerance)
        })
    }

    fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        store: &dyn ChartStore,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) {
        let (FigureAttrs::Line(items), FigureStyles::Line(style)) = (attrs, styles) else {
            return;
        };
        let color = style.color.resolve(&*surface, "", store);
        let stroke = Stroke::with_line_type(color, style.size, style.style, &style.dashed_value);
        for item in items {
            if item.coordinates.len() < 2 {
                continue;
            }
            surface.stroke_line(&item.coordinates, &stroke);
        }
    }
}

fn distance_to_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq <= f64::EPSILON {
        return (point.x - start.x).hypot(point.y - start.y);
    }
    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    let closest_x = start.x + t * dx;
    let closest_y = start.y + t * dy;
    (point.x - closest_x).hypot(point.y - closest_y)
}
