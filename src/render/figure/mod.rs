//! Named, stateless drawing primitives.
//!
//! Views describe what to draw as a `Figure` payload and hand it to the
//! `FigureRegistry`, which dispatches to the template registered under the
//! figure's name. Templates own both painting and hit-testing so the two
//! always agree on geometry.

mod line;
mod polygon;
mod rect;
mod text;

use indexmap::IndexMap;
use tracing::warn;

use crate::api::store::ChartStore;
use crate::core::Coordinate;
use crate::interaction::FigureEventAction;

use super::surface::{DrawingSurface, TextMeasurer};

pub use line::{LineAttrs, LineFigure, LineStyle};
pub use polygon::{PolygonAttrs, PolygonFigure, PolygonStyle};
pub use rect::{RectAttrs, RectFigure, RectStyle};
pub use text::{TextAttrs, TextFigure, TextStyle, get_text_rect};

pub const FIGURE_TEXT: &str = "text";
pub const FIGURE_LINE: &str = "line";
pub const FIGURE_RECT: &str = "rect";
pub const FIGURE_POLYGON: &str = "polygon";

/// Geometry payload; every variant is a batch sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureAttrs {
    Text(Vec<TextAttrs>),
    Line(Vec<LineAttrs>),
    Rect(Vec<RectAttrs>),
    Polygon(Vec<PolygonAttrs>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureStyles {
    Text(TextStyle),
    Line(LineStyle),
    Rect(RectStyle),
    Polygon(PolygonStyle),
}

/// Store mutations bound to a figure's pointer events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FigureEventHandlers {
    pub on_click: Option<FigureEventAction>,
    pub on_move: Option<FigureEventAction>,
}

impl FigureEventHandlers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none() && self.on_move.is_none()
    }
}

/// Per-draw figure payload; built by a view and dropped after the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub name: String,
    pub attrs: FigureAttrs,
    pub styles: FigureStyles,
    pub handlers: FigureEventHandlers,
}

impl Figure {
    #[must_use]
    pub fn new(name: impl Into<String>, attrs: FigureAttrs, styles: FigureStyles) -> Self {
        Self {
            name: name.into(),
            attrs,
            styles,
            handlers: FigureEventHandlers::default(),
        }
    }

    #[must_use]
    pub fn text(items: Vec<TextAttrs>, style: TextStyle) -> Self {
        Self::new(FIGURE_TEXT, FigureAttrs::Text(items), FigureStyles::Text(style))
    }

    #[must_use]
    pub fn line(items: Vec<LineAttrs>, style: LineStyle) -> Self {
        Self::new(FIGURE_LINE, FigureAttrs::Line(items), FigureStyles::Line(style))
    }

    #[must_use]
    pub fn rect(items: Vec<RectAttrs>, style: RectStyle) -> Self {
        Self::new(FIGURE_RECT, FigureAttrs::Rect(items), FigureStyles::Rect(style))
    }

    #[must_use]
    pub fn polygon(items: Vec<PolygonAttrs>, style: PolygonStyle) -> Self {
        Self::new(
            FIGURE_POLYGON,
            FigureAttrs::Polygon(items),
            FigureStyles::Polygon(style),
        )
    }

    #[must_use]
    pub fn on_click(mut self, action: FigureEventAction) -> Self {
        self.handlers.on_click = Some(action);
        self
    }

    #[must_use]
    pub fn on_move(mut self, action: FigureEventAction) -> Self {
        self.handlers.on_move = Some(action);
        self
    }
}

/// Contract implemented by every drawable primitive.
///
/// A template receives the attrs/styles variant matching its own kind; a
/// mismatched payload is neither drawn nor hit.
pub trait FigureTemplate {
    fn name(&self) -> &str;

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
        measurer: &dyn TextMeasurer,
    ) -> bool;

    fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        store: &dyn ChartStore,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    );
}

/// Name-keyed figure templates, pre-populated with the built-ins.
pub struct FigureRegistry {
    templates: IndexMap<String, Box<dyn FigureTemplate>>,
}

impl Default for FigureRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextFigure));
        registry.register(Box::new(LineFigure));
        registry.register(Box::new(RectFigure));
        registry.register(Box::new(PolygonFigure));
        registry
    }
}

impl std::fmt::Debug for FigureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigureRegistry")
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FigureRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            templates: IndexMap::new(),
        }
    }

    /// Registers `template`, replacing any template with the same name.
    pub fn register(&mut self, template: Box<dyn FigureTemplate>) {
        self.templates.insert(template.name().to_owned(), template);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Paints `figure`; unknown names are skipped.
    pub fn draw(&self, figure: &Figure, surface: &mut dyn DrawingSurface, store: &dyn ChartStore) {
        match self.templates.get(&figure.name) {
            Some(template) => template.draw(surface, store, &figure.attrs, &figure.styles),
            None => warn!(figure = %figure.name, "draw skipped for unregistered figure"),
        }
    }

    /// Hit-tests `figure`; unknown names never hit.
    #[must_use]
    pub fn check_event_on(
        &self,
        figure: &Figure,
        coordinate: Coordinate,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        match self.templates.get(&figure.name) {
            Some(template) => {
                template.check_event_on(coordinate, &figure.attrs, &figure.styles, measurer)
            }
            None => {
                warn!(figure = %figure.name, "hit-test skipped for unregistered figure");
                false
            }
        }
    }
}
