use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::store::ChartStore;
use crate::api::update::UpdateLevel;
use crate::core::{Bounding, Coordinate};
use crate::interaction::PointerEventKind;
use crate::render::figure::{Figure, FigureRegistry};
use crate::render::{DrawingSurface, Picture, RecordingSurface, RectShape, TextMeasurer};
use crate::telemetry::{DRAW_TARGET, EVENTS_TARGET};
use crate::view::{DrawEnv, Layer, View, ViewContext};

/// Role of a widget inside its pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Main,
    YAxis,
    LeftYAxis,
}

/// Pointer cursor a host should show over the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Horizontal resize, over a zoomable x axis.
    EwResize,
    /// Vertical resize, over a zoomable y axis.
    NsResize,
}

/// Rectangular drawing region of a pane with two recorded layers.
///
/// Each layer keeps the figures that carry pointer handlers from its last
/// recording; hit-testing runs against those, topmost first.
pub struct Widget {
    kind: WidgetKind,
    bounding: Bounding,
    views: Vec<Box<dyn View>>,
    main: Picture,
    overlay: Picture,
    main_hits: Vec<Figure>,
    overlay_hits: Vec<Figure>,
    cursor: Cursor,
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("kind", &self.kind)
            .field("bounding", &self.bounding)
            .field("views", &self.views.len())
            .field("main_commands", &self.main.commands().len())
            .field("overlay_commands", &self.overlay.commands().len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Widget {
    #[must_use]
    pub fn new(kind: WidgetKind, views: Vec<Box<dyn View>>) -> Self {
        Self {
            kind,
            bounding: Bounding::default(),
            views,
            main: Picture::default(),
            overlay: Picture::default(),
            main_hits: Vec::new(),
            overlay_hits: Vec::new(),
            cursor: Cursor::Default,
        }
    }

    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    #[must_use]
    pub fn bounding(&self) -> Bounding {
        self.bounding
    }

    /// Replaces the bounding; recorded layers stay stale until the next update.
    pub fn set_bounding(&mut self, bounding: Bounding) {
        self.bounding = bounding;
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    #[must_use]
    pub fn main_picture(&self) -> &Picture {
        &self.main
    }

    #[must_use]
    pub fn overlay_picture(&self) -> &Picture {
        &self.overlay
    }

    /// Figures of both layers that currently accept pointer events.
    pub fn interactive_figures(&self) -> impl Iterator<Item = &Figure> {
        self.main_hits.iter().chain(&self.overlay_hits)
    }

    /// Re-records the layers selected by `level`.
    pub(crate) fn update(&mut self, level: UpdateLevel, env: DrawEnv<'_>, measurer: &Rc<dyn TextMeasurer>) {
        if level.includes_main() {
            let (picture, hits) = self.record(Layer::Main, env, measurer);
            self.main = picture;
            self.main_hits = hits;
        }
        if level.includes_overlay() {
            let (picture, hits) = self.record(Layer::Overlay, env, measurer);
            self.overlay = picture;
            self.overlay_hits = hits;
        }
    }

    fn record(&self, layer: Layer, env: DrawEnv<'_>, measurer: &Rc<dyn TextMeasurer>) -> (Picture, Vec<Figure>) {
        let Bounding { width, height, .. } = self.bounding;
        let mut surface = RecordingSurface::with_measurer(width, height, 1.0, Rc::clone(measurer));
        let mut hits = Vec::new();
        if width > 0.0 && height > 0.0 {
            surface.save();
            surface.clip_rect(RectShape::new(0.0, 0.0, width, height));
            {
                let mut ctx = ViewContext::new(&mut surface, env, self.bounding, &mut hits);
                for view in self.views.iter().filter(|view| view.layer() == layer) {
                    view.draw_imp(&mut ctx);
                }
            }
            surface.restore();
        }
        let picture = surface.finish();
        trace!(
            target: DRAW_TARGET,
            pane = %env.pane_id,
            widget = ?self.kind,
            layer = ?layer,
            commands = picture.commands().len(),
            interactive = hits.len(),
            "widget layer recorded"
        );
        (picture, hits)
    }

    /// Routes a pointer event in widget-local coordinates to the topmost
    /// figure under it that handles `kind`. Returns whether it was consumed.
    pub(crate) fn dispatch_event(
        &self,
        kind: PointerEventKind,
        coordinate: Coordinate,
        store: &mut dyn ChartStore,
        figures: &FigureRegistry,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        let candidates = self.overlay_hits.iter().rev().chain(self.main_hits.iter().rev());
        for figure in candidates {
            let action = match kind {
                PointerEventKind::Move => figure.handlers.on_move.as_ref(),
                PointerEventKind::Click => figure.handlers.on_click.as_ref(),
            };
            let Some(action) = action else {
                continue;
            };
            if figures.check_event_on(figure, coordinate, measurer) {
                trace!(target: EVENTS_TARGET, widget = ?self.kind, event = ?kind, "figure event handled");
                return action.apply(store);
            }
        }
        false
    }

    /// Paints the recorded layers with the widget origin at `(x, y)`.
    pub fn draw_onto(&self, surface: &mut dyn DrawingSurface, x: f64, y: f64, include_overlay: bool) {
        self.main.draw_at(surface, x, y);
        if include_overlay {
            self.overlay.draw_at(surface, x, y);
        }
    }

    /// Off-screen image of the widget at its logical size.
    #[must_use]
    pub fn image(&self, include_overlay: bool) -> Picture {
        let mut surface = RecordingSurface::new(self.bounding.width, self.bounding.height, 1.0);
        self.main.replay(&mut surface);
        if include_overlay {
            self.overlay.replay(&mut surface);
        }
        surface.finish()
    }
}
