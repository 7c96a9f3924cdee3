use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::{Axis, Coordinate, PaneId, PaneOptions, PaneOptionsUpdate};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{Crosshair, PointerEvent, PointerEventKind};
use crate::pane::{Cursor, Pane};
use crate::render::figure::FigureRegistry;
use crate::render::{
    DrawingSurface, EstimatedTextMeasurer, Picture, RecordingSurface, RectShape, TextMeasurer,
};
use crate::telemetry::{DRAW_TARGET, EVENTS_TARGET, LAYOUT_TARGET};

use super::engine_config::ChartEngineConfig;
use super::store::ChartStore;
use super::update::UpdateLevel;

/// Layout manager and drawing orchestrator of a multi-pane chart.
///
/// The engine owns the panes and the store. It assigns every bounding from
/// the top down, fits axes to the visible data, records widget layers and
/// routes pointer events. It does not decide when to redraw; callers signal
/// that through [`ChartEngine::update`].
pub struct ChartEngine<S: ChartStore> {
    pub(super) store: S,
    pub(super) figures: FigureRegistry,
    pub(super) measurer: Rc<dyn TextMeasurer>,
    /// Drawing panes in display order; the candle pane is always first.
    pub(super) panes: Vec<Pane>,
    pub(super) x_axis_pane: Pane,
    pub(super) config: ChartEngineConfig,
    /// Top edges of the separators between drawing panes.
    pub(super) separators: Vec<f64>,
    next_indicator_pane: u32,
}

impl<S: ChartStore> std::fmt::Debug for ChartEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartEngine")
            .field("config", &self.config)
            .field("panes", &self.panes)
            .field("x_axis_pane", &self.x_axis_pane)
            .field("figures", &self.figures)
            .finish_non_exhaustive()
    }
}

impl<S: ChartStore> ChartEngine<S> {
    pub fn new(store: S, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        let mut engine = Self {
            store,
            figures: FigureRegistry::default(),
            measurer: Rc::new(EstimatedTextMeasurer::default()),
            panes: vec![Pane::new(PaneId::Candle, PaneOptions::default())],
            x_axis_pane: Pane::new(PaneId::XAxis, PaneOptions::x_axis()),
            config,
            separators: Vec::new(),
            next_indicator_pane: 1,
        };
        engine.update(UpdateLevel::All);
        debug!(width = config.width, height = config.height, "chart engine created");
        Ok(engine)
    }

    /// Replaces the text measurer used for layout and hit-testing.
    #[must_use]
    pub fn with_measurer(mut self, measurer: Rc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self.update(UpdateLevel::All);
        self
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store access; call [`ChartEngine::update`] afterwards.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn figures(&self) -> &FigureRegistry {
        &self.figures
    }

    /// Registry for custom figure templates.
    pub fn figures_mut(&mut self) -> &mut FigureRegistry {
        &mut self.figures
    }

    pub fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let config = ChartEngineConfig {
            width,
            height,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        self.update(UpdateLevel::All);
        Ok(())
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> ChartResult<()> {
        let config = self.config.with_pixel_ratio(pixel_ratio);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Drawing panes in display order.
    #[must_use]
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    #[must_use]
    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        if id == PaneId::XAxis {
            return Some(&self.x_axis_pane);
        }
        self.panes.iter().find(|pane| pane.id() == id)
    }

    fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        if id == PaneId::XAxis {
            return Some(&mut self.x_axis_pane);
        }
        self.panes.iter_mut().find(|pane| pane.id() == id)
    }

    #[must_use]
    pub fn x_axis(&self) -> &Axis {
        self.x_axis_pane.axis()
    }

    /// Adds an indicator pane below the existing ones of lower or equal order.
    pub fn add_indicator_pane(&mut self, options: PaneOptions) -> PaneId {
        let id = PaneId::Indicator(self.next_indicator_pane);
        self.next_indicator_pane += 1;
        self.panes.push(Pane::new(id, options));
        self.sort_panes();
        debug!(target: LAYOUT_TARGET, pane = %id, order = options.order, "indicator pane added");
        self.update(UpdateLevel::All);
        id
    }

    /// Removes an indicator pane. Indicators the store keeps for it are left
    /// untouched.
    pub fn remove_pane(&mut self, id: PaneId) -> ChartResult<()> {
        if !matches!(id, PaneId::Indicator(_)) {
            return Err(ChartError::InvalidData(format!("{id} cannot be removed")));
        }
        let index = self
            .panes
            .iter()
            .position(|pane| pane.id() == id)
            .ok_or(ChartError::UnknownPane(id))?;
        self.panes.remove(index);
        debug!(target: LAYOUT_TARGET, pane = %id, "pane removed");
        self.update(UpdateLevel::All);
        Ok(())
    }

    pub fn set_pane_options(&mut self, id: PaneId, update: &PaneOptionsUpdate) -> ChartResult<()> {
        let pane = self.pane_mut(id).ok_or(ChartError::UnknownPane(id))?;
        pane.set_options(update);
        if update.order.is_some() {
            self.sort_panes();
        }
        self.update(UpdateLevel::All);
        Ok(())
    }

    fn sort_panes(&mut self) {
        self.panes.sort_by_key(|pane| match pane.id() {
            PaneId::Candle => (0, 0),
            _ => (1, pane.options().order),
        });
    }

    /// Re-records the layers selected by `level`, relayouting first for
    /// [`UpdateLevel::All`].
    pub fn update(&mut self, level: UpdateLevel) {
        if level.requires_layout() {
            self.layout();
        }
        let Self {
            store,
            figures,
            measurer,
            panes,
            x_axis_pane,
            ..
        } = self;
        let store: &S = store;
        for pane in panes.iter_mut() {
            pane.update(level, Some(x_axis_pane.axis()), store, figures, measurer);
        }
        x_axis_pane.update(level, None, store, figures, measurer);
        trace!(target: DRAW_TARGET, level = ?level, "chart updated");
    }

    /// Drawing pane whose main widget contains `coordinate`.
    fn main_pane_at(&self, coordinate: Coordinate) -> Option<&Pane> {
        self.panes.iter().find(|pane| {
            let pane_bounding = pane.bounding();
            let main = pane.main_widget().bounding();
            coordinate.y >= pane_bounding.top
                && coordinate.y <= pane_bounding.top + pane_bounding.height
                && coordinate.x >= main.left
                && coordinate.x <= main.left + main.width
                && main.width > 0.0
                && pane_bounding.height > 0.0
        })
    }

    /// Pane (drawing or x-axis) containing `coordinate`.
    #[must_use]
    pub fn pane_at(&self, coordinate: Coordinate) -> Option<&Pane> {
        self.panes
            .iter()
            .chain(std::iter::once(&self.x_axis_pane))
            .find(|pane| pane.bounding().height > 0.0 && pane.bounding().contains(coordinate))
    }

    /// Cursor of the widget under `coordinate`.
    #[must_use]
    pub fn cursor_at(&self, coordinate: Coordinate) -> Cursor {
        let Some(pane) = self.pane_at(coordinate) else {
            return Cursor::Default;
        };
        let top = pane.bounding().top;
        pane.widgets()
            .find(|widget| {
                let bounding = widget.bounding();
                bounding.width > 0.0
                    && coordinate.x >= bounding.left
                    && coordinate.x <= bounding.left + bounding.width
                    && coordinate.y >= top + bounding.top
                    && coordinate.y <= top + bounding.top + bounding.height
            })
            .map_or(Cursor::Default, |widget| widget.cursor())
    }

    /// Crosshair for a pointer at `coordinate`: anchored to the drawing pane
    /// under it and snapped to the nearest visible bar, or the idle crosshair
    /// on the last visible bar.
    fn crosshair_at(&self, coordinate: Coordinate) -> Crosshair {
        let Some(pane) = self.main_pane_at(coordinate) else {
            return self.idle_crosshair();
        };
        let range = self.store.visible_range();
        let data = self.store.data_list();
        if range.is_empty() {
            return Crosshair {
                x: None,
                y: Some(coordinate.y - pane.bounding().top),
                pane_id: Some(pane.id()),
                data_index: None,
                kline_data: None,
            };
        }
        let x = coordinate.x - pane.main_widget().bounding().left;
        let last = range.to.min(data.len()).saturating_sub(1);
        let index = self.x_axis().pixel_to_value(x).round();
        let index = if index.is_finite() {
            (index.max(range.from as f64) as usize).min(last)
        } else {
            last
        };
        Crosshair {
            x: Some(x),
            y: Some(coordinate.y - pane.bounding().top),
            pane_id: Some(pane.id()),
            data_index: Some(index),
            kline_data: data.get(index).copied(),
        }
    }

    pub(super) fn idle_crosshair(&self) -> Crosshair {
        let range = self.store.visible_range();
        let data = self.store.data_list();
        let index = range.to.min(data.len()).checked_sub(1).filter(|_| !range.is_empty());
        Crosshair {
            x: None,
            y: None,
            pane_id: None,
            data_index: index,
            kline_data: index.and_then(|index| data.get(index).copied()),
        }
    }

    /// Routes a pointer event in chart coordinates.
    ///
    /// A move re-anchors the crosshair and clears the active tooltip keys
    /// unless a figure under the pointer re-activates one. Moves and active
    /// key changes re-record the overlay layers. Returns whether a figure
    /// consumed the event.
    pub fn dispatch_pointer_event(&mut self, event: PointerEvent) -> bool {
        let coordinate = event.coordinate();
        let before = (
            self.store.active_tooltip_icon().cloned(),
            self.store.active_tooltip_title().cloned(),
        );
        if event.kind == PointerEventKind::Move {
            let crosshair = self.crosshair_at(coordinate);
            self.store.set_crosshair(crosshair);
            self.store.set_active_tooltip_icon(None);
            self.store.set_active_tooltip_title(None);
        }

        let target = self
            .panes
            .iter()
            .chain(std::iter::once(&self.x_axis_pane))
            .find(|pane| pane.bounding().height > 0.0 && pane.bounding().contains(coordinate));
        let consumed = target.is_some_and(|pane| {
            pane.dispatch_event(
                event.kind,
                coordinate,
                &mut self.store,
                &self.figures,
                &*self.measurer,
            )
        });

        let after = (
            self.store.active_tooltip_icon().cloned(),
            self.store.active_tooltip_title().cloned(),
        );
        let keys_changed = before != after;
        trace!(target: EVENTS_TARGET, event = ?event.kind, x = event.x, y = event.y, consumed, keys_changed, "pointer event");
        if event.kind == PointerEventKind::Move || keys_changed {
            self.update(UpdateLevel::Overlay);
        }
        consumed
    }

    fn compose(&self, surface: &mut dyn DrawingSurface, include_overlay: bool) {
        for pane in self.panes.iter().chain(std::iter::once(&self.x_axis_pane)) {
            pane.compose_widgets(surface, include_overlay, 0.0, pane.bounding().top);
        }
        let separator = &self.store.styles().separator;
        if separator.fill && separator.size > 0.0 && !separator.color.is_transparent() {
            for top in &self.separators {
                surface.fill_rect(
                    RectShape::new(0.0, *top, self.config.width, separator.size),
                    0.0,
                    separator.color,
                );
            }
        }
    }

    /// Whole-chart image at the configured pixel ratio.
    ///
    /// The ratio is applied once, as a surface scale; every widget is placed
    /// in logical pixels.
    #[must_use]
    pub fn image(&self, include_overlay: bool) -> Picture {
        let ratio = self.config.pixel_ratio;
        let mut surface = RecordingSurface::with_measurer(
            self.config.width,
            self.config.height,
            ratio,
            Rc::clone(&self.measurer),
        );
        surface.save();
        surface.scale(ratio, ratio);
        self.compose(&mut surface, include_overlay);
        surface.restore();
        surface.finish()
    }

    /// Replays the recorded layers onto a host surface, scaled by the
    /// surface's own pixel ratio.
    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        let ratio = surface.pixel_ratio();
        surface.save();
        surface.scale(ratio, ratio);
        self.compose(surface, true);
        surface.restore();
    }
}
