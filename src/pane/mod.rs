//! Panes: horizontal chart regions owning a value axis and up to three widgets.
//!
//! A pane never measures its children. The layout manager computes every
//! bounding and hands it down through [`Pane::set_bounding`].

mod widget;

use std::rc::Rc;

use tracing::debug;

use crate::api::store::ChartStore;
use crate::api::update::UpdateLevel;
use crate::core::{
    Axis, AxisDescriptor, AxisOptions, AxisPosition, Bounding, BoundingPatch, Coordinate, PaneId,
    PaneOptions, PaneOptionsUpdate,
};
use crate::interaction::PointerEventKind;
use crate::render::figure::FigureRegistry;
use crate::render::{DrawingSurface, Picture, RecordingSurface, TextMeasurer};
use crate::telemetry::LAYOUT_TARGET;
use crate::view::{
    AxisSide, AxisView, CandleBarView, CrosshairLabelView, CrosshairLineView, DrawEnv,
    IndicatorTooltipView, IndicatorView, LastPriceLabelView, LastPriceLineView, View,
};

pub use widget::{Cursor, Widget, WidgetKind};

/// Pane variant; decides which widgets, views and axis a pane gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Candle,
    Indicator,
    XAxis,
}

impl PaneKind {
    #[must_use]
    pub const fn of(id: PaneId) -> Self {
        match id {
            PaneId::Candle => Self::Candle,
            PaneId::Indicator(_) => Self::Indicator,
            PaneId::XAxis => Self::XAxis,
        }
    }

    #[must_use]
    pub fn create_main_widget(self) -> Widget {
        let views: Vec<Box<dyn View>> = match self {
            Self::Candle => vec![
                Box::new(CandleBarView),
                Box::new(IndicatorView),
                Box::new(LastPriceLineView),
                Box::new(CrosshairLineView),
                Box::new(IndicatorTooltipView),
            ],
            Self::Indicator => vec![
                Box::new(IndicatorView),
                Box::new(CrosshairLineView),
                Box::new(IndicatorTooltipView),
            ],
            Self::XAxis => vec![
                Box::new(AxisView::new(AxisSide::Bottom)),
                Box::new(CrosshairLabelView::new(AxisSide::Bottom)),
            ],
        };
        Widget::new(WidgetKind::Main, views)
    }

    /// Axis of the pane; only value axes calculate their own ticks.
    #[must_use]
    pub fn create_axis_component(self, options: AxisOptions) -> Axis {
        let descriptor = match self {
            Self::Candle | Self::Indicator => AxisDescriptor::value(options.name),
            Self::XAxis => AxisDescriptor::index(),
        };
        let mut axis = Axis::new(descriptor, options);
        axis.set_auto_calc_ticks(descriptor.supports_auto_ticks);
        axis
    }

    #[must_use]
    pub fn create_y_axis_widget(self) -> Option<Widget> {
        self.axis_widget(WidgetKind::YAxis, AxisSide::Right)
    }

    #[must_use]
    pub fn create_left_y_axis_widget(self) -> Option<Widget> {
        self.axis_widget(WidgetKind::LeftYAxis, AxisSide::Left)
    }

    fn axis_widget(self, kind: WidgetKind, side: AxisSide) -> Option<Widget> {
        let mut views: Vec<Box<dyn View>> = vec![Box::new(AxisView::new(side))];
        match self {
            Self::Candle => views.push(Box::new(LastPriceLabelView::new(side))),
            Self::Indicator => {}
            Self::XAxis => return None,
        }
        views.push(Box::new(CrosshairLabelView::new(side)));
        Some(Widget::new(kind, views))
    }
}

#[derive(Debug)]
pub struct Pane {
    id: PaneId,
    kind: PaneKind,
    options: PaneOptions,
    axis: Axis,
    left_axis: Axis,
    bounding: Bounding,
    main_widget: Widget,
    y_axis_widget: Option<Widget>,
    left_y_axis_widget: Option<Widget>,
}

impl Pane {
    #[must_use]
    pub fn new(id: PaneId, options: PaneOptions) -> Self {
        let kind = PaneKind::of(id);
        let mut pane = Self {
            id,
            kind,
            options,
            axis: kind.create_axis_component(options.axis),
            left_axis: PaneKind::Indicator.create_axis_component(options.left_axis),
            bounding: Bounding::default(),
            main_widget: kind.create_main_widget(),
            y_axis_widget: kind.create_y_axis_widget(),
            left_y_axis_widget: kind.create_left_y_axis_widget(),
        };
        pane.update_cursors();
        pane
    }

    #[must_use]
    pub fn id(&self) -> PaneId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> PaneKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &PaneOptions {
        &self.options
    }

    #[must_use]
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }

    #[must_use]
    pub fn left_axis(&self) -> &Axis {
        &self.left_axis
    }

    pub fn left_axis_mut(&mut self) -> &mut Axis {
        &mut self.left_axis
    }

    #[must_use]
    pub fn bounding(&self) -> Bounding {
        self.bounding
    }

    #[must_use]
    pub fn main_widget(&self) -> &Widget {
        &self.main_widget
    }

    #[must_use]
    pub fn y_axis_widget(&self) -> Option<&Widget> {
        self.y_axis_widget.as_ref()
    }

    #[must_use]
    pub fn left_y_axis_widget(&self) -> Option<&Widget> {
        self.left_y_axis_widget.as_ref()
    }

    /// Widgets in draw order: main, right axis, left axis.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        std::iter::once(&self.main_widget)
            .chain(self.y_axis_widget.as_ref())
            .chain(self.left_y_axis_widget.as_ref())
    }

    /// Merges `update` into the pane options.
    ///
    /// The axis is rebuilt only for panes whose axis follows its name and only
    /// when the name actually changes; otherwise the live axis keeps its range
    /// and ticks.
    pub fn set_options(&mut self, update: &PaneOptionsUpdate) {
        self.options.apply(update);
        let axis_options = self.options.axis;
        if self.id.recreates_axis_on_name_change() && axis_options.name != self.axis.name() {
            debug!(
                target: LAYOUT_TARGET,
                pane = %self.id,
                from = self.axis.name().as_str(),
                to = axis_options.name.as_str(),
                "axis recreated"
            );
            self.axis = self.kind.create_axis_component(axis_options);
        } else {
            self.axis.apply_options(axis_options);
            self.axis
                .set_auto_calc_ticks(self.axis.descriptor().supports_auto_ticks);
        }
        self.left_axis.apply_options(self.options.left_axis);
        self.update_cursors();
    }

    fn update_cursors(&mut self) {
        let zoomable = self.axis.options().scroll_zoom_enabled;
        match self.kind {
            PaneKind::XAxis => self.main_widget.set_cursor(if zoomable {
                Cursor::EwResize
            } else {
                Cursor::Default
            }),
            PaneKind::Candle | PaneKind::Indicator => {
                if let Some(widget) = self.y_axis_widget.as_mut() {
                    widget.set_cursor(if zoomable {
                        Cursor::NsResize
                    } else {
                        Cursor::Default
                    });
                }
                let left_zoomable = self.left_axis.options().scroll_zoom_enabled;
                if let Some(widget) = self.left_y_axis_widget.as_mut() {
                    widget.set_cursor(if left_zoomable {
                        Cursor::NsResize
                    } else {
                        Cursor::Default
                    });
                }
            }
        }
    }

    /// Assigns the pane and widget boundings top-down.
    ///
    /// Every widget first takes the pane's height at pane-relative top 0;
    /// the optional patches then adjust it. The right axis widget is placed
    /// after the main widget's extent, or at the left edge when the pane's
    /// axis sits on the left; the left axis widget is always pinned to
    /// `left = 0`.
    pub fn set_bounding(
        &mut self,
        root: BoundingPatch,
        main: Option<BoundingPatch>,
        left: Option<BoundingPatch>,
        right: Option<BoundingPatch>,
    ) {
        self.bounding.merge(&root);
        let span = BoundingPatch::default()
            .with_top(0.0)
            .with_height(self.bounding.height);

        let mut main_bounding = self.main_widget.bounding();
        main_bounding.merge(&span);
        if let Some(main) = main {
            main_bounding.merge(&main);
        }
        self.main_widget.set_bounding(main_bounding);

        if let Some(widget) = self.y_axis_widget.as_mut() {
            let mut bounding = widget.bounding();
            bounding.merge(&span);
            if let Some(right) = right {
                bounding.merge(&right);
            }
            if self.axis.position() == AxisPosition::Left {
                bounding.left = 0.0;
            } else {
                bounding.left = main_bounding.left + main_bounding.width + main_bounding.right
                    - bounding.width;
            }
            widget.set_bounding(bounding);
        }

        if let Some(widget) = self.left_y_axis_widget.as_mut() {
            let mut bounding = widget.bounding();
            bounding.merge(&span);
            if let Some(left) = left {
                bounding.merge(&left);
            }
            bounding.left = 0.0;
            widget.set_bounding(bounding);
        }
    }

    /// Re-records every widget for `level`.
    ///
    /// `x_axis` is the chart-wide index axis; `None` on the x-axis pane
    /// itself, which uses its own axis.
    pub(crate) fn update(
        &mut self,
        level: UpdateLevel,
        x_axis: Option<&Axis>,
        store: &dyn ChartStore,
        figures: &FigureRegistry,
        measurer: &Rc<dyn TextMeasurer>,
    ) {
        let Self {
            id,
            axis,
            left_axis,
            main_widget,
            y_axis_widget,
            left_y_axis_widget,
            ..
        } = self;
        let axis: &Axis = axis;
        let left_axis: &Axis = left_axis;
        let env = DrawEnv {
            figures,
            store,
            pane_id: *id,
            y_axis: axis,
            left_axis,
            x_axis: x_axis.unwrap_or(axis),
        };
        main_widget.update(level, env, measurer);
        if let Some(widget) = y_axis_widget.as_mut() {
            widget.update(level, env, measurer);
        }
        if let Some(widget) = left_y_axis_widget.as_mut() {
            widget.update(level, env, measurer);
        }
    }

    /// Routes a pointer event in chart coordinates to the widget under it.
    pub(crate) fn dispatch_event(
        &self,
        kind: PointerEventKind,
        coordinate: Coordinate,
        store: &mut dyn ChartStore,
        figures: &FigureRegistry,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        for widget in self.widgets() {
            let bounding = widget.bounding();
            let absolute = Bounding {
                top: self.bounding.top + bounding.top,
                ..bounding
            };
            if absolute.width <= 0.0 || absolute.height <= 0.0 || !absolute.contains(coordinate) {
                continue;
            }
            let local = Coordinate::new(coordinate.x - absolute.left, coordinate.y - absolute.top);
            if widget.dispatch_event(kind, local, store, figures, measurer) {
                return true;
            }
        }
        false
    }

    /// Paints every widget with the pane origin at `(dx, dy)`.
    pub fn compose_widgets(&self, surface: &mut dyn DrawingSurface, include_overlay: bool, dx: f64, dy: f64) {
        for widget in self.widgets() {
            let bounding = widget.bounding();
            widget.draw_onto(surface, dx + bounding.left, dy + bounding.top, include_overlay);
        }
    }

    /// Off-screen image of the pane at `pixel_ratio`.
    ///
    /// The surface is scaled once; widgets are placed in logical pixels.
    #[must_use]
    pub fn image(&self, include_overlay: bool, pixel_ratio: f64, measurer: Rc<dyn TextMeasurer>) -> Picture {
        let width = self.bounding.width;
        let height = self.bounding.height;
        let mut surface = RecordingSurface::with_measurer(width, height, pixel_ratio, measurer);
        surface.save();
        surface.scale(pixel_ratio, pixel_ratio);
        self.compose_widgets(&mut surface, include_overlay, 0.0, 0.0);
        surface.restore();
        surface.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cursor, Pane, PaneKind};
    use crate::core::{
        AxisName, AxisOptions, AxisPosition, BoundingPatch, PaneId, PaneOptions, PaneOptionsUpdate,
    };

    fn patch(left: f64, top: f64, width: f64, height: f64) -> BoundingPatch {
        BoundingPatch::default()
            .with_left(left)
            .with_top(top)
            .with_width(width)
            .with_height(height)
    }

    #[test]
    fn right_axis_is_placed_after_main_extent() {
        let mut pane = Pane::new(PaneId::Candle, PaneOptions::default());
        pane.set_bounding(
            patch(0.0, 0.0, 860.0, 400.0),
            Some(patch(0.0, 0.0, 800.0, 400.0).with_right(60.0)),
            Some(patch(0.0, 0.0, 0.0, 400.0)),
            Some(patch(0.0, 0.0, 60.0, 400.0)),
        );
        let right = pane.y_axis_widget().map(|widget| widget.bounding().left);
        assert_eq!(right, Some(800.0));

        pane.set_bounding(
            BoundingPatch::default(),
            Some(BoundingPatch::default().with_right(0.0)),
            None,
            Some(BoundingPatch::default()),
        );
        assert_eq!(pane.y_axis_widget().map(|widget| widget.bounding().left), Some(740.0));
    }

    #[test]
    fn left_positioned_axis_widget_is_pinned_to_origin() {
        let options = PaneOptions {
            axis: AxisOptions {
                position: AxisPosition::Left,
                ..AxisOptions::default()
            },
            ..PaneOptions::default()
        };
        let mut pane = Pane::new(PaneId::Indicator(1), options);
        pane.set_bounding(
            patch(0.0, 0.0, 860.0, 100.0),
            Some(patch(60.0, 0.0, 800.0, 100.0)),
            None,
            Some(patch(25.0, 0.0, 60.0, 100.0)),
        );
        assert_eq!(pane.y_axis_widget().map(|widget| widget.bounding().left), Some(0.0));
    }

    #[test]
    fn x_axis_pane_has_no_y_axis_widgets() {
        let pane = Pane::new(PaneId::XAxis, PaneOptions::x_axis());
        assert!(pane.y_axis_widget().is_none());
        assert!(pane.left_y_axis_widget().is_none());
        assert_eq!(pane.main_widget().cursor(), Cursor::EwResize);
        assert!(!pane.axis().auto_calc_ticks());
        assert!(PaneKind::XAxis.create_y_axis_widget().is_none());
    }

    #[test]
    fn axis_is_recreated_only_on_name_change_for_candle() {
        let mut pane = Pane::new(PaneId::Candle, PaneOptions::default());
        pane.axis_mut().set_extent(200.0);
        pane.axis_mut().set_range(10.0, 20.0);

        pane.set_options(&PaneOptionsUpdate {
            axis: Some(AxisOptions {
                reverse: true,
                ..AxisOptions::default()
            }),
            ..PaneOptionsUpdate::default()
        });
        assert_eq!(pane.axis().range().from, 10.0);
        assert!(pane.axis().options().reverse);

        pane.set_options(&PaneOptionsUpdate {
            axis: Some(AxisOptions {
                name: AxisName::Logarithm,
                ..AxisOptions::default()
            }),
            ..PaneOptionsUpdate::default()
        });
        assert_eq!(pane.axis().name(), AxisName::Logarithm);
        assert_eq!(pane.axis().range().from, 0.0);
        assert!(pane.axis().auto_calc_ticks());
    }

    #[test]
    fn indicator_axis_name_change_merges_in_place() {
        let mut pane = Pane::new(PaneId::Indicator(2), PaneOptions::default());
        pane.axis_mut().set_range(1.0, 5.0);
        pane.set_options(&PaneOptionsUpdate {
            axis: Some(AxisOptions {
                name: AxisName::Percentage,
                ..AxisOptions::default()
            }),
            ..PaneOptionsUpdate::default()
        });
        assert_eq!(pane.axis().name(), AxisName::Percentage);
        assert_eq!(pane.axis().range().from, 1.0);
    }

    #[test]
    fn disabled_zoom_resets_cursor() {
        let mut pane = Pane::new(PaneId::Candle, PaneOptions::default());
        assert_eq!(pane.y_axis_widget().map(|widget| widget.cursor()), Some(Cursor::NsResize));
        pane.set_options(&PaneOptionsUpdate {
            axis: Some(AxisOptions {
                scroll_zoom_enabled: false,
                ..AxisOptions::default()
            }),
            ..PaneOptionsUpdate::default()
        });
        assert_eq!(pane.y_axis_widget().map(|widget| widget.cursor()), Some(Cursor::Default));
    }
}
