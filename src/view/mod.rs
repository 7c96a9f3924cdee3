//! Drawing strategies bound to widgets.
//!
//! A view reads store state, builds figure payloads and hands them to the
//! figure registry. It is called with a surface already clipped to its
//! widget, in widget-local coordinates.

mod axis;
mod candle_bar;
mod crosshair;
pub mod indicator_tooltip;
mod indicator_view;
mod last_price;
pub mod tooltip_flow;

use crate::api::store::ChartStore;
use crate::api::styles::CandleColorCompareRule;
use crate::core::{Axis, Bounding, KLineData, PaneId};
use crate::render::figure::{Figure, FigureRegistry};
use crate::render::{Color, DrawingSurface};

pub(crate) use axis::axis_extent_for_labels;
pub use axis::{AxisSide, AxisView};
pub use candle_bar::CandleBarView;
pub use crosshair::{CrosshairLabelView, CrosshairLineView};
pub use indicator_tooltip::{
    IndicatorTooltipData, IndicatorTooltipView, TooltipLegend, TooltipTarget, build_tooltip_data,
    layout_indicator_tooltip, should_draw_tooltip,
};
pub use indicator_view::IndicatorView;
pub use last_price::{
    LastPriceLabelView, LastPriceLineView, last_price_color, last_price_trend_color,
};
pub use tooltip_flow::TooltipFlow;

/// Recording layer of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Main,
    Overlay,
}

/// Everything a view may read while drawing, plus the sink for interactive
/// figures.
pub struct ViewContext<'a> {
    pub surface: &'a mut dyn DrawingSurface,
    pub figures: &'a FigureRegistry,
    pub store: &'a dyn ChartStore,
    pub pane_id: PaneId,
    /// Widget bounding in chart coordinates; drawing happens in
    /// `[0, width] x [0, height]`.
    pub bounding: Bounding,
    /// Value axis of the pane (the index axis on the x-axis pane).
    pub y_axis: &'a Axis,
    pub left_axis: &'a Axis,
    /// Chart-wide index axis.
    pub x_axis: &'a Axis,
    interactive: &'a mut Vec<Figure>,
}

/// Shared, read-only inputs of one recording pass.
#[derive(Clone, Copy)]
pub struct DrawEnv<'a> {
    pub figures: &'a FigureRegistry,
    pub store: &'a dyn ChartStore,
    pub pane_id: PaneId,
    pub y_axis: &'a Axis,
    pub left_axis: &'a Axis,
    pub x_axis: &'a Axis,
}

impl<'a> ViewContext<'a> {
    pub(crate) fn new(
        surface: &'a mut dyn DrawingSurface,
        env: DrawEnv<'a>,
        bounding: Bounding,
        interactive: &'a mut Vec<Figure>,
    ) -> Self {
        Self {
            surface,
            figures: env.figures,
            store: env.store,
            pane_id: env.pane_id,
            bounding,
            y_axis: env.y_axis,
            left_axis: env.left_axis,
            x_axis: env.x_axis,
            interactive,
        }
    }

    /// Paints `figure`; figures carrying event handlers stay registered for
    /// hit-testing until the layer is recorded again.
    pub fn draw_figure(&mut self, figure: Figure) {
        self.figures.draw(&figure, &mut *self.surface, self.store);
        if !figure.handlers.is_empty() {
            self.interactive.push(figure);
        }
    }
}

pub trait View {
    fn layer(&self) -> Layer {
        Layer::Main
    }

    fn draw_imp(&self, ctx: &mut ViewContext<'_>);
}

/// Price the bar at `index` is compared against for coloring.
pub(crate) fn compare_price(rule: CandleColorCompareRule, data: &[KLineData], index: usize) -> Option<f64> {
    let bar = data.get(index)?;
    Some(match rule {
        CandleColorCompareRule::CurrentOpen => bar.open,
        CandleColorCompareRule::PreviousClose => index
            .checked_sub(1)
            .and_then(|prev| data.get(prev))
            .map_or(bar.close, |prev| prev.close),
    })
}

pub(crate) fn trend_color(value: f64, reference: f64, up: Color, down: Color, no_change: Color) -> Color {
    if value > reference {
        up
    } else if value < reference {
        down
    } else {
        no_change
    }
}
