use tracing::debug;

use crate::core::{
    Axis, AxisPosition, BoundingPatch, KLineData, PaneId, PaneOptions, layout_pane_heights,
};
use crate::pane::Pane;
use crate::render::{Color, Font, TextMeasurer};
use crate::telemetry::LAYOUT_TARGET;
use crate::view::axis_extent_for_labels;

use super::engine::ChartEngine;
use super::store::ChartStore;

/// Sample label used to space time ticks.
const TIME_LABEL_SAMPLE: &str = "00-00 00:00";

fn patch(left: f64, top: f64, width: f64, height: f64) -> BoundingPatch {
    BoundingPatch::default()
        .with_left(left)
        .with_top(top)
        .with_width(width)
        .with_height(height)
}

fn union(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((a_min, a_max)), Some((b_min, b_max))) => Some((a_min.min(b_min), a_max.max(b_max))),
        (extent, None) | (None, extent) => extent,
    }
}

fn bars_extent(bars: &[KLineData]) -> Option<(f64, f64)> {
    bars.iter().fold(None, |extent, bar| union(extent, Some((bar.low, bar.high))))
}

/// Fits `axis` to `extent` and rebuilds its ticks; an empty extent keeps the
/// previous range.
fn fit_axis(
    axis: &mut Axis,
    height: f64,
    extent: Option<(f64, f64)>,
    base: Option<f64>,
    precision: u32,
    spacing: f64,
) {
    axis.set_extent(height);
    axis.set_base_value(base);
    if let Some((min, max)) = extent {
        axis.fit_range(min, max);
    }
    axis.calc_value_ticks(precision, spacing);
}

fn widest_tick<M: TextMeasurer + ?Sized>(axis: &Axis, font: &Font, measurer: &M) -> f64 {
    axis.ticks()
        .iter()
        .map(|tick| measurer.measure_text(&tick.text, font))
        .fold(0.0, f64::max)
}

impl<S: ChartStore> ChartEngine<S> {
    /// Assigns every pane and widget bounding and refits the axes.
    ///
    /// The x-axis pane takes the bottom strip; drawing panes stack above it
    /// with separators between them. Y-axis columns are shared by all panes
    /// so the main widgets line up vertically.
    pub fn layout(&mut self) {
        let Self {
            store,
            measurer,
            panes,
            x_axis_pane,
            config,
            separators,
            ..
        } = self;
        let store: &S = store;
        let measurer: &dyn TextMeasurer = &**measurer;
        let styles = store.styles();
        let width = config.width;
        let height = config.height;

        let x_styles = &styles.x_axis;
        let x_height = if x_axis_pane.axis().options().show {
            x_styles.size.map_or_else(
                || axis_extent_for_labels(x_styles, x_styles.tick_text.size),
                |size| size.max(0.0),
            )
        } else {
            0.0
        };
        let x_height = x_height.min(height);

        let separator = if styles.separator.size.is_finite() {
            styles.separator.size.max(0.0)
        } else {
            0.0
        };
        let pane_options: Vec<(PaneId, PaneOptions)> =
            panes.iter().map(|pane| (pane.id(), *pane.options())).collect();
        let regions = layout_pane_heights(&pane_options, height - x_height, separator);
        separators.clear();
        if separator > 0.0 {
            separators.extend(
                regions
                    .iter()
                    .enumerate()
                    .filter(|(index, region)| {
                        region.height > 0.0
                            && regions[index + 1..].iter().any(|next| next.height > 0.0)
                    })
                    .map(|(_, region)| region.top + region.height),
            );
        }

        let data = store.data_list();
        let range = store.visible_range();
        let visible = data.get(range.from..range.to.min(data.len())).unwrap_or(&[]);
        let base = visible.first().map(|bar| bar.close);
        let price_precision = store.precision().price;
        let y_styles = &styles.y_axis;
        let tick_spacing = y_styles.tick_text.size;

        for (pane, region) in panes.iter_mut().zip(&regions) {
            let indicators = store.indicators_by_pane_id(pane.id());
            let indicator_extent = indicators.iter().fold(None, |extent, indicator| {
                union(extent, indicator.value_extent(range.from, range.to))
            });
            let (extent, precision) = if pane.id() == PaneId::Candle {
                (union(bars_extent(visible), indicator_extent), price_precision)
            } else {
                let precision = indicators
                    .iter()
                    .map(|indicator| indicator.precision)
                    .max()
                    .unwrap_or(price_precision);
                (indicator_extent, precision)
            };
            fit_axis(pane.axis_mut(), region.height, extent, base, precision, tick_spacing);
            fit_axis(pane.left_axis_mut(), region.height, extent, base, precision, tick_spacing);
        }

        let tick_font = y_styles.tick_text.to_text_style().font();
        let y_width = y_styles.size.map_or_else(
            || {
                let mut label = panes.iter().fold(0.0, |widest: f64, pane| {
                    widest
                        .max(widest_tick(pane.axis(), &tick_font, measurer))
                        .max(widest_tick(pane.left_axis(), &tick_font, measurer))
                });
                let last_mark = &styles.candle.price_mark.last;
                if styles.candle.price_mark.show && last_mark.show && last_mark.text.show {
                    if let (Some(bar), Some(candle)) = (data.last(), panes.first()) {
                        let raw = candle.axis().value_to_text(bar.close, price_precision);
                        let text = store.format_decimal_fold(&store.format_thousands(&raw));
                        let style = last_mark.text.to_text_style(Color::TRANSPARENT);
                        let badge = style.padding_left
                            + measurer.measure_text(&text, &style.font())
                            + style.padding_right;
                        label = label.max(badge);
                    }
                }
                axis_extent_for_labels(y_styles, label)
            },
            |size| size.max(0.0),
        );

        let shows = |axis: &Axis| y_styles.show && axis.options().show;
        let mut left_column: f64 = 0.0;
        let mut right_column: f64 = 0.0;
        for pane in panes.iter() {
            let axis = pane.axis();
            if shows(axis) && !axis.options().inside {
                match axis.position() {
                    AxisPosition::Left => left_column = left_column.max(y_width),
                    AxisPosition::Right | AxisPosition::Top | AxisPosition::Bottom => {
                        right_column = right_column.max(y_width);
                    }
                }
            }
            let left_axis = pane.left_axis();
            if shows(left_axis) && !left_axis.options().inside {
                left_column = left_column.max(y_width);
            }
        }
        left_column = left_column.min(width);
        right_column = right_column.min(width - left_column);
        let main_width = (width - left_column - right_column).max(0.0);

        for (pane, region) in panes.iter_mut().zip(&regions) {
            let right_width = if shows(pane.axis()) { y_width } else { 0.0 };
            let left_width = if shows(pane.left_axis()) { y_width } else { 0.0 };
            layout_drawing_pane(
                pane,
                width,
                region.top,
                region.height,
                (left_column, main_width, right_column),
                (left_width, right_width),
            );
        }

        let x_axis = x_axis_pane.axis_mut();
        x_axis.set_extent(main_width);
        if range.is_empty() {
            x_axis.set_range(0.0, 0.0);
        } else {
            x_axis.set_range(range.from as f64 - 0.5, range.to as f64 - 0.5);
        }
        let time_font = x_styles.tick_text.to_text_style().font();
        let time_spacing = measurer.measure_text(TIME_LABEL_SAMPLE, &time_font)
            + x_styles.tick_text.margin_start
            + x_styles.tick_text.margin_end;
        x_axis.calc_index_ticks(data, time_spacing);
        x_axis_pane.set_bounding(
            patch(0.0, height - x_height, width, x_height),
            Some(patch(left_column, 0.0, main_width, x_height).with_right(right_column)),
            None,
            None,
        );

        let crosshair = store.crosshair();
        let stale = crosshair
            .data_index
            .is_some_and(|index| index >= data.len() || range.is_empty());
        if !crosshair.is_anchored() || stale {
            let idle = self.idle_crosshair();
            self.store.set_crosshair(idle);
        }

        debug!(
            target: LAYOUT_TARGET,
            width,
            height,
            panes = regions.len(),
            x_height,
            y_width,
            left_column,
            right_column,
            "chart layout"
        );
    }
}

/// Places one drawing pane; `columns` is `(left, main, right)` and `axes` is
/// the `(left, right)` axis widget widths.
fn layout_drawing_pane(
    pane: &mut Pane,
    width: f64,
    top: f64,
    height: f64,
    columns: (f64, f64, f64),
    axes: (f64, f64),
) {
    let (left_column, main_width, right_column) = columns;
    let (left_width, right_width) = axes;
    pane.set_bounding(
        patch(0.0, top, width, height),
        Some(patch(left_column, 0.0, main_width, height).with_right(right_column)),
        Some(patch(0.0, 0.0, left_width, height)),
        Some(patch(0.0, 0.0, right_width, height)),
    );
}
