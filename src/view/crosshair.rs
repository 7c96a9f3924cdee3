use crate::api::styles::CrosshairDirectionStyles;
use crate::core::Coordinate;
use crate::render::figure::{Figure, LineAttrs, LineStyle, TextAttrs, get_text_rect};
use crate::render::{TextAlign, TextBaseline};

use super::axis::AxisSide;
use super::{Layer, View, ViewContext};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn crosshair_line_style(styles: &CrosshairDirectionStyles) -> LineStyle {
    LineStyle {
        style: styles.line.style,
        color: styles.line_color.into(),
        size: styles.line.size,
        dashed_value: styles.line.dashed_value.clone(),
    }
}

/// Crosshair lines over a drawing pane's main widget.
///
/// The horizontal line is drawn only on the pane under the pointer; the
/// vertical line follows the snapped bar on every pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosshairLineView;

impl View for CrosshairLineView {
    fn layer(&self) -> Layer {
        Layer::Overlay
    }

    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let styles = &store.styles().crosshair;
        let crosshair = store.crosshair();
        if !styles.show || !crosshair.is_anchored() {
            return;
        }
        let width = ctx.bounding.width;
        let height = ctx.bounding.height;

        if styles.horizontal.show && styles.horizontal.line.show && crosshair.pane_id == Some(ctx.pane_id) {
            if let Some(y) = crosshair.y {
                ctx.draw_figure(Figure::line(
                    vec![LineAttrs::segment(Coordinate::new(0.0, y), Coordinate::new(width, y))],
                    crosshair_line_style(&styles.horizontal),
                ));
            }
        }

        if styles.vertical.show && styles.vertical.line.show {
            if let Some(index) = crosshair.data_index {
                let x = ctx.x_axis.value_to_pixel(index as f64);
                ctx.draw_figure(Figure::line(
                    vec![LineAttrs::segment(Coordinate::new(x, 0.0), Coordinate::new(x, height))],
                    crosshair_line_style(&styles.vertical),
                ));
            }
        }
    }
}

/// Crosshair value badge on an axis widget.
#[derive(Debug, Clone, Copy)]
pub struct CrosshairLabelView {
    side: AxisSide,
}

impl CrosshairLabelView {
    #[must_use]
    pub const fn new(side: AxisSide) -> Self {
        Self { side }
    }

    fn draw_value_label(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let styles = &store.styles().crosshair.horizontal;
        let crosshair = store.crosshair();
        if !styles.show || !styles.text.show || crosshair.pane_id != Some(ctx.pane_id) {
            return;
        }
        let Some(y) = crosshair.y else {
            return;
        };
        let axis = self.side.axis(ctx);
        if !axis.options().show {
            return;
        }
        let value = axis.pixel_to_value(y);
        let raw = axis.value_to_text(value, store.precision().price);
        let text = store.format_decimal_fold(&store.format_thousands(&raw));
        let (x, align) = if axis.is_from_zero() {
            (0.0, TextAlign::Left)
        } else {
            (ctx.bounding.width, TextAlign::Right)
        };
        ctx.draw_figure(Figure::text(
            vec![TextAttrs::new(x, y, text).aligned(align, TextBaseline::Middle)],
            styles.text.to_text_style(),
        ));
    }

    fn draw_time_label(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let styles = &store.styles().crosshair.vertical;
        let crosshair = store.crosshair();
        if !styles.show || !styles.text.show || !crosshair.is_anchored() {
            return;
        }
        let (Some(index), Some(bar)) = (crosshair.data_index, crosshair.kline_data) else {
            return;
        };
        let Some(time) = bar.datetime() else {
            return;
        };
        let text = time.format(DATETIME_FORMAT).to_string();
        let style = styles.text.to_text_style();
        let width = ctx.bounding.width;
        let anchor = TextAttrs::new(0.0, 0.0, text.as_str());
        let label_width = get_text_rect(&anchor, &style, &*ctx.surface).width;
        let half = label_width / 2.0;
        let x = ctx.x_axis.value_to_pixel(index as f64);
        let x = if label_width >= width {
            width / 2.0
        } else {
            x.clamp(half, width - half)
        };
        ctx.draw_figure(Figure::text(
            vec![TextAttrs::new(x, 0.0, text).aligned(TextAlign::Center, TextBaseline::Top)],
            style,
        ));
    }
}

impl View for CrosshairLabelView {
    fn layer(&self) -> Layer {
        Layer::Overlay
    }

    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        if !ctx.store.styles().crosshair.show {
            return;
        }
        match self.side {
            AxisSide::Right | AxisSide::Left => self.draw_value_label(ctx),
            AxisSide::Bottom => self.draw_time_label(ctx),
        }
    }
}
