use crate::core::Coordinate;
use crate::render::figure::{Figure, LineAttrs, LineStyle, RectAttrs, RectStyle};
use crate::render::PolygonType;

use super::{View, ViewContext, compare_price};

const BODY_WIDTH_RATIO: f64 = 0.6;

#[derive(Debug, Default)]
struct Bucket {
    wicks: Vec<LineAttrs>,
    bodies: Vec<RectAttrs>,
}

/// Candlesticks of the visible range, batched into one figure per trend color.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandleBarView;

impl View for CandleBarView {
    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let data = store.data_list();
        let range = store.visible_range();
        if data.is_empty() || range.is_empty() {
            return;
        }
        let styles = &store.styles().candle.bar;
        let body_width = (ctx.x_axis.bar_space() * BODY_WIDTH_RATIO).max(1.0);
        let half = body_width / 2.0;

        // up, down, no change
        let mut buckets: [Bucket; 3] = Default::default();
        for index in range.from..range.to.min(data.len()) {
            let bar = &data[index];
            let reference = compare_price(styles.compare_rule, data, index).unwrap_or(bar.close);
            let bucket = if bar.close > reference {
                0
            } else if bar.close < reference {
                1
            } else {
                2
            };
            let x = ctx.x_axis.value_to_pixel(index as f64);
            let high = ctx.y_axis.value_to_pixel(bar.high);
            let low = ctx.y_axis.value_to_pixel(bar.low);
            let open = ctx.y_axis.value_to_pixel(bar.open);
            let close = ctx.y_axis.value_to_pixel(bar.close);
            let top = open.min(close);
            let height = (open - close).abs().max(1.0);

            let target = &mut buckets[bucket];
            target.wicks.push(LineAttrs::segment(
                Coordinate::new(x, high),
                Coordinate::new(x, low),
            ));
            target
                .bodies
                .push(RectAttrs::new(x - half, top, body_width, height));
        }

        let colors = [styles.up_color, styles.down_color, styles.no_change_color];
        for (bucket, color) in buckets.into_iter().zip(colors) {
            if bucket.bodies.is_empty() {
                continue;
            }
            ctx.draw_figure(Figure::line(
                bucket.wicks,
                LineStyle {
                    color: color.into(),
                    ..LineStyle::default()
                },
            ));
            ctx.draw_figure(Figure::rect(
                bucket.bodies,
                RectStyle {
                    style: PolygonType::Fill,
                    color: color.into(),
                    ..RectStyle::default()
                },
            ));
        }
    }
}
