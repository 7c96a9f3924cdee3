use crate::api::styles::LastPriceMarkStyles;
use crate::core::{AxisName, Coordinate, KLineData};
use crate::render::figure::{Figure, LineAttrs, LineStyle, TextAttrs};
use crate::render::{Color, TextAlign, TextBaseline};

use super::axis::AxisSide;
use super::{View, ViewContext, compare_price, trend_color};

/// Color of the last-price label.
///
/// On a percentage axis the label text decides: a positive leading number is
/// up, anything else (including unparsable text) is down.
#[must_use]
pub fn last_price_color(
    styles: &LastPriceMarkStyles,
    data: &[KLineData],
    axis_name: AxisName,
    label_text: &str,
) -> Color {
    if axis_name == AxisName::Percentage {
        return if leading_number(label_text).is_some_and(|value| value > 0.0) {
            styles.up_color
        } else {
            styles.down_color
        };
    }
    last_price_trend_color(styles, data)
}

/// Color of the last-price line: the compare rule alone, whatever the axis.
#[must_use]
pub fn last_price_trend_color(styles: &LastPriceMarkStyles, data: &[KLineData]) -> Color {
    let Some(index) = data.len().checked_sub(1) else {
        return styles.no_change_color;
    };
    let close = data[index].close;
    let reference = compare_price(styles.compare_rule, data, index).unwrap_or(close);
    trend_color(
        close,
        reference,
        styles.up_color,
        styles.down_color,
        styles.no_change_color,
    )
}

/// Longest numeric prefix of `text`, ignoring grouping separators.
fn leading_number(text: &str) -> Option<f64> {
    let prefix: String = text
        .trim_start()
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | ','))
        .filter(|ch| *ch != ',')
        .collect();
    prefix.parse().ok()
}

fn last_price_enabled(styles: &crate::api::styles::PriceMarkStyles) -> bool {
    styles.show && styles.last.show
}

/// Dashed line from the last bar to the right edge of the candle pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastPriceLineView;

impl View for LastPriceLineView {
    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let price_mark = &store.styles().candle.price_mark;
        let line = &price_mark.last.line;
        if !last_price_enabled(price_mark) || !line.show {
            return;
        }
        let data = store.data_list();
        let Some(last) = data.last() else {
            return;
        };
        let width = ctx.bounding.width;
        let y = ctx.y_axis.value_to_nice_pixel(last.close);
        let x = ctx
            .x_axis
            .value_to_pixel((data.len() - 1) as f64)
            .clamp(0.0, width);
        let color = last_price_trend_color(&price_mark.last, data);
        ctx.draw_figure(Figure::line(
            vec![LineAttrs::segment(Coordinate::new(x, y), Coordinate::new(width, y))],
            LineStyle {
                style: line.style,
                color: color.into(),
                size: line.size,
                dashed_value: line.dashed_value.clone(),
            },
        ));
    }
}

/// Last close badge on a value axis.
#[derive(Debug, Clone, Copy)]
pub struct LastPriceLabelView {
    side: AxisSide,
}

impl LastPriceLabelView {
    #[must_use]
    pub const fn new(side: AxisSide) -> Self {
        Self { side }
    }
}

impl View for LastPriceLabelView {
    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let price_mark = &store.styles().candle.price_mark;
        let text_styles = &price_mark.last.text;
        if !last_price_enabled(price_mark) || !text_styles.show {
            return;
        }
        let axis = self.side.axis(ctx);
        if !axis.options().show {
            return;
        }
        let data = store.data_list();
        let Some(last) = data.last() else {
            return;
        };

        let raw = axis.value_to_text(last.close, store.precision().price);
        let text = store.format_decimal_fold(&store.format_thousands(&raw));
        let background = last_price_color(&price_mark.last, data, axis.name(), &text);
        let (x, align) = if axis.is_from_zero() {
            (0.0, TextAlign::Left)
        } else {
            (ctx.bounding.width, TextAlign::Right)
        };
        let y = axis.value_to_nice_pixel(last.close);
        ctx.draw_figure(Figure::text(
            vec![TextAttrs::new(x, y, text).aligned(align, TextBaseline::Middle)],
            text_styles.to_text_style(background),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{last_price_color, last_price_trend_color, leading_number};
    use crate::api::styles::{CandleColorCompareRule, LastPriceMarkStyles};
    use crate::core::{AxisName, KLineData};

    fn bar(open: f64, close: f64) -> KLineData {
        KLineData::new(0, open, open.max(close), open.min(close), close).expect("bar")
    }

    #[test]
    fn current_open_rule_compares_last_bar() {
        let styles = LastPriceMarkStyles::default();
        let data = [bar(10.0, 9.0), bar(10.0, 11.0)];
        assert_eq!(last_price_color(&styles, &data, AxisName::Normal, ""), styles.up_color);
        let data = [bar(10.0, 10.0)];
        assert_eq!(
            last_price_color(&styles, &data, AxisName::Normal, ""),
            styles.no_change_color
        );
    }

    #[test]
    fn previous_close_rule_uses_prior_bar() {
        let styles = LastPriceMarkStyles {
            compare_rule: CandleColorCompareRule::PreviousClose,
            ..LastPriceMarkStyles::default()
        };
        let data = [bar(10.0, 12.0), bar(10.0, 11.0)];
        assert_eq!(last_price_color(&styles, &data, AxisName::Normal, ""), styles.down_color);
        let single = [bar(10.0, 11.0)];
        assert_eq!(
            last_price_color(&styles, &single, AxisName::Normal, ""),
            styles.no_change_color
        );
    }

    #[test]
    fn percentage_axis_follows_label_sign() {
        let styles = LastPriceMarkStyles::default();
        let data = [bar(10.0, 20.0)];
        assert_eq!(
            last_price_color(&styles, &data, AxisName::Percentage, "-1.25%"),
            styles.down_color
        );
        assert_eq!(
            last_price_color(&styles, &data, AxisName::Percentage, "1,204.10%"),
            styles.up_color
        );
        assert_eq!(
            last_price_color(&styles, &data, AxisName::Percentage, "0.00%"),
            styles.down_color
        );
    }

    #[test]
    fn line_ignores_percentage_label_sign() {
        let styles = LastPriceMarkStyles::default();
        let data = [bar(5.0, 5.0), bar(10.0, 8.0)];
        assert_eq!(
            last_price_color(&styles, &data, AxisName::Percentage, "60.00%"),
            styles.up_color
        );
        assert_eq!(last_price_trend_color(&styles, &data), styles.down_color);
    }

    #[test]
    fn leading_number_ignores_suffix() {
        assert_eq!(leading_number("12.5%"), Some(12.5));
        assert_eq!(leading_number("abc"), None);
    }
}
