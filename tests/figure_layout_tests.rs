use approx::assert_relative_eq;
use chart_panes::api::styles::{
    CandleColorCompareRule, IndicatorTooltipStyles, LastPriceMarkStyles, TooltipTextStyles,
};
use chart_panes::core::{AxisName, Coordinate, KLineData, PaneId};
use chart_panes::render::figure::{FigureAttrs, TextAttrs, TextStyle, get_text_rect};
use chart_panes::render::{EstimatedTextMeasurer, TextAlign, TextBaseline};
use chart_panes::view::{
    IndicatorTooltipData, TooltipFlow, TooltipLegend, TooltipTarget, last_price_color,
    layout_indicator_tooltip,
};

fn bar(open: f64, close: f64) -> KLineData {
    KLineData::new(0, open, open.max(close) + 1.0, open.min(close) - 1.0, close).expect("bar")
}

#[test]
fn right_bottom_text_is_anchored_at_its_far_corner() {
    let attrs = TextAttrs::new(100.0, 50.0, "ABC").aligned(TextAlign::Right, TextBaseline::Bottom);
    let style = TextStyle {
        size: 12.0,
        ..TextStyle::default()
    };
    let rect = get_text_rect(&attrs, &style, &EstimatedTextMeasurer::default());
    assert_relative_eq!(rect.x + rect.width, 100.0);
    assert_relative_eq!(rect.y + rect.height, 50.0);
    assert_relative_eq!(rect.height, 12.0);
    assert!(rect.width > 0.0);
}

#[test]
fn default_text_anchor_is_top_left() {
    let attrs = TextAttrs::new(10.0, 20.0, "AB");
    let rect = get_text_rect(&attrs, &TextStyle::default(), &EstimatedTextMeasurer::default());
    assert_relative_eq!(rect.x, 10.0);
    assert_relative_eq!(rect.y, 20.0);
    assert!(rect.contains(Coordinate::new(11.0, 21.0)));
}

#[test]
fn third_item_wraps_to_a_new_row() {
    let mut flow = TooltipFlow::new(0.0, 0.0, 100.0);
    let item = 40.0 + 10.0;

    let first = flow.place(item, 20.0);
    let second = flow.place(item, 24.0);
    assert_eq!(first, Coordinate::new(0.0, 0.0));
    assert_eq!(second, Coordinate::new(50.0, 0.0));
    assert_relative_eq!(flow.cursor().x, 100.0);
    assert_relative_eq!(flow.row_height(), 24.0);

    let third = flow.place(item, 18.0);
    assert_eq!(third, Coordinate::new(0.0, 24.0));
    assert_relative_eq!(flow.row_height(), 18.0);
    assert_relative_eq!(flow.consumed_height(0.0), 42.0);
}

#[test]
fn tooltip_legends_wrap_inside_max_width() {
    let styles = TooltipTextStyles {
        margin_left: 5.0,
        margin_right: 5.0,
        margin_top: 2.0,
        margin_bottom: 2.0,
        ..TooltipTextStyles::default()
    };
    let legend = |title: &str| TooltipLegend {
        title: title.into(),
        value: "1.0".into(),
    };
    let data = IndicatorTooltipData {
        legends: vec![legend("A: "), legend("B: "), legend("C: ")],
        ..IndicatorTooltipData::default()
    };
    let target = TooltipTarget {
        pane_id: PaneId::Candle,
        indicator_name: "MA",
        active_icon: None,
        active_title: None,
    };
    let tooltip_styles = IndicatorTooltipStyles {
        text: styles,
        ..IndicatorTooltipStyles::default()
    };
    // Each legend is 5 + 3 chars + 3 chars + 5 wide at 7.2 px per char.
    let width = 5.0 + 6.0 * 7.2 + 5.0;
    let mut flow = TooltipFlow::new(0.0, 0.0, width * 2.0 + 1.0);
    let figures = layout_indicator_tooltip(
        &mut flow,
        &target,
        &data,
        &tooltip_styles,
        &EstimatedTextMeasurer::default(),
    );

    let tops: Vec<f64> = figures
        .iter()
        .filter_map(|figure| match &figure.attrs {
            FigureAttrs::Text(items) if items[0].text.ends_with(": ") => Some(items[0].y),
            _ => None,
        })
        .collect();
    assert_eq!(tops.len(), 3);
    assert_relative_eq!(tops[0], tops[1]);
    assert!(tops[2] > tops[1]);
    assert_relative_eq!(flow.consumed_height(0.0), 2.0 * (2.0 + 12.0 + 2.0));
}

#[test]
fn last_price_color_follows_current_open_rule() {
    let styles = LastPriceMarkStyles::default();
    assert_eq!(
        last_price_color(&styles, &[bar(10.0, 12.0)], AxisName::Normal, "12.00"),
        styles.up_color
    );
    assert_eq!(
        last_price_color(&styles, &[bar(10.0, 10.0)], AxisName::Normal, "10.00"),
        styles.no_change_color
    );
    assert_eq!(
        last_price_color(&styles, &[bar(10.0, 8.0)], AxisName::Normal, "8.00"),
        styles.down_color
    );
}

#[test]
fn last_price_color_follows_previous_close_rule() {
    let styles = LastPriceMarkStyles {
        compare_rule: CandleColorCompareRule::PreviousClose,
        ..LastPriceMarkStyles::default()
    };
    let data = [bar(12.5, 13.0), bar(11.0, 12.0)];
    assert_eq!(
        last_price_color(&styles, &data, AxisName::Normal, "12.00"),
        styles.down_color
    );
    assert_eq!(
        last_price_color(&styles, &data[1..], AxisName::Normal, "12.00"),
        styles.no_change_color
    );
}

#[test]
fn percentage_axis_colors_by_label_sign() {
    let styles = LastPriceMarkStyles::default();
    let falling = [bar(10.0, 8.0)];
    assert_eq!(
        last_price_color(&styles, &falling, AxisName::Percentage, "1,234.50%"),
        styles.up_color
    );
    assert_eq!(
        last_price_color(&styles, &falling, AxisName::Percentage, "0.00%"),
        styles.down_color
    );
}
