//! Indicator legend rows drawn in the top-left corner of a pane.
//!
//! Each indicator contributes, in order: left icons, its title, middle icons,
//! its legends and right icons. Items flow left to right and wrap at the
//! widget's right offset. Icons and the title carry pointer handlers that
//! update the store's active keys.

use crate::api::indicator::{Indicator, LegendText, TooltipDataSourceContext};
use crate::api::store::ChartStore;
use crate::api::styles::{
    IndicatorTooltipStyles, StyleValue, TooltipIconPosition, TooltipIconStyles, TooltipShowRule,
    TooltipTextStyles,
};
use crate::core::{Axis, Bounding, PaneId, format_precision};
use crate::interaction::{
    ActionType, ChartAction, Crosshair, FigureEventAction, TooltipIconKey, TooltipTitleKey,
};
use crate::render::figure::{Figure, TextAttrs, TextStyle};
use crate::render::{Color, Font, PolygonType, TextMeasurer};

use super::tooltip_flow::TooltipFlow;
use super::{Layer, View, ViewContext};

const ACTIVE_TITLE_PADDING_LEFT: f64 = 4.0;
const ACTIVE_TITLE_PADDING_TOP: f64 = 6.0;
const ACTIVE_TITLE_PADDING_RIGHT: f64 = 4.0;
const ACTIVE_TITLE_PADDING_BOTTOM: f64 = 4.0;
const ACTIVE_TITLE_BORDER_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLegend {
    pub title: LegendText,
    pub value: LegendText,
}

/// Resolved tooltip content of one indicator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorTooltipData {
    pub name: String,
    pub calc_params_text: String,
    pub legends: Vec<TooltipLegend>,
    pub icons: Vec<TooltipIconStyles>,
}

impl IndicatorTooltipData {
    /// Icons alone never produce a tooltip row.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.name.is_empty() || !self.legends.is_empty()
    }
}

/// Identity and active state of the indicator being laid out.
#[derive(Debug, Clone, Copy)]
pub struct TooltipTarget<'a> {
    pub pane_id: PaneId,
    pub indicator_name: &'a str,
    pub active_icon: Option<&'a TooltipIconKey>,
    pub active_title: Option<&'a TooltipTitleKey>,
}

impl TooltipTarget<'_> {
    fn icon_key(&self, icon_id: &str) -> TooltipIconKey {
        TooltipIconKey::new(self.pane_id, self.indicator_name, icon_id)
    }

    fn title_key(&self) -> TooltipTitleKey {
        TooltipTitleKey::new(self.pane_id, self.indicator_name)
    }

    fn is_icon_active(&self, icon_id: &str) -> bool {
        self.active_icon.is_some_and(|key| {
            key.pane_id == self.pane_id
                && key.indicator_name == self.indicator_name
                && key.icon_id == icon_id
        })
    }

    fn is_title_active(&self) -> bool {
        self.active_title
            .is_some_and(|key| key.pane_id == self.pane_id && key.indicator_name == self.indicator_name)
    }
}

/// Whether tooltips are drawn at all for the current crosshair.
#[must_use]
pub fn should_draw_tooltip(crosshair: &Crosshair, styles: &IndicatorTooltipStyles) -> bool {
    match styles.show_rule {
        TooltipShowRule::Always => true,
        TooltipShowRule::FollowCross => crosshair.is_anchored(),
        TooltipShowRule::None => false,
    }
}

fn format_legend_value(store: &dyn ChartStore, value: &str) -> String {
    store.format_decimal_fold(&store.format_thousands(value))
}

/// Trimmed text of a custom legend value that reads as a finite number.
/// Blank text, `NaN` and infinities are shown verbatim.
fn numeric_legend_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|_| trimmed)
}

/// Builds the standard tooltip content of `indicator`, then applies its
/// custom data source if it has one.
#[must_use]
pub fn build_tooltip_data(
    indicator: &Indicator,
    store: &dyn ChartStore,
    bounding: Bounding,
    x_axis: &Axis,
    y_axis: &Axis,
) -> IndicatorTooltipData {
    let styles = &store.styles().indicator;
    let tooltip = &styles.tooltip;
    let crosshair = store.crosshair();

    let mut data = IndicatorTooltipData {
        name: if tooltip.show_name {
            indicator.short_name.clone()
        } else {
            String::new()
        },
        calc_params_text: if tooltip.show_params {
            indicator.calc_params_text()
        } else {
            String::new()
        },
        legends: Vec::new(),
        icons: tooltip.icons.clone(),
    };

    if indicator.visible {
        let data_index = crosshair
            .data_index
            .or_else(|| store.data_list().len().checked_sub(1))
            .unwrap_or_default();
        let row = indicator.row_at(data_index);
        for (figure_index, figure) in indicator.figures.iter().enumerate() {
            let Some(title) = figure.title.as_ref() else {
                continue;
            };
            let value = row.and_then(|row| row.get(&figure.key).copied());
            let color = indicator.figure_color(figure_index, value, styles);
            let text = match value.filter(|v| v.is_finite()) {
                Some(value) => {
                    let mut text = format_precision(value, indicator.precision);
                    if indicator.should_format_big_number {
                        text = store.format_big_number(&text);
                    }
                    format_legend_value(store, &text)
                }
                None => tooltip.default_value.clone(),
            };
            data.legends.push(TooltipLegend {
                title: LegendText::colored(title.clone(), color),
                value: LegendText::colored(text, color),
            });
        }
    }

    if let Some(source) = indicator.tooltip_data_source.as_ref() {
        let custom = source(&TooltipDataSourceContext {
            indicator,
            crosshair,
            bounding,
            x_axis,
            y_axis,
        });
        if let Some(name) = custom.name.filter(|_| tooltip.show_name) {
            data.name = name;
        }
        if let Some(text) = custom.calc_params_text.filter(|_| tooltip.show_params) {
            data.calc_params_text = text;
        }
        if let Some(icons) = custom.icons {
            data.icons = icons;
        }
        if let Some(legends) = custom.legends.filter(|_| indicator.visible) {
            data.legends = legends
                .into_iter()
                .map(|legend| {
                    let mut value = legend.value;
                    if let Some(number) = numeric_legend_text(&value.text) {
                        value.text = format_legend_value(store, number);
                    }
                    TooltipLegend {
                        title: legend.title,
                        value,
                    }
                })
                .collect();
        }
    }
    data
}

fn legend_color(text: &LegendText, styles: &TooltipTextStyles) -> StyleValue<Color> {
    text.color.map_or_else(|| styles.color.clone(), StyleValue::Static)
}

fn tooltip_text_style(styles: &TooltipTextStyles, color: StyleValue<Color>) -> TextStyle {
    TextStyle {
        color,
        size: styles.size,
        family: styles.family.clone(),
        weight: styles.weight.clone(),
        ..TextStyle::default()
    }
}

fn icon_font(icon: &TooltipIconStyles) -> Font {
    Font::new(icon.size, icon.font_family.clone(), "normal")
}

fn icon_width<M: TextMeasurer + ?Sized>(icon: &TooltipIconStyles, measurer: &M) -> f64 {
    icon.margin_left
        + icon.padding_left
        + measurer.measure_text(&icon.icon, &icon_font(icon))
        + icon.padding_right
        + icon.margin_right
}

fn icon_height(icon: &TooltipIconStyles) -> f64 {
    icon.margin_top + icon.padding_top + icon.size + icon.padding_bottom + icon.margin_bottom
}

fn layout_icons<'i, M, I>(
    flow: &mut TooltipFlow,
    target: &TooltipTarget<'_>,
    icons: I,
    measurer: &M,
    figures: &mut Vec<Figure>,
) where
    M: TextMeasurer + ?Sized,
    I: Iterator<Item = &'i TooltipIconStyles> + Clone,
{
    let (width, height) = icons.clone().fold((0.0, 0.0_f64), |(width, height), icon| {
        (width + icon_width(icon, measurer), height.max(icon_height(icon)))
    });
    if width <= 0.0 && height <= 0.0 {
        return;
    }
    flow.break_if_needed(width, height);

    for icon in icons {
        let active = target.is_icon_active(&icon.id);
        let origin = flow.cursor();
        let key = target.icon_key(&icon.id);
        let style = TextStyle {
            color: StyleValue::Static(if active { icon.active_color } else { icon.color }),
            size: icon.size,
            family: icon.font_family.clone(),
            padding_left: icon.padding_left,
            padding_top: icon.padding_top,
            padding_right: icon.padding_right,
            padding_bottom: icon.padding_bottom,
            background_color: StyleValue::Static(if active {
                icon.active_background_color
            } else {
                icon.background_color
            }),
            ..TextStyle::default()
        };
        figures.push(
            Figure::text(
                vec![TextAttrs::new(
                    origin.x + icon.margin_left,
                    origin.y + icon.margin_top,
                    icon.icon.clone(),
                )],
                style,
            )
            .on_click(FigureEventAction::Execute(ChartAction {
                action: ActionType::OnTooltipIconClick,
                icon: key.clone(),
            }))
            .on_move(FigureEventAction::ActivateTooltipIcon(key)),
        );
        flow.advance(icon_width(icon, measurer));
    }
}

fn layout_title<M: TextMeasurer + ?Sized>(
    flow: &mut TooltipFlow,
    target: &TooltipTarget<'_>,
    text: String,
    styles: &TooltipTextStyles,
    measurer: &M,
    figures: &mut Vec<Figure>,
) {
    let font = Font::new(styles.size, styles.family.clone(), styles.weight.clone());
    let text_width = measurer.measure_text(&text, &font);
    let height = styles.margin_top + styles.size + styles.margin_bottom;
    flow.break_if_needed(styles.margin_left + text_width + styles.margin_right, height);

    let origin = flow.cursor();
    let mut style = tooltip_text_style(styles, styles.color.clone());
    let (mut x, mut y) = (origin.x + styles.margin_left, origin.y + styles.margin_top);
    if target.is_title_active() {
        style.style = PolygonType::Stroke;
        style.border_color = StyleValue::Static(Color::BLACK);
        style.border_size = 1.0;
        style.border_radius = ACTIVE_TITLE_BORDER_RADIUS;
        style.padding_left = ACTIVE_TITLE_PADDING_LEFT;
        style.padding_top = ACTIVE_TITLE_PADDING_TOP;
        style.padding_right = ACTIVE_TITLE_PADDING_RIGHT;
        style.padding_bottom = ACTIVE_TITLE_PADDING_BOTTOM;
        x -= ACTIVE_TITLE_PADDING_LEFT;
        y -= ACTIVE_TITLE_PADDING_TOP;
    }
    figures.push(
        Figure::text(vec![TextAttrs::new(x, y, text)], style)
            .on_move(FigureEventAction::ActivateTooltipTitle(target.title_key())),
    );
    flow.advance(styles.margin_left + text_width + styles.margin_right);
}

fn layout_legends<M: TextMeasurer + ?Sized>(
    flow: &mut TooltipFlow,
    legends: &[TooltipLegend],
    styles: &TooltipTextStyles,
    measurer: &M,
    figures: &mut Vec<Figure>,
) {
    let font = Font::new(styles.size, styles.family.clone(), styles.weight.clone());
    let height = styles.margin_top + styles.size + styles.margin_bottom;
    for legend in legends {
        let title_width = measurer.measure_text(&legend.title.text, &font);
        let value_width = measurer.measure_text(&legend.value.text, &font);
        let width = styles.margin_left + title_width + value_width + styles.margin_right;
        flow.break_if_needed(width, height);

        let origin = flow.cursor();
        let x = origin.x + styles.margin_left;
        let y = origin.y + styles.margin_top;
        if !legend.title.text.is_empty() {
            figures.push(Figure::text(
                vec![TextAttrs::new(x, y, legend.title.text.clone())],
                tooltip_text_style(styles, legend_color(&legend.title, styles)),
            ));
        }
        figures.push(Figure::text(
            vec![TextAttrs::new(x + title_width, y, legend.value.text.clone())],
            tooltip_text_style(styles, legend_color(&legend.value, styles)),
        ));
        flow.advance(width);
    }
}

/// Lays out one indicator's tooltip row(s) into figures, advancing `flow`.
///
/// Returns no figures when the data has neither a name nor legends.
pub fn layout_indicator_tooltip<M: TextMeasurer + ?Sized>(
    flow: &mut TooltipFlow,
    target: &TooltipTarget<'_>,
    data: &IndicatorTooltipData,
    styles: &IndicatorTooltipStyles,
    measurer: &M,
) -> Vec<Figure> {
    let mut figures = Vec::new();
    if !data.has_content() {
        return figures;
    }
    let at = |position: TooltipIconPosition| {
        data.icons.iter().filter(move |icon| icon.position == position)
    };

    layout_icons(flow, target, at(TooltipIconPosition::Left), measurer, &mut figures);
    if !data.name.is_empty() {
        let text = format!("{}{}", data.name, data.calc_params_text);
        layout_title(flow, target, text, &styles.text, measurer, &mut figures);
    }
    layout_icons(flow, target, at(TooltipIconPosition::Middle), measurer, &mut figures);
    layout_legends(flow, &data.legends, &styles.text, measurer, &mut figures);
    layout_icons(flow, target, at(TooltipIconPosition::Right), measurer, &mut figures);
    figures
}

/// Tooltip rows of every indicator attached to the pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorTooltipView;

impl View for IndicatorTooltipView {
    fn layer(&self) -> Layer {
        Layer::Overlay
    }

    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let crosshair = store.crosshair();
        let styles = &store.styles().indicator.tooltip;
        if crosshair.kline_data.is_none() || !should_draw_tooltip(crosshair, styles) {
            return;
        }

        let left = styles.offset_left;
        let max_width = ctx.bounding.width - styles.offset_right;
        let mut top = styles.offset_top;
        let active_icon = store.active_tooltip_icon();
        let active_title = store.active_tooltip_title();

        for indicator in store.indicators_by_pane_id(ctx.pane_id) {
            let data = build_tooltip_data(indicator, store, ctx.bounding, ctx.x_axis, ctx.y_axis);
            if !data.has_content() {
                continue;
            }
            let target = TooltipTarget {
                pane_id: ctx.pane_id,
                indicator_name: &indicator.name,
                active_icon,
                active_title,
            };
            let mut flow = TooltipFlow::new(left, top, max_width);
            let figures = layout_indicator_tooltip(&mut flow, &target, &data, styles, &*ctx.surface);
            top = flow.bottom();
            for figure in figures {
                ctx.draw_figure(figure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::{
        IndicatorTooltipData, TooltipLegend, TooltipTarget, build_tooltip_data,
        layout_indicator_tooltip, numeric_legend_text,
    };
    use crate::api::indicator::{CustomTooltipData, CustomTooltipLegend, Indicator, IndicatorFigure};
    use crate::api::store::{ChartStore, MemoryStore};
    use crate::api::styles::{IndicatorTooltipStyles, TooltipIconPosition, TooltipIconStyles};
    use crate::core::{Axis, AxisDescriptor, AxisName, AxisOptions, Bounding, KLineData, PaneId};
    use crate::interaction::{Crosshair, FigureEventAction, TooltipIconKey, TooltipTitleKey};
    use crate::render::figure::FigureAttrs;
    use crate::render::{EstimatedTextMeasurer, PolygonType};
    use crate::view::TooltipFlow;

    fn target<'a>(
        active_icon: Option<&'a TooltipIconKey>,
        active_title: Option<&'a TooltipTitleKey>,
    ) -> TooltipTarget<'a> {
        TooltipTarget {
            pane_id: PaneId::Candle,
            indicator_name: "MA",
            active_icon,
            active_title,
        }
    }

    fn icon(id: &str, position: TooltipIconPosition) -> TooltipIconStyles {
        TooltipIconStyles {
            id: id.to_owned(),
            position,
            icon: "X".to_owned(),
            ..TooltipIconStyles::default()
        }
    }

    fn first_text(figure: &crate::render::figure::Figure) -> (&str, f64, f64) {
        let FigureAttrs::Text(items) = &figure.attrs else {
            panic!("expected a text figure");
        };
        (items[0].text.as_str(), items[0].x, items[0].y)
    }

    fn store_with_ma(value: f64) -> MemoryStore {
        let bar = KLineData::new(0, 1.0, 2.0, 0.5, 1.5).expect("bar");
        let mut store = MemoryStore::new(vec![bar]);
        let row: IndexMap<String, f64> = [("ma5".to_owned(), value)].into_iter().collect();
        store.add_indicator(
            PaneId::Candle,
            Indicator::new("MA")
                .with_calc_params(vec![5.0])
                .with_precision(2)
                .with_figure(IndicatorFigure::line("ma5", "MA5: "))
                .with_result(vec![row]),
        );
        store
    }

    fn axes() -> (Axis, Axis) {
        (
            Axis::new(AxisDescriptor::index(), AxisOptions::bottom()),
            Axis::new(AxisDescriptor::value(AxisName::Normal), AxisOptions::default()),
        )
    }

    #[test]
    fn standard_legends_are_formatted() {
        let store = store_with_ma(12345.678);
        let (x_axis, y_axis) = axes();
        let indicator = &store.indicators_by_pane_id(PaneId::Candle)[0];
        let data = build_tooltip_data(indicator, &store, Bounding::default(), &x_axis, &y_axis);
        assert_eq!(data.name, "MA");
        assert_eq!(data.calc_params_text, "(5)");
        assert_eq!(data.legends.len(), 1);
        assert_eq!(data.legends[0].title.text, "MA5: ");
        assert_eq!(data.legends[0].value.text, "12,345.68");
    }

    #[test]
    fn hidden_indicator_keeps_name_but_drops_legends() {
        let mut store = store_with_ma(1.0);
        if let Some(list) = store.indicators_mut(PaneId::Candle) {
            list[0].visible = false;
        }
        let (x_axis, y_axis) = axes();
        let indicator = &store.indicators_by_pane_id(PaneId::Candle)[0];
        let data = build_tooltip_data(indicator, &store, Bounding::default(), &x_axis, &y_axis);
        assert!(data.legends.is_empty());
        assert!(data.has_content());
    }

    #[test]
    fn custom_source_overrides_standard_fields() {
        let mut store = store_with_ma(1.0);
        if let Some(list) = store.indicators_mut(PaneId::Candle) {
            let indicator = list.remove(0).with_tooltip_data_source(|_| CustomTooltipData {
                name: Some("Custom".to_owned()),
                calc_params_text: None,
                legends: Some(vec![CustomTooltipLegend {
                    title: "T: ".into(),
                    value: "1234567".into(),
                }]),
                icons: None,
            });
            list.push(indicator);
        }
        let (x_axis, y_axis) = axes();
        let indicator = &store.indicators_by_pane_id(PaneId::Candle)[0];
        let data = build_tooltip_data(indicator, &store, Bounding::default(), &x_axis, &y_axis);
        assert_eq!(data.name, "Custom");
        assert_eq!(data.calc_params_text, "(5)");
        assert_eq!(data.legends.len(), 1);
        assert_eq!(data.legends[0].value.text, "1,234,567");
        assert!(data.legends[0].value.color.is_none());
    }

    #[test]
    fn padded_custom_values_are_formatted_and_blank_ones_kept() {
        let mut store = store_with_ma(1.0);
        if let Some(list) = store.indicators_mut(PaneId::Candle) {
            let indicator = list.remove(0).with_tooltip_data_source(|_| CustomTooltipData {
                name: None,
                calc_params_text: None,
                legends: Some(vec![
                    CustomTooltipLegend {
                        title: "A: ".into(),
                        value: " 1234567 ".into(),
                    },
                    CustomTooltipLegend {
                        title: "B: ".into(),
                        value: "".into(),
                    },
                ]),
                icons: None,
            });
            list.push(indicator);
        }
        let (x_axis, y_axis) = axes();
        let indicator = &store.indicators_by_pane_id(PaneId::Candle)[0];
        let data = build_tooltip_data(indicator, &store, Bounding::default(), &x_axis, &y_axis);
        assert_eq!(data.legends[0].value.text, "1,234,567");
        assert_eq!(data.legends[1].value.text, "");
    }

    #[test]
    fn custom_legend_numbers_are_trimmed_and_finite() {
        assert_eq!(numeric_legend_text("  1234.5 "), Some("1234.5"));
        assert_eq!(numeric_legend_text("-0.25"), Some("-0.25"));
        assert_eq!(numeric_legend_text(""), None);
        assert_eq!(numeric_legend_text("   "), None);
        assert_eq!(numeric_legend_text("NaN"), None);
        assert_eq!(numeric_legend_text("inf"), None);
        assert_eq!(numeric_legend_text("12 apples"), None);
    }

    #[test]
    fn missing_value_uses_default_text() {
        let store = {
            let mut store = store_with_ma(f64::NAN);
            store.set_crosshair(Crosshair {
                data_index: Some(0),
                ..Crosshair::default()
            });
            store
        };
        let (x_axis, y_axis) = axes();
        let indicator = &store.indicators_by_pane_id(PaneId::Candle)[0];
        let data = build_tooltip_data(indicator, &store, Bounding::default(), &x_axis, &y_axis);
        assert_eq!(data.legends[0].value.text, "n/a");
    }

    #[test]
    fn items_follow_icon_title_legend_order() {
        let data = IndicatorTooltipData {
            name: "MA".to_owned(),
            calc_params_text: "(5)".to_owned(),
            legends: vec![TooltipLegend {
                title: "MA5: ".into(),
                value: "1.00".into(),
            }],
            icons: vec![
                icon("right", TooltipIconPosition::Right),
                icon("left", TooltipIconPosition::Left),
                icon("middle", TooltipIconPosition::Middle),
            ],
        };
        let mut flow = TooltipFlow::new(0.0, 0.0, 1000.0);
        let figures = layout_indicator_tooltip(
            &mut flow,
            &target(None, None),
            &data,
            &IndicatorTooltipStyles::default(),
            &EstimatedTextMeasurer::default(),
        );
        let texts: Vec<&str> = figures.iter().map(|figure| first_text(figure).0).collect();
        assert_eq!(texts, vec!["X", "MA(5)", "X", "MA5: ", "1.00", "X"]);
        let xs: Vec<f64> = figures.iter().map(|figure| first_text(figure).1).collect();
        assert!(xs.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(matches!(
            figures[0].handlers.on_move,
            Some(FigureEventAction::ActivateTooltipIcon(ref key)) if key.icon_id == "left"
        ));
    }

    #[test]
    fn narrow_width_wraps_legends() {
        let data = IndicatorTooltipData {
            name: String::new(),
            calc_params_text: String::new(),
            legends: (0..3)
                .map(|_| TooltipLegend {
                    title: "A: ".into(),
                    value: "1".into(),
                })
                .collect(),
            icons: Vec::new(),
        };
        let styles = IndicatorTooltipStyles::default();
        let mut flow = TooltipFlow::new(0.0, 0.0, 60.0);
        let figures = layout_indicator_tooltip(
            &mut flow,
            &target(None, None),
            &data,
            &styles,
            &EstimatedTextMeasurer::default(),
        );
        let row_height = styles.text.margin_top + styles.text.size + styles.text.margin_bottom;
        let ys: Vec<f64> = figures
            .iter()
            .step_by(2)
            .map(|figure| first_text(figure).2)
            .collect();
        assert_eq!(ys[0], styles.text.margin_top);
        assert_eq!(ys[1], styles.text.margin_top + row_height);
        assert_eq!(flow.bottom(), 3.0 * row_height);
    }

    #[test]
    fn active_title_gets_stroke_box() {
        let data = IndicatorTooltipData {
            name: "MA".to_owned(),
            ..IndicatorTooltipData::default()
        };
        let title_key = TooltipTitleKey::new(PaneId::Candle, "MA");
        let styles = IndicatorTooltipStyles::default();
        let mut flow = TooltipFlow::new(0.0, 0.0, 500.0);
        let figures = layout_indicator_tooltip(
            &mut flow,
            &target(None, Some(&title_key)),
            &data,
            &styles,
            &EstimatedTextMeasurer::default(),
        );
        assert_eq!(figures.len(), 1);
        let crate::render::figure::FigureStyles::Text(style) = &figures[0].styles else {
            panic!("expected text style");
        };
        assert_eq!(style.style, PolygonType::Stroke);
        let (_, x, y) = first_text(&figures[0]);
        assert_eq!(x, styles.text.margin_left - 4.0);
        assert_eq!(y, styles.text.margin_top - 6.0);
    }

    #[test]
    fn icons_alone_draw_nothing() {
        let data = IndicatorTooltipData {
            icons: vec![icon("a", TooltipIconPosition::Left)],
            ..IndicatorTooltipData::default()
        };
        let mut flow = TooltipFlow::new(0.0, 0.0, 500.0);
        let figures = layout_indicator_tooltip(
            &mut flow,
            &target(None, None),
            &data,
            &IndicatorTooltipStyles::default(),
            &EstimatedTextMeasurer::default(),
        );
        assert!(figures.is_empty());
        assert_eq!(flow.bottom(), 0.0);
    }
}
