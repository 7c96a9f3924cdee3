use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::api::styles::{IndicatorStyles, TooltipIconStyles};
use crate::core::{Axis, Bounding};
use crate::interaction::Crosshair;
use crate::render::Color;

/// One calculation result row, keyed by figure key.
pub type IndicatorRow = IndexMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorFigureKind {
    Line,
    Bar,
}

/// One plotted output of an indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFigure {
    pub key: String,
    /// Legend title; figures without one stay out of the tooltip.
    pub title: Option<String>,
    pub kind: IndicatorFigureKind,
    pub color: Option<Color>,
}

impl IndicatorFigure {
    #[must_use]
    pub fn line(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: Some(title.into()),
            kind: IndicatorFigureKind::Line,
            color: None,
        }
    }

    #[must_use]
    pub fn bar(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: Some(title.into()),
            kind: IndicatorFigureKind::Bar,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Text plus optional color of one side of a tooltip legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendText {
    pub text: String,
    /// `None` falls back to the tooltip text color.
    pub color: Option<Color>,
}

impl LegendText {
    #[must_use]
    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

impl From<&str> for LegendText {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            color: None,
        }
    }
}

impl From<String> for LegendText {
    fn from(text: String) -> Self {
        Self { text, color: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomTooltipLegend {
    pub title: LegendText,
    pub value: LegendText,
}

/// Override returned by an indicator's tooltip data source; every present
/// field replaces the standard one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomTooltipData {
    pub name: Option<String>,
    pub calc_params_text: Option<String>,
    pub legends: Option<Vec<CustomTooltipLegend>>,
    pub icons: Option<Vec<TooltipIconStyles>>,
}

/// Read-only state handed to a tooltip data source.
#[derive(Debug, Clone, Copy)]
pub struct TooltipDataSourceContext<'a> {
    pub indicator: &'a Indicator,
    pub crosshair: &'a Crosshair,
    pub bounding: Bounding,
    pub x_axis: &'a Axis,
    pub y_axis: &'a Axis,
}

pub type TooltipDataSource = Rc<dyn Fn(&TooltipDataSourceContext<'_>) -> CustomTooltipData>;

/// Calculated indicator as consumed by the drawing pipeline.
///
/// The calculation itself happens elsewhere; `result` holds one row per bar.
#[derive(Clone)]
pub struct Indicator {
    pub name: String,
    pub short_name: String,
    pub calc_params: Vec<f64>,
    pub precision: u32,
    pub visible: bool,
    pub should_format_big_number: bool,
    pub figures: Vec<IndicatorFigure>,
    pub result: Vec<IndicatorRow>,
    pub tooltip_data_source: Option<TooltipDataSource>,
}

impl fmt::Debug for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indicator")
            .field("name", &self.name)
            .field("short_name", &self.short_name)
            .field("calc_params", &self.calc_params)
            .field("precision", &self.precision)
            .field("visible", &self.visible)
            .field("figures", &self.figures)
            .field("rows", &self.result.len())
            .field("custom_tooltip", &self.tooltip_data_source.is_some())
            .finish()
    }
}

impl Indicator {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            short_name: name.clone(),
            name,
            calc_params: Vec::new(),
            precision: 4,
            visible: true,
            should_format_big_number: false,
            figures: Vec::new(),
            result: Vec::new(),
            tooltip_data_source: None,
        }
    }

    #[must_use]
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    #[must_use]
    pub fn with_calc_params(mut self, calc_params: Vec<f64>) -> Self {
        self.calc_params = calc_params;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_figure(mut self, figure: IndicatorFigure) -> Self {
        self.figures.push(figure);
        self
    }

    #[must_use]
    pub fn with_result(mut self, result: Vec<IndicatorRow>) -> Self {
        self.result = result;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_big_number_format(mut self, enabled: bool) -> Self {
        self.should_format_big_number = enabled;
        self
    }

    #[must_use]
    pub fn with_tooltip_data_source(
        mut self,
        source: impl Fn(&TooltipDataSourceContext<'_>) -> CustomTooltipData + 'static,
    ) -> Self {
        self.tooltip_data_source = Some(Rc::new(source));
        self
    }

    /// `(a,b)` text of the calculation parameters, empty without parameters.
    #[must_use]
    pub fn calc_params_text(&self) -> String {
        if self.calc_params.is_empty() {
            return String::new();
        }
        let params: Vec<String> = self.calc_params.iter().map(f64::to_string).collect();
        format!("({})", params.join(","))
    }

    /// Row at `index`, falling back to the previous row.
    #[must_use]
    pub fn row_at(&self, index: usize) -> Option<&IndicatorRow> {
        self.result
            .get(index)
            .or_else(|| index.checked_sub(1).and_then(|prev| self.result.get(prev)))
    }

    /// Finite `(min, max)` over every figure value in `[from, to)`.
    #[must_use]
    pub fn value_extent(&self, from: usize, to: usize) -> Option<(f64, f64)> {
        if !self.visible {
            return None;
        }
        let mut extent: Option<(f64, f64)> = None;
        for row in self.result.iter().take(to).skip(from) {
            for figure in &self.figures {
                let Some(value) = row.get(&figure.key).copied().filter(|v| v.is_finite()) else {
                    continue;
                };
                extent = Some(match extent {
                    Some((min, max)) => (min.min(value), max.max(value)),
                    None => (value, value),
                });
            }
        }
        extent
    }

    /// Color of the figure at `figure_index` given its current value.
    #[must_use]
    pub fn figure_color(&self, figure_index: usize, value: Option<f64>, styles: &IndicatorStyles) -> Color {
        let Some(figure) = self.figures.get(figure_index) else {
            return styles.no_change_color;
        };
        if let Some(color) = figure.color {
            return color;
        }
        match figure.kind {
            IndicatorFigureKind::Line => {
                let line_index = self.figures[..figure_index]
                    .iter()
                    .filter(|figure| figure.kind == IndicatorFigureKind::Line)
                    .count();
                if styles.lines.is_empty() {
                    styles.no_change_color
                } else {
                    styles.lines[line_index % styles.lines.len()].color
                }
            }
            IndicatorFigureKind::Bar => match value {
                Some(value) if value > 0.0 => styles.up_color,
                Some(value) if value < 0.0 => styles.down_color,
                _ => styles.no_change_color,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::{Indicator, IndicatorFigure};
    use crate::api::styles::IndicatorStyles;

    fn row(pairs: &[(&str, f64)]) -> IndexMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[test]
    fn calc_params_text_joins_with_commas() {
        let indicator = Indicator::new("MA").with_calc_params(vec![5.0, 10.0, 2.5]);
        assert_eq!(indicator.calc_params_text(), "(5,10,2.5)");
        assert_eq!(Indicator::new("VOL").calc_params_text(), "");
    }

    #[test]
    fn row_lookup_falls_back_to_previous() {
        let indicator = Indicator::new("MA").with_result(vec![row(&[("ma5", 1.0)])]);
        assert!(indicator.row_at(0).is_some());
        assert_eq!(indicator.row_at(1), indicator.row_at(0));
        assert!(indicator.row_at(2).is_none());
    }

    #[test]
    fn line_colors_cycle_through_palette() {
        let styles = IndicatorStyles::default();
        let indicator = Indicator::new("MA")
            .with_figure(IndicatorFigure::line("ma5", "MA5: "))
            .with_figure(IndicatorFigure::bar("vol", "VOL: "))
            .with_figure(IndicatorFigure::line("ma10", "MA10: "));
        assert_eq!(indicator.figure_color(0, None, &styles), styles.lines[0].color);
        assert_eq!(indicator.figure_color(2, None, &styles), styles.lines[1].color);
        assert_eq!(indicator.figure_color(1, Some(-1.0), &styles), styles.down_color);
    }

    #[test]
    fn value_extent_skips_missing_values() {
        let indicator = Indicator::new("MA")
            .with_figure(IndicatorFigure::line("a", "A"))
            .with_figure(IndicatorFigure::line("b", "B"))
            .with_result(vec![
                row(&[("a", 1.0)]),
                row(&[("a", 3.0), ("b", -2.0)]),
                row(&[("b", 9.0)]),
            ]);
        assert_eq!(indicator.value_extent(0, 2), Some((-2.0, 3.0)));
        assert_eq!(indicator.value_extent(5, 9), None);
    }
}
