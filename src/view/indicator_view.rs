use crate::api::indicator::{Indicator, IndicatorFigureKind};
use crate::api::styles::IndicatorStyles;
use crate::core::{Axis, Coordinate, VisibleRange};
use crate::render::figure::{Figure, LineAttrs, LineStyle, RectAttrs, RectStyle};

use super::{View, ViewContext};

const BAR_WIDTH_RATIO: f64 = 0.6;

/// Plots every visible indicator attached to the pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorView;

impl IndicatorView {
    fn line_figure(
        indicator: &Indicator,
        figure_index: usize,
        range: VisibleRange,
        x_axis: &Axis,
        y_axis: &Axis,
        styles: &IndicatorStyles,
    ) -> Option<Figure> {
        let key = &indicator.figures[figure_index].key;
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for index in range.from..range.to {
            let value = indicator
                .result
                .get(index)
                .and_then(|row| row.get(key).copied())
                .filter(|value| value.is_finite());
            match value {
                Some(value) => current.push(Coordinate::new(
                    x_axis.value_to_pixel(index as f64),
                    y_axis.value_to_pixel(value),
                )),
                None if current.len() > 1 => segments.push(LineAttrs::new(std::mem::take(&mut current))),
                None => current.clear(),
            }
        }
        if current.len() > 1 {
            segments.push(LineAttrs::new(current));
        }
        if segments.is_empty() {
            return None;
        }

        let line_index = indicator.figures[..figure_index]
            .iter()
            .filter(|figure| figure.kind == IndicatorFigureKind::Line)
            .count();
        let palette = styles.lines.get(line_index % styles.lines.len().max(1));
        let color = indicator.figure_color(figure_index, None, styles);
        Some(Figure::line(
            segments,
            LineStyle {
                style: palette.map_or_else(Default::default, |line| line.style),
                color: color.into(),
                size: palette.map_or(1.0, |line| line.size),
                dashed_value: palette
                    .map_or_else(|| LineStyle::default().dashed_value, |line| line.dashed_value.clone()),
            },
        ))
    }

    fn bar_figures(
        indicator: &Indicator,
        figure_index: usize,
        range: VisibleRange,
        x_axis: &Axis,
        y_axis: &Axis,
        styles: &IndicatorStyles,
    ) -> Vec<Figure> {
        let key = &indicator.figures[figure_index].key;
        let width = (x_axis.bar_space() * BAR_WIDTH_RATIO).max(1.0);
        let base = y_axis.value_to_pixel(0.0);
        let mut figures = Vec::new();
        for index in range.from..range.to {
            let Some(value) = indicator
                .result
                .get(index)
                .and_then(|row| row.get(key).copied())
                .filter(|value| value.is_finite())
            else {
                continue;
            };
            let x = x_axis.value_to_pixel(index as f64);
            let y = y_axis.value_to_pixel(value);
            let color = indicator.figure_color(figure_index, Some(value), styles);
            figures.push(Figure::rect(
                vec![RectAttrs::new(x - width / 2.0, y, width, base - y)],
                RectStyle {
                    color: color.into(),
                    ..RectStyle::default()
                },
            ));
        }
        figures
    }
}

impl View for IndicatorView {
    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let store = ctx.store;
        let range = store.visible_range();
        if range.is_empty() {
            return;
        }
        let styles = &store.styles().indicator;
        for indicator in store.indicators_by_pane_id(ctx.pane_id) {
            if !indicator.visible {
                continue;
            }
            for (figure_index, figure) in indicator.figures.iter().enumerate() {
                match figure.kind {
                    IndicatorFigureKind::Line => {
                        if let Some(line) =
                            Self::line_figure(indicator, figure_index, range, ctx.x_axis, ctx.y_axis, styles)
                        {
                            ctx.draw_figure(line);
                        }
                    }
                    IndicatorFigureKind::Bar => {
                        for bar in
                            Self::bar_figures(indicator, figure_index, range, ctx.x_axis, ctx.y_axis, styles)
                        {
                            ctx.draw_figure(bar);
                        }
                    }
                }
            }
        }
    }
}
