use crate::api::styles::AxisStyles;
use crate::core::{Axis, Coordinate};
use crate::render::figure::{Figure, LineAttrs, LineStyle, TextAttrs};
use crate::render::{TextAlign, TextBaseline};

use super::{View, ViewContext};

/// Which axis of the pane a view draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    /// The pane's value axis.
    Right,
    /// The pane's secondary value axis.
    Left,
    /// The chart-wide index axis.
    Bottom,
}

impl AxisSide {
    pub(crate) fn axis<'a>(self, ctx: &ViewContext<'a>) -> &'a Axis {
        match self {
            Self::Right => ctx.y_axis,
            Self::Left => ctx.left_axis,
            Self::Bottom => ctx.x_axis,
        }
    }

    pub(crate) fn styles<'a>(self, ctx: &ViewContext<'a>) -> &'a AxisStyles {
        let styles = ctx.store.styles();
        match self {
            Self::Right | Self::Left => &styles.y_axis,
            Self::Bottom => &styles.x_axis,
        }
    }
}

/// Axis line, tick lines and tick labels.
#[derive(Debug, Clone, Copy)]
pub struct AxisView {
    side: AxisSide,
}

impl AxisView {
    #[must_use]
    pub const fn new(side: AxisSide) -> Self {
        Self { side }
    }

    fn draw_vertical(&self, ctx: &mut ViewContext<'_>, axis: &Axis, styles: &AxisStyles) {
        let width = ctx.bounding.width;
        let height = ctx.bounding.height;
        let from_zero = axis.is_from_zero();
        let axis_line_size = if styles.axis_line.show {
            styles.axis_line.size
        } else {
            0.0
        };
        let tick_length = if styles.tick_line.show {
            styles.tick_line.length
        } else {
            0.0
        };

        if styles.axis_line.show {
            let x = if from_zero { 0.0 } else { width - axis_line_size };
            ctx.draw_figure(Figure::line(
                vec![LineAttrs::segment(Coordinate::new(x, 0.0), Coordinate::new(x, height))],
                LineStyle {
                    color: styles.axis_line.color.into(),
                    size: axis_line_size,
                    ..LineStyle::default()
                },
            ));
        }

        if styles.tick_line.show {
            let (start_x, end_x) = if from_zero {
                (axis_line_size, axis_line_size + tick_length)
            } else {
                (width - axis_line_size, width - axis_line_size - tick_length)
            };
            let lines = axis
                .ticks()
                .iter()
                .map(|tick| {
                    LineAttrs::segment(
                        Coordinate::new(start_x, tick.coord),
                        Coordinate::new(end_x, tick.coord),
                    )
                })
                .collect();
            ctx.draw_figure(Figure::line(
                lines,
                LineStyle {
                    color: styles.tick_line.color.into(),
                    size: styles.tick_line.size,
                    ..LineStyle::default()
                },
            ));
        }

        if styles.tick_text.show {
            let text = &styles.tick_text;
            let (x, align) = if from_zero {
                (
                    text.margin_start + axis_line_size + tick_length,
                    TextAlign::Left,
                )
            } else {
                (
                    width - text.margin_end - axis_line_size - tick_length,
                    TextAlign::Right,
                )
            };
            let items = axis
                .ticks()
                .iter()
                .map(|tick| {
                    TextAttrs::new(x, tick.coord, tick.text.clone())
                        .aligned(align, TextBaseline::Middle)
                })
                .collect();
            ctx.draw_figure(Figure::text(items, text.to_text_style()));
        }
    }

    fn draw_horizontal(&self, ctx: &mut ViewContext<'_>, axis: &Axis, styles: &AxisStyles) {
        let width = ctx.bounding.width;
        let height = ctx.bounding.height;
        let from_zero = axis.is_from_zero();
        let axis_line_size = if styles.axis_line.show {
            styles.axis_line.size
        } else {
            0.0
        };
        let tick_length = if styles.tick_line.show {
            styles.tick_line.length
        } else {
            0.0
        };

        if styles.axis_line.show {
            let y = if from_zero { 0.0 } else { height - axis_line_size };
            ctx.draw_figure(Figure::line(
                vec![LineAttrs::segment(Coordinate::new(0.0, y), Coordinate::new(width, y))],
                LineStyle {
                    color: styles.axis_line.color.into(),
                    size: axis_line_size,
                    ..LineStyle::default()
                },
            ));
        }

        if styles.tick_line.show {
            let (start_y, end_y) = if from_zero {
                (axis_line_size, axis_line_size + tick_length)
            } else {
                (height - axis_line_size, height - axis_line_size - tick_length)
            };
            let lines = axis
                .ticks()
                .iter()
                .map(|tick| {
                    LineAttrs::segment(
                        Coordinate::new(tick.coord, start_y),
                        Coordinate::new(tick.coord, end_y),
                    )
                })
                .collect();
            ctx.draw_figure(Figure::line(
                lines,
                LineStyle {
                    color: styles.tick_line.color.into(),
                    size: styles.tick_line.size,
                    ..LineStyle::default()
                },
            ));
        }

        if styles.tick_text.show {
            let text = &styles.tick_text;
            let (y, baseline) = if from_zero {
                (
                    text.margin_start + axis_line_size + tick_length,
                    TextBaseline::Top,
                )
            } else {
                (
                    height - text.margin_end - axis_line_size - tick_length,
                    TextBaseline::Bottom,
                )
            };
            let items = axis
                .ticks()
                .iter()
                .map(|tick| {
                    TextAttrs::new(tick.coord, y, tick.text.clone())
                        .aligned(TextAlign::Center, baseline)
                })
                .collect();
            ctx.draw_figure(Figure::text(items, text.to_text_style()));
        }
    }
}

impl View for AxisView {
    fn draw_imp(&self, ctx: &mut ViewContext<'_>) {
        let axis = self.side.axis(ctx);
        let styles = self.side.styles(ctx);
        if !styles.show || !axis.options().show {
            return;
        }
        if axis.is_vertical() {
            self.draw_vertical(ctx, axis, styles);
        } else {
            self.draw_horizontal(ctx, axis, styles);
        }
    }
}

/// Thickness an axis needs to fit its labels, tick lines and axis line.
pub(crate) fn axis_extent_for_labels(styles: &AxisStyles, label_extent: f64) -> f64 {
    if !styles.show {
        return 0.0;
    }
    let mut extent = 0.0;
    if styles.axis_line.show {
        extent += styles.axis_line.size;
    }
    if styles.tick_line.show {
        extent += styles.tick_line.length;
    }
    if styles.tick_text.show {
        extent += styles.tick_text.margin_start + label_extent + styles.tick_text.margin_end;
    }
    extent.ceil()
}
