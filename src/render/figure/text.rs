use smallvec::SmallVec;

use crate::api::store::ChartStore;
use crate::api::styles::StyleValue;
use crate::core::Coordinate;
use crate::render::primitives::{Color, Font, LineType, PolygonType, TextAlign, TextBaseline};
use crate::render::surface::{DrawingSurface, RectShape, Stroke, TextMeasurer};

use super::{FIGURE_TEXT, FigureAttrs, FigureStyles, FigureTemplate};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextAttrs {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Overrides the measured box width.
    pub width: Option<f64>,
    /// Overrides the measured box height.
    pub height: Option<f64>,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextAttrs {
    #[must_use]
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn aligned(mut self, align: TextAlign, baseline: TextBaseline) -> Self {
        self.align = align;
        self.baseline = baseline;
        self
    }
}

/// Style of a text batch; `color` and `background_color` resolve per item.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub style: PolygonType,
    pub color: StyleValue<Color>,
    pub size: f64,
    pub family: String,
    pub weight: String,
    pub padding_left: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub border_style: LineType,
    pub border_color: StyleValue<Color>,
    pub border_size: f64,
    pub border_dashed_value: SmallVec<[f64; 4]>,
    pub border_radius: f64,
    pub background_color: StyleValue<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            style: PolygonType::Fill,
            color: StyleValue::Static(Color::BLACK),
            size: 12.0,
            family: Font::default().family,
            weight: "normal".to_owned(),
            padding_left: 0.0,
            padding_top: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
            border_style: LineType::Solid,
            border_color: StyleValue::Static(Color::TRANSPARENT),
            border_size: 0.0,
            border_dashed_value: SmallVec::from_slice(&[2.0, 2.0]),
            border_radius: 0.0,
            background_color: StyleValue::Static(Color::TRANSPARENT),
        }
    }
}

impl TextStyle {
    #[must_use]
    pub fn font(&self) -> Font {
        Font::new(self.size, self.family.clone(), self.weight.clone())
    }
}

/// Box occupied by a text item, shared by painting and hit-testing.
#[must_use]
pub fn get_text_rect<M>(attrs: &TextAttrs, style: &TextStyle, measurer: &M) -> RectShape
where
    M: TextMeasurer + ?Sized,
{
    let width = attrs.width.unwrap_or_else(|| {
        style.padding_left + measurer.measure_text(&attrs.text, &style.font()) + style.padding_right
    });
    let height = attrs
        .height
        .unwrap_or(style.padding_top + style.size + style.padding_bottom);
    RectShape::new(
        attrs.x + attrs.align.offset(width),
        attrs.y + attrs.baseline.offset(height),
        width,
        height,
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFigure;

impl FigureTemplate for TextFigure {
    fn name(&self) -> &str {
        FIGURE_TEXT
    }

    fn check_event_on(
        &self,
        coordinate: Coordinate,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        let (FigureAttrs::Text(items), FigureStyles::Text(style)) = (attrs, styles) else {
            return false;
        };
        items
            .iter()
            .any(|item| get_text_rect(item, style, measurer).contains(coordinate))
    }

    fn draw(
        &self,
        surface: &mut dyn DrawingSurface,
        store: &dyn ChartStore,
        attrs: &FigureAttrs,
        styles: &FigureStyles,
    ) {
        let (FigureAttrs::Text(items), FigureStyles::Text(style)) = (attrs, styles) else {
            return;
        };
        let rects: Vec<RectShape> = items
            .iter()
            .map(|item| get_text_rect(item, style, &*surface))
            .collect();

        for (item, rect) in items.iter().zip(&rects) {
            if style.style != PolygonType::Stroke {
                let background = style.background_color.resolve(&*surface, &item.text, store);
                if !background.is_transparent() {
                    surface.fill_rect(*rect, style.border_radius, background);
                }
            }
            if style.style != PolygonType::Fill && style.border_size > 0.0 {
                let border = style.border_color.resolve(&*surface, &item.text, store);
                let stroke = Stroke::with_line_type(
                    border,
                    style.border_size,
                    style.border_style,
                    &style.border_dashed_value,
                );
                surface.stroke_rect(*rect, style.border_radius, &stroke);
            }
        }

        let font = style.font();
        let horizontal_padding = style.padding_left + style.padding_right;
        for (item, rect) in items.iter().zip(&rects) {
            let color = style.color.resolve(&*surface, &item.text, store);
            surface.fill_text(
                &item.text,
                rect.x + style.padding_left,
                rect.y + style.padding_top,
                &font,
                color,
                Some((rect.width - horizontal_padding).max(0.0)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TextAttrs, TextFigure, TextStyle, get_text_rect};
    use crate::api::store::MemoryStore;
    use crate::api::styles::StyleValue;
    use crate::core::Coordinate;
    use crate::render::figure::{FigureAttrs, FigureStyles, FigureTemplate};
    use crate::render::{
        Color, DrawCommand, EstimatedTextMeasurer, RecordingSurface, TextAlign, TextBaseline,
    };

    #[test]
    fn explicit_size_overrides_measurement() {
        let attrs = TextAttrs {
            width: Some(50.0),
            height: Some(20.0),
            ..TextAttrs::new(10.0, 10.0, "X")
        }
        .aligned(TextAlign::Center, TextBaseline::Middle);
        let rect = get_text_rect(&attrs, &TextStyle::default(), &EstimatedTextMeasurer::default());
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (-15.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn paddings_widen_the_box() {
        let style = TextStyle {
            padding_left: 2.0,
            padding_right: 3.0,
            padding_top: 1.0,
            padding_bottom: 4.0,
            size: 10.0,
            ..TextStyle::default()
        };
        let rect = get_text_rect(
            &TextAttrs::new(0.0, 0.0, "AB"),
            &style,
            &EstimatedTextMeasurer::default(),
        );
        assert_eq!(rect.width, 2.0 + 12.0 + 3.0);
        assert_eq!(rect.height, 15.0);
    }

    #[test]
    fn backgrounds_resolve_per_item_and_paint_before_text() {
        let style = TextStyle {
            background_color: StyleValue::computed(|_, content, _| {
                if content.starts_with('-') {
                    Color::rgb(1.0, 0.0, 0.0)
                } else {
                    Color::rgb(0.0, 1.0, 0.0)
                }
            }),
            ..TextStyle::default()
        };
        let items = vec![TextAttrs::new(0.0, 0.0, "-1.2"), TextAttrs::new(0.0, 20.0, "3.4")];
        let store = MemoryStore::default();
        let mut surface = RecordingSurface::new(100.0, 100.0, 1.0);
        TextFigure.draw(
            &mut surface,
            &store,
            &FigureAttrs::Text(items),
            &FigureStyles::Text(style),
        );

        let commands = surface.commands();
        assert_eq!(commands.len(), 4);
        let DrawCommand::FillRect { color: first, .. } = &commands[0] else {
            panic!("expected background first");
        };
        let DrawCommand::FillRect { color: second, .. } = &commands[1] else {
            panic!("expected second background before any text");
        };
        assert_eq!(*first, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(*second, Color::rgb(0.0, 1.0, 0.0));
        assert!(matches!(commands[2], DrawCommand::FillText { .. }));
        assert!(matches!(commands[3], DrawCommand::FillText { .. }));
    }

    #[test]
    fn hit_test_uses_paint_rect() {
        let attrs = FigureAttrs::Text(vec![
            TextAttrs::new(100.0, 50.0, "ABC").aligned(TextAlign::Right, TextBaseline::Bottom),
        ]);
        let styles = FigureStyles::Text(TextStyle::default());
        let measurer = EstimatedTextMeasurer::default();
        assert!(TextFigure.check_event_on(Coordinate::new(99.0, 49.0), &attrs, &styles, &measurer));
        assert!(!TextFigure.check_event_on(Coordinate::new(101.0, 49.0), &attrs, &styles, &measurer));
    }
}
