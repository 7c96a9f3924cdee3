use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;

use super::primitives::{Color, Font};
use super::surface::{DrawingSurface, EstimatedTextMeasurer, RectShape, Stroke, TextMeasurer};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    ClipRect(RectShape),
    FillRect {
        rect: RectShape,
        radius: f64,
        color: Color,
    },
    StrokeRect {
        rect: RectShape,
        radius: f64,
        stroke: Stroke,
    },
    FillPolygon {
        points: Vec<Coordinate>,
        color: Color,
    },
    StrokePolygon {
        points: Vec<Coordinate>,
        stroke: Stroke,
    },
    StrokeLine {
        points: Vec<Coordinate>,
        stroke: Stroke,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: Font,
        color: Color,
        max_width: Option<f64>,
    },
}

impl DrawCommand {
    pub fn apply(&self, surface: &mut dyn DrawingSurface) {
        match self {
            Self::Save => surface.save(),
            Self::Restore => surface.restore(),
            Self::Translate { dx, dy } => surface.translate(*dx, *dy),
            Self::Scale { sx, sy } => surface.scale(*sx, *sy),
            Self::ClipRect(rect) => surface.clip_rect(*rect),
            Self::FillRect {
                rect,
                radius,
                color,
            } => surface.fill_rect(*rect, *radius, *color),
            Self::StrokeRect {
                rect,
                radius,
                stroke,
            } => surface.stroke_rect(*rect, *radius, stroke),
            Self::FillPolygon { points, color } => surface.fill_polygon(points, *color),
            Self::StrokePolygon { points, stroke } => surface.stroke_polygon(points, stroke),
            Self::StrokeLine { points, stroke } => surface.stroke_line(points, stroke),
            Self::FillText {
                text,
                x,
                y,
                font,
                color,
                max_width,
            } => surface.fill_text(text, *x, *y, font, *color, *max_width),
        }
    }
}

/// Recorded drawing with its logical size; the off-screen image of a widget,
/// a pane or the whole chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Picture {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    commands: Vec<DrawCommand>,
}

impl Picture {
    #[must_use]
    pub fn empty(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Plays every command onto `surface` in the surface's current frame.
    pub fn replay(&self, surface: &mut dyn DrawingSurface) {
        for command in &self.commands {
            command.apply(surface);
        }
    }

    /// Plays the picture with its origin at `(x, y)`, clipped to its size.
    pub fn draw_at(&self, surface: &mut dyn DrawingSurface, x: f64, y: f64) {
        if self.commands.is_empty() {
            return;
        }
        surface.save();
        surface.translate(x, y);
        surface.clip_rect(RectShape::new(0.0, 0.0, self.width, self.height));
        self.replay(surface);
        surface.restore();
    }

    /// Text items in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Headless surface that records every call into a `Picture`.
pub struct RecordingSurface {
    measurer: Rc<dyn TextMeasurer>,
    picture: Picture,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self::with_measurer(width, height, pixel_ratio, Rc::new(EstimatedTextMeasurer::default()))
    }

    #[must_use]
    pub fn with_measurer(
        width: f64,
        height: f64,
        pixel_ratio: f64,
        measurer: Rc<dyn TextMeasurer>,
    ) -> Self {
        Self {
            measurer,
            picture: Picture::empty(width, height, pixel_ratio),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        self.picture.commands()
    }

    #[must_use]
    pub fn finish(self) -> Picture {
        self.picture
    }

    fn push(&mut self, command: DrawCommand) {
        self.picture.commands.push(command);
    }
}

impl std::fmt::Debug for RecordingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("picture", &self.picture)
            .finish_non_exhaustive()
    }
}

impl TextMeasurer for RecordingSurface {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        self.measurer.measure_text(text, font)
    }
}

impl DrawingSurface for RecordingSurface {
    fn pixel_ratio(&self) -> f64 {
        self.picture.pixel_ratio
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.push(DrawCommand::Scale { sx, sy });
    }

    fn clip_rect(&mut self, rect: RectShape) {
        self.push(DrawCommand::ClipRect(rect));
    }

    fn fill_rect(&mut self, rect: RectShape, radius: f64, color: Color) {
        self.push(DrawCommand::FillRect {
            rect,
            radius,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: RectShape, radius: f64, stroke: &Stroke) {
        self.push(DrawCommand::StrokeRect {
            rect,
            radius,
            stroke: stroke.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Coordinate], color: Color) {
        self.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Coordinate], stroke: &Stroke) {
        self.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn stroke_line(&mut self, points: &[Coordinate], stroke: &Stroke) {
        self.push(DrawCommand::StrokeLine {
            points: points.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &Font,
        color: Color,
        max_width: Option<f64>,
    ) {
        self.push(DrawCommand::FillText {
            text: text.to_owned(),
            x,
            y,
            font: font.clone(),
            color,
            max_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, RecordingSurface};
    use crate::render::{Color, DrawingSurface, Font, RectShape};

    #[test]
    fn draw_at_wraps_commands_in_translated_clip() {
        let mut inner = RecordingSurface::new(50.0, 20.0, 1.0);
        inner.fill_rect(RectShape::new(0.0, 0.0, 10.0, 10.0), 0.0, Color::BLACK);
        let picture = inner.finish();

        let mut outer = RecordingSurface::new(100.0, 100.0, 1.0);
        picture.draw_at(&mut outer, 30.0, 40.0);
        let commands = outer.commands();
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], DrawCommand::Save);
        assert_eq!(commands[1], DrawCommand::Translate { dx: 30.0, dy: 40.0 });
        assert_eq!(
            commands[2],
            DrawCommand::ClipRect(RectShape::new(0.0, 0.0, 50.0, 20.0))
        );
        assert_eq!(commands[4], DrawCommand::Restore);
    }

    #[test]
    fn empty_picture_draws_nothing() {
        let picture = RecordingSurface::new(10.0, 10.0, 1.0).finish();
        let mut outer = RecordingSurface::new(10.0, 10.0, 1.0);
        picture.draw_at(&mut outer, 0.0, 0.0);
        assert!(outer.commands().is_empty());
    }

    #[test]
    fn texts_lists_painted_labels() {
        let mut surface = RecordingSurface::new(10.0, 10.0, 2.0);
        surface.fill_text("A", 0.0, 0.0, &Font::default(), Color::BLACK, None);
        surface.fill_text("B", 0.0, 0.0, &Font::default(), Color::BLACK, Some(4.0));
        let picture = surface.finish();
        assert_eq!(picture.texts().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(picture.pixel_ratio, 2.0);
    }
}
