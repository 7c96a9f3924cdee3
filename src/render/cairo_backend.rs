use std::f64::consts::{FRAC_PI_2, PI};

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::warn;

use crate::core::Coordinate;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawingSurface, Font, Picture, RectShape, Stroke, TextMeasurer};

/// `DrawingSurface` over a Cairo context with Pango text metrics.
///
/// Works on an owned image surface or on an external context (for example a
/// GTK `DrawingArea` callback). Cairo errors are logged and the call skipped.
#[derive(Debug)]
pub struct CairoSurface {
    context: Context,
    pixel_ratio: f64,
}

impl CairoSurface {
    #[must_use]
    pub fn from_context(context: Context, pixel_ratio: f64) -> Self {
        Self {
            context,
            pixel_ratio,
        }
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    fn apply_color(&self, color: Color) {
        self.context
            .set_source_rgba(color.red, color.green, color.blue, color.alpha);
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.apply_color(stroke.color);
        self.context.set_line_width(stroke.width);
        self.context.set_dash(&stroke.dash, 0.0);
    }

    fn append_path(&self, points: &[Coordinate], close: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.context.new_path();
        self.context.move_to(first.x, first.y);
        for point in rest {
            self.context.line_to(point.x, point.y);
        }
        if close {
            self.context.close_path();
        }
    }

    fn append_rect_path(&self, rect: RectShape, radius: f64) {
        self.context.new_path();
        if radius <= 0.0 {
            self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
            return;
        }

        let radius = radius.min(rect.width * 0.5).min(rect.height * 0.5);
        let left = rect.x;
        let top = rect.y;
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;

        self.context.new_sub_path();
        self.context
            .arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
        self.context
            .arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
        self.context
            .arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
        self.context
            .arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
        self.context.close_path();
    }

    fn layout(&self, text: &str, font: &Font) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(&self.context);
        let description = FontDescription::from_string(&format!(
            "{} {} {}px",
            font.family, font.weight, font.size
        ));
        layout.set_font_description(Some(&description));
        layout.set_text(text);
        layout
    }
}

impl TextMeasurer for CairoSurface {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        let (width, _) = self.layout(text, font).pixel_size();
        f64::from(width)
    }
}

impl DrawingSurface for CairoSurface {
    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn save(&mut self) {
        log_failure("save", self.context.save());
    }

    fn restore(&mut self) {
        log_failure("restore", self.context.restore());
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.context.translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.context.scale(sx, sy);
    }

    fn clip_rect(&mut self, rect: RectShape) {
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context.clip();
    }

    fn fill_rect(&mut self, rect: RectShape, radius: f64, color: Color) {
        self.append_rect_path(rect, radius);
        self.apply_color(color);
        log_failure("fill rectangle", self.context.fill());
    }

    fn stroke_rect(&mut self, rect: RectShape, radius: f64, stroke: &Stroke) {
        self.append_rect_path(rect, radius);
        self.apply_stroke(stroke);
        log_failure("stroke rectangle", self.context.stroke());
    }

    fn fill_polygon(&mut self, points: &[Coordinate], color: Color) {
        self.append_path(points, true);
        self.apply_color(color);
        log_failure("fill polygon", self.context.fill());
    }

    fn stroke_polygon(&mut self, points: &[Coordinate], stroke: &Stroke) {
        self.append_path(points, true);
        self.apply_stroke(stroke);
        log_failure("stroke polygon", self.context.stroke());
    }

    fn stroke_line(&mut self, points: &[Coordinate], stroke: &Stroke) {
        self.append_path(points, false);
        self.apply_stroke(stroke);
        log_failure("stroke line", self.context.stroke());
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
        let layout = self.layout(text, font);
        if let Some(max_width) = max_width {
            layout.set_width((max_width * f64::from(pango::SCALE)) as i32);
            layout.set_ellipsize(pango::EllipsizeMode::End);
        }
        self.apply_color(color);
        self.context.move_to(x, y);
        pangocairo::functions::show_layout(&self.context, &layout);
    }
}

/// Rasterizes `picture` into a new ARGB image of its device-pixel size.
pub fn render_picture_to_image(picture: &Picture, clear_color: Color) -> ChartResult<ImageSurface> {
    let width = (picture.width * picture.pixel_ratio).ceil() as i32;
    let height = (picture.height * picture.pixel_ratio).ceil() as i32;
    if width <= 0 || height <= 0 {
        return Err(ChartError::InvalidViewport {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        });
    }

    let image = ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
    let context = Context::new(&image)
        .map_err(|err| map_backend_error("failed to create cairo context", err))?;
    context.set_source_rgba(
        clear_color.red,
        clear_color.green,
        clear_color.blue,
        clear_color.alpha,
    );
    context
        .paint()
        .map_err(|err| map_backend_error("failed to clear surface", err))?;

    let mut surface = CairoSurface::from_context(context, picture.pixel_ratio);
    picture.replay(&mut surface);
    drop(surface);
    Ok(image)
}

fn log_failure(operation: &str, result: Result<(), cairo::Error>) {
    if let Err(err) = result {
        warn!(operation, error = %err, "cairo operation failed");
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
