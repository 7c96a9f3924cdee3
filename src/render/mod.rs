pub mod figure;
mod primitives;
mod recording;
mod surface;

pub use primitives::{Color, Font, LineType, PolygonType, TextAlign, TextBaseline};
pub use recording::{DrawCommand, Picture, RecordingSurface};
pub use surface::{DashPattern, DrawingSurface, EstimatedTextMeasurer, RectShape, Stroke, TextMeasurer};

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoSurface, render_picture_to_image};
