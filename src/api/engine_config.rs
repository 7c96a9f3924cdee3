use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    /// Logical width in pixels.
    pub width: f64,
    /// Logical height in pixels.
    pub height: f64,
    /// Device pixels per logical pixel, applied once on export.
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: default_pixel_ratio(),
        }
    }

    #[must_use]
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let valid_extent = |value: f64| value.is_finite() && value >= 1.0;
        if !valid_extent(self.width) || !valid_extent(self.height) {
            return Err(ChartError::InvalidViewport {
                width: self.width.max(0.0) as u32,
                height: self.height.max(0.0) as u32,
            });
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "pixel ratio must be finite and > 0, got {}",
                self.pixel_ratio
            )));
        }
        Ok(())
    }
}
