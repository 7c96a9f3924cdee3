use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Point in pixel space, relative to whatever frame the caller works in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel rectangle owned by a pane or widget.
///
/// `right` and `bottom` are offsets from the parent frame edges, not absolute
/// edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounding {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: 0.0,
            bottom: 0.0,
            width,
            height,
        }
    }

    /// Applies every field present in `patch`, leaving the others untouched.
    pub fn merge(&mut self, patch: &BoundingPatch) {
        if let Some(left) = patch.left {
            self.left = left;
        }
        if let Some(top) = patch.top {
            self.top = top;
        }
        if let Some(right) = patch.right {
            self.right = right;
        }
        if let Some(bottom) = patch.bottom {
            self.bottom = bottom;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
    }

    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= self.left
            && coordinate.x <= self.left + self.width
            && coordinate.y >= self.top
            && coordinate.y <= self.top + self.height
    }
}

/// Partial bounding used by top-down layout assignment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingPatch {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl BoundingPatch {
    #[must_use]
    pub fn with_left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    #[must_use]
    pub fn with_top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    #[must_use]
    pub fn with_right(mut self, right: f64) -> Self {
        self.right = Some(right);
        self
    }

    #[must_use]
    pub fn with_bottom(mut self, bottom: f64) -> Self {
        self.bottom = Some(bottom);
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

impl From<Bounding> for BoundingPatch {
    fn from(bounding: Bounding) -> Self {
        Self {
            left: Some(bounding.left),
            top: Some(bounding.top),
            right: Some(bounding.right),
            bottom: Some(bounding.bottom),
            width: Some(bounding.width),
            height: Some(bounding.height),
        }
    }
}

/// One OHLC bar of the series held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KLineData {
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl KLineData {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "bar field `{field}` must be finite"
                )));
            }
        }
        if high < low {
            return Err(ChartError::InvalidData(
                "bar high must be >= low".to_owned(),
            ));
        }
        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        })
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Half-open range `[from, to)` of data indices currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisibleRange {
    pub from: usize,
    pub to: usize,
}

impl VisibleRange {
    #[must_use]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.to <= self.from
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.to.saturating_sub(self.from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    pub price: u32,
    pub volume: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            price: 2,
            volume: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounding, BoundingPatch, Coordinate, KLineData};

    #[test]
    fn merge_only_touches_present_fields() {
        let mut bounding = Bounding::new(10.0, 20.0, 300.0, 200.0);
        bounding.merge(&BoundingPatch::default().with_width(120.0).with_right(4.0));
        assert_eq!(bounding.left, 10.0);
        assert_eq!(bounding.top, 20.0);
        assert_eq!(bounding.width, 120.0);
        assert_eq!(bounding.right, 4.0);
        assert_eq!(bounding.height, 200.0);
    }

    #[test]
    fn contains_is_inclusive_on_edges() {
        let bounding = Bounding::new(0.0, 10.0, 100.0, 50.0);
        assert!(bounding.contains(Coordinate::new(0.0, 10.0)));
        assert!(bounding.contains(Coordinate::new(100.0, 60.0)));
        assert!(!bounding.contains(Coordinate::new(100.5, 30.0)));
    }

    #[test]
    fn bar_rejects_inverted_envelope() {
        assert!(KLineData::new(0, 1.0, 0.5, 2.0, 1.0).is_err());
        assert!(KLineData::new(0, 1.0, 2.0, 0.5, 1.5).is_ok());
    }
}
