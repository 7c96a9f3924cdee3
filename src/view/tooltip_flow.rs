use crate::core::Coordinate;

/// Row-flow cursor used to lay out tooltip items left to right, wrapping to a
/// new row when an item would cross `max_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipFlow {
    left: f64,
    max_width: f64,
    cursor: Coordinate,
    row_height: f64,
}

impl TooltipFlow {
    #[must_use]
    pub const fn new(left: f64, top: f64, max_width: f64) -> Self {
        Self {
            left,
            max_width,
            cursor: Coordinate::new(left, top),
            row_height: 0.0,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    /// Height of the row currently being filled.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Bottom edge of the current row.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.cursor.y + self.row_height
    }

    #[must_use]
    pub fn consumed_height(&self, top: f64) -> f64 {
        self.bottom() - top
    }

    /// Starts a new row when an item of `width` no longer fits; otherwise the
    /// current row grows to `height`. Returns whether the row wrapped.
    ///
    /// An item wider than `max_width` on an empty row still wraps once and
    /// then overflows.
    pub fn break_if_needed(&mut self, width: f64, height: f64) -> bool {
        if self.cursor.x + width > self.max_width {
            self.cursor.x = self.left;
            self.cursor.y += self.row_height;
            self.row_height = height;
            true
        } else {
            self.row_height = self.row_height.max(height);
            false
        }
    }

    pub fn advance(&mut self, width: f64) {
        self.cursor.x += width;
    }

    /// Wraps if needed, returns the item's top-left and moves past it.
    pub fn place(&mut self, width: f64, height: f64) -> Coordinate {
        self.break_if_needed(width, height);
        let origin = self.cursor;
        self.advance(width);
        origin
    }
}
