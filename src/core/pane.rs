use std::fmt;

use serde::{Deserialize, Serialize};

pub use super::axis::AxisOptions;

pub const DEFAULT_INDICATOR_PANE_HEIGHT: f64 = 100.0;
pub const DEFAULT_PANE_MIN_HEIGHT: f64 = 30.0;

/// Fixed role of a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneId {
    Candle,
    Indicator(u32),
    XAxis,
}

impl PaneId {
    /// Panes whose axis identity follows the configured axis name.
    #[must_use]
    pub const fn recreates_axis_on_name_change(self) -> bool {
        matches!(self, Self::Candle | Self::XAxis)
    }

    #[must_use]
    pub const fn is_drawing_pane(self) -> bool {
        !matches!(self, Self::XAxis)
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Candle => f.write_str("candle_pane"),
            Self::Indicator(index) => write!(f, "indicator_pane_{index}"),
            Self::XAxis => f.write_str("x_axis_pane"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaneState {
    #[default]
    Normal,
    Maximized,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneOptions {
    /// Requested height; ignored for the candle pane, which absorbs the rest.
    pub height: f64,
    pub min_height: f64,
    pub drag_enabled: bool,
    /// Stacking order among indicator panes, ascending from the candle pane.
    pub order: i32,
    pub state: PaneState,
    pub axis: AxisOptions,
    pub left_axis: AxisOptions,
}

impl Default for PaneOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_INDICATOR_PANE_HEIGHT,
            min_height: DEFAULT_PANE_MIN_HEIGHT,
            drag_enabled: true,
            order: 0,
            state: PaneState::Normal,
            axis: AxisOptions::default(),
            left_axis: AxisOptions::left(),
        }
    }
}

impl PaneOptions {
    #[must_use]
    pub fn x_axis() -> Self {
        Self {
            drag_enabled: false,
            axis: AxisOptions::bottom(),
            ..Self::default()
        }
    }

    /// Applies the present fields of `update`.
    pub fn apply(&mut self, update: &PaneOptionsUpdate) {
        if let Some(height) = update.height {
            self.height = height;
        }
        if let Some(min_height) = update.min_height {
            self.min_height = min_height;
        }
        if let Some(drag_enabled) = update.drag_enabled {
            self.drag_enabled = drag_enabled;
        }
        if let Some(order) = update.order {
            self.order = order;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(axis) = update.axis {
            self.axis = axis;
        }
        if let Some(left_axis) = update.left_axis {
            self.left_axis = left_axis;
        }
    }
}

/// Partial pane options; absent fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneOptionsUpdate {
    pub height: Option<f64>,
    pub min_height: Option<f64>,
    pub drag_enabled: Option<bool>,
    pub order: Option<i32>,
    pub state: Option<PaneState>,
    pub axis: Option<AxisOptions>,
    pub left_axis: Option<AxisOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneLayoutRegion {
    pub pane_id: PaneId,
    pub top: f64,
    pub height: f64,
}

/// Stacks drawing panes top to bottom inside `drawable_height`.
///
/// `panes` must already be in display order. A `separator` gap sits between
/// adjacent panes. Region heights always sum to `drawable_height` minus the
/// separators; the candle pane absorbs whatever the other panes leave.
#[must_use]
pub fn layout_pane_heights(
    panes: &[(PaneId, PaneOptions)],
    drawable_height: f64,
    separator: f64,
) -> Vec<PaneLayoutRegion> {
    if panes.is_empty() {
        return Vec::new();
    }

    let separator = if separator.is_finite() {
        separator.max(0.0)
    } else {
        0.0
    };
    let drawable_height = if drawable_height.is_finite() {
        drawable_height.max(0.0)
    } else {
        0.0
    };
    let mut heights = vec![0.0; panes.len()];
    let maximized = panes
        .iter()
        .position(|(_, options)| options.state == PaneState::Maximized);

    if let Some(index) = maximized {
        heights[index] = drawable_height;
    } else {
        let separators = separator * (panes.len() - 1) as f64;
        let available = (drawable_height - separators).max(0.0);
        let candle_index = panes.iter().position(|(id, _)| *id == PaneId::Candle);
        let candle_reserve = candle_index
            .map(|index| sanitize(panes[index].1.min_height).min(available))
            .unwrap_or(0.0);
        let mut budget = available - candle_reserve;
        for (index, (id, options)) in panes.iter().enumerate() {
            if *id == PaneId::Candle {
                continue;
            }
            let min_height = sanitize(options.min_height);
            let requested = match options.state {
                PaneState::Minimized => min_height,
                PaneState::Normal | PaneState::Maximized => sanitize(options.height).max(min_height),
            };
            let granted = requested.min(budget);
            heights[index] = granted;
            budget -= granted;
        }
        match candle_index {
            Some(index) => heights[index] = candle_reserve + budget,
            None => {
                if let Some(last) = heights.last_mut() {
                    *last += budget;
                }
            }
        }
    }

    // Separators only sit between two panes that both have height.
    let mut regions = Vec::with_capacity(panes.len());
    let mut cursor = 0.0;
    for (index, ((pane_id, _), height)) in panes.iter().zip(&heights).enumerate() {
        regions.push(PaneLayoutRegion {
            pane_id: *pane_id,
            top: cursor,
            height: *height,
        });
        cursor += height;
        if *height > 0.0 && heights[index + 1..].iter().any(|next| *next > 0.0) {
            cursor += separator;
        }
    }
    regions
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
