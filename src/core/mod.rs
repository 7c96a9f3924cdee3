pub mod axis;
pub mod format;
pub mod pane;
pub mod ticks;
pub mod types;

pub use axis::{
    Axis, AxisDescriptor, AxisGap, AxisKind, AxisName, AxisOptions, AxisPosition, AxisRange,
    AxisTick,
};
pub use format::{format_big_number, format_decimal_fold, format_precision, format_thousands};
pub use pane::{
    PaneId, PaneLayoutRegion, PaneOptions, PaneOptionsUpdate, PaneState, layout_pane_heights,
};
pub use types::{Bounding, BoundingPatch, Coordinate, KLineData, Precision, VisibleRange};
