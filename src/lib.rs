//! chart-panes: multi-pane financial chart engine.
//!
//! A chart is a stack of panes (candles, indicators, the shared time axis),
//! each owning up to three widgets. Views turn store state into figures,
//! figures paint onto a [`render::DrawingSurface`], and every widget keeps its
//! main and overlay layers as recorded [`render::Picture`]s that hosts replay
//! or export.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod pane;
pub mod render;
pub mod telemetry;
pub mod view;

pub use api::{ChartEngine, ChartEngineConfig, ChartStore, MemoryStore, Styles, UpdateLevel};
pub use error::{ChartError, ChartResult};
