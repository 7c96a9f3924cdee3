mod engine;
mod engine_config;
pub mod indicator;
mod layout;
pub mod store;
pub mod styles;
pub mod update;

pub use engine::ChartEngine;
pub use engine_config::ChartEngineConfig;
pub use indicator::{
    CustomTooltipData, CustomTooltipLegend, Indicator, IndicatorFigure, IndicatorFigureKind, IndicatorRow,
    LegendText, TooltipDataSource, TooltipDataSourceContext,
};
pub use store::{ChartStore, MemoryStore};
pub use styles::{StyleValue, Styles};
pub use update::UpdateLevel;
