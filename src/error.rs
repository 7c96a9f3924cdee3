use thiserror::Error;

use crate::core::PaneId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown pane: {0}")]
    UnknownPane(PaneId),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid style configuration: {0}")]
    InvalidStyles(#[from] serde_json::Error),
}
