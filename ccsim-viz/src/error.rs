//! Error types for visualization

use thiserror::Error;

/// Errors related to reporting and visualization operations
#[derive(Debug, Error)]
pub enum VizError {
    #[error("Invalid plot configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Nothing to plot: {0}")]
    InvalidData(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Rendering error: {0}")]
    RenderingError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
