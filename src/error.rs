use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading benchmark data or rendering charts
#[derive(Debug, Error)]
pub enum PerfPlotError {
    /// Reading an input or writing an output failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataframe engine error (CSV parsing, casting, expressions)
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Required column absent from the input
    #[error("Missing column '{0}' in benchmark data")]
    MissingColumn(String),

    /// Row-level data problem (null cell, unparsable number, non-positive time)
    #[error("Invalid data at row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// Input contains a header but no measurements
    #[error("Benchmark data is empty")]
    EmptyData,

    /// Configuration file could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// A chart ended up with nothing to draw
    #[error("Chart '{0}' has no series to plot")]
    EmptyChart(String),

    /// Drawing backend failure
    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },

    /// Output file missing or zero-sized after rendering
    #[error("Output {0} was not written")]
    EmptyOutput(PathBuf),
}

impl PerfPlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PerfPlotError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using PerfPlotError
pub type Result<T> = std::result::Result<T, PerfPlotError>;
