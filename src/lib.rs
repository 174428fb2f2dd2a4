//! Benchmark chart library
//!
//! Turns a CSV of list-append benchmark measurements into PNG line charts.
//! Used by the `perf_plot` binary and its tests.

pub mod config;
pub mod data;
pub mod error;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod series;

pub use error::{PerfPlotError, Result};
