//! Plot configuration
//!
//! Every field has a built-in default that reproduces the fixed behaviour:
//! read `performance_data.csv`, write three PNGs under `docs/images/`. A
//! `perfplot.json` in the working directory may override any subset of fields.

use crate::error::{PerfPlotError, Result};
use crate::palette::DEFAULT_PALETTE;
use crate::series::{ListTypeFilter, Metric};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Optional override file, relative to the working directory
pub const CONFIG_FILE: &str = "perfplot.json";

/// Benchmark CSV, relative to the working directory
pub const DEFAULT_INPUT: &str = "performance_data.csv";

const IMAGE_DIR: &str = "docs/images";

/// 10 x 6 inches at 100 dpi
const DEFAULT_WIDTH: u32 = 1000;
const DEFAULT_HEIGHT: u32 = 600;

const DIMENSION_RANGE: std::ops::RangeInclusive<u32> = 100..=10000;

/// List types drawn on the "efficient" charts
pub const EFFICIENT_LIST_TYPES: [&str; 2] = ["EfficientIntArrayList", "EfficientIntLinkedList"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

/// Which rows a chart draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSubset {
    #[default]
    All,
    /// Only `PlotConfig::efficient_list_types`
    Efficient,
}

/// Where the legend box goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    None,
}

/// One output image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartSpec {
    /// Identifier used in logs and results
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub metric: Metric,
    pub subset: ChartSubset,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    /// Appended to each list type in the legend
    pub legend_suffix: String,
    /// PNG path, relative to the working directory
    pub output: PathBuf,
}

impl ChartSpec {
    /// All list types, raw append time, log y axis
    pub fn all_log() -> Self {
        Self {
            name: "all_log".to_string(),
            title: "Append Performance by List Type (Logarithmic Scale)".to_string(),
            x_label: "Number of Elements".to_string(),
            y_label: "Time (ns, log scale)".to_string(),
            metric: Metric::AppendTime,
            subset: ChartSubset::All,
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Log,
            legend_suffix: "Append".to_string(),
            output: Path::new(IMAGE_DIR).join("AllListGraphs_log.png"),
        }
    }

    /// Efficient list types, raw append time, log y axis
    pub fn efficient_log() -> Self {
        Self {
            name: "efficient_log".to_string(),
            title: "Append Performance by Efficient List Types (Logarithmic Scale)".to_string(),
            y_label: "Time (ns)".to_string(),
            subset: ChartSubset::Efficient,
            output: Path::new(IMAGE_DIR).join("EfficientListGraphs_log.png"),
            ..Self::all_log()
        }
    }

    /// All list types, normalized time, linear y axis
    pub fn relative() -> Self {
        Self {
            name: "relative".to_string(),
            title: "Relative Append Performance by List Type (Normalized)".to_string(),
            x_label: "Number of Elements".to_string(),
            y_label: "Normalized Time (relative to min for each type)".to_string(),
            metric: Metric::NormalizedTime,
            subset: ChartSubset::All,
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            legend_suffix: "Append (Normalized)".to_string(),
            output: Path::new(IMAGE_DIR).join("RelativeListGraphs.png"),
        }
    }

    /// Same as `relative` under the all-lists normalized file name (not drawn by default)
    pub fn all_normalized() -> Self {
        Self {
            name: "all_normalized".to_string(),
            title: "Relative Append Performance by List Type (All Lists, Normalized)".to_string(),
            output: Path::new(IMAGE_DIR).join("AllListGraphs_Normalized.png"),
            ..Self::relative()
        }
    }

    /// Efficient list types, normalized time (not drawn by default)
    pub fn efficient_normalized() -> Self {
        Self {
            name: "efficient_normalized".to_string(),
            title: "Relative Append Performance by Efficient List Types (Normalized)".to_string(),
            subset: ChartSubset::Efficient,
            output: Path::new(IMAGE_DIR).join("EfficientListGraphs_Normalized.png"),
            ..Self::relative()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Benchmark CSV path
    pub input: PathBuf,

    /// Image width in pixels [100, 10000]
    pub width: u32,

    /// Image height in pixels [100, 10000]
    pub height: u32,

    /// Categorical palette name from palettes.json
    pub palette: String,

    pub legend_position: LegendPosition,

    /// Labels drawn on `ChartSubset::Efficient` charts, in legend order
    pub efficient_list_types: Vec<String>,

    /// Charts to render, in order
    pub charts: Vec<ChartSpec>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: DEFAULT_PALETTE.to_string(),
            legend_position: LegendPosition::default(),
            efficient_list_types: EFFICIENT_LIST_TYPES.iter().map(|s| s.to_string()).collect(),
            charts: vec![
                ChartSpec::all_log(),
                ChartSpec::efficient_log(),
                ChartSpec::relative(),
            ],
        }
    }
}

impl PlotConfig {
    /// Load `path` if it exists, otherwise use the defaults
    ///
    /// A present but unparsable file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|e| PerfPlotError::io(path, e))?;
        tracing::info!(path = %path.display(), "Loaded config file");
        Self::from_json(&json)
    }

    /// Parse, sanitize and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| PerfPlotError::Config(format!("Invalid config JSON: {}", e)))?;

        config.width = checked_dimension("width", config.width, DEFAULT_WIDTH);
        config.height = checked_dimension("height", config.height, DEFAULT_HEIGHT);
        config.validate()?;

        Ok(config)
    }

    /// Reject configs that cannot produce a sensible set of images
    pub fn validate(&self) -> Result<()> {
        if self.charts.is_empty() {
            return Err(PerfPlotError::Config("No charts configured".to_string()));
        }

        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for chart in &self.charts {
            if chart.name.is_empty() {
                return Err(PerfPlotError::Config("Chart with empty name".to_string()));
            }
            if chart.output.as_os_str().is_empty() {
                return Err(PerfPlotError::Config(format!(
                    "Chart '{}' has no output path",
                    chart.name
                )));
            }
            if !names.insert(chart.name.as_str()) {
                return Err(PerfPlotError::Config(format!(
                    "Duplicate chart name '{}'",
                    chart.name
                )));
            }
            if !outputs.insert(output_key(&chart.output)) {
                return Err(PerfPlotError::Config(format!(
                    "Output {} used by more than one chart",
                    chart.output.display()
                )));
            }
        }

        Ok(())
    }

    /// Row filter for a chart
    pub fn filter_for(&self, chart: &ChartSpec) -> ListTypeFilter {
        match chart.subset {
            ChartSubset::All => ListTypeFilter::All,
            ChartSubset::Efficient => ListTypeFilter::Only(self.efficient_list_types.clone()),
        }
    }
}

/// Path used to detect two charts writing the same file; `./a.png` and `a.png` match
fn output_key(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|c| matches!(c, Component::CurDir))
        .collect()
}

fn checked_dimension(name: &str, value: u32, default: u32) -> u32 {
    if DIMENSION_RANGE.contains(&value) {
        value
    } else {
        tracing::warn!(
            "Plot {} {} out of valid range [100-10000], using default: {}",
            name,
            value,
            default
        );
        default
    }
}
