//! Chart generation pipeline
//!
//! The pipeline:
//! 1. Loads the benchmark CSV
//! 2. Derives NormalizedTime per list type
//! 3. Builds the series for each configured chart
//! 4. Renders each chart and checks the PNG landed on disk

use crate::config::PlotConfig;
use crate::data::BenchmarkTable;
use crate::error::{PerfPlotError, Result};
use crate::palette::PaletteRegistry;
use crate::render::ChartRenderer;
use crate::series::collect_series;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One rendered image
#[derive(Debug, Clone, PartialEq)]
pub struct ChartResult {
    pub name: String,
    pub path: PathBuf,
    /// List types drawn, in legend order
    pub list_types: Vec<String>,
    /// PNG size on disk
    pub bytes: u64,
}

/// Run the whole pipeline for `config`
pub fn generate_charts(config: &PlotConfig) -> Result<Vec<ChartResult>> {
    config.validate()?;
    let start = Instant::now();

    println!(
        "\n[1/3] Loading benchmark data from {}...",
        config.input.display()
    );
    let table = BenchmarkTable::load(&config.input)?;
    let summary = table.summary()?;
    println!("  {}", summary);
    tracing::info!(
        rows = summary.total_rows,
        list_types = summary.list_types,
        "Loaded benchmark data"
    );

    println!("\n[2/3] Normalizing append times per list type...");
    let table = table.with_normalized_time()?;
    let rows = table.rows()?;

    let renderer = ChartRenderer::new(
        config.width,
        config.height,
        PaletteRegistry::builtin().resolve(&config.palette),
        config.legend_position,
        table.list_types()?,
    );

    println!("\n[3/3] Rendering {} chart(s)...", config.charts.len());
    let mut results = Vec::with_capacity(config.charts.len());
    for chart in &config.charts {
        let series = collect_series(
            &rows,
            chart.metric,
            &config.filter_for(chart),
            &chart.legend_suffix,
        )?;
        if series.is_empty() {
            return Err(PerfPlotError::EmptyChart(chart.name.clone()));
        }

        renderer.render(chart, &series)?;
        let bytes = output_size(&chart.output)?;

        println!(
            "  ✓ {} -> {} ({} series, {} bytes)",
            chart.name,
            chart.output.display(),
            series.len(),
            bytes
        );
        tracing::debug!(chart = %chart.name, bytes, "Chart written");

        results.push(ChartResult {
            name: chart.name.clone(),
            path: chart.output.clone(),
            list_types: series.into_iter().map(|s| s.list_type).collect(),
            bytes,
        });
    }

    tracing::info!(
        charts = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Charts generated"
    );

    Ok(results)
}

fn output_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| PerfPlotError::io(path, e))?;
    if metadata.len() == 0 {
        return Err(PerfPlotError::EmptyOutput(path.to_path_buf()));
    }
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartSpec;

    const CSV: &str = "\
ListType,Size,AppendTime,RetrievalTime
IntArrayList,10,4000,900
EfficientIntArrayList,10,900,0
IntArrayList,100,12000,1500
EfficientIntArrayList,100,1100,0
";

    /// Default config with the input and every output moved into `dir`
    fn config_in(dir: &Path, charts: Vec<ChartSpec>) -> PlotConfig {
        let input = dir.join("performance_data.csv");
        std::fs::write(&input, CSV).unwrap();

        let charts = charts
            .into_iter()
            .map(|chart| ChartSpec {
                output: dir.join("images").join(chart.output.file_name().unwrap()),
                ..chart
            })
            .collect();

        PlotConfig {
            input,
            width: 400,
            height: 300,
            charts,
            ..PlotConfig::default()
        }
    }

    #[test]
    fn test_default_run_writes_three_images() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), PlotConfig::default().charts);

        let results = generate_charts(&config).unwrap();

        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(result.bytes > 0);
            assert_eq!(std::fs::metadata(&result.path).unwrap().len(), result.bytes);
        }
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["all_log", "efficient_log", "relative"]);
    }

    #[test]
    fn test_efficient_chart_only_has_efficient_types() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), PlotConfig::default().charts);

        let results = generate_charts(&config).unwrap();

        assert_eq!(
            results[0].list_types,
            vec!["IntArrayList".to_string(), "EfficientIntArrayList".to_string()]
        );
        assert_eq!(
            results[1].list_types,
            vec!["EfficientIntArrayList".to_string()]
        );
    }

    #[test]
    fn test_supplementary_normalized_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            vec![
                ChartSpec::all_normalized(),
                ChartSpec::efficient_normalized(),
            ],
        );

        let results = generate_charts(&config).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0]
            .path
            .ends_with("images/AllListGraphs_Normalized.png"));
        assert_eq!(
            results[1].list_types,
            vec!["EfficientIntArrayList".to_string()]
        );
    }

    #[test]
    fn test_efficient_chart_without_efficient_rows_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), vec![ChartSpec::efficient_log()]);
        config.efficient_list_types = vec!["EfficientIntLinkedList".to_string()];

        let err = generate_charts(&config).unwrap_err();
        assert!(matches!(err, PerfPlotError::EmptyChart(ref name) if name == "efficient_log"));
    }

    #[test]
    fn test_missing_input_aborts_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), PlotConfig::default().charts);
        config.input = dir.path().join("absent.csv");

        let err = generate_charts(&config).unwrap_err();
        assert!(matches!(err, PerfPlotError::Io { .. }));
        assert!(!dir.path().join("images").exists());
    }

    #[test]
    fn test_unwritable_output_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut config = config_in(dir.path(), PlotConfig::default().charts);
        config.charts[0].output = blocker.join("x.png");

        let err = generate_charts(&config).unwrap_err();
        assert!(matches!(err, PerfPlotError::Io { ref path, .. } if path == &blocker));
        assert!(!dir.path().join("images").exists());
    }
}
