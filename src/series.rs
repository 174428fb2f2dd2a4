//! Per-list-type line series for the chart renderer

use crate::data::BenchmarkRow;
use crate::error::{PerfPlotError, Result};
use serde::{Deserialize, Serialize};

/// Which value goes on the y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    AppendTime,
    NormalizedTime,
}

/// Which list types a chart draws
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListTypeFilter {
    #[default]
    All,
    /// Only these labels, drawn in this order
    Only(Vec<String>),
}

/// One line on a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// The benchmarked list type
    pub list_type: String,
    /// Legend text
    pub label: String,
    /// (Size, value) sorted by size
    pub points: Vec<(f64, f64)>,
}

/// Group rows by list type and build one series per group
///
/// Groups appear in first-appearance order for `ListTypeFilter::All` and in
/// the filter's order for `ListTypeFilter::Only`. Labels requested by the
/// filter but absent from `rows` are skipped.
pub fn collect_series(
    rows: &[BenchmarkRow],
    metric: Metric,
    filter: &ListTypeFilter,
    label_suffix: &str,
) -> Result<Vec<ChartSeries>> {
    let order: Vec<&str> = match filter {
        ListTypeFilter::All => {
            let mut order: Vec<&str> = Vec::new();
            for row in rows {
                if !order.contains(&row.list_type.as_str()) {
                    order.push(row.list_type.as_str());
                }
            }
            order
        }
        ListTypeFilter::Only(wanted) => wanted.iter().map(String::as_str).collect(),
    };

    let mut series = Vec::with_capacity(order.len());
    for list_type in order {
        let mut points = Vec::new();
        for row in rows.iter().filter(|r| r.list_type == list_type) {
            let y = match metric {
                Metric::AppendTime => row.append_time,
                Metric::NormalizedTime => row.normalized_time.ok_or_else(|| {
                    PerfPlotError::Config(
                        "NormalizedTime requested before normalization".to_string(),
                    )
                })?,
            };
            points.push((row.size as f64, y));
        }

        if points.is_empty() {
            tracing::warn!(list_type, "List type not present in data, skipping");
            continue;
        }

        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        series.push(ChartSeries {
            list_type: list_type.to_string(),
            label: legend_label(list_type, label_suffix),
            points,
        });
    }

    Ok(series)
}

fn legend_label(list_type: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        list_type.to_string()
    } else {
        format!("{} {}", list_type, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(list_type: &str, size: i64, append_time: f64) -> BenchmarkRow {
        BenchmarkRow {
            list_type: list_type.to_string(),
            size,
            append_time,
            normalized_time: None,
        }
    }

    fn rows() -> Vec<BenchmarkRow> {
        vec![
            row("IntArrayList", 100, 900.0),
            row("EfficientIntArrayList", 10, 50.0),
            row("IntArrayList", 10, 300.0),
            row("EfficientIntArrayList", 100, 70.0),
        ]
    }

    #[test]
    fn test_all_keeps_first_appearance_order_and_sorts_sizes() {
        let series = collect_series(&rows(), Metric::AppendTime, &ListTypeFilter::All, "Append")
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "IntArrayList Append");
        assert_eq!(series[0].points, vec![(10.0, 300.0), (100.0, 900.0)]);
        assert_eq!(series[1].list_type, "EfficientIntArrayList");
    }

    #[test]
    fn test_only_filter_restricts_rows() {
        let filter = ListTypeFilter::Only(vec![
            "EfficientIntArrayList".to_string(),
            "EfficientIntLinkedList".to_string(),
        ]);
        let series = collect_series(&rows(), Metric::AppendTime, &filter, "Append").unwrap();

        // EfficientIntLinkedList has no rows and is skipped
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].list_type, "EfficientIntArrayList");
        assert_eq!(series[0].points, vec![(10.0, 50.0), (100.0, 70.0)]);
    }

    #[test]
    fn test_normalized_metric_requires_column() {
        let err = collect_series(
            &rows(),
            Metric::NormalizedTime,
            &ListTypeFilter::All,
            "Append",
        )
        .unwrap_err();
        assert!(matches!(err, PerfPlotError::Config(_)));
    }

    #[test]
    fn test_empty_suffix() {
        assert_eq!(legend_label("IntLinkedList", ""), "IntLinkedList");
        assert_eq!(
            legend_label("IntLinkedList", "Append (Normalized)"),
            "IntLinkedList Append (Normalized)"
        );
    }
}
