//! Benchmark table loading and the grouped normalization
//!
//! The CSV is read into a polars DataFrame, narrowed to the three columns the
//! charts need and cast to fixed types. `NormalizedTime` is derived with a
//! windowed min over `ListType`, so every group's fastest size maps to 1.0.

use crate::error::{PerfPlotError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

pub const LIST_TYPE: &str = "ListType";
pub const SIZE: &str = "Size";
pub const APPEND_TIME: &str = "AppendTime";
pub const NORMALIZED_TIME: &str = "NormalizedTime";

/// A single measurement, materialized from the table
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub list_type: String,
    /// Number of elements appended
    pub size: i64,
    /// Append time in nanoseconds
    pub append_time: f64,
    /// Present once `with_normalized_time` has run
    pub normalized_time: Option<f64>,
}

/// Loaded benchmark measurements
#[derive(Debug, Clone)]
pub struct BenchmarkTable {
    frame: DataFrame,
}

impl BenchmarkTable {
    /// Read and validate the CSV at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| PerfPlotError::io(path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read benchmark CSV");
        Self::from_csv_bytes(bytes)
    }

    /// Parse CSV content (header row required)
    ///
    /// Columns other than `ListType`, `Size` and `AppendTime` are dropped.
    pub fn from_csv_bytes(bytes: Vec<u8>) -> Result<Self> {
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        for name in [LIST_TYPE, SIZE, APPEND_TIME] {
            if raw.get_column_index(name).is_none() {
                return Err(PerfPlotError::MissingColumn(name.to_string()));
            }
        }

        if raw.height() == 0 {
            return Err(PerfPlotError::EmptyData);
        }

        // Non-strict casts turn unparsable cells into nulls, which `rows()` rejects
        let frame = raw
            .lazy()
            .select([
                col(LIST_TYPE).cast(DataType::String),
                col(SIZE).cast(DataType::Int64),
                col(APPEND_TIME).cast(DataType::Float64),
            ])
            .collect()?;

        let table = Self { frame };
        table.rows()?;
        Ok(table)
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Return a copy with `NormalizedTime = AppendTime / min(AppendTime)` per `ListType`
    pub fn with_normalized_time(&self) -> Result<Self> {
        let frame = self
            .frame
            .clone()
            .lazy()
            .with_column(
                (col(APPEND_TIME) / col(APPEND_TIME).min().over([col(LIST_TYPE)]))
                    .alias(NORMALIZED_TIME),
            )
            .collect()?;

        Ok(Self { frame })
    }

    pub fn has_normalized_time(&self) -> bool {
        self.frame.get_column_index(NORMALIZED_TIME).is_some()
    }

    /// Materialize typed rows, rejecting nulls and non-positive times
    pub fn rows(&self) -> Result<Vec<BenchmarkRow>> {
        let list_types = self.str_column(LIST_TYPE)?;
        let sizes = self.i64_column(SIZE)?;
        let times = self.f64_column(APPEND_TIME)?;
        let normalized = if self.has_normalized_time() {
            Some(self.f64_column(NORMALIZED_TIME)?)
        } else {
            None
        };

        let mut rows = Vec::with_capacity(self.frame.height());
        for (idx, ((list_type, size), append_time)) in list_types
            .into_iter()
            .zip(sizes.into_iter())
            .zip(times.into_iter())
            .enumerate()
        {
            let row = idx + 1;
            let list_type = list_type.ok_or_else(|| invalid_row(row, "missing ListType"))?;
            let size = size.ok_or_else(|| invalid_row(row, "missing or non-integer Size"))?;
            let append_time =
                append_time.ok_or_else(|| invalid_row(row, "missing or non-numeric AppendTime"))?;

            if !append_time.is_finite() || append_time <= 0.0 {
                return Err(invalid_row(
                    row,
                    format!("AppendTime must be positive, got {}", append_time),
                ));
            }

            rows.push(BenchmarkRow {
                list_type: list_type.to_string(),
                size,
                append_time,
                normalized_time: normalized.and_then(|ca| ca.get(idx)),
            });
        }

        Ok(rows)
    }

    /// Distinct list types in first-appearance order
    pub fn list_types(&self) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for list_type in self.str_column(LIST_TYPE)?.into_iter().flatten() {
            if seen.insert(list_type) {
                ordered.push(list_type.to_string());
            }
        }
        Ok(ordered)
    }

    /// Get summary statistics
    pub fn summary(&self) -> Result<DataSummary> {
        let rows = self.rows()?;
        let sizes = rows.iter().map(|r| r.size);
        let times: Vec<f64> = rows.iter().map(|r| r.append_time).collect();

        Ok(DataSummary {
            total_rows: rows.len(),
            list_types: self.list_types()?.len(),
            size_min: sizes.clone().min().unwrap_or(0),
            size_max: sizes.max().unwrap_or(0),
            time_min: times.iter().copied().fold(f64::INFINITY, f64::min),
            time_max: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    fn str_column(&self, name: &str) -> Result<&StringChunked> {
        Ok(self.frame.column(name)?.as_materialized_series().str()?)
    }

    fn i64_column(&self, name: &str) -> Result<&Int64Chunked> {
        Ok(self.frame.column(name)?.as_materialized_series().i64()?)
    }

    fn f64_column(&self, name: &str) -> Result<&Float64Chunked> {
        Ok(self.frame.column(name)?.as_materialized_series().f64()?)
    }
}

fn invalid_row(row: usize, reason: impl Into<String>) -> PerfPlotError {
    PerfPlotError::InvalidRow {
        row,
        reason: reason.into(),
    }
}

/// Summary statistics for a loaded table
#[derive(Debug, Clone)]
pub struct DataSummary {
    pub total_rows: usize,
    pub list_types: usize,
    pub size_min: i64,
    pub size_max: i64,
    pub time_min: f64,
    pub time_max: f64,
}

impl std::fmt::Display for DataSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DataSummary {{ rows: {}, list types: {}, size: [{}, {}], append ns: [{:.0}, {:.0}] }}",
            self.total_rows,
            self.list_types,
            self.size_min,
            self.size_max,
            self.time_min,
            self.time_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "\
ListType,Size,AppendTime,RetrievalTime
IntArrayList,10,4000,900
IntLinkedList,10,2500,0
IntArrayList,100,12000,1500
IntLinkedList,100,20000,0
IntArrayList,1000,800000,7000
IntLinkedList,1000,1000000,0
";

    fn sample() -> BenchmarkTable {
        BenchmarkTable::from_csv_bytes(SAMPLE.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_load_keeps_required_columns() {
        let table = sample();
        assert_eq!(table.len(), 6);

        let rows = table.rows().unwrap();
        assert_eq!(
            rows[0],
            BenchmarkRow {
                list_type: "IntArrayList".to_string(),
                size: 10,
                append_time: 4000.0,
                normalized_time: None,
            }
        );
        assert!(!table.has_normalized_time());
    }

    #[test]
    fn test_list_types_first_appearance_order() {
        assert_eq!(
            sample().list_types().unwrap(),
            vec!["IntArrayList".to_string(), "IntLinkedList".to_string()]
        );
    }

    #[test]
    fn test_normalized_time_per_group() {
        let rows = sample().with_normalized_time().unwrap().rows().unwrap();
        let normalized: Vec<f64> = rows.iter().map(|r| r.normalized_time.unwrap()).collect();

        assert_eq!(normalized, vec![1.0, 1.0, 3.0, 8.0, 200.0, 400.0]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let table = sample();
        let first = table.with_normalized_time().unwrap().rows().unwrap();
        let second = table.with_normalized_time().unwrap().rows().unwrap();

        let bits = |rows: &[BenchmarkRow]| -> Vec<u64> {
            rows.iter()
                .map(|r| r.normalized_time.unwrap().to_bits())
                .collect()
        };
        assert_eq!(bits(&first), bits(&second));

        // Normalizing an already-normalized table replaces the column
        let twice = table
            .with_normalized_time()
            .unwrap()
            .with_normalized_time()
            .unwrap()
            .rows()
            .unwrap();
        assert_eq!(bits(&first), bits(&twice));
    }

    #[test]
    fn test_missing_column() {
        let err = BenchmarkTable::from_csv_bytes(b"ListType,Size\nA,10\n".to_vec()).unwrap_err();
        assert!(matches!(err, PerfPlotError::MissingColumn(ref c) if c == "AppendTime"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err =
            BenchmarkTable::from_csv_bytes(b"ListType,Size,AppendTime\n".to_vec()).unwrap_err();
        assert!(matches!(err, PerfPlotError::EmptyData));
    }

    #[test]
    fn test_non_positive_time_rejected() {
        let csv = b"ListType,Size,AppendTime\nA,10,100\nA,100,0\n".to_vec();
        let err = BenchmarkTable::from_csv_bytes(csv).unwrap_err();
        assert!(matches!(err, PerfPlotError::InvalidRow { row: 2, .. }));
    }

    #[test]
    fn test_unparsable_size_rejected() {
        let csv = b"ListType,Size,AppendTime\nA,10,100\nA,lots,200\n".to_vec();
        let err = BenchmarkTable::from_csv_bytes(csv).unwrap_err();
        assert!(matches!(err, PerfPlotError::InvalidRow { row: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("performance_data.csv");
        let err = BenchmarkTable::load(&path).unwrap_err();
        assert!(matches!(err, PerfPlotError::Io { .. }));
    }

    #[test]
    fn test_load_from_file_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("performance_data.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let summary = BenchmarkTable::load(&path).unwrap().summary().unwrap();
        assert_eq!(summary.total_rows, 6);
        assert_eq!(summary.list_types, 2);
        assert_eq!((summary.size_min, summary.size_max), (10, 1000));
        assert_eq!(summary.time_min, 2500.0);
        assert_eq!(summary.time_max, 1_000_000.0);
        assert!(summary.to_string().starts_with("DataSummary { rows: 6"));
    }

    fn to_csv(rows: &[(u8, u32, u64)]) -> Vec<u8> {
        let mut csv = String::from("ListType,Size,AppendTime\n");
        for (group, size, time) in rows {
            csv.push_str(&format!("List{},{},{}\n", group, size, time));
        }
        csv.into_bytes()
    }

    proptest! {
        #[test]
        fn prop_group_minimum_is_one(
            rows in prop::collection::vec((0u8..4, 1u32..100_000, 1u64..10_000_000_000), 1..40)
        ) {
            let table = BenchmarkTable::from_csv_bytes(to_csv(&rows)).unwrap();
            let normalized = table.with_normalized_time().unwrap().rows().unwrap();

            for list_type in table.list_types().unwrap() {
                let group_min = normalized
                    .iter()
                    .filter(|r| r.list_type == list_type)
                    .map(|r| r.normalized_time.unwrap())
                    .fold(f64::INFINITY, f64::min);
                prop_assert_eq!(group_min, 1.0);
            }
            for row in &normalized {
                prop_assert!(row.normalized_time.unwrap() >= 1.0);
            }
        }
    }
}
