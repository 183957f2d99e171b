// Query result series and their alignment onto a shared time axis
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Marker written for a missing sample, understood by gnuplot's `set datafile missing`
pub const GAP_MARKER: &str = "?";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesResult {
    pub labels: BTreeMap<String, String>,
    pub samples: BTreeMap<DateTime<Utc>, f64>,
}

impl SeriesResult {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self {
            labels,
            samples: BTreeMap::new(),
        }
    }

    /// Later samples for the same instant overwrite earlier ones
    pub fn insert(&mut self, time: DateTime<Utc>, value: f64) {
        self.samples.insert(time, value);
    }
}

/// A cell of the aligned table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Value(f64),
    Gap,
}

impl Sample {
    pub fn is_gap(&self) -> bool {
        matches!(self, Sample::Gap)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::Value(value) => write!(f, "{}", value),
            Sample::Gap => f.write_str(GAP_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub label: String,
    pub values: Vec<Sample>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedTable {
    pub timestamps: Vec<DateTime<Utc>>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    /// Merge labelled series onto the sorted union of their timestamps.
    ///
    /// Rows keep the input order; a series without a sample at some
    /// timestamp gets [`Sample::Gap`] there.
    pub fn align(series: Vec<(String, SeriesResult)>) -> Self {
        let timestamps: Vec<DateTime<Utc>> = series
            .iter()
            .flat_map(|(_, result)| result.samples.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = series
            .into_iter()
            .map(|(label, result)| {
                let values = timestamps
                    .iter()
                    .map(|time| match result.samples.get(time) {
                        Some(value) => Sample::Value(*value),
                        None => Sample::Gap,
                    })
                    .collect();
                AlignedRow { label, values }
            })
            .collect();

        Self { timestamps, rows }
    }

    pub fn legend(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn gap_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter())
            .filter(|sample| sample.is_gap())
            .count()
    }
}

/// Unix seconds with millisecond precision, as written to plot data files
pub fn unix_seconds(time: &DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Convert a float unix timestamp from the range query API
pub fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}
