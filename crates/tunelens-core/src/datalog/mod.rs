//! ECU Datalog
//!
//! In-memory model of a recorded ECU log: named channels over an
//! ordered sequence of samples. The log is consumed as an opaque
//! mapping from column name to numeric sequence; channel semantics
//! live with the report builder, not here.

mod format;

pub use format::{read_csv_file, read_csv_str, write_csv, LogError};

use serde::{Deserialize, Serialize};

/// A single log row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Channel values, in header order. Cells that failed numeric
    /// parsing are stored as NaN so samples keep their row alignment.
    pub values: Vec<f64>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// A loaded datalog: channel names plus sample rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataLog {
    /// Channel (column) names from the log header
    channels: Vec<String>,
    /// Sample rows, one entry per recorded row
    entries: Vec<LogEntry>,
}

impl DataLog {
    /// Build a log from channel names and rows
    pub fn new(channels: Vec<String>, entries: Vec<LogEntry>) -> Self {
        Self { channels, entries }
    }

    /// Parse a log from CSV text
    pub fn from_csv_str(text: &str) -> Result<Self, LogError> {
        read_csv_str(text)
    }

    /// Load a log from a CSV file
    pub fn from_csv_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, LogError> {
        read_csv_file(path)
    }

    /// Channel names in header order
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// All sample rows
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of sample rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log holds no samples
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the index of a channel by exact name
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c == name)
    }

    /// Whether a channel was recorded in this log
    pub fn has_channel(&self, name: &str) -> bool {
        self.channel_index(name).is_some()
    }

    /// Get the samples for a channel, skipping unparsable cells.
    ///
    /// Returns an empty vector for a channel the log never recorded.
    pub fn channel_values(&self, name: &str) -> Vec<f64> {
        let idx = match self.channel_index(name) {
            Some(i) => i,
            None => return Vec::new(),
        };

        self.entries
            .iter()
            .filter_map(|e| e.values.get(idx).copied())
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Row-wise (x, y) pairs for two channels, dropping rows where
    /// either cell is missing or unparsable so the pairing stays
    /// aligned.
    pub fn channel_pairs(&self, x: &str, y: &str) -> Option<Vec<(f64, f64)>> {
        let xi = self.channel_index(x)?;
        let yi = self.channel_index(y)?;

        Some(
            self.entries
                .iter()
                .filter_map(|e| {
                    let x = *e.values.get(xi)?;
                    let y = *e.values.get(yi)?;
                    if x.is_nan() || y.is_nan() {
                        None
                    } else {
                        Some((x, y))
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_test_log() -> DataLog {
        DataLog::new(
            vec!["Engine Speed (rpm)".into(), "Manifold Absolute Pressure (psi)".into()],
            vec![
                LogEntry::new(vec![1000.0, 5.0]),
                LogEntry::new(vec![2000.0, 8.5]),
                LogEntry::new(vec![3000.0, 12.0]),
            ],
        )
    }

    #[test]
    fn test_channel_values() {
        let log = make_test_log();
        assert_eq!(
            log.channel_values("Engine Speed (rpm)"),
            vec![1000.0, 2000.0, 3000.0]
        );
        assert_eq!(log.channel_values("Not Recorded"), Vec::<f64>::new());
    }

    #[test]
    fn test_channel_values_skips_nan() {
        let log = DataLog::new(
            vec!["a".into()],
            vec![
                LogEntry::new(vec![1.0]),
                LogEntry::new(vec![f64::NAN]),
                LogEntry::new(vec![3.0]),
            ],
        );
        assert_eq!(log.channel_values("a"), vec![1.0, 3.0]);
    }

    #[test]
    fn test_channel_pairs() {
        let log = make_test_log();
        let pairs = log
            .channel_pairs("Engine Speed (rpm)", "Manifold Absolute Pressure (psi)")
            .expect("both channels present");
        assert_eq!(pairs, vec![(1000.0, 5.0), (2000.0, 8.5), (3000.0, 12.0)]);
        assert!(log.channel_pairs("Engine Speed (rpm)", "missing").is_none());
    }

    #[test]
    fn test_channel_pairs_drop_nan_rows() {
        let log = DataLog::new(
            vec!["x".into(), "y".into()],
            vec![
                LogEntry::new(vec![1.0, 10.0]),
                LogEntry::new(vec![2.0, f64::NAN]),
                LogEntry::new(vec![3.0, 30.0]),
            ],
        );
        assert_eq!(
            log.channel_pairs("x", "y").unwrap(),
            vec![(1.0, 10.0), (3.0, 30.0)]
        );
    }
}
