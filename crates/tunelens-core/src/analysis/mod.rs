//! Analysis Report Builder
//!
//! Turns a datalog into summary statistics and plot-ready series.
//! Channel semantics live here: which columns carry boost, knock, and
//! engine speed, and which metrics the report summarizes. Missing
//! channels degrade gracefully since logged channel sets vary from
//! pull to pull.

use serde::{Deserialize, Serialize};

use crate::datalog::DataLog;
use crate::rom::ResolvedValue;

/// One summary metric to compute: the maximum of a named log column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Short metric key (e.g. "max_boost")
    pub key: String,
    /// Exact log column name to summarize
    pub column: String,
}

/// One (x, y) plot series to extract from the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Series title
    pub title: String,
    /// X-axis column name
    pub x_column: String,
    /// Y-axis column name
    pub y_column: String,
}

/// What the report builder computes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Max-value metrics, in output order
    pub metrics: Vec<MetricSpec>,
    /// Plot series, each omitted when a column is absent
    pub series: Vec<SeriesSpec>,
}

impl ReportOptions {
    fn metric(key: &str, column: &str) -> MetricSpec {
        MetricSpec {
            key: key.to_string(),
            column: column.to_string(),
        }
    }
}

impl Default for ReportOptions {
    /// The stock Subaru channel set: boost, knock corrections, and
    /// injector duty maxes, plus boost-vs-RPM and knock-vs-RPM series.
    fn default() -> Self {
        Self {
            metrics: vec![
                Self::metric("max_boost", "Manifold Absolute Pressure (psi)"),
                Self::metric(
                    "max_knock_feedback",
                    "Feedback Knock Correction (1-byte)** (degrees)",
                ),
                Self::metric(
                    "max_knock_learning",
                    "Fine Learning Knock Correction (degrees)",
                ),
                Self::metric("max_injector_duty", "Injector Duty Cycle (%)"),
            ],
            series: vec![
                SeriesSpec {
                    title: "Boost Pressure vs RPM".into(),
                    x_column: "Engine Speed (rpm)".into(),
                    y_column: "Manifold Absolute Pressure (psi)".into(),
                },
                SeriesSpec {
                    title: "Knock Correction vs RPM".into(),
                    x_column: "Engine Speed (rpm)".into(),
                    y_column: "Feedback Knock Correction (1-byte)** (degrees)".into(),
                },
            ],
        }
    }
}

/// A computed summary metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric key from the options
    pub key: String,
    /// Source column name
    pub column: String,
    /// Maximum observed value, 0.0 when the column was not recorded
    pub value: f64,
}

/// A plot-ready (x, y) series extracted from the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    /// Series title
    pub title: String,
    /// X-axis column name
    pub x_label: String,
    /// Y-axis column name
    pub y_label: String,
    /// Row-paired samples
    pub points: Vec<(f64, f64)>,
}

/// The analysis output: metrics, series, and optional ROM context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Summary metrics in option order
    pub metrics: Vec<Metric>,
    /// Plot series; absent columns omit the series entirely
    pub series: Vec<PlotSeries>,
    /// Calibration values resolved from the ROM, when available.
    /// Additive context only; an empty list is a complete report.
    pub reference_values: Vec<ResolvedValue>,
    /// Problems resolving reference values (e.g. ROM/definition
    /// mismatch), reported without blocking the log analysis
    pub reference_warnings: Vec<String>,
}

impl Report {
    /// Look up a computed metric by key
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.iter().find(|m| m.key == key).map(|m| m.value)
    }

    /// Attach resolved calibration values as comparison context
    pub fn with_reference_values(mut self, values: Vec<ResolvedValue>) -> Self {
        self.reference_values = values;
        self
    }
}

/// Build a report from a datalog.
///
/// Never fails: metrics for unrecorded columns default to 0.0 and
/// series with an unrecorded axis are left out.
pub fn build_report(log: &DataLog, options: &ReportOptions) -> Report {
    let metrics = options
        .metrics
        .iter()
        .map(|spec| {
            let value = log
                .channel_values(&spec.column)
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max);
            Metric {
                key: spec.key.clone(),
                column: spec.column.clone(),
                value: if value.is_finite() { value } else { 0.0 },
            }
        })
        .collect();

    let series = options
        .series
        .iter()
        .filter_map(|spec| {
            let points = log.channel_pairs(&spec.x_column, &spec.y_column)?;
            Some(PlotSeries {
                title: spec.title.clone(),
                x_label: spec.x_column.clone(),
                y_label: spec.y_column.clone(),
                points,
            })
        })
        .collect();

    Report {
        metrics,
        series,
        reference_values: Vec::new(),
        reference_warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalog::LogEntry;
    use pretty_assertions::assert_eq;

    fn make_log(channels: &[&str], rows: &[&[f64]]) -> DataLog {
        DataLog::new(
            channels.iter().map(|c| c.to_string()).collect(),
            rows.iter().map(|r| LogEntry::new(r.to_vec())).collect(),
        )
    }

    #[test]
    fn test_metric_max() {
        let log = make_log(
            &["Engine Speed (rpm)", "Manifold Absolute Pressure (psi)"],
            &[&[1000.0, 5.0], &[2000.0, 18.2], &[3000.0, 12.0]],
        );
        let report = build_report(&log, &ReportOptions::default());
        assert_eq!(report.metric("max_boost"), Some(18.2));
    }

    #[test]
    fn test_missing_column_defaults_to_zero() {
        let log = make_log(&["Engine Speed (rpm)"], &[&[1000.0]]);
        let report = build_report(&log, &ReportOptions::default());
        assert_eq!(report.metric("max_boost"), Some(0.0));
        assert_eq!(report.metric("max_injector_duty"), Some(0.0));
    }

    #[test]
    fn test_missing_column_omits_series() {
        let log = make_log(&["Engine Speed (rpm)"], &[&[1000.0]]);
        let report = build_report(&log, &ReportOptions::default());
        assert!(report.series.is_empty());
    }

    #[test]
    fn test_series_built_when_columns_present() {
        let log = make_log(
            &["Engine Speed (rpm)", "Manifold Absolute Pressure (psi)"],
            &[&[1000.0, 5.0], &[2000.0, 8.5], &[3000.0, 12.0]],
        );
        let report = build_report(&log, &ReportOptions::default());
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series[0].title, "Boost Pressure vs RPM");
        assert_eq!(report.series[0].points.len(), 3);
        assert_eq!(report.series[0].points[1], (2000.0, 8.5));
    }

    #[test]
    fn test_negative_only_column_keeps_true_max() {
        // Knock corrections are usually negative; the max must not be
        // clamped to the missing-column default
        let log = make_log(
            &["Feedback Knock Correction (1-byte)** (degrees)"],
            &[&[-1.4], &[-2.8]],
        );
        let report = build_report(&log, &ReportOptions::default());
        assert_eq!(report.metric("max_knock_feedback"), Some(-1.4));
    }

    #[test]
    fn test_empty_log_never_fails() {
        let log = DataLog::default();
        let report = build_report(&log, &ReportOptions::default());
        assert_eq!(report.metric("max_boost"), Some(0.0));
        assert!(report.series.is_empty());
    }

    #[test]
    fn test_report_json_round_trip() {
        let log = make_log(
            &["Engine Speed (rpm)", "Manifold Absolute Pressure (psi)"],
            &[&[1000.0, 5.0]],
        );
        let report = build_report(&log, &ReportOptions::default());
        let json = serde_json::to_string(&report).expect("serialize");
        let back: Report = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, report);
    }
}
