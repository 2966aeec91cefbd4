//! Log file reading and writing
//!
//! CSV is the interchange format for ECU logs: first row is the
//! channel header, every following row is one sample.

use std::path::Path;

use thiserror::Error;

use super::{DataLog, LogEntry};

/// Errors that can occur reading or writing a log file
#[derive(Error, Debug)]
pub enum LogError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Parse a datalog from CSV text.
///
/// Non-numeric cells become NaN placeholders rather than failing the
/// load; short rows are padded the same way so every entry matches
/// the header width.
pub fn read_csv_str(text: &str) -> Result<DataLog, LogError> {
    read_csv_reader(csv::ReaderBuilder::new().flexible(true).from_reader(text.as_bytes()))
}

/// Load a datalog from a CSV file.
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<DataLog, LogError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let log = read_csv_reader(reader)?;
    tracing::info!(
        path = %path.display(),
        channels = log.channels().len(),
        rows = log.len(),
        "loaded datalog"
    );
    Ok(log)
}

fn read_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<DataLog, LogError> {
    let channels: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut values: Vec<f64> = record
            .iter()
            .map(|cell| cell.trim().parse::<f64>().unwrap_or(f64::NAN))
            .collect();
        values.resize(channels.len(), f64::NAN);
        entries.push(LogEntry::new(values));
    }

    Ok(DataLog::new(channels, entries))
}

/// Write a datalog to a CSV file.
pub fn write_csv<P: AsRef<Path>>(path: P, log: &DataLog) -> Result<(), LogError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(log.channels())?;
    for entry in log.entries() {
        writer.write_record(entry.values.iter().map(|v| format!("{:.4}", v)))?;
    }
    writer.flush()?;
    Ok(())
}
