//! Analysis session state
//!
//! Holds the three independently loaded artifacts (definition, ROM
//! image, datalog) and ties them together into a report. Each load
//! replaces its slot wholesale, so an analysis only ever sees one
//! consistent snapshot of each artifact.

use std::path::Path;

use thiserror::Error;

use crate::analysis::{build_report, Report, ReportOptions};
use crate::datalog::{DataLog, LogError};
use crate::defs::{DefError, RomDefinition};
use crate::rom::{resolve_all, RomError, RomImage};

/// Errors surfaced by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no datalog loaded")]
    NoLog,

    #[error(transparent)]
    Definition(#[from] DefError),

    #[error(transparent)]
    Rom(#[from] RomError),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// One analysis session: the loaded artifacts plus report options
#[derive(Debug, Default)]
pub struct AnalysisSession {
    defs: Option<RomDefinition>,
    rom: Option<RomImage>,
    log: Option<DataLog>,
}

impl AnalysisSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ROM definition file, replacing any previous one
    pub fn load_definition<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        self.defs = Some(RomDefinition::from_file(path)?);
        Ok(())
    }

    /// Load a ROM image file, replacing any previous one
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        self.rom = Some(RomImage::from_file(path)?);
        Ok(())
    }

    /// Load a datalog CSV file, replacing any previous one
    pub fn load_log<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        self.log = Some(DataLog::from_csv_file(path)?);
        Ok(())
    }

    /// Set the definition directly
    pub fn set_definition(&mut self, defs: RomDefinition) {
        self.defs = Some(defs);
    }

    /// Set the ROM image directly
    pub fn set_rom(&mut self, rom: RomImage) {
        self.rom = Some(rom);
    }

    /// Set the datalog directly
    pub fn set_log(&mut self, log: DataLog) {
        self.log = Some(log);
    }

    /// The loaded definition, if any
    pub fn definition(&self) -> Option<&RomDefinition> {
        self.defs.as_ref()
    }

    /// The loaded ROM image, if any
    pub fn rom(&self) -> Option<&RomImage> {
        self.rom.as_ref()
    }

    /// The loaded datalog, if any
    pub fn log(&self) -> Option<&DataLog> {
        self.log.as_ref()
    }

    /// True when all three artifacts are loaded
    pub fn is_ready(&self) -> bool {
        self.defs.is_some() && self.rom.is_some() && self.log.is_some()
    }

    /// Build a report from the loaded datalog.
    ///
    /// Requires only the log. When both a definition and a ROM are
    /// also loaded, every known table is resolved and the successes
    /// attached as reference values; per-table failures become report
    /// warnings rather than errors, since a ROM/definition mismatch
    /// should not hide the log analysis.
    pub fn analyze(&self, options: &ReportOptions) -> Result<Report, SessionError> {
        let log = self.log.as_ref().ok_or(SessionError::NoLog)?;
        let mut report = build_report(log, options);

        if let (Some(defs), Some(rom)) = (&self.defs, &self.rom) {
            for (name, result) in resolve_all(defs, rom) {
                match result {
                    Ok(value) => report.reference_values.push(value),
                    Err(e) => {
                        tracing::warn!(table = %name, error = %e, "reference value unavailable");
                        report.reference_warnings.push(e.to_string());
                    }
                }
            }
        }

        Ok(report)
    }
}
