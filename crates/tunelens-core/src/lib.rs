//! # tunelens Core Library
//!
//! Core functionality for tunelens ECU log and ROM analysis.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - XML ROM definition parsing (table name → address map)
//! - An immutable ROM image model with bounds-checked reads
//! - Table resolution: decode and scale calibration values by name
//! - Datalog (CSV) ingestion as named numeric channels
//! - Analysis report building (summary metrics and plot series)
//!
//! ## Example
//!
//! ```rust,ignore
//! use tunelens_core::prelude::*;
//!
//! let mut session = AnalysisSession::new();
//! session.load_definition("defs/ej257.xml")?;
//! session.load_rom("roms/stock.bin")?;
//! session.load_log("logs/pull-3.csv")?;
//!
//! let report = session.analyze(&ReportOptions::default())?;
//! println!("max boost: {:.1} psi", report.metric("max_boost").unwrap_or(0.0));
//! ```

pub mod analysis;
pub mod datalog;
pub mod defs;
pub mod rom;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::{build_report, PlotSeries, Report, ReportOptions};
    pub use crate::datalog::{DataLog, LogEntry};
    pub use crate::defs::{RomDefinition, TableDescriptor};
    pub use crate::rom::{resolve, resolve_all, ResolvedValue, RomImage};
    pub use crate::session::AnalysisSession;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
