//! ROM Definition File Parser
//!
//! Parses XML definition files that map named calibration tables to
//! their addresses in a ROM image. A definition describes:
//! - Table names and absolute ROM addresses
//! - Storage type, element count, and byte order per table
//! - Linear scaling into engineering units
//!
//! The definition and the ROM are independent artifacts; address
//! bounds are validated at resolve time, not here.

mod parser;
mod types;
mod error;

pub use error::{DefError, DefWarning};
pub use types::{DataType, Endianness, Scaling, TableDescriptor};

use std::collections::HashMap;
use std::path::Path;

/// A loaded ROM definition: the table address map plus any warnings
/// recorded during extraction. Immutable after parse; reloading a
/// definition replaces the whole structure.
#[derive(Debug, Clone, Default)]
pub struct RomDefinition {
    tables: HashMap<String, TableDescriptor>,
    warnings: Vec<DefWarning>,
}

impl RomDefinition {
    /// Parse a definition from an XML file.
    ///
    /// Handles non-UTF-8 encodings (Windows-1252, Latin-1) by falling
    /// back to lossy conversion, since definition files in the wild
    /// are not consistently encoded.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DefError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                let bytes = std::fs::read(path)?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Err(e) => return Err(e.into()),
        };
        let defs = Self::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            tables = defs.len(),
            warnings = defs.warnings().len(),
            "loaded ROM definition"
        );
        Ok(defs)
    }

    /// Parse a definition from XML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &str) -> Result<Self, DefError> {
        let parsed = parser::parse_defs(xml)?;
        Ok(Self {
            tables: parsed.tables,
            warnings: parsed.warnings,
        })
    }

    /// Look up a table descriptor by name
    pub fn get(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.get(name)
    }

    /// All known table names, sorted for deterministic iteration
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of tables in the definition
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the definition contains no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Warnings recorded while parsing (skipped entries, duplicates)
    pub fn warnings(&self) -> &[DefWarning] {
        &self.warnings
    }
}
