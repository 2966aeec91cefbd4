//! Error and warning types for definition parsing

use thiserror::Error;

/// Errors that can occur while loading a definition file
#[derive(Error, Debug)]
pub enum DefError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    MalformedAttr(#[from] quick_xml::events::attributes::AttrError),
}

/// Non-fatal problems recorded while parsing a definition.
///
/// A bad entry is skipped rather than failing the whole load; the
/// warning keeps the loss visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefWarning {
    /// A table's address attribute was not valid hexadecimal
    BadAddress { name: String, address: String },

    /// A table's type attribute was not a known storage type
    BadDataType { name: String, data_type: String },

    /// A later table entry replaced an earlier one with the same name
    DuplicateName { name: String },
}

impl std::fmt::Display for DefWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefWarning::BadAddress { name, address } => {
                write!(f, "table '{}' skipped: bad hex address '{}'", name, address)
            }
            DefWarning::BadDataType { name, data_type } => {
                write!(f, "table '{}' skipped: unknown type '{}'", name, data_type)
            }
            DefWarning::DuplicateName { name } => {
                write!(f, "table '{}' defined more than once, last wins", name)
            }
        }
    }
}
