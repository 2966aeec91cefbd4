//! Resolved table values
//!
//! Decoded, scaled values read out of a ROM image, tagged with the
//! table they came from.

use serde::{Deserialize, Serialize};

/// The decoded value(s) of one calibration table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedValue {
    /// Name of the source table, for traceability
    pub name: String,

    /// Engineering units from the table's scaling ("" when unscaled)
    pub units: String,

    /// The decoded data
    pub data: ValueData,
}

/// Scalar or ordered-sequence payload of a resolved table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueData {
    /// Single-element table
    Scalar(f64),
    /// 1-D table, in address order
    Series(Vec<f64>),
}

impl ResolvedValue {
    /// Get as scalar, returning None for series values
    pub fn as_scalar(&self) -> Option<f64> {
        match self.data {
            ValueData::Scalar(v) => Some(v),
            ValueData::Series(_) => None,
        }
    }

    /// Get as an ordered slice; a scalar is a one-element slice
    pub fn as_slice(&self) -> &[f64] {
        match &self.data {
            ValueData::Scalar(v) => std::slice::from_ref(v),
            ValueData::Series(vs) => vs.as_slice(),
        }
    }

    /// Number of decoded elements
    pub fn len(&self) -> usize {
        match &self.data {
            ValueData::Scalar(_) => 1,
            ValueData::Series(vs) => vs.len(),
        }
    }

    /// Check for an empty series (zero-element table)
    pub fn is_empty(&self) -> bool {
        matches!(&self.data, ValueData::Series(vs) if vs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accessors() {
        let value = ResolvedValue {
            name: "Boost Target".into(),
            units: "psi".into(),
            data: ValueData::Scalar(14.7),
        };
        assert_eq!(value.as_scalar(), Some(14.7));
        assert_eq!(value.as_slice(), &[14.7]);
        assert_eq!(value.len(), 1);
        assert!(!value.is_empty());
    }

    #[test]
    fn test_series_accessors() {
        let value = ResolvedValue {
            name: "Target Boost".into(),
            units: "psi".into(),
            data: ValueData::Series(vec![10.0, 12.0, 14.0]),
        };
        assert_eq!(value.as_scalar(), None);
        assert_eq!(value.as_slice(), &[10.0, 12.0, 14.0]);
        assert_eq!(value.len(), 3);
    }
}
