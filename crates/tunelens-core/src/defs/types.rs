//! Definition data model
//!
//! Types describing one calibration table entry: storage type,
//! byte order, and the linear scaling into engineering units.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

/// Storage type of a table element in the ROM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DataType {
    /// Unsigned 8-bit integer
    #[default]
    U08,
    /// Signed 8-bit integer
    S08,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 16-bit integer
    S16,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 32-bit integer
    S32,
    /// 32-bit floating point
    F32,
}

/// Byte order of multi-byte table elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Endianness {
    /// Big-endian (Subaru ECUs store calibration data big-endian)
    #[default]
    Big,
    /// Little-endian
    Little,
}

impl DataType {
    /// Parse a storage type from a definition attribute.
    ///
    /// Accepts both short forms (`u8`, `s16`) and the INI-style
    /// vocabulary (`U08`, `SWORD`) used by other definition formats.
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "U8" | "U08" | "UINT8" | "BYTE" => Some(DataType::U08),
            "S8" | "S08" | "INT8" | "SBYTE" => Some(DataType::S08),
            "U16" | "UINT16" | "WORD" => Some(DataType::U16),
            "S16" | "INT16" | "SWORD" => Some(DataType::S16),
            "U32" | "UINT32" | "DWORD" => Some(DataType::U32),
            "S32" | "INT32" | "SDWORD" => Some(DataType::S32),
            "F32" | "FLOAT" => Some(DataType::F32),
            _ => None,
        }
    }

    /// Get the size in bytes of one element of this type
    pub fn size_bytes(&self) -> usize {
        match self {
            DataType::U08 | DataType::S08 => 1,
            DataType::U16 | DataType::S16 => 2,
            DataType::U32 | DataType::S32 | DataType::F32 => 4,
        }
    }

    /// Decode one element from `bytes` at `offset` with the given byte order.
    ///
    /// Returns `None` when fewer than `size_bytes()` bytes remain.
    pub fn read_from_bytes(&self, data: &[u8], offset: usize, endian: Endianness) -> Option<f64> {
        if offset + self.size_bytes() > data.len() {
            return None;
        }

        let bytes = &data[offset..];
        let value = match (self, endian) {
            (DataType::U08, _) => bytes[0] as f64,
            (DataType::S08, _) => bytes[0] as i8 as f64,
            (DataType::U16, Endianness::Big) => BigEndian::read_u16(bytes) as f64,
            (DataType::U16, Endianness::Little) => LittleEndian::read_u16(bytes) as f64,
            (DataType::S16, Endianness::Big) => BigEndian::read_i16(bytes) as f64,
            (DataType::S16, Endianness::Little) => LittleEndian::read_i16(bytes) as f64,
            (DataType::U32, Endianness::Big) => BigEndian::read_u32(bytes) as f64,
            (DataType::U32, Endianness::Little) => LittleEndian::read_u32(bytes) as f64,
            (DataType::S32, Endianness::Big) => BigEndian::read_i32(bytes) as f64,
            (DataType::S32, Endianness::Little) => LittleEndian::read_i32(bytes) as f64,
            (DataType::F32, Endianness::Big) => BigEndian::read_f32(bytes) as f64,
            (DataType::F32, Endianness::Little) => LittleEndian::read_f32(bytes) as f64,
        };
        Some(value)
    }
}

impl Endianness {
    /// Parse a byte order from a definition attribute
    pub fn from_attr(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "big" | "be" => Some(Endianness::Big),
            "little" | "le" => Some(Endianness::Little),
            _ => None,
        }
    }
}

/// Linear transform from raw stored values to engineering units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    /// Multiply raw by this
    pub multiplier: f64,

    /// Add this after multiplying
    pub offset: f64,

    /// Unit of measurement for display
    pub units: String,
}

impl Scaling {
    /// Identity scaling with no units
    pub fn identity() -> Self {
        Self {
            multiplier: 1.0,
            offset: 0.0,
            units: String::new(),
        }
    }

    /// Convert a raw value to engineering units
    pub fn raw_to_display(&self, raw: f64) -> f64 {
        raw * self.multiplier + self.offset
    }

    /// Convert an engineering-unit value back to raw
    pub fn display_to_raw(&self, display: f64) -> f64 {
        (display - self.offset) / self.multiplier
    }
}

impl Default for Scaling {
    fn default() -> Self {
        Self::identity()
    }
}

/// One named calibration table extracted from a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name, unique within a definition (last wins on duplicate)
    pub name: String,

    /// Absolute byte offset into the ROM image
    pub address: u32,

    /// Storage type of each element
    pub data_type: DataType,

    /// Number of elements (1 = scalar, >1 = 1-D table)
    pub elements: usize,

    /// Byte order of multi-byte elements
    pub endianness: Endianness,

    /// Raw-to-display transform
    pub scaling: Scaling,
}

impl TableDescriptor {
    /// Create a scalar descriptor with defaults (u8, big-endian, identity scaling)
    pub fn new(name: impl Into<String>, address: u32) -> Self {
        Self {
            name: name.into(),
            address,
            data_type: DataType::default(),
            elements: 1,
            endianness: Endianness::default(),
            scaling: Scaling::identity(),
        }
    }

    /// Total byte span this table occupies in the ROM.
    ///
    /// `None` when the element count overflows the address space;
    /// `elements` comes straight from the definition file and is not
    /// capped at parse time.
    pub fn size_bytes(&self) -> Option<usize> {
        self.data_type.size_bytes().checked_mul(self.elements)
    }
}
