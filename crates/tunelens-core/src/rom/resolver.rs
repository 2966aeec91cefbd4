//! Table resolver
//!
//! Resolves a table name against a definition and a ROM image:
//! lookup, bounds-checked read, decode per storage type and byte
//! order, scale into engineering units. Resolution is a pure function
//! of its inputs; nothing is cached, so callers can re-resolve after
//! swapping in a matching ROM.

use crate::defs::RomDefinition;
use thiserror::Error;

use super::image::RomImage;
use super::values::{ResolvedValue, ValueData};

/// Errors that can occur resolving a table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("table '{name}' at {address:#x} ({len} bytes) is outside the {rom_size:#x}-byte ROM")]
    AddressOutOfBounds {
        name: String,
        address: u32,
        len: usize,
        rom_size: usize,
    },
}

/// Resolve one table by name.
pub fn resolve(
    defs: &RomDefinition,
    rom: &RomImage,
    name: &str,
) -> Result<ResolvedValue, ResolveError> {
    let desc = defs
        .get(name)
        .ok_or_else(|| ResolveError::UnknownTable(name.to_string()))?;

    // An overflowed span can never fit a real image; saturate so the
    // bounds check below rejects it instead of wrapping.
    let span = desc.size_bytes().unwrap_or(usize::MAX);
    let bytes = match rom.read(desc.address as usize, span) {
        Ok(bytes) => bytes,
        Err(_) => {
            return Err(ResolveError::AddressOutOfBounds {
                name: desc.name.clone(),
                address: desc.address,
                len: span,
                rom_size: rom.len(),
            })
        }
    };

    let width = desc.data_type.size_bytes();
    let mut decoded = Vec::with_capacity(desc.elements);
    for i in 0..desc.elements {
        // Span was bounds-checked above, so every element decode succeeds
        if let Some(raw) = desc.data_type.read_from_bytes(bytes, i * width, desc.endianness) {
            decoded.push(desc.scaling.raw_to_display(raw));
        }
    }

    tracing::debug!(table = %desc.name, address = desc.address, elements = decoded.len(), "resolved table");

    let data = match decoded.as_slice() {
        [v] if desc.elements == 1 => ValueData::Scalar(*v),
        _ => ValueData::Series(decoded),
    };
    Ok(ResolvedValue {
        name: desc.name.clone(),
        units: desc.scaling.units.clone(),
        data,
    })
}

/// Resolve every table in the definition, in name order.
///
/// Per-table failures do not stop the sweep; each name gets its own
/// result so a ROM/definition mismatch surfaces as individual
/// `AddressOutOfBounds` entries.
pub fn resolve_all(
    defs: &RomDefinition,
    rom: &RomImage,
) -> Vec<(String, Result<ResolvedValue, ResolveError>)> {
    defs.names()
        .into_iter()
        .map(|name| (name.to_string(), resolve(defs, rom, name)))
        .collect()
}
