//! ROM Image Model
//!
//! The loaded ROM byte buffer and the resolver that reads calibration
//! tables out of it by name.

mod image;
mod values;
pub mod resolver;

pub use image::{RomError, RomImage};
pub use resolver::{resolve, resolve_all, ResolveError};
pub use values::{ResolvedValue, ValueData};
