//! ROM image buffer
//!
//! Wraps a loaded ROM dump as an immutable byte buffer with
//! bounds-checked reads. The image is treated as read-only evidence;
//! there is no write path, so a user's calibration file can never be
//! corrupted from here.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur accessing a ROM image
#[derive(Error, Debug)]
pub enum RomError {
    #[error("read of {len} bytes at offset {offset:#x} exceeds ROM size {size:#x}")]
    OutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// An immutable ROM image
#[derive(Debug, Clone, Default)]
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    /// Wrap raw bytes as a ROM image
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Load a ROM image from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let image = Self::new(data);
        tracing::info!(
            path = %path.display(),
            size = image.len(),
            checksum = format!("{:08x}", image.checksum()),
            "loaded ROM image"
        );
        Ok(image)
    }

    /// Size of the image in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the image is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read `len` bytes starting at `offset`.
    ///
    /// Fails with `OutOfRange` when the span extends past the end of
    /// the image. A zero-length read at any offset up to and
    /// including the image size succeeds.
    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8], RomError> {
        let end = offset.checked_add(len).ok_or(RomError::OutOfRange {
            offset,
            len,
            size: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(RomError::OutOfRange {
                offset,
                len,
                size: self.data.len(),
            });
        }
        Ok(&self.data[offset..end])
    }

    /// CRC32 of the whole image, used to identify a loaded ROM in logs
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_in_bounds() {
        let rom = RomImage::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(rom.read(1, 3).unwrap(), &[2, 3, 4]);
        assert_eq!(rom.read(0, 5).unwrap(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_out_of_range() {
        let rom = RomImage::new(vec![0; 16]);
        assert!(matches!(
            rom.read(10, 8),
            Err(RomError::OutOfRange {
                offset: 10,
                len: 8,
                size: 16
            })
        ));
        assert!(rom.read(16, 1).is_err());
        assert!(rom.read(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_zero_length_read() {
        let rom = RomImage::new(vec![0; 4]);
        assert_eq!(rom.read(4, 0).unwrap(), &[] as &[u8]);
        assert!(rom.read(5, 0).is_err());
    }

    #[test]
    fn test_empty_image() {
        let rom = RomImage::default();
        assert!(rom.is_empty());
        assert!(rom.read(0, 1).is_err());
        assert_eq!(rom.read(0, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_checksum_stable() {
        let rom = RomImage::new(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(rom.checksum(), rom.checksum());
        assert_ne!(rom.checksum(), RomImage::new(vec![0xFF]).checksum());
    }
}
