//! # ROM Byte Source
//!
//! This module provides the `ByteSource` trait that decouples the passes from
//! the way ROM bytes are stored. The passes only ever read single bytes at
//! 21-bit physical addresses.
//!
//! ## Design Principles
//!
//! - No read errors: out-of-range reads return a fill value, like an open bus
//! - The whole image is resident before a pass starts
//! - `len()` lets the passes bound auto-sized sections

use std::path::Path;

/// Value returned for reads past the end of an image.
pub const OPEN_BUS: u8 = 0xFF;

/// Size of a HuCard bank.
pub const BANK_SIZE: usize = 0x2000;

/// Read-only physical byte source.
///
/// # Examples
///
/// ```
/// use huc6280_disasm::{ByteSource, RomImage};
///
/// let rom = RomImage::new(vec![0xA9, 0x05, 0x60]);
/// assert_eq!(rom.read_byte(1), 0x05);
/// assert_eq!(rom.read_byte(0x1000), 0xFF);
/// assert_eq!(rom.len(), 3);
/// ```
pub trait ByteSource {
    /// Reads a byte from a physical address.
    ///
    /// This method must never panic. Addresses outside the image return
    /// [`OPEN_BUS`].
    fn read_byte(&self, physical: u32) -> u8;

    /// Number of addressable bytes.
    fn len(&self) -> u32;

    /// True if the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory ROM image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    /// Wrap raw bytes with no header handling.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Build an image from a HuCard dump.
    ///
    /// Dumps whose size is not a multiple of 8KB carry a copier header of
    /// `len % 8KB` bytes that is dropped. CD-ROM images are kept verbatim.
    pub fn from_dump(mut data: Vec<u8>, cdrom: bool) -> Self {
        if !cdrom {
            let header = data.len() % BANK_SIZE;
            if header != 0 {
                log::info!("skipping {header} byte ROM header");
                data.drain(..header);
            }
        }
        Self { data }
    }

    /// Load a dump from disk.
    pub fn load(path: impl AsRef<Path>, cdrom: bool) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::from_dump(data, cdrom))
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl ByteSource for RomImage {
    fn read_byte(&self, physical: u32) -> u8 {
        self.data.get(physical as usize).copied().unwrap_or(OPEN_BUS)
    }

    fn len(&self) -> u32 {
        self.data.len() as u32
    }
}

impl ByteSource for [u8] {
    fn read_byte(&self, physical: u32) -> u8 {
        self.get(physical as usize).copied().unwrap_or(OPEN_BUS)
    }

    fn len(&self) -> u32 {
        <[u8]>::len(self) as u32
    }
}
