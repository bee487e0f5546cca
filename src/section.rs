//! Sections and the decode cursor.

use crate::mapping::{AddressTranslator, PAGE_MASK, PAGE_SHIFT};

/// Kind of region a section describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Code, disassembled in two passes.
    Code,
    /// Raw binary data copied to its own file.
    BinaryData,
    /// Data emitted as `.db` rows.
    IncludeData,
}

impl SectionKind {
    /// Name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Code => "code",
            SectionKind::BinaryData => "bin_data",
            SectionKind::IncludeData => "inc_data",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous region of the ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section name, also the label of its first byte.
    pub name: String,
    /// Position in the run, embedded in generated label names.
    pub id: u8,
    /// Region kind.
    pub kind: SectionKind,
    /// ROM bank holding the first byte.
    pub bank: u8,
    /// Logical address of the first byte.
    pub logical_origin: u16,
    /// Size in bytes. 0 asks the extraction pass to find the end of the
    /// routine.
    pub size: u32,
    /// Physical address of the first byte.
    pub start: u32,
    /// Bank registers in effect while the section runs.
    pub mpr: AddressTranslator,
    /// Output file name.
    pub output: String,
}

impl Section {
    /// Build a section with the reset MPR state and a default output file.
    pub fn new(
        name: impl Into<String>,
        id: u8,
        kind: SectionKind,
        bank: u8,
        logical_origin: u16,
        size: u32,
    ) -> Self {
        let name = name.into();
        let output = default_output(&name, kind);
        Self {
            start: ((bank as u32) << PAGE_SHIFT) | (logical_origin as u32 & PAGE_MASK),
            mpr: AddressTranslator::for_origin(bank, logical_origin),
            name,
            id,
            kind,
            bank,
            logical_origin,
            size,
            output,
        }
    }

    /// True if the size has to be detected.
    pub fn is_auto_sized(&self) -> bool {
        self.size == 0
    }

    /// Cursor on the first byte.
    pub fn cursor(&self) -> DecodeCursor {
        DecodeCursor {
            physical: self.start,
            logical: self.logical_origin,
            offset: 0,
        }
    }
}

fn default_output(name: &str, kind: SectionKind) -> String {
    match kind {
        SectionKind::BinaryData => format!("{name}.bin"),
        SectionKind::Code | SectionKind::IncludeData => format!("{name}.asm"),
    }
}

/// Position of the next instruction inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeCursor {
    /// Physical address.
    pub physical: u32,
    /// Logical address.
    pub logical: u16,
    /// Bytes consumed since the section start.
    pub offset: u32,
}

impl DecodeCursor {
    /// Cursor `size` bytes further on.
    pub fn advance(self, size: u8) -> Self {
        Self {
            physical: self.physical + size as u32,
            logical: self.logical.wrapping_add(size as u16),
            offset: self.offset + size as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_start() {
        let section = Section::new("main", 0, SectionKind::Code, 0x1F, 0xE010, 0);
        assert_eq!(section.start, (0x1F << 13) | 0x0010);
        assert_eq!(section.mpr.bank(7), 0x1F);
        assert!(section.is_auto_sized());
        assert_eq!(section.output, "main.asm");
    }

    #[test]
    fn test_binary_output_name() {
        let section = Section::new("gfx", 3, SectionKind::BinaryData, 2, 0x4000, 0x100);
        assert_eq!(section.output, "gfx.bin");
    }

    #[test]
    fn test_cursor_advance() {
        let cursor = DecodeCursor {
            physical: 0x2000,
            logical: 0xFFFE,
            offset: 4,
        };
        let next = cursor.advance(3);
        assert_eq!(next.physical, 0x2003);
        assert_eq!(next.logical, 0x0001);
        assert_eq!(next.offset, 7);
    }
}
