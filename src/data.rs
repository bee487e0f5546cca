//! Data section output.
//!
//! Include data is printed as `.db` rows; binary data is copied out as is.

use crate::formatter::{format_label, INDENT, MNEMONIC_WIDTH, OPERAND_GAP};
use crate::memory::ByteSource;
use crate::section::Section;

/// Bytes per `.db` row.
pub const BYTES_PER_ROW: usize = 8;

/// Raw bytes covered by a section.
pub fn section_bytes<S: ByteSource + ?Sized>(source: &S, section: &Section) -> Vec<u8> {
    (0..section.size)
        .map(|offset| source.read_byte(section.start + offset))
        .collect()
}

/// `.db` listing of a section, preceded by its label.
///
/// ```
/// use huc6280_disasm::data::format_include_data;
/// use huc6280_disasm::{Section, SectionKind};
///
/// let rom: &[u8] = &[1, 2, 3];
/// let section = Section::new("tbl", 0, SectionKind::IncludeData, 0, 0xE000, 3);
/// assert_eq!(
///     format_include_data(rom, &section),
///     "tbl:\n          .db     $01, $02, $03\n"
/// );
/// ```
pub fn format_include_data<S: ByteSource + ?Sized>(source: &S, section: &Section) -> String {
    let bytes = section_bytes(source, section);
    let mut out = String::with_capacity(bytes.len() * 5 + section.name.len() + 2);

    out.push_str(&format_label(&section.name));
    out.push('\n');
    for row in bytes.chunks(BYTES_PER_ROW) {
        let values: Vec<String> = row.iter().map(|b| format!("${b:02x}")).collect();
        out.push_str(&format!(
            "{:indent$}{:<mw$}{:gap$}{}\n",
            "",
            ".db",
            "",
            values.join(", "),
            indent = INDENT,
            mw = MNEMONIC_WIDTH,
            gap = OPERAND_GAP
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionKind;

    #[test]
    fn test_rows_of_eight() {
        let rom: Vec<u8> = (0..10).collect();
        let section = Section::new("t", 0, SectionKind::IncludeData, 0, 0xE000, 10);
        let text = format_include_data(&rom[..], &section);

        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "t:",
                "          .db     $00, $01, $02, $03, $04, $05, $06, $07",
                "          .db     $08, $09",
            ]
        );
    }

    #[test]
    fn test_full_row_ends_with_newline() {
        let rom = [0xAAu8; 16];
        let section = Section::new("t", 0, SectionKind::IncludeData, 0, 0xE000, 16);
        let text = format_include_data(&rom[..], &section);

        assert_eq!(text.matches(".db").count(), 2);
        assert!(text.ends_with("$aa, $aa\n"));
    }

    #[test]
    fn test_bytes_follow_bank() {
        let mut rom = vec![0u8; 0x4000];
        rom[0x2010] = 0xAB;
        rom[0x2011] = 0xCD;
        let section = Section::new("gfx", 1, SectionKind::BinaryData, 1, 0x4010, 2);

        assert_eq!(section_bytes(&rom[..], &section), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_past_end_reads_open_bus() {
        let rom = [0x11u8];
        let section = Section::new("t", 0, SectionKind::BinaryData, 0, 0xE000, 3);
        assert_eq!(section_bytes(&rom[..], &section), vec![0x11, 0xFF, 0xFF]);
    }
}
