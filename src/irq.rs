//! Interrupt vector discovery.
//!
//! A HuCard boots with bank 0 mapped at `$E000`, so the vector table at
//! logical `$FFF6` sits at physical `$1FF6` of the image.

use crate::memory::ByteSource;
use crate::section::{Section, SectionKind};

/// Physical address of the vector table.
pub const VECTOR_TABLE: u32 = 0x1FF6;

/// Logical address of the vector table.
pub const VECTOR_ORIGIN: u16 = 0xFFF6;

/// Vector names, in table order.
pub const VECTOR_NAMES: [&str; 5] = ["irq_2", "irq_1", "irq_timer", "irq_nmi", "irq_reset"];

/// Read the five interrupt vectors.
pub fn read_vectors<S: ByteSource + ?Sized>(source: &S) -> [u16; 5] {
    let mut vectors = [0u16; 5];
    for (i, vector) in vectors.iter_mut().enumerate() {
        let at = VECTOR_TABLE + 2 * i as u32;
        *vector = u16::from_le_bytes([source.read_byte(at), source.read_byte(at + 1)]);
    }
    vectors
}

/// One auto-sized code section per vector, numbered from 0.
pub fn vector_sections(vectors: &[u16; 5]) -> Vec<Section> {
    VECTOR_NAMES
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(id, (name, &origin))| {
            log::info!("{name}: ${origin:04x}");
            Section::new(*name, id as u8, SectionKind::Code, 0, origin, 0)
        })
        .collect()
}

/// `.dw` block restoring the vector table, appended to the main file.
pub fn format_vector_table(vectors: &[u16; 5]) -> String {
    let mut out = format!("\t.data\n\t.bank 0\n\t.org ${VECTOR_ORIGIN:04x}\n");
    for vector in vectors {
        out.push_str(&format!("\t.dw ${vector:04x}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RomImage;

    fn rom_with_vectors() -> RomImage {
        let mut data = vec![0u8; 0x2000];
        let vectors: [u16; 5] = [0xE100, 0xE200, 0xE300, 0xE400, 0xE000];
        for (i, v) in vectors.iter().enumerate() {
            let at = 0x1FF6 + 2 * i;
            data[at..at + 2].copy_from_slice(&v.to_le_bytes());
        }
        RomImage::new(data)
    }

    #[test]
    fn test_read_vectors() {
        let vectors = read_vectors(&rom_with_vectors());
        assert_eq!(vectors, [0xE100, 0xE200, 0xE300, 0xE400, 0xE000]);
    }

    #[test]
    fn test_vector_sections() {
        let sections = vector_sections(&[0xE100, 0xE200, 0xE300, 0xE400, 0xE000]);

        assert_eq!(sections.len(), 5);
        assert_eq!(sections[4].name, "irq_reset");
        assert_eq!(sections[4].start, 0x0000);
        assert_eq!(sections[0].start, 0x0100);
        assert!(sections.iter().all(|s| s.is_auto_sized() && s.kind == SectionKind::Code));
    }

    #[test]
    fn test_vector_table_text() {
        let text = format_vector_table(&[1, 2, 3, 4, 0xE000]);
        assert!(text.starts_with("\t.data\n\t.bank 0\n\t.org $fff6\n"));
        assert!(text.ends_with("\t.dw $e000\n"));
        assert_eq!(text.lines().count(), 8);
    }
}
