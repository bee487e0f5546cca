//! Fuzz target for the two passes.
//!
//! This target feeds arbitrary ROM bytes and section placement through label
//! extraction and disassembly to find edge cases and crashes in decoding.

#![no_main]

use arbitrary::Arbitrary;
use huc6280_disasm::pass::{perform, DisassemblyPass, LabelExtractionPass};
use huc6280_disasm::{LabelRepository, OpcodeTable, Section, SectionKind};
use libfuzzer_sys::fuzz_target;

/// Section placement for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzSection {
    bank: u8,
    origin: u16,
    size: u16,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    section: FuzzSection,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to prevent OOM
    if input.bytes.len() > 65536 {
        return;
    }

    // Keep the section inside the image; size 0 exercises routine detection
    let bank = (input.section.bank as usize % (input.bytes.len() / 0x2000 + 1)) as u8;
    let mut section = Section::new(
        "fuzz",
        0,
        SectionKind::Code,
        bank,
        input.section.origin,
        input.section.size as u32,
    );
    let table = OpcodeTable::huc6280();
    let mut labels = LabelRepository::new();

    let mut extract = LabelExtractionPass::new(table, &input.bytes[..], &section, &mut labels);
    let extracted = perform(&mut extract);
    let count = extract.instructions();
    let resolved = extract.resolved_size();
    if extracted.is_err() {
        return;
    }
    if let Some(size) = resolved {
        section.size = size;
    }

    let mut disassembly = DisassemblyPass::new(table, &input.bytes[..], &section, &labels);
    perform(&mut disassembly).expect("disassembly failed after a successful extraction");

    // Both passes walk the same instructions
    let text = disassembly.output().unwrap_or_default();
    let lines = text.lines().filter(|line| line.starts_with("          ")).count();
    assert_eq!(lines, count);
});
