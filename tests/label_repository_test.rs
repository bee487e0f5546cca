//! Label repository behaviour across a run.

use huc6280_disasm::labels::generated_name;
use huc6280_disasm::pass::{perform, LabelExtractionPass};
use huc6280_disasm::{LabelError, LabelKind, LabelRepository, OpcodeTable, Section, SectionKind};

#[test]
fn test_generated_names_are_bit_exact() {
    assert_eq!(generated_name(0x04A0, 7), "l04a0_07");
    assert_eq!(generated_name(0x0000, 0), "l0000_00");
    assert_eq!(generated_name(0xFFFF, 99), "lffff_99");
}

#[test]
fn test_user_duplicate_is_an_error() {
    let mut labels = LabelRepository::new();
    labels.add("main", 0xE000, Some(0), LabelKind::User).unwrap();

    assert_eq!(
        labels.add("main", 0xE100, Some(0x100), LabelKind::User),
        Err(LabelError::Duplicate {
            name: "main".to_string()
        })
    );
}

#[test]
fn test_sections_share_one_repository() {
    // Two sections in different banks both branching to $e002
    let mut rom = vec![0xEA; 0x4000];
    for base in [0x0000, 0x2000] {
        rom[base] = 0x80; // BRA +0
        rom[base + 1] = 0x00;
        rom[base + 2] = 0x60;
    }
    let first = Section::new("first", 0, SectionKind::Code, 0, 0xE000, 0);
    let second = Section::new("second", 1, SectionKind::Code, 1, 0xE000, 0);
    let mut labels = LabelRepository::new();

    for section in [&first, &second] {
        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom[..], section, &mut labels);
        perform(&mut pass).unwrap();
    }

    // Same logical target, distinct names and physical addresses
    assert_eq!(labels.find_by_physical(0x0002), Some("le002_00"));
    assert_eq!(labels.find_by_physical(0x2002), Some("le002_01"));
    assert_eq!(labels.find_by_logical(0xE002), Some("le002_00"));
    assert_eq!(
        labels.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        vec!["first", "le002_00", "second", "le002_01"]
    );
}
