//! # Opcode Metadata Table
//!
//! This module contains the complete 256-entry opcode table that serves as the
//! single source of truth for HuC6280 instruction decoding.
//!
//! The table covers:
//! - **234 documented instructions**: the 65C02 set plus the HuC6280 extensions
//!   (block transfers, `TST`, `TAM`/`TMA`, `ST0`-`ST2`, speed control).
//! - **22 unused opcodes**: marked [`AddressingMode::Unsupported`] with size 1,
//!   emitted as raw `.db` data by the disassembler.
//!
//! Both disassembly passes decode through an [`OpcodeTable`] handle, never
//! through a private copy, so a change here reaches label extraction and text
//! output at the same time.

use crate::addressing::AddressingMode;

/// Metadata for a single opcode.
///
/// # Examples
///
/// ```
/// use huc6280_disasm::{AddressingMode, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, "LDA");
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.size_bytes, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic (at most 5 characters, `.db` for unused opcodes).
    pub mnemonic: &'static str,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Total instruction size in bytes (opcode + operands), 1 to 7.
    pub size_bytes: u8,

    /// Set on RTS and RTI. Ends an auto-sized routine.
    pub ends_routine: bool,
}

impl OpcodeMetadata {
    const fn new(mnemonic: &'static str, size_bytes: u8, addressing_mode: AddressingMode) -> Self {
        Self {
            mnemonic,
            addressing_mode,
            size_bytes,
            ends_routine: false,
        }
    }

    const fn returning(self) -> Self {
        Self {
            ends_routine: true,
            ..self
        }
    }

    /// True if the opcode is unused on the HuC6280.
    pub fn is_unsupported(&self) -> bool {
        self.addressing_mode == AddressingMode::Unsupported
    }
}

use AddressingMode::*;

const UNUSED: OpcodeMetadata = OpcodeMetadata::new(".db", 1, Unsupported);

/// Complete 256-entry opcode table indexed by opcode byte value.
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = [
    /* 0x00 */ OpcodeMetadata::new("BRK", 1, Implied),
    /* 0x01 */ OpcodeMetadata::new("ORA", 2, ZeroPageIndexedIndirect),
    /* 0x02 */ OpcodeMetadata::new("SXY", 1, Implied),
    /* 0x03 */ OpcodeMetadata::new("ST0", 2, Immediate),
    /* 0x04 */ OpcodeMetadata::new("TSB", 2, ZeroPage),
    /* 0x05 */ OpcodeMetadata::new("ORA", 2, ZeroPage),
    /* 0x06 */ OpcodeMetadata::new("ASL", 2, ZeroPage),
    /* 0x07 */ OpcodeMetadata::new("RMB0", 2, ZeroPage),
    /* 0x08 */ OpcodeMetadata::new("PHP", 1, Implied),
    /* 0x09 */ OpcodeMetadata::new("ORA", 2, Immediate),
    /* 0x0A */ OpcodeMetadata::new("ASL", 1, Accumulator),
    /* 0x0B */ UNUSED,
    /* 0x0C */ OpcodeMetadata::new("TSB", 3, Absolute),
    /* 0x0D */ OpcodeMetadata::new("ORA", 3, Absolute),
    /* 0x0E */ OpcodeMetadata::new("ASL", 3, Absolute),
    /* 0x0F */ OpcodeMetadata::new("BBR0", 3, ZeroPageRelative),
    /* 0x10 */ OpcodeMetadata::new("BPL", 2, Relative),
    /* 0x11 */ OpcodeMetadata::new("ORA", 2, ZeroPageIndirectIndexed),
    /* 0x12 */ OpcodeMetadata::new("ORA", 2, ZeroPageIndirect),
    /* 0x13 */ OpcodeMetadata::new("ST1", 2, Immediate),
    /* 0x14 */ OpcodeMetadata::new("TRB", 2, ZeroPage),
    /* 0x15 */ OpcodeMetadata::new("ORA", 2, ZeroPageX),
    /* 0x16 */ OpcodeMetadata::new("ASL", 2, ZeroPageX),
    /* 0x17 */ OpcodeMetadata::new("RMB1", 2, ZeroPage),
    /* 0x18 */ OpcodeMetadata::new("CLC", 1, Implied),
    /* 0x19 */ OpcodeMetadata::new("ORA", 3, AbsoluteY),
    /* 0x1A */ OpcodeMetadata::new("INC", 1, Accumulator),
    /* 0x1B */ UNUSED,
    /* 0x1C */ OpcodeMetadata::new("TRB", 3, Absolute),
    /* 0x1D */ OpcodeMetadata::new("ORA", 3, AbsoluteX),
    /* 0x1E */ OpcodeMetadata::new("ASL", 3, AbsoluteX),
    /* 0x1F */ OpcodeMetadata::new("BBR1", 3, ZeroPageRelative),
    /* 0x20 */ OpcodeMetadata::new("JSR", 3, AbsoluteJump),
    /* 0x21 */ OpcodeMetadata::new("AND", 2, ZeroPageIndexedIndirect),
    /* 0x22 */ OpcodeMetadata::new("SAX", 1, Implied),
    /* 0x23 */ OpcodeMetadata::new("ST2", 2, Immediate),
    /* 0x24 */ OpcodeMetadata::new("BIT", 2, ZeroPage),
    /* 0x25 */ OpcodeMetadata::new("AND", 2, ZeroPage),
    /* 0x26 */ OpcodeMetadata::new("ROL", 2, ZeroPage),
    /* 0x27 */ OpcodeMetadata::new("RMB2", 2, ZeroPage),
    /* 0x28 */ OpcodeMetadata::new("PLP", 1, Implied),
    /* 0x29 */ OpcodeMetadata::new("AND", 2, Immediate),
    /* 0x2A */ OpcodeMetadata::new("ROL", 1, Accumulator),
    /* 0x2B */ UNUSED,
    /* 0x2C */ OpcodeMetadata::new("BIT", 3, Absolute),
    /* 0x2D */ OpcodeMetadata::new("AND", 3, Absolute),
    /* 0x2E */ OpcodeMetadata::new("ROL", 3, Absolute),
    /* 0x2F */ OpcodeMetadata::new("BBR2", 3, ZeroPageRelative),
    /* 0x30 */ OpcodeMetadata::new("BMI", 2, Relative),
    /* 0x31 */ OpcodeMetadata::new("AND", 2, ZeroPageIndirectIndexed),
    /* 0x32 */ OpcodeMetadata::new("AND", 2, ZeroPageIndirect),
    /* 0x33 */ UNUSED,
    /* 0x34 */ OpcodeMetadata::new("BIT", 2, ZeroPageX),
    /* 0x35 */ OpcodeMetadata::new("AND", 2, ZeroPageX),
    /* 0x36 */ OpcodeMetadata::new("ROL", 2, ZeroPageX),
    /* 0x37 */ OpcodeMetadata::new("RMB3", 2, ZeroPage),
    /* 0x38 */ OpcodeMetadata::new("SEC", 1, Implied),
    /* 0x39 */ OpcodeMetadata::new("AND", 3, AbsoluteY),
    /* 0x3A */ OpcodeMetadata::new("DEC", 1, Accumulator),
    /* 0x3B */ UNUSED,
    /* 0x3C */ OpcodeMetadata::new("BIT", 3, AbsoluteX),
    /* 0x3D */ OpcodeMetadata::new("AND", 3, AbsoluteX),
    /* 0x3E */ OpcodeMetadata::new("ROL", 3, AbsoluteX),
    /* 0x3F */ OpcodeMetadata::new("BBR3", 3, ZeroPageRelative),
    /* 0x40 */ OpcodeMetadata::new("RTI", 1, Implied).returning(),
    /* 0x41 */ OpcodeMetadata::new("EOR", 2, ZeroPageIndexedIndirect),
    /* 0x42 */ OpcodeMetadata::new("SAY", 1, Implied),
    /* 0x43 */ OpcodeMetadata::new("TMA", 2, Mpr),
    /* 0x44 */ OpcodeMetadata::new("BSR", 2, Relative),
    /* 0x45 */ OpcodeMetadata::new("EOR", 2, ZeroPage),
    /* 0x46 */ OpcodeMetadata::new("LSR", 2, ZeroPage),
    /* 0x47 */ OpcodeMetadata::new("RMB4", 2, ZeroPage),
    /* 0x48 */ OpcodeMetadata::new("PHA", 1, Implied),
    /* 0x49 */ OpcodeMetadata::new("EOR", 2, Immediate),
    /* 0x4A */ OpcodeMetadata::new("LSR", 1, Accumulator),
    /* 0x4B */ UNUSED,
    /* 0x4C */ OpcodeMetadata::new("JMP", 3, AbsoluteJump),
    /* 0x4D */ OpcodeMetadata::new("EOR", 3, Absolute),
    /* 0x4E */ OpcodeMetadata::new("LSR", 3, Absolute),
    /* 0x4F */ OpcodeMetadata::new("BBR4", 3, ZeroPageRelative),
    /* 0x50 */ OpcodeMetadata::new("BVC", 2, Relative),
    /* 0x51 */ OpcodeMetadata::new("EOR", 2, ZeroPageIndirectIndexed),
    /* 0x52 */ OpcodeMetadata::new("EOR", 2, ZeroPageIndirect),
    /* 0x53 */ OpcodeMetadata::new("TAM", 2, Mpr),
    /* 0x54 */ OpcodeMetadata::new("CSL", 1, Implied),
    /* 0x55 */ OpcodeMetadata::new("EOR", 2, ZeroPageX),
    /* 0x56 */ OpcodeMetadata::new("LSR", 2, ZeroPageX),
    /* 0x57 */ OpcodeMetadata::new("RMB5", 2, ZeroPage),
    /* 0x58 */ OpcodeMetadata::new("CLI", 1, Implied),
    /* 0x59 */ OpcodeMetadata::new("EOR", 3, AbsoluteY),
    /* 0x5A */ OpcodeMetadata::new("PHY", 1, Implied),
    /* 0x5B */ UNUSED,
    /* 0x5C */ UNUSED,
    /* 0x5D */ OpcodeMetadata::new("EOR", 3, AbsoluteX),
    /* 0x5E */ OpcodeMetadata::new("LSR", 3, AbsoluteX),
    /* 0x5F */ OpcodeMetadata::new("BBR5", 3, ZeroPageRelative),
    /* 0x60 */ OpcodeMetadata::new("RTS", 1, Implied).returning(),
    /* 0x61 */ OpcodeMetadata::new("ADC", 2, ZeroPageIndexedIndirect),
    /* 0x62 */ OpcodeMetadata::new("CLA", 1, Implied),
    /* 0x63 */ UNUSED,
    /* 0x64 */ OpcodeMetadata::new("STZ", 2, ZeroPage),
    /* 0x65 */ OpcodeMetadata::new("ADC", 2, ZeroPage),
    /* 0x66 */ OpcodeMetadata::new("ROR", 2, ZeroPage),
    /* 0x67 */ OpcodeMetadata::new("RMB6", 2, ZeroPage),
    /* 0x68 */ OpcodeMetadata::new("PLA", 1, Implied),
    /* 0x69 */ OpcodeMetadata::new("ADC", 2, Immediate),
    /* 0x6A */ OpcodeMetadata::new("ROR", 1, Accumulator),
    /* 0x6B */ UNUSED,
    /* 0x6C */ OpcodeMetadata::new("JMP", 3, AbsoluteIndirect),
    /* 0x6D */ OpcodeMetadata::new("ADC", 3, Absolute),
    /* 0x6E */ OpcodeMetadata::new("ROR", 3, Absolute),
    /* 0x6F */ OpcodeMetadata::new("BBR6", 3, ZeroPageRelative),
    /* 0x70 */ OpcodeMetadata::new("BVS", 2, Relative),
    /* 0x71 */ OpcodeMetadata::new("ADC", 2, ZeroPageIndirectIndexed),
    /* 0x72 */ OpcodeMetadata::new("ADC", 2, ZeroPageIndirect),
    /* 0x73 */ OpcodeMetadata::new("TII", 7, BlockTransfer),
    /* 0x74 */ OpcodeMetadata::new("STZ", 2, ZeroPageX),
    /* 0x75 */ OpcodeMetadata::new("ADC", 2, ZeroPageX),
    /* 0x76 */ OpcodeMetadata::new("ROR", 2, ZeroPageX),
    /* 0x77 */ OpcodeMetadata::new("RMB7", 2, ZeroPage),
    /* 0x78 */ OpcodeMetadata::new("SEI", 1, Implied),
    /* 0x79 */ OpcodeMetadata::new("ADC", 3, AbsoluteY),
    /* 0x7A */ OpcodeMetadata::new("PLY", 1, Implied),
    /* 0x7B */ UNUSED,
    /* 0x7C */ OpcodeMetadata::new("JMP", 3, AbsoluteIndexedIndirect),
    /* 0x7D */ OpcodeMetadata::new("ADC", 3, AbsoluteX),
    /* 0x7E */ OpcodeMetadata::new("ROR", 3, AbsoluteX),
    /* 0x7F */ OpcodeMetadata::new("BBR7", 3, ZeroPageRelative),
    /* 0x80 */ OpcodeMetadata::new("BRA", 2, Relative),
    /* 0x81 */ OpcodeMetadata::new("STA", 2, ZeroPageIndexedIndirect),
    /* 0x82 */ OpcodeMetadata::new("CLX", 1, Implied),
    /* 0x83 */ OpcodeMetadata::new("TST", 3, ImmediateZeroPage),
    /* 0x84 */ OpcodeMetadata::new("STY", 2, ZeroPage),
    /* 0x85 */ OpcodeMetadata::new("STA", 2, ZeroPage),
    /* 0x86 */ OpcodeMetadata::new("STX", 2, ZeroPage),
    /* 0x87 */ OpcodeMetadata::new("SMB0", 2, ZeroPage),
    /* 0x88 */ OpcodeMetadata::new("DEY", 1, Implied),
    /* 0x89 */ OpcodeMetadata::new("BIT", 2, Immediate),
    /* 0x8A */ OpcodeMetadata::new("TXA", 1, Implied),
    /* 0x8B */ UNUSED,
    /* 0x8C */ OpcodeMetadata::new("STY", 3, Absolute),
    /* 0x8D */ OpcodeMetadata::new("STA", 3, Absolute),
    /* 0x8E */ OpcodeMetadata::new("STX", 3, Absolute),
    /* 0x8F */ OpcodeMetadata::new("BBS0", 3, ZeroPageRelative),
    /* 0x90 */ OpcodeMetadata::new("BCC", 2, Relative),
    /* 0x91 */ OpcodeMetadata::new("STA", 2, ZeroPageIndirectIndexed),
    /* 0x92 */ OpcodeMetadata::new("STA", 2, ZeroPageIndirect),
    /* 0x93 */ OpcodeMetadata::new("TST", 4, ImmediateAbsolute),
    /* 0x94 */ OpcodeMetadata::new("STY", 2, ZeroPageX),
    /* 0x95 */ OpcodeMetadata::new("STA", 2, ZeroPageX),
    /* 0x96 */ OpcodeMetadata::new("STX", 2, ZeroPageY),
    /* 0x97 */ OpcodeMetadata::new("SMB1", 2, ZeroPage),
    /* 0x98 */ OpcodeMetadata::new("TYA", 1, Implied),
    /* 0x99 */ OpcodeMetadata::new("STA", 3, AbsoluteY),
    /* 0x9A */ OpcodeMetadata::new("TXS", 1, Implied),
    /* 0x9B */ UNUSED,
    /* 0x9C */ OpcodeMetadata::new("STZ", 3, Absolute),
    /* 0x9D */ OpcodeMetadata::new("STA", 3, AbsoluteX),
    /* 0x9E */ OpcodeMetadata::new("STZ", 3, AbsoluteX),
    /* 0x9F */ OpcodeMetadata::new("BBS1", 3, ZeroPageRelative),
    /* 0xA0 */ OpcodeMetadata::new("LDY", 2, Immediate),
    /* 0xA1 */ OpcodeMetadata::new("LDA", 2, ZeroPageIndexedIndirect),
    /* 0xA2 */ OpcodeMetadata::new("LDX", 2, Immediate),
    /* 0xA3 */ OpcodeMetadata::new("TST", 3, ImmediateZeroPageX),
    /* 0xA4 */ OpcodeMetadata::new("LDY", 2, ZeroPage),
    /* 0xA5 */ OpcodeMetadata::new("LDA", 2, ZeroPage),
    /* 0xA6 */ OpcodeMetadata::new("LDX", 2, ZeroPage),
    /* 0xA7 */ OpcodeMetadata::new("SMB2", 2, ZeroPage),
    /* 0xA8 */ OpcodeMetadata::new("TAY", 1, Implied),
    /* 0xA9 */ OpcodeMetadata::new("LDA", 2, Immediate),
    /* 0xAA */ OpcodeMetadata::new("TAX", 1, Implied),
    /* 0xAB */ UNUSED,
    /* 0xAC */ OpcodeMetadata::new("LDY", 3, Absolute),
    /* 0xAD */ OpcodeMetadata::new("LDA", 3, Absolute),
    /* 0xAE */ OpcodeMetadata::new("LDX", 3, Absolute),
    /* 0xAF */ OpcodeMetadata::new("BBS2", 3, ZeroPageRelative),
    /* 0xB0 */ OpcodeMetadata::new("BCS", 2, Relative),
    /* 0xB1 */ OpcodeMetadata::new("LDA", 2, ZeroPageIndirectIndexed),
    /* 0xB2 */ OpcodeMetadata::new("LDA", 2, ZeroPageIndirect),
    /* 0xB3 */ OpcodeMetadata::new("TST", 4, ImmediateAbsoluteX),
    /* 0xB4 */ OpcodeMetadata::new("LDY", 2, ZeroPageX),
    /* 0xB5 */ OpcodeMetadata::new("LDA", 2, ZeroPageX),
    /* 0xB6 */ OpcodeMetadata::new("LDX", 2, ZeroPageY),
    /* 0xB7 */ OpcodeMetadata::new("SMB3", 2, ZeroPage),
    /* 0xB8 */ OpcodeMetadata::new("CLV", 1, Implied),
    /* 0xB9 */ OpcodeMetadata::new("LDA", 3, AbsoluteY),
    /* 0xBA */ OpcodeMetadata::new("TSX", 1, Implied),
    /* 0xBB */ UNUSED,
    /* 0xBC */ OpcodeMetadata::new("LDY", 3, AbsoluteX),
    /* 0xBD */ OpcodeMetadata::new("LDA", 3, AbsoluteX),
    /* 0xBE */ OpcodeMetadata::new("LDX", 3, AbsoluteY),
    /* 0xBF */ OpcodeMetadata::new("BBS3", 3, ZeroPageRelative),
    /* 0xC0 */ OpcodeMetadata::new("CPY", 2, Immediate),
    /* 0xC1 */ OpcodeMetadata::new("CMP", 2, ZeroPageIndexedIndirect),
    /* 0xC2 */ OpcodeMetadata::new("CLY", 1, Implied),
    /* 0xC3 */ OpcodeMetadata::new("TDD", 7, BlockTransfer),
    /* 0xC4 */ OpcodeMetadata::new("CPY", 2, ZeroPage),
    /* 0xC5 */ OpcodeMetadata::new("CMP", 2, ZeroPage),
    /* 0xC6 */ OpcodeMetadata::new("DEC", 2, ZeroPage),
    /* 0xC7 */ OpcodeMetadata::new("SMB4", 2, ZeroPage),
    /* 0xC8 */ OpcodeMetadata::new("INY", 1, Implied),
    /* 0xC9 */ OpcodeMetadata::new("CMP", 2, Immediate),
    /* 0xCA */ OpcodeMetadata::new("DEX", 1, Implied),
    /* 0xCB */ UNUSED,
    /* 0xCC */ OpcodeMetadata::new("CPY", 3, Absolute),
    /* 0xCD */ OpcodeMetadata::new("CMP", 3, Absolute),
    /* 0xCE */ OpcodeMetadata::new("DEC", 3, Absolute),
    /* 0xCF */ OpcodeMetadata::new("BBS4", 3, ZeroPageRelative),
    /* 0xD0 */ OpcodeMetadata::new("BNE", 2, Relative),
    /* 0xD1 */ OpcodeMetadata::new("CMP", 2, ZeroPageIndirectIndexed),
    /* 0xD2 */ OpcodeMetadata::new("CMP", 2, ZeroPageIndirect),
    /* 0xD3 */ OpcodeMetadata::new("TIN", 7, BlockTransfer),
    /* 0xD4 */ OpcodeMetadata::new("CSH", 1, Implied),
    /* 0xD5 */ OpcodeMetadata::new("CMP", 2, ZeroPageX),
    /* 0xD6 */ OpcodeMetadata::new("DEC", 2, ZeroPageX),
    /* 0xD7 */ OpcodeMetadata::new("SMB5", 2, ZeroPage),
    /* 0xD8 */ OpcodeMetadata::new("CLD", 1, Implied),
    /* 0xD9 */ OpcodeMetadata::new("CMP", 3, AbsoluteY),
    /* 0xDA */ OpcodeMetadata::new("PHX", 1, Implied),
    /* 0xDB */ UNUSED,
    /* 0xDC */ UNUSED,
    /* 0xDD */ OpcodeMetadata::new("CMP", 3, AbsoluteX),
    /* 0xDE */ OpcodeMetadata::new("DEC", 3, AbsoluteX),
    /* 0xDF */ OpcodeMetadata::new("BBS5", 3, ZeroPageRelative),
    /* 0xE0 */ OpcodeMetadata::new("CPX", 2, Immediate),
    /* 0xE1 */ OpcodeMetadata::new("SBC", 2, ZeroPageIndexedIndirect),
    /* 0xE2 */ UNUSED,
    /* 0xE3 */ OpcodeMetadata::new("TIA", 7, BlockTransfer),
    /* 0xE4 */ OpcodeMetadata::new("CPX", 2, ZeroPage),
    /* 0xE5 */ OpcodeMetadata::new("SBC", 2, ZeroPage),
    /* 0xE6 */ OpcodeMetadata::new("INC", 2, ZeroPage),
    /* 0xE7 */ OpcodeMetadata::new("SMB6", 2, ZeroPage),
    /* 0xE8 */ OpcodeMetadata::new("INX", 1, Implied),
    /* 0xE9 */ OpcodeMetadata::new("SBC", 2, Immediate),
    /* 0xEA */ OpcodeMetadata::new("NOP", 1, Implied),
    /* 0xEB */ UNUSED,
    /* 0xEC */ OpcodeMetadata::new("CPX", 3, Absolute),
    /* 0xED */ OpcodeMetadata::new("SBC", 3, Absolute),
    /* 0xEE */ OpcodeMetadata::new("INC", 3, Absolute),
    /* 0xEF */ OpcodeMetadata::new("BBS6", 3, ZeroPageRelative),
    /* 0xF0 */ OpcodeMetadata::new("BEQ", 2, Relative),
    /* 0xF1 */ OpcodeMetadata::new("SBC", 2, ZeroPageIndirectIndexed),
    /* 0xF2 */ OpcodeMetadata::new("SBC", 2, ZeroPageIndirect),
    /* 0xF3 */ OpcodeMetadata::new("TAI", 7, BlockTransfer),
    /* 0xF4 */ OpcodeMetadata::new("SET", 1, Implied),
    /* 0xF5 */ OpcodeMetadata::new("SBC", 2, ZeroPageX),
    /* 0xF6 */ OpcodeMetadata::new("INC", 2, ZeroPageX),
    /* 0xF7 */ OpcodeMetadata::new("SMB7", 2, ZeroPage),
    /* 0xF8 */ OpcodeMetadata::new("SED", 1, Implied),
    /* 0xF9 */ OpcodeMetadata::new("SBC", 3, AbsoluteY),
    /* 0xFA */ OpcodeMetadata::new("PLX", 1, Implied),
    /* 0xFB */ UNUSED,
    /* 0xFC */ UNUSED,
    /* 0xFD */ OpcodeMetadata::new("SBC", 3, AbsoluteX),
    /* 0xFE */ OpcodeMetadata::new("INC", 3, AbsoluteX),
    /* 0xFF */ OpcodeMetadata::new("BBS7", 3, ZeroPageRelative),
];

/// Read-only handle on a 256-entry opcode table.
///
/// The handle is `Copy` and is passed to each pass explicitly. Another
/// instruction set sharing the same operand shapes can be decoded by building
/// a handle over a different table with [`OpcodeTable::new`].
#[derive(Debug, Clone, Copy)]
pub struct OpcodeTable {
    entries: &'static [OpcodeMetadata; 256],
}

impl OpcodeTable {
    /// Wrap an arbitrary table.
    pub const fn new(entries: &'static [OpcodeMetadata; 256]) -> Self {
        Self { entries }
    }

    /// The HuC6280 table.
    pub const fn huc6280() -> Self {
        Self::new(&OPCODE_TABLE)
    }

    /// Total lookup: every byte value has an entry.
    pub fn lookup(&self, opcode: u8) -> &'static OpcodeMetadata {
        &self.entries[opcode as usize]
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::huc6280()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_table() {
        let table = OpcodeTable::huc6280();
        for opcode in 0..=255u8 {
            assert_eq!(table.lookup(opcode), &OPCODE_TABLE[opcode as usize]);
        }
    }

    #[test]
    fn test_returns_end_routine() {
        let table = OpcodeTable::huc6280();
        assert!(table.lookup(0x60).ends_routine);
        assert!(table.lookup(0x40).ends_routine);
        assert!(!table.lookup(0x4C).ends_routine);
    }

    #[test]
    fn test_unused_opcode() {
        let entry = OpcodeTable::huc6280().lookup(0x0B);
        assert!(entry.is_unsupported());
        assert_eq!(entry.size_bytes, 1);
        assert_eq!(entry.mnemonic, ".db");
    }
}
