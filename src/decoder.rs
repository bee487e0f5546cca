//! Instruction decoder shared by both passes.
//!
//! Decoding goes through an [`OpcodeTable`] and the operand layout of the
//! opcode's addressing mode, and nowhere else. Label extraction and text
//! output call the same [`decode_instruction`], so their view of sizes,
//! operands and branch targets cannot drift apart.

use thiserror::Error;

use crate::addressing::{operand_layout, AddressingMode, OperandRole, OperandSlot};
use crate::mapping::{page_of, AddressTranslator};
use crate::memory::ByteSource;
use crate::opcodes::OpcodeTable;
use crate::section::DecodeCursor;

/// Decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The instruction runs past the end of its section.
    #[error(
        "opcode ${opcode:02x} at ${physical:06x} needs {needed} bytes, only {available} left in section"
    )]
    Truncated {
        physical: u32,
        opcode: u8,
        needed: u8,
        available: u32,
    },
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Where the instruction starts.
    pub cursor: DecodeCursor,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Instruction mnemonic (e.g., "LDA", "BBR3", ".db")
    pub mnemonic: &'static str,

    /// Addressing mode used by this instruction
    pub addressing_mode: AddressingMode,

    /// Operand bytes in ROM order (0-6 bytes)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes (opcode + operands)
    pub size_bytes: u8,

    /// RTS or RTI
    pub ends_routine: bool,
}

/// An operand reassembled from its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub slot: OperandSlot,
    /// Byte value, or little-endian word for two-byte slots.
    pub value: u16,
}

/// Decode one instruction at `cursor`.
///
/// `available` is the number of bytes left in the section from `cursor`.
/// An instruction longer than that is a [`DecodeError::Truncated`].
pub fn decode_instruction<S: ByteSource + ?Sized>(
    table: &OpcodeTable,
    source: &S,
    cursor: DecodeCursor,
    available: u32,
) -> Result<Instruction, DecodeError> {
    let opcode = source.read_byte(cursor.physical);
    let metadata = table.lookup(opcode);

    if available < metadata.size_bytes as u32 {
        return Err(DecodeError::Truncated {
            physical: cursor.physical,
            opcode,
            needed: metadata.size_bytes,
            available,
        });
    }

    let operand_bytes = (1..metadata.size_bytes as u32)
        .map(|i| source.read_byte(cursor.physical + i))
        .collect();

    Ok(Instruction {
        cursor,
        opcode,
        mnemonic: metadata.mnemonic,
        addressing_mode: metadata.addressing_mode,
        operand_bytes,
        size_bytes: metadata.size_bytes,
        ends_routine: metadata.ends_routine,
    })
}

impl Instruction {
    /// Logical address of the following instruction.
    pub fn next_logical(&self) -> u16 {
        self.cursor.logical.wrapping_add(self.size_bytes as u16)
    }

    /// Cursor on the following instruction.
    pub fn next_cursor(&self) -> DecodeCursor {
        self.cursor.advance(self.size_bytes)
    }

    /// Operands in slot order, words reassembled low byte first.
    pub fn operands(&self) -> Vec<Operand> {
        let mut offset = 0;
        let mut operands = Vec::new();
        for slot in operand_layout(self.addressing_mode) {
            let width = slot.width as usize;
            let Some(bytes) = self.operand_bytes.get(offset..offset + width) else {
                break;
            };
            let value = match bytes {
                [lo, hi] => u16::from_le_bytes([*lo, *hi]),
                [b] => *b as u16,
                _ => unreachable!("operand slots are one or two bytes wide"),
            };
            operands.push(Operand { slot: *slot, value });
            offset += width;
        }
        operands
    }

    fn operand(&self, role: OperandRole) -> Option<u16> {
        self.operands()
            .into_iter()
            .find(|op| op.slot.role == role)
            .map(|op| op.value)
    }

    /// Target of a relative branch: next instruction + signed displacement.
    ///
    /// For `BBRn`/`BBSn` the displacement is the second operand byte; the
    /// first one is the zero page address under test.
    pub fn branch_target(&self) -> Option<u16> {
        if !self.addressing_mode.is_branch() {
            return None;
        }
        let displacement = self.operand(OperandRole::BranchDisplacement)? as u8 as i8;
        Some(self.next_logical().wrapping_add(displacement as i16 as u16))
    }

    /// Target of an absolute jump or call.
    pub fn jump_target(&self) -> Option<u16> {
        if !self.addressing_mode.is_jump() {
            return None;
        }
        self.operand(OperandRole::JumpTarget)
    }

    /// Branch or jump target, whichever applies.
    pub fn control_target(&self) -> Option<u16> {
        self.branch_target().or_else(|| self.jump_target())
    }
}

/// Physical address of a control-flow target.
///
/// Only targets in the same logical page as the instruction are resolved,
/// through `mpr`; another page may be mapped to a bank that is not known
/// yet, so those return `None`.
pub fn resolve_target(mpr: &AddressTranslator, from: u16, target: u16) -> Option<u32> {
    if page_of(target) == page_of(from) {
        Some(mpr.logical_to_physical(target))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_at(logical: u16) -> DecodeCursor {
        DecodeCursor {
            physical: 0,
            logical,
            offset: 0,
        }
    }

    fn decode(bytes: &[u8], logical: u16) -> Instruction {
        decode_instruction(
            &OpcodeTable::huc6280(),
            bytes,
            cursor_at(logical),
            bytes.len() as u32,
        )
        .unwrap()
    }

    #[test]
    fn test_decode_lda_immediate() {
        let instr = decode(&[0xA9, 0x42], 0x8000);

        assert_eq!(instr.opcode, 0xA9);
        assert_eq!(instr.mnemonic, "LDA");
        assert_eq!(instr.addressing_mode, AddressingMode::Immediate);
        assert_eq!(instr.operand_bytes, vec![0x42]);
        assert_eq!(instr.size_bytes, 2);
    }

    #[test]
    fn test_decode_block_transfer() {
        let instr = decode(&[0x73, 0x00, 0x30, 0x00, 0x22, 0x00, 0x01], 0xE000);

        assert_eq!(instr.mnemonic, "TII");
        let values: Vec<u16> = instr.operands().iter().map(|op| op.value).collect();
        assert_eq!(values, vec![0x3000, 0x2200, 0x0100]);
    }

    #[test]
    fn test_tst_absolute_word_after_mask() {
        let instr = decode(&[0x93, 0x01, 0x34, 0x12], 0xE000);

        let operands = instr.operands();
        assert_eq!(operands[0].value, 0x01);
        assert_eq!(operands[1].value, 0x1234);
    }

    #[test]
    fn test_branch_forward_and_backward() {
        assert_eq!(decode(&[0xD0, 0x05], 0x1000).branch_target(), Some(0x1007));
        assert_eq!(decode(&[0xD0, 0xFB], 0x1000).branch_target(), Some(0x0FFD));
    }

    #[test]
    fn test_bbr_displacement_is_second_byte() {
        // BBR0 <$20, +4
        let instr = decode(&[0x0F, 0x20, 0x04], 0x2000);
        assert_eq!(instr.branch_target(), Some(0x2007));
    }

    #[test]
    fn test_jump_target_little_endian() {
        let instr = decode(&[0x20, 0x34, 0xE2], 0xE000);
        assert_eq!(instr.jump_target(), Some(0xE234));
        assert_eq!(instr.branch_target(), None);
    }

    #[test]
    fn test_truncated_instruction() {
        let err = decode_instruction(
            &OpcodeTable::huc6280(),
            &[0x4C, 0x00][..],
            cursor_at(0xE000),
            2,
        )
        .unwrap_err();

        assert_eq!(
            err,
            DecodeError::Truncated {
                physical: 0,
                opcode: 0x4C,
                needed: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_resolve_target_same_page_only() {
        let mpr = AddressTranslator::for_origin(0x05, 0xC000);
        assert_eq!(resolve_target(&mpr, 0xC100, 0xC800), Some(0x05 << 13 | 0x0800));
        assert_eq!(resolve_target(&mpr, 0xC100, 0xE000), None);
    }
}
