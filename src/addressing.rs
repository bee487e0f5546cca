//! # Addressing Modes
//!
//! This module defines the operand shapes used by the HuC6280 instruction set.
//! The HuC6280 keeps the 65C02 modes and adds a few of its own: the
//! test-and-set `TST` forms, the bit-test-and-branch `BBR`/`BBS` family, the
//! seven byte block transfers and the `TAM`/`TMA` bank register selects.
//!
//! Each mode maps to an ordered operand layout (see [`operand_layout`]). The
//! layout is the only place that knows where each operand lives inside the
//! instruction bytes, so the decoder and the formatter never disagree about
//! which byte is a zero page address and which pair is a little-endian word.

/// HuC6280 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied, Accumulator, Unsupported
/// - **1 byte**: Immediate, ZeroPage*, Relative, Mpr
/// - **2 bytes**: Absolute*, ImmediateZeroPage*, ZeroPageRelative, AbsoluteJump
/// - **3 bytes**: ImmediateAbsolute*
/// - **6 bytes**: BlockTransfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, SXY
    Implied,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: ASL A, INC A
    Accumulator,

    /// 8-bit constant operand.
    ///
    /// Examples: LDA #$10, ST0 #$05
    Immediate,

    /// Immediate mask tested against a zero page location.
    ///
    /// Example: TST #$01, <$20
    ImmediateZeroPage,

    /// Immediate mask tested against a zero page location indexed by X.
    ///
    /// Example: TST #$01, <$20, X
    ImmediateZeroPageX,

    /// Immediate mask tested against an absolute location.
    ///
    /// Example: TST #$01, $2000
    ImmediateAbsolute,

    /// Immediate mask tested against an absolute location indexed by X.
    ///
    /// Example: TST #$01, $2000, X
    ImmediateAbsoluteX,

    /// 8-bit address in the zero page.
    ///
    /// Example: LDA <$80
    ZeroPage,

    /// Zero page address indexed by X.
    ZeroPageX,

    /// Zero page address indexed by Y.
    ZeroPageY,

    /// Zero page indirect: `[ZZ]`.
    ZeroPageIndirect,

    /// Zero page indexed indirect: `[ZZ, X]`.
    ZeroPageIndexedIndirect,

    /// Zero page indirect indexed: `[ZZ], Y`.
    ZeroPageIndirectIndexed,

    /// Bit test and branch: a zero page address followed by a signed
    /// displacement.
    ///
    /// Examples: BBR0 <$20, label / BBS7 <$20, label
    ZeroPageRelative,

    /// Full 16-bit address.
    Absolute,

    /// Absolute indirect: `[hhll]`. Only used by JMP.
    AbsoluteIndirect,

    /// 16-bit address indexed by X.
    AbsoluteX,

    /// 16-bit address indexed by Y.
    AbsoluteY,

    /// Absolute indexed indirect: `[hhll, X]`. Only used by JMP.
    AbsoluteIndexedIndirect,

    /// Block transfer: source, destination and length words.
    ///
    /// Examples: TII, TDD, TIN, TIA, TAI
    BlockTransfer,

    /// Signed 8-bit displacement relative to the next instruction.
    ///
    /// Examples: BEQ, BRA, BSR
    Relative,

    /// Absolute 16-bit jump or call target.
    ///
    /// Examples: JMP $e000, JSR $e010
    AbsoluteJump,

    /// Bank register select. The operand is a bitmask of MPR registers.
    ///
    /// Examples: TAM #2, TMA #6
    Mpr,

    /// Unused opcode. Emitted as raw data.
    Unsupported,
}

/// What an operand slot means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandRole {
    /// Literal value.
    Value,
    /// Zero page address.
    ZeroPageAddress,
    /// Absolute data address.
    AbsoluteAddress,
    /// Signed branch displacement.
    BranchDisplacement,
    /// Absolute code address targeted by a jump or a call.
    JumpTarget,
    /// Bank register bitmask.
    RegisterSelect,
}

/// A single operand inside an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandSlot {
    /// Width in bytes (1 or 2). Words are stored little-endian.
    pub width: u8,
    /// Operand meaning.
    pub role: OperandRole,
}

impl OperandSlot {
    const fn byte(role: OperandRole) -> Self {
        Self { width: 1, role }
    }

    const fn word(role: OperandRole) -> Self {
        Self { width: 2, role }
    }
}

use OperandRole::*;

const NONE: &[OperandSlot] = &[];
const VALUE: &[OperandSlot] = &[OperandSlot::byte(Value)];
const ZP: &[OperandSlot] = &[OperandSlot::byte(ZeroPageAddress)];
const ABS: &[OperandSlot] = &[OperandSlot::word(AbsoluteAddress)];
const VALUE_ZP: &[OperandSlot] = &[OperandSlot::byte(Value), OperandSlot::byte(ZeroPageAddress)];
const VALUE_ABS: &[OperandSlot] = &[OperandSlot::byte(Value), OperandSlot::word(AbsoluteAddress)];
const ZP_BRANCH: &[OperandSlot] = &[
    OperandSlot::byte(ZeroPageAddress),
    OperandSlot::byte(BranchDisplacement),
];
const TRANSFER: &[OperandSlot] = &[
    OperandSlot::word(AbsoluteAddress),
    OperandSlot::word(AbsoluteAddress),
    OperandSlot::word(AbsoluteAddress),
];
const BRANCH: &[OperandSlot] = &[OperandSlot::byte(BranchDisplacement)];
const JUMP: &[OperandSlot] = &[OperandSlot::word(JumpTarget)];
const MPR: &[OperandSlot] = &[OperandSlot::byte(RegisterSelect)];

/// Ordered operand slots for an addressing mode.
///
/// Slots are listed in the order their bytes follow the opcode. A word slot
/// that comes after a byte slot (`TST #nn, hhll`) therefore starts one byte
/// later than it would on its own; reading words slot by slot is what keeps
/// the little-endian reassembly right for those modes.
///
/// # Examples
///
/// ```
/// use huc6280_disasm::addressing::{operand_layout, AddressingMode, OperandRole};
///
/// let slots = operand_layout(AddressingMode::ZeroPageRelative);
/// assert_eq!(slots.len(), 2);
/// assert_eq!(slots[0].role, OperandRole::ZeroPageAddress);
/// assert_eq!(slots[1].role, OperandRole::BranchDisplacement);
/// ```
pub fn operand_layout(mode: AddressingMode) -> &'static [OperandSlot] {
    use AddressingMode::*;

    match mode {
        Implied | Accumulator | Unsupported => NONE,
        Immediate => VALUE,
        ImmediateZeroPage | ImmediateZeroPageX => VALUE_ZP,
        ImmediateAbsolute | ImmediateAbsoluteX => VALUE_ABS,
        ZeroPage | ZeroPageX | ZeroPageY | ZeroPageIndirect | ZeroPageIndexedIndirect
        | ZeroPageIndirectIndexed => ZP,
        ZeroPageRelative => ZP_BRANCH,
        Absolute | AbsoluteIndirect | AbsoluteX | AbsoluteY | AbsoluteIndexedIndirect => ABS,
        BlockTransfer => TRANSFER,
        Relative => BRANCH,
        AbsoluteJump => JUMP,
        Mpr => MPR,
    }
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_size(self) -> usize {
        operand_layout(self).iter().map(|s| s.width as usize).sum()
    }

    /// True for the short, displacement-based branches.
    pub fn is_branch(self) -> bool {
        matches!(self, AddressingMode::Relative | AddressingMode::ZeroPageRelative)
    }

    /// True for absolute jumps and subroutine calls.
    pub fn is_jump(self) -> bool {
        self == AddressingMode::AbsoluteJump
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_sizes() {
        assert_eq!(AddressingMode::Implied.operand_size(), 0);
        assert_eq!(AddressingMode::Immediate.operand_size(), 1);
        assert_eq!(AddressingMode::ImmediateZeroPageX.operand_size(), 2);
        assert_eq!(AddressingMode::ImmediateAbsolute.operand_size(), 3);
        assert_eq!(AddressingMode::BlockTransfer.operand_size(), 6);
        assert_eq!(AddressingMode::AbsoluteJump.operand_size(), 2);
    }

    #[test]
    fn test_tst_absolute_word_follows_mask() {
        let slots = operand_layout(AddressingMode::ImmediateAbsolute);
        assert_eq!(slots[0], OperandSlot::byte(OperandRole::Value));
        assert_eq!(slots[1], OperandSlot::word(OperandRole::AbsoluteAddress));
    }

    #[test]
    fn test_control_flow_classification() {
        assert!(AddressingMode::Relative.is_branch());
        assert!(AddressingMode::ZeroPageRelative.is_branch());
        assert!(!AddressingMode::AbsoluteJump.is_branch());
        assert!(AddressingMode::AbsoluteJump.is_jump());
        assert!(!AddressingMode::AbsoluteIndirect.is_jump());
    }
}
