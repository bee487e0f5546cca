//! Formatting functions for decoded instructions
//!
//! Output follows the PC-Engine assembler conventions: `#$nn` immediates,
//! `<$nn` zero page, `$hhll` absolute, square brackets for indirection.

use crate::addressing::AddressingMode;
use crate::decoder::Instruction;

/// Columns before the mnemonic.
pub const INDENT: usize = 10;

/// Width the mnemonic is padded to.
pub const MNEMONIC_WIDTH: usize = 4;

/// Columns between the padded mnemonic and the operand.
pub const OPERAND_GAP: usize = 4;

/// Bit index of a single-bit MPR mask, `None` if the mask is not a power of
/// two.
///
/// ```
/// use huc6280_disasm::formatter::mpr_index;
///
/// assert_eq!(mpr_index(0x04), Some(2));
/// assert_eq!(mpr_index(0x06), None);
/// ```
pub fn mpr_index(mask: u8) -> Option<u8> {
    if mask.is_power_of_two() {
        Some(mask.trailing_zeros() as u8)
    } else {
        None
    }
}

/// Format a single instruction as assembly text
///
/// `target` is the label naming the branch or jump target, if one was found.
/// Without it the target is printed as a raw address.
///
/// # Returns
///
/// The lowercase mnemonic padded to [`MNEMONIC_WIDTH`], the operand gap and
/// the operand text, with no trailing whitespace.
pub fn format_instruction(instr: &Instruction, target: Option<&str>) -> String {
    let operand = format_operand(instr, target);
    let mnemonic = instr.mnemonic.to_lowercase();

    if operand.is_empty() {
        mnemonic
    } else {
        format!(
            "{:<mw$}{:gap$}{}",
            mnemonic,
            "",
            operand,
            mw = MNEMONIC_WIDTH,
            gap = OPERAND_GAP
        )
    }
}

/// Format an instruction line, indented.
pub fn format_line(instr: &Instruction, target: Option<&str>) -> String {
    format!("{:indent$}{}", "", format_instruction(instr, target), indent = INDENT)
}

/// Format a label line.
pub fn format_label(name: &str) -> String {
    format!("{name}:")
}

/// Format the operand based on addressing mode
pub fn format_operand(instr: &Instruction, target: Option<&str>) -> String {
    use AddressingMode::*;

    let values: Vec<u16> = instr.operands().iter().map(|op| op.value).collect();
    let byte = |i: usize| values.get(i).copied().unwrap_or(0) as u8;
    let word = |i: usize| values.get(i).copied().unwrap_or(0);

    let destination = || match target {
        Some(name) => name.to_string(),
        None => format!("${:04x}", instr.control_target().unwrap_or(0)),
    };

    match instr.addressing_mode {
        Implied => String::new(),
        Accumulator => "A".to_string(),
        Immediate => format!("#${:02x}", byte(0)),
        ImmediateZeroPage => format!("#${:02x}, <${:02x}", byte(0), byte(1)),
        ImmediateZeroPageX => format!("#${:02x}, <${:02x}, X", byte(0), byte(1)),
        ImmediateAbsolute => format!("#${:02x}, ${:04x}", byte(0), word(1)),
        ImmediateAbsoluteX => format!("#${:02x}, ${:04x}, X", byte(0), word(1)),
        ZeroPage => format!("<${:02x}", byte(0)),
        ZeroPageX => format!("<${:02x}, X", byte(0)),
        ZeroPageY => format!("<${:02x}, Y", byte(0)),
        ZeroPageIndirect => format!("[${:02x}]", byte(0)),
        ZeroPageIndexedIndirect => format!("[${:02x}, X]", byte(0)),
        ZeroPageIndirectIndexed => format!("[${:02x}], Y", byte(0)),
        ZeroPageRelative => format!("<${:02x}, {}", byte(0), destination()),
        Absolute => format!("${:04x}", word(0)),
        AbsoluteIndirect => format!("[${:04x}]", word(0)),
        AbsoluteX => format!("${:04x}, X", word(0)),
        AbsoluteY => format!("${:04x}, Y", word(0)),
        AbsoluteIndexedIndirect => format!("[${:04x}, X]", word(0)),
        BlockTransfer => format!("${:04x}, ${:04x}, ${:04x}", word(0), word(1), word(2)),
        Relative | AbsoluteJump => destination(),
        Mpr => match mpr_index(byte(0)) {
            Some(index) => format!("#{index}"),
            None => format!("#${:02x}", byte(0)),
        },
        Unsupported => format!("${:02x}", instr.opcode),
    }
}
