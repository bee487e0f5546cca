//! Section passes.
//!
//! A pass walks one code section instruction by instruction. Both passes
//! implement the same small state machine:
//!
//! ```text
//! Idle --initialize--> Running --iterate*--> Running --finalize--> Done
//!   \                     \
//!    `-------------------- `--> Failed
//! ```
//!
//! [`perform`] drives a pass through it: one `initialize`, `iterate` until it
//! reports [`Step::Done`], then `finalize`. Any error leaves the pass in
//! [`PassState::Failed`] and stops the loop.

pub mod disassembly;
pub mod extract;

use thiserror::Error;

use crate::decoder::{resolve_target, DecodeError, Instruction};
use crate::labels::{LabelError, LabelKind, LabelRepository};
use crate::mapping::{page_of, AddressTranslator, PAGE_SHIFT};
use crate::memory::ByteSource;
use crate::section::{DecodeCursor, Section, SectionKind};

pub use disassembly::{Anomaly, DisassemblyPass};
pub use extract::LabelExtractionPass;

/// Pass lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Running,
    Done,
    Failed,
}

/// Result of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Another instruction follows.
    Continue,
    /// The end of the section was reached.
    Done,
}

/// Errors that stop a pass.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("section `{section}` is {kind} data, not code")]
    NotCode { section: String, kind: SectionKind },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("failed to format output")]
    Output(#[from] std::fmt::Error),

    #[error("{pass}: `{operation}` called in state {state:?}")]
    State {
        pass: &'static str,
        operation: &'static str,
        state: PassState,
    },
}

/// A section pass.
pub trait Pass {
    /// Human readable pass name.
    fn name(&self) -> &'static str;

    fn state(&self) -> PassState;

    /// Position of the next instruction.
    fn cursor(&self) -> DecodeCursor;

    /// Prepare the section. Fails for non-code sections.
    fn initialize(&mut self) -> Result<(), PassError>;

    /// Process one instruction.
    fn iterate(&mut self) -> Result<Step, PassError>;

    /// Close the pass.
    fn finalize(&mut self) -> Result<(), PassError>;
}

/// Run a pass to completion.
///
/// # Examples
///
/// ```
/// use huc6280_disasm::pass::{perform, LabelExtractionPass, Pass, PassState};
/// use huc6280_disasm::{LabelRepository, OpcodeTable, RomImage, Section, SectionKind};
///
/// // LDA #$05 / RTS at $E000, bank 0
/// let rom = RomImage::new(vec![0xA9, 0x05, 0x60]);
/// let section = Section::new("main", 0, SectionKind::Code, 0, 0xE000, 0);
/// let mut labels = LabelRepository::new();
///
/// let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom, &section, &mut labels);
/// perform(&mut pass).unwrap();
///
/// assert_eq!(pass.state(), PassState::Done);
/// assert_eq!(pass.resolved_size(), Some(3));
/// ```
pub fn perform<P: Pass + ?Sized>(pass: &mut P) -> Result<(), PassError> {
    pass.initialize()?;
    while pass.iterate()? == Step::Continue {}
    pass.finalize()
}

/// Bytes left in the section from `cursor`.
///
/// Auto-sized sections are bounded by the end of the ROM image.
pub(crate) fn bytes_available<S: ByteSource + ?Sized>(
    section: &Section,
    source: &S,
    cursor: DecodeCursor,
) -> u32 {
    if section.is_auto_sized() {
        source.len().saturating_sub(cursor.physical)
    } else {
        section.size.saturating_sub(cursor.offset)
    }
}

/// True once `instr` closes the section: an RTS/RTI for auto-sized
/// sections, the declared size otherwise.
pub(crate) fn reaches_end(section: &Section, instr: &Instruction) -> bool {
    if section.is_auto_sized() {
        instr.ends_routine
    } else {
        instr.next_cursor().offset >= section.size
    }
}

/// Map the cursor's logical page to the bank its physical address sits in.
pub(crate) fn track_page(mpr: &mut AddressTranslator, cursor: DecodeCursor) {
    mpr.set_bank(page_of(cursor.logical), (cursor.physical >> PAGE_SHIFT) as u8);
}

pub(crate) fn not_code(section: &Section) -> PassError {
    PassError::NotCode {
        section: section.name.clone(),
        kind: section.kind,
    }
}

/// A branch or jump destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub logical: u16,
    /// `None` when the target sits in another page of unknown bank.
    pub physical: Option<u32>,
    pub kind: LabelKind,
}

/// Which repository index supplied a target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Physical,
    Logical,
}

/// Destination of a control-flow instruction.
///
/// Branches are short and stay inside the section's linear byte range, so
/// their physical address is the instruction's own plus the displacement.
/// Jumps are resolved through the bank registers when they stay in the
/// current page and left unresolved otherwise.
pub fn control_target(instr: &Instruction, mpr: &AddressTranslator) -> Option<Target> {
    if let Some(logical) = instr.branch_target() {
        let delta = logical.wrapping_sub(instr.cursor.logical) as i16 as i32;
        let physical = (instr.cursor.physical as i64 + delta as i64) as u32;
        return Some(Target {
            logical,
            physical: Some(physical),
            kind: LabelKind::BranchTarget,
        });
    }
    let logical = instr.jump_target()?;
    Some(Target {
        logical,
        physical: resolve_target(mpr, instr.cursor.logical, logical),
        kind: LabelKind::JumpTarget,
    })
}

/// Name of the label at `target`.
///
/// Resolved targets are looked up by physical address only; unresolved ones
/// fall back to the logical address.
pub fn find_target<'r>(labels: &'r LabelRepository, target: &Target) -> Option<(&'r str, Lookup)> {
    match target.physical {
        Some(physical) => labels
            .find_by_physical(physical)
            .map(|name| (name, Lookup::Physical)),
        None => labels
            .find_by_logical(target.logical)
            .map(|name| (name, Lookup::Logical)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_instruction;
    use crate::opcodes::OpcodeTable;

    fn decode_at(bytes: &[u8], physical: u32, logical: u16) -> Instruction {
        let mut rom = vec![0; physical as usize];
        rom.extend_from_slice(bytes);
        let cursor = DecodeCursor {
            physical,
            logical,
            offset: 0,
        };
        decode_instruction(&OpcodeTable::huc6280(), &rom[..], cursor, bytes.len() as u32).unwrap()
    }

    #[test]
    fn test_branch_target_physical_is_linear() {
        let instr = decode_at(&[0xF0, 0xFB], 0x2100, 0xE100);
        let mpr = AddressTranslator::for_origin(1, 0xE000);
        let target = control_target(&instr, &mpr).unwrap();

        assert_eq!(target.logical, 0xE0FD);
        assert_eq!(target.physical, Some(0x20FD));
        assert_eq!(target.kind, LabelKind::BranchTarget);
    }

    #[test]
    fn test_jump_lookup_paths() {
        let mut labels = LabelRepository::new();
        labels.add("by_logical", 0xE100, None, LabelKind::User).unwrap();
        labels.add("by_physical", 0xE100, Some(0x2100), LabelKind::User).unwrap();
        labels.add("far", 0x8100, None, LabelKind::User).unwrap();

        let mpr = AddressTranslator::for_origin(1, 0xE000);

        // JMP $e100 from page 7: same page, resolved through bank 1
        let near = decode_at(&[0x4C, 0x00, 0xE1], 0x2000, 0xE000);
        let target = control_target(&near, &mpr).unwrap();
        assert_eq!(find_target(&labels, &target), Some(("by_physical", Lookup::Physical)));

        // JSR $8100 from page 7: page 4 bank unknown
        let far = decode_at(&[0x20, 0x00, 0x81], 0x2000, 0xE000);
        let target = control_target(&far, &mpr).unwrap();
        assert_eq!(target.physical, None);
        assert_eq!(find_target(&labels, &target), Some(("far", Lookup::Logical)));
    }

    #[test]
    fn test_non_control_flow_has_no_target() {
        let instr = decode_at(&[0xA9, 0x00], 0, 0xE000);
        assert_eq!(control_target(&instr, &AddressTranslator::default()), None);
    }
}
