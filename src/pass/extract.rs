//! Label extraction pass.
//!
//! Walks a code section and registers a label for every branch and jump
//! target. For auto-sized sections it also finds where the routine ends.

use log::{debug, info, trace};

use super::{
    bytes_available, control_target, not_code, reaches_end, track_page, Pass, PassError,
    PassState, Step,
};
use crate::decoder::decode_instruction;
use crate::labels::{generated_name, LabelError, LabelKind, LabelRepository};
use crate::mapping::AddressTranslator;
use crate::memory::ByteSource;
use crate::opcodes::OpcodeTable;
use crate::section::{DecodeCursor, Section, SectionKind};

/// First pass over a code section.
pub struct LabelExtractionPass<'a, S: ByteSource + ?Sized> {
    table: OpcodeTable,
    source: &'a S,
    section: &'a Section,
    labels: &'a mut LabelRepository,
    mpr: AddressTranslator,
    cursor: DecodeCursor,
    state: PassState,
    exhausted: bool,
    resolved_size: Option<u32>,
    instructions: usize,
}

impl<'a, S: ByteSource + ?Sized> LabelExtractionPass<'a, S> {
    pub fn new(
        table: OpcodeTable,
        source: &'a S,
        section: &'a Section,
        labels: &'a mut LabelRepository,
    ) -> Self {
        Self {
            table,
            source,
            section,
            labels,
            mpr: section.mpr,
            cursor: section.cursor(),
            state: PassState::Idle,
            exhausted: false,
            resolved_size: None,
            instructions: 0,
        }
    }

    /// Size found for an auto-sized section: the offset just past the RTS or
    /// RTI that ended it. `None` for sections with a declared size.
    pub fn resolved_size(&self) -> Option<u32> {
        self.resolved_size
    }

    /// Number of instructions decoded so far.
    pub fn instructions(&self) -> usize {
        self.instructions
    }

    fn wrong_state(&self, operation: &'static str) -> PassError {
        PassError::State {
            pass: self.name(),
            operation,
            state: self.state,
        }
    }

    fn step(&mut self) -> Result<Step, PassError> {
        if self.exhausted {
            return Ok(Step::Done);
        }

        track_page(&mut self.mpr, self.cursor);
        let available = bytes_available(self.section, self.source, self.cursor);
        let instr = decode_instruction(&self.table, self.source, self.cursor, available)?;
        self.instructions += 1;

        if let Some(target) = control_target(&instr, &self.mpr) {
            let name = generated_name(target.logical, self.section.id);
            match self.labels.add(&name, target.logical, target.physical, target.kind) {
                Ok(()) => debug!(
                    "{}: {} ${:04x} -> {name}",
                    self.section.name, instr.mnemonic, target.logical
                ),
                Err(LabelError::Duplicate { .. }) => {
                    trace!("{}: {name} already known", self.section.name)
                }
            }
        }

        self.cursor = instr.next_cursor();

        if reaches_end(self.section, &instr) {
            if self.section.is_auto_sized() {
                self.resolved_size = Some(self.cursor.offset);
            }
            self.exhausted = true;
            return Ok(Step::Done);
        }
        Ok(Step::Continue)
    }
}

impl<S: ByteSource + ?Sized> Pass for LabelExtractionPass<'_, S> {
    fn name(&self) -> &'static str {
        "label extraction"
    }

    fn state(&self) -> PassState {
        self.state
    }

    fn cursor(&self) -> DecodeCursor {
        self.cursor
    }

    fn initialize(&mut self) -> Result<(), PassError> {
        if self.state != PassState::Idle {
            return Err(self.wrong_state("initialize"));
        }
        if self.section.kind != SectionKind::Code {
            self.state = PassState::Failed;
            return Err(not_code(self.section));
        }

        let section = self.section;
        if let Err(e) = self.labels.add(
            section.name.as_str(),
            section.logical_origin,
            Some(section.start),
            LabelKind::SectionStart,
        ) {
            self.state = PassState::Failed;
            return Err(e.into());
        }

        info!(
            "{}: extracting labels from ${:06x} (${:04x})",
            section.name, section.start, section.logical_origin
        );
        self.mpr = section.mpr;
        self.cursor = section.cursor();
        self.state = PassState::Running;
        Ok(())
    }

    fn iterate(&mut self) -> Result<Step, PassError> {
        if self.state != PassState::Running {
            return Err(self.wrong_state("iterate"));
        }
        let result = self.step();
        if result.is_err() {
            self.state = PassState::Failed;
        }
        result
    }

    fn finalize(&mut self) -> Result<(), PassError> {
        if self.state != PassState::Running {
            return Err(self.wrong_state("finalize"));
        }
        if let Some(size) = self.resolved_size {
            info!("{}: routine ends after {size:#x} bytes", self.section.name);
        }
        self.cursor = self.section.cursor();
        self.state = PassState::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::perform;

    fn run(rom: &[u8], section: &Section, labels: &mut LabelRepository) -> Result<Option<u32>, PassError> {
        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), rom, section, labels);
        perform(&mut pass)?;
        Ok(pass.resolved_size())
    }

    #[test]
    fn test_auto_size_stops_at_rts() {
        // LDA #$05 / JMP $e000 / RTS / NOP
        let rom = [0xA9, 0x05, 0x4C, 0x00, 0xE0, 0x60, 0xEA];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();

        assert_eq!(run(&rom, &section, &mut labels).unwrap(), Some(6));
        // The jump lands on the section label; the generated name is still
        // registered but loses the lookup tie.
        assert_eq!(labels.find_by_physical(0), Some("s"));
        assert!(labels.get("le000_00").is_some());
    }

    #[test]
    fn test_sized_section_ignores_rts() {
        let rom = [0x60, 0xEA, 0x60];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 3);
        let mut labels = LabelRepository::new();

        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom[..], &section, &mut labels);
        perform(&mut pass).unwrap();
        assert_eq!(pass.instructions(), 3);
        assert_eq!(pass.resolved_size(), None);
    }

    #[test]
    fn test_branch_targets_are_registered() {
        // BNE +2 / NOP / NOP / RTS
        let rom = [0xD0, 0x02, 0xEA, 0xEA, 0x60];
        let section = Section::new("s", 3, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();

        run(&rom, &section, &mut labels).unwrap();
        let label = labels.get("le004_03").unwrap();
        assert_eq!(label.physical, Some(4));
        assert_eq!(label.kind, LabelKind::BranchTarget);
        assert_eq!(labels.find_by_physical(4), Some("le004_03"));
    }

    #[test]
    fn test_repeated_target_is_tolerated() {
        // BEQ +2 / BNE +0 / RTS: both land on $e004
        let rom = [0xF0, 0x02, 0xD0, 0x00, 0x60];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();

        assert_eq!(run(&rom, &section, &mut labels).unwrap(), Some(5));
        assert!(labels.get("le004_00").is_some());
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_far_jump_is_unresolved() {
        let rom = [0x20, 0x00, 0x80, 0x60];
        let section = Section::new("s", 1, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();

        run(&rom, &section, &mut labels).unwrap();
        assert_eq!(labels.get("l8000_01").unwrap().physical, None);
        assert_eq!(labels.find_by_logical(0x8000), Some("l8000_01"));
    }

    #[test]
    fn test_duplicate_section_name_fails() {
        let rom = [0x60];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();
        labels.add("s", 0x4000, None, LabelKind::User).unwrap();

        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom[..], &section, &mut labels);
        let err = perform(&mut pass).unwrap_err();
        assert!(matches!(err, PassError::Label(LabelError::Duplicate { .. })));
        assert_eq!(pass.state(), PassState::Failed);
    }

    #[test]
    fn test_data_section_rejected() {
        let rom = [0x00];
        let section = Section::new("gfx", 0, SectionKind::BinaryData, 0, 0x4000, 1);
        let mut labels = LabelRepository::new();

        let err = run(&rom, &section, &mut labels).unwrap_err();
        assert!(matches!(err, PassError::NotCode { .. }));
        assert!(labels.is_empty());
    }

    #[test]
    fn test_truncated_instruction_fails() {
        // JMP with a single operand byte left in a 2 byte section
        let rom = [0x4C, 0x00, 0xE0];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 2);
        let mut labels = LabelRepository::new();

        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom[..], &section, &mut labels);
        let err = perform(&mut pass).unwrap_err();
        assert!(matches!(err, PassError::Decode(_)));
        assert_eq!(pass.state(), PassState::Failed);
        assert_eq!(pass.cursor().offset, 0);
    }

    #[test]
    fn test_iterate_before_initialize() {
        let rom = [0x60];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();
        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom[..], &section, &mut labels);

        assert!(matches!(pass.iterate(), Err(PassError::State { .. })));
    }

    #[test]
    fn test_finalize_rewinds_cursor() {
        let rom = [0xEA, 0x60];
        let section = Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0);
        let mut labels = LabelRepository::new();
        let mut pass = LabelExtractionPass::new(OpcodeTable::huc6280(), &rom[..], &section, &mut labels);

        pass.initialize().unwrap();
        assert_eq!(pass.iterate().unwrap(), Step::Continue);
        assert_eq!(pass.cursor().offset, 1);
        assert_eq!(pass.iterate().unwrap(), Step::Done);
        pass.finalize().unwrap();
        assert_eq!(pass.cursor().offset, 0);
        assert_eq!(pass.state(), PassState::Done);
    }
}
