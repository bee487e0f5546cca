//! Disassembly pass.
//!
//! Second walk over a code section, after label extraction. Output is built
//! in memory and only handed out once the pass completes, so a section that
//! fails halfway never produces a partial listing.

use std::fmt::Write;

use log::{info, warn};

use super::{
    bytes_available, control_target, find_target, not_code, reaches_end, track_page, Pass,
    PassError, PassState, Step,
};
use crate::addressing::AddressingMode;
use crate::decoder::{decode_instruction, Instruction};
use crate::formatter::{format_label, format_line, mpr_index};
use crate::labels::LabelRepository;
use crate::mapping::AddressTranslator;
use crate::memory::ByteSource;
use crate::opcodes::OpcodeTable;
use crate::section::{DecodeCursor, Section, SectionKind};

/// Something odd noticed while printing a section. Output is still produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// TAM/TMA operand selecting zero or several registers.
    MprMask { physical: u32, opcode: u8, mask: u8 },
    /// Branch or jump target without a label; printed as a raw address.
    MissingLabel { physical: u32, target: u16 },
}

/// Second pass over a code section.
pub struct DisassemblyPass<'a, S: ByteSource + ?Sized> {
    table: OpcodeTable,
    source: &'a S,
    section: &'a Section,
    labels: &'a LabelRepository,
    mpr: AddressTranslator,
    cursor: DecodeCursor,
    state: PassState,
    exhausted: bool,
    buffer: String,
    output: Option<String>,
    anomalies: Vec<Anomaly>,
}

impl<'a, S: ByteSource + ?Sized> DisassemblyPass<'a, S> {
    /// `section` must carry its final size: auto-sized sections are resized
    /// from the extraction pass result first.
    pub fn new(
        table: OpcodeTable,
        source: &'a S,
        section: &'a Section,
        labels: &'a LabelRepository,
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
            buffer: String::new(),
            output: None,
            anomalies: Vec::new(),
        }
    }

    /// The listing, once the pass is done.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn into_output(self) -> Option<String> {
        self.output
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
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

        if let Some(name) = self.labels.find_by_physical(self.cursor.physical) {
            writeln!(self.buffer, "{}", format_label(name))?;
        }

        self.check_mpr_mask(&instr);

        let target = match control_target(&instr, &self.mpr) {
            Some(target) => match find_target(self.labels, &target) {
                Some((name, _)) => Some(name),
                None => {
                    warn!(
                        "{}: no label for ${:04x} at ${:06x}",
                        self.section.name, target.logical, instr.cursor.physical
                    );
                    self.anomalies.push(Anomaly::MissingLabel {
                        physical: instr.cursor.physical,
                        target: target.logical,
                    });
                    None
                }
            },
            None => None,
        };
        writeln!(self.buffer, "{}", format_line(&instr, target))?;

        self.cursor = instr.next_cursor();
        if reaches_end(self.section, &instr) {
            self.exhausted = true;
            return Ok(Step::Done);
        }
        Ok(Step::Continue)
    }

    fn check_mpr_mask(&mut self, instr: &Instruction) {
        if instr.addressing_mode != AddressingMode::Mpr {
            return;
        }
        let mask = instr.operand_bytes.first().copied().unwrap_or(0);
        if mpr_index(mask).is_none() {
            warn!(
                "{}: {} at ${:06x} with mask ${mask:02x} does not select a single register",
                self.section.name, instr.mnemonic, instr.cursor.physical
            );
            self.anomalies.push(Anomaly::MprMask {
                physical: instr.cursor.physical,
                opcode: instr.opcode,
                mask,
            });
        }
    }
}

impl<S: ByteSource + ?Sized> Pass for DisassemblyPass<'_, S> {
    fn name(&self) -> &'static str {
        "disassembly"
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

        info!(
            "{}: disassembling {:#x} bytes from ${:06x}",
            self.section.name, self.section.size, self.section.start
        );
        self.mpr = self.section.mpr;
        self.cursor = self.section.cursor();
        self.buffer.clear();
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
            self.buffer.clear();
        }
        result
    }

    fn finalize(&mut self) -> Result<(), PassError> {
        if self.state != PassState::Running {
            return Err(self.wrong_state("finalize"));
        }
        self.output = Some(std::mem::take(&mut self.buffer));
        self.state = PassState::Done;
        Ok(())
    }
}
