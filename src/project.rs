//! Run driver.
//!
//! A [`Project`] owns the sections and the label repository for a whole run.
//! [`Project::run`] works in two phases:
//!
//! 1. label extraction over every code section, applying the detected size
//!    of auto-sized ones;
//! 2. disassembly of code sections and output of data sections.
//!
//! The repository is complete before the first line is printed, so a branch
//! from one section into another still gets its label line.

use log::{info, warn};

use crate::data::{format_include_data, section_bytes};
use crate::config::ConfigError;
use crate::irq::{format_vector_table, read_vectors, vector_sections};
use crate::labels::LabelRepository;
use crate::memory::ByteSource;
use crate::opcodes::OpcodeTable;
use crate::pass::{perform, DisassemblyPass, LabelExtractionPass, Pass, PassError};
use crate::section::{Section, SectionKind};
use crate::Error;

/// Contents of one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Text(String),
    Binary(Vec<u8>),
}

/// Output of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutput {
    pub name: String,
    /// File name from the section configuration.
    pub file: String,
    pub contents: Contents,
}

/// Result of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Sections that succeeded, in order.
    pub outputs: Vec<SectionOutput>,
    /// Sections skipped after an error. Always empty in strict mode.
    pub failures: Vec<Error>,
    /// Decode anomalies over all code sections.
    pub anomalies: usize,
    /// Main file including every section output.
    pub main: String,
}

/// Sections, labels and ROM for one run.
pub struct Project<'a, S: ByteSource + ?Sized> {
    table: OpcodeTable,
    source: &'a S,
    sections: Vec<Section>,
    labels: LabelRepository,
    vectors: Option<[u16; 5]>,
    strict: bool,
}

impl<'a, S: ByteSource + ?Sized> Project<'a, S> {
    pub fn new(source: &'a S, sections: Vec<Section>) -> Self {
        Self {
            table: OpcodeTable::huc6280(),
            source,
            sections,
            labels: LabelRepository::new(),
            vectors: None,
            strict: false,
        }
    }

    /// Start from an existing repository, typically user labels.
    pub fn with_labels(mut self, labels: LabelRepository) -> Self {
        self.labels = labels;
        self
    }

    /// Prepend one code section per interrupt vector.
    ///
    /// Sections are renumbered, so configured sections come after the five
    /// vector sections in generated label names.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSection`] when the renumbered sections no longer
    /// fit in a section id.
    pub fn with_irq_vectors(mut self) -> Result<Self, Error> {
        let vectors = read_vectors(self.source);
        let mut sections = vector_sections(&vectors);
        sections.append(&mut self.sections);
        for (index, section) in sections.iter_mut().enumerate() {
            section.id = u8::try_from(index).map_err(|_| ConfigError::InvalidSection {
                name: section.name.clone(),
                reason: "more than 256 sections with the interrupt vectors".to_string(),
            })?;
        }
        self.sections = sections;
        self.vectors = Some(vectors);
        Ok(self)
    }

    /// Abort on the first failing section instead of skipping it.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn labels(&self) -> &LabelRepository {
        &self.labels
    }

    /// Process every section.
    ///
    /// # Errors
    ///
    /// In strict mode, the first [`Error::Section`]. Otherwise failures are
    /// collected in the report and the run carries on.
    pub fn run(&mut self) -> Result<RunReport, Error> {
        let mut report = RunReport::default();
        let mut failed = vec![false; self.sections.len()];

        for index in 0..self.sections.len() {
            if self.sections[index].kind != SectionKind::Code {
                continue;
            }
            match self.extract(index) {
                Ok(Some(size)) => self.sections[index].size = size,
                Ok(None) => {}
                Err(e) => {
                    self.skip(e, &mut report)?;
                    failed[index] = true;
                }
            }
        }

        for (index, section) in self.sections.iter().enumerate() {
            if failed[index] {
                continue;
            }
            let contents = match section.kind {
                SectionKind::Code => {
                    match disassemble(self.table, self.source, section, &self.labels) {
                        Ok((text, anomalies)) => {
                            report.anomalies += anomalies;
                            Contents::Text(section_header(section) + &text)
                        }
                        Err(e) => {
                            self.skip(e, &mut report)?;
                            continue;
                        }
                    }
                }
                SectionKind::IncludeData => Contents::Text(
                    section_header(section) + &format_include_data(self.source, section),
                ),
                SectionKind::BinaryData => Contents::Binary(section_bytes(self.source, section)),
            };
            info!("{}: {} ready", section.name, section.output);
            report.outputs.push(SectionOutput {
                name: section.name.clone(),
                file: section.output.clone(),
                contents,
            });
        }

        report.main = self.main_file(&report.outputs);
        Ok(report)
    }

    fn extract(&mut self, index: usize) -> Result<Option<u32>, Error> {
        let section = &self.sections[index];
        let mut pass = LabelExtractionPass::new(self.table, self.source, section, &mut self.labels);
        match perform(&mut pass) {
            Ok(()) => Ok(pass.resolved_size()),
            Err(e) => Err(section_error(section, pass.cursor().offset, e)),
        }
    }

    fn skip(&self, error: Error, report: &mut RunReport) -> Result<(), Error> {
        if self.strict {
            return Err(error);
        }
        warn!("skipping section: {error}");
        report.failures.push(error);
        Ok(())
    }

    fn main_file(&self, outputs: &[SectionOutput]) -> String {
        let mut main = String::new();
        for output in outputs {
            let Some(section) = self.sections.iter().find(|s| s.name == output.name) else {
                continue;
            };
            match section.kind {
                SectionKind::Code | SectionKind::IncludeData => {
                    main.push_str(&format!("\t.include \"{}\"\n", output.file));
                }
                SectionKind::BinaryData => {
                    main.push_str(&format!(
                        "\t.data\n\t.bank {:x}\n\t.org ${:04x}\n\t.incbin \"{}\"\n",
                        section.bank, section.logical_origin, output.file
                    ));
                }
            }
        }
        if let Some(vectors) = &self.vectors {
            main.push_str(&format_vector_table(vectors));
        }
        main
    }
}

fn disassemble<S: ByteSource + ?Sized>(
    table: OpcodeTable,
    source: &S,
    section: &Section,
    labels: &LabelRepository,
) -> Result<(String, usize), Error> {
    let mut pass = DisassemblyPass::new(table, source, section, labels);
    if let Err(e) = perform(&mut pass) {
        return Err(section_error(section, pass.cursor().offset, e));
    }
    let anomalies = pass.anomalies().len();
    Ok((pass.into_output().unwrap_or_default(), anomalies))
}

fn section_error(section: &Section, offset: u32, source: PassError) -> Error {
    Error::Section {
        name: section.name.clone(),
        offset,
        source,
    }
}

/// `.code`/`.data`, `.bank` and `.org` lines opening a section file.
pub fn section_header(section: &Section) -> String {
    let directive = match section.kind {
        SectionKind::Code => ".code",
        SectionKind::IncludeData | SectionKind::BinaryData => ".data",
    };
    format!(
        "\t{directive}\n\t.bank {:x}\n\t.org ${:04x}\n",
        section.bank, section.logical_origin
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelKind;
    use crate::memory::RomImage;

    fn text(contents: &Contents) -> &str {
        match contents {
            Contents::Text(text) => text,
            Contents::Binary(_) => panic!("expected text output"),
        }
    }

    #[test]
    fn test_section_header() {
        let section = Section::new("s", 0, SectionKind::Code, 0x1F, 0xE000, 0);
        assert_eq!(section_header(&section), "\t.code\n\t.bank 1f\n\t.org $e000\n");
    }

    #[test]
    fn test_run_applies_detected_size() {
        let rom = RomImage::new(vec![0xEA, 0x60, 0xFF, 0xFF]);
        let sections = vec![Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0)];
        let mut project = Project::new(&rom, sections);

        let report = project.run().unwrap();
        assert_eq!(project.sections()[0].size, 2);
        assert_eq!(report.outputs.len(), 1);
        assert!(text(&report.outputs[0].contents).ends_with("          rts\n"));
        assert_eq!(report.main, "\t.include \"s.asm\"\n");
    }

    #[test]
    fn test_cross_section_branch_gets_label_line() {
        // "a": NOP / RTS at $e000, "b": JMP $e001 at $e002
        let rom = RomImage::new(vec![0xEA, 0x60, 0x4C, 0x01, 0xE0, 0x60]);
        let sections = vec![
            Section::new("a", 0, SectionKind::Code, 0, 0xE000, 0),
            Section::new("b", 1, SectionKind::Code, 0, 0xE002, 0),
        ];
        let mut project = Project::new(&rom, sections);

        let report = project.run().unwrap();
        assert!(text(&report.outputs[0].contents).contains("le001_01:\n          rts"));
        assert!(text(&report.outputs[1].contents).contains("jmp     le001_01"));
    }

    #[test]
    fn test_cross_page_call_keeps_logical_name() {
        // "a": JSR $c000 / RTS in bank 0, "b": RTS at $c000 in bank 1
        let mut data = vec![0xFFu8; 0x4000];
        data[..4].copy_from_slice(&[0x20, 0x00, 0xC0, 0x60]);
        data[0x2000] = 0x60;
        let rom = RomImage::new(data);
        let sections = vec![
            Section::new("a", 0, SectionKind::Code, 0, 0xE000, 0),
            Section::new("b", 1, SectionKind::Code, 1, 0xC000, 0),
        ];
        let mut project = Project::new(&rom, sections);

        let report = project.run().unwrap();
        assert!(text(&report.outputs[0].contents).contains("jsr     lc000_00"));
        assert!(!text(&report.outputs[1].contents).contains("lc000_00:"));
        assert_eq!(project.labels().get("lc000_00").unwrap().physical, None);
    }

    #[test]
    fn test_failed_section_skipped() {
        // "bad" ends with a truncated JSR
        let rom = RomImage::new(vec![0x60, 0xEA, 0x20]);
        let sections = vec![
            Section::new("good", 0, SectionKind::Code, 0, 0xE000, 0),
            Section::new("bad", 1, SectionKind::Code, 0, 0xE001, 2),
        ];
        let mut project = Project::new(&rom, sections);

        let report = project.run().unwrap();
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.outputs[0].name, "good");
        match &report.failures[..] {
            [Error::Section { name, offset, .. }] => {
                assert_eq!(name, "bad");
                assert_eq!(*offset, 1);
            }
            other => panic!("unexpected failures: {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_aborts() {
        let rom = RomImage::new(vec![0x20]);
        let sections = vec![Section::new("bad", 0, SectionKind::Code, 0, 0xE000, 1)];
        let mut project = Project::new(&rom, sections).strict(true);

        assert!(matches!(project.run(), Err(Error::Section { .. })));
    }

    #[test]
    fn test_data_sections_and_main_file() {
        let rom = RomImage::new(vec![0x01, 0x02, 0x03, 0x04]);
        let sections = vec![
            Section::new("tbl", 0, SectionKind::IncludeData, 0, 0xE000, 2),
            Section::new("gfx", 1, SectionKind::BinaryData, 0, 0xE002, 2),
        ];
        let mut project = Project::new(&rom, sections);

        let report = project.run().unwrap();
        assert_eq!(
            text(&report.outputs[0].contents),
            "\t.data\n\t.bank 0\n\t.org $e000\ntbl:\n          .db     $01, $02\n"
        );
        assert_eq!(report.outputs[1].contents, Contents::Binary(vec![0x03, 0x04]));
        assert_eq!(
            report.main,
            "\t.include \"tbl.asm\"\n\t.data\n\t.bank 0\n\t.org $e002\n\t.incbin \"gfx.bin\"\n"
        );
    }

    #[test]
    fn test_user_labels_win() {
        let rom = RomImage::new(vec![0x80, 0x00, 0x60]);
        let sections = vec![Section::new("s", 0, SectionKind::Code, 0, 0xE000, 0)];
        let mut labels = LabelRepository::new();
        labels.add("loop_end", 0xE002, Some(2), LabelKind::User).unwrap();
        let mut project = Project::new(&rom, sections).with_labels(labels);

        let report = project.run().unwrap();
        let listing = text(&report.outputs[0].contents);
        assert!(listing.contains("bra     loop_end"));
        assert!(listing.contains("loop_end:\n          rts"));
    }

    #[test]
    fn test_irq_vectors_prepended() {
        let mut data = vec![0xFFu8; 0x2000];
        data[0] = 0x40; // RTI at $e000
        for i in 0..5 {
            data[0x1FF6 + 2 * i] = 0x00;
            data[0x1FF7 + 2 * i] = 0xE0;
        }
        let rom = RomImage::new(data);
        let sections = vec![Section::new("extra", 0, SectionKind::Code, 0, 0xE000, 1)];
        let project = Project::new(&rom, sections).with_irq_vectors().unwrap();

        let names: Vec<&str> = project.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["irq_2", "irq_1", "irq_timer", "irq_nmi", "irq_reset", "extra"]);
        assert_eq!(project.sections()[5].id, 5);
    }

    #[test]
    fn test_irq_vectors_overflow_section_ids() {
        let rom = RomImage::new(vec![0x60; 0x2000]);
        let sections = (0..252)
            .map(|id| Section::new(format!("s{id}"), id as u8, SectionKind::Code, 0, 0xE000, 1))
            .collect();

        match Project::new(&rom, sections).with_irq_vectors() {
            Err(Error::Config(ConfigError::InvalidSection { name, .. })) => assert_eq!(name, "s251"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("section ids wrapped"),
        }
    }
}
