//! # HuC6280 Disassembler Core
//!
//! A two-pass, label-resolving disassembler for PC-Engine (HuC6280) ROM
//! images.
//!
//! The first pass walks each code section and registers a label for every
//! branch and jump target; the second pass prints the section with those
//! labels substituted for raw addresses.
//!
//! ## Quick Start
//!
//! ```rust
//! use huc6280_disasm::{Project, RomImage, Section, SectionKind};
//! use huc6280_disasm::project::Contents;
//!
//! // LDA #$05 / BNE -4 / RTS
//! let rom = RomImage::new(vec![0xA9, 0x05, 0xD0, 0xFC, 0x60]);
//! let sections = vec![Section::new("start", 0, SectionKind::Code, 0x00, 0xE000, 0)];
//!
//! let mut project = Project::new(&rom, sections);
//! let report = project.run().unwrap();
//!
//! let Contents::Text(listing) = &report.outputs[0].contents else { unreachable!() };
//! assert!(listing.contains("start:\n          lda     #$05\n          bne     start\n"));
//! assert_eq!(project.sections()[0].size, 5);
//! ```
//!
//! ## Architecture
//!
//! - **Table-Driven Decoding**: opcode metadata and operand layouts live in
//!   one table that both passes decode through
//! - **Banked Addresses**: labels carry a 21-bit physical address resolved
//!   through the eight MPR bank registers, or only a logical address when the
//!   bank is not known
//! - **Pass State Machine**: both passes implement the same
//!   `initialize`/`iterate`/`finalize` trait, driven by one loop
//!
//! ## Modules
//!
//! - `addressing` - Addressing modes and operand layouts
//! - `opcodes` - Opcode metadata table
//! - `mapping` - MPR bank registers, logical/physical translation
//! - `memory` - ROM byte source
//! - `section` - Sections and the decode cursor
//! - `labels` - Label repository
//! - `decoder` - Instruction decoding and target arithmetic
//! - `formatter` - Assembly text output
//! - `pass` - Label extraction and disassembly passes
//! - `data` - Data section output
//! - `config` - JSON section and label files
//! - `irq` - Interrupt vector sections
//! - `project` - Run driver

pub mod addressing;
pub mod config;
pub mod data;
pub mod decoder;
pub mod formatter;
pub mod irq;
pub mod labels;
pub mod mapping;
pub mod memory;
pub mod opcodes;
pub mod pass;
pub mod project;
pub mod section;

// Re-export public API
pub use addressing::AddressingMode;
pub use config::ConfigError;
pub use decoder::{decode_instruction, DecodeError, Instruction};
pub use labels::{Label, LabelError, LabelKind, LabelRepository};
pub use mapping::AddressTranslator;
pub use memory::{ByteSource, RomImage};
pub use opcodes::{OpcodeMetadata, OpcodeTable, OPCODE_TABLE};
pub use pass::{PassError, PassState};
pub use project::{Project, RunReport};
pub use section::{DecodeCursor, Section, SectionKind};

use thiserror::Error;

/// Errors surfaced by a disassembly run.
#[derive(Debug, Error)]
pub enum Error {
    /// A section failed. `offset` is the cursor position, relative to the
    /// section start, of the instruction that could not be processed.
    #[error("section `{name}` failed at offset {offset:#x}: {source}")]
    Section {
        name: String,
        offset: u32,
        #[source]
        source: PassError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
