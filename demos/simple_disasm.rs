//! Basic disassembler usage example

use huc6280_disasm::project::Contents;
use huc6280_disasm::{Project, RomImage, Section, SectionKind};

fn main() {
    // Example machine code bytes, bank 0 mapped at $E000
    let code = vec![
        0xA9, 0xFF, // LDA #$FF
        0x53, 0x02, // TAM #1
        0x73, 0x00, 0x40, 0x00, 0x22, 0x00, 0x01, // TII $4000, $2200, $0100
        0xCA, // DEX
        0xD0, 0xFD, // BNE $E00B
        0x20, 0x12, 0xE0, // JSR $E012
        0x60, // RTS
        0x60, // RTS
    ];
    let rom = RomImage::new(code);

    let sections = vec![
        // Listed first so its name wins over the label generated for the JSR
        Section::new("helper", 0, SectionKind::Code, 0x00, 0xE012, 0),
        Section::new("main", 1, SectionKind::Code, 0x00, 0xE000, 0),
    ];

    let mut project = Project::new(&rom, sections);
    let report = match project.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return;
        }
    };

    // Print each section listing
    for output in &report.outputs {
        println!("; {}", output.file);
        if let Contents::Text(text) = &output.contents {
            print!("{text}");
        }
        println!();
    }
    print!("{}", report.main);
}
