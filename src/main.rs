use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;

use huc6280_disasm::project::Contents;
use huc6280_disasm::{config, LabelRepository, Project, RomImage};

/// PC-Engine ROM disassembler.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Section configuration (JSON)
    cfg: PathBuf,

    /// ROM image
    rom: PathBuf,

    /// Disassemble the routines behind the interrupt vectors (HuCard only)
    #[clap(short, long, conflicts_with = "cdrom")]
    irq_detect: bool,

    /// CD-ROM image: keep every byte, no header detection
    #[clap(short, long)]
    cdrom: bool,

    /// Main file including every section
    #[clap(short, long, default_value = "main.asm")]
    out: PathBuf,

    /// Label file (JSON)
    #[clap(short, long)]
    labels: Option<PathBuf>,

    /// Stop at the first failing section
    #[clap(long)]
    strict: bool,

    /// -v for info, -vv for debug
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> anyhow::Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let rom = RomImage::load(&args.rom, args.cdrom)
        .with_context(|| format!("failed to read ROM {}", args.rom.display()))?;
    let sections = config::load_sections(&args.cfg)?;

    let mut labels = LabelRepository::new();
    if let Some(path) = &args.labels {
        let count = config::load_labels(path, &mut labels)?;
        info!("{count} labels loaded from {}", path.display());
    }

    let mut project = Project::new(&rom, sections)
        .with_labels(labels)
        .strict(args.strict);
    if args.irq_detect {
        project = project.with_irq_vectors()?;
    }

    let report = project.run()?;

    let dir = args.out.parent().unwrap_or_else(|| Path::new(""));
    for output in &report.outputs {
        match &output.contents {
            Contents::Text(text) => write_file(dir, &output.file, text.as_bytes())?,
            Contents::Binary(bytes) => write_file(dir, &output.file, bytes)?,
        }
    }
    std::fs::write(&args.out, &report.main)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
    if report.anomalies > 0 {
        eprintln!("{} decode anomalies, see warnings", report.anomalies);
    }
    if !report.failures.is_empty() {
        anyhow::bail!("{} section(s) skipped", report.failures.len());
    }
    Ok(())
}
