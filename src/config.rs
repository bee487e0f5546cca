//! Section and label configuration files.
//!
//! Both files are JSON. Numbers may be JSON integers or hexadecimal strings
//! with an optional `$` or `0x` prefix.
//!
//! ```json
//! {
//!   "boot": { "type": "code", "bank": "0", "org": "e000" },
//!   "font": { "type": "inc_data", "bank": "1a", "org": "$4000", "size": "0x800" }
//! }
//! ```
//!
//! Sections are numbered in file order; the number ends up in generated
//! label names.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::labels::{LabelKind, LabelRepository};
use crate::mapping::{page_of, AddressTranslator, PAGE_COUNT, PAGE_MASK, PAGE_SHIFT};
use crate::section::{Section, SectionKind};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{text}` is not a hexadecimal number")]
    InvalidNumber { text: String },

    #[error("section `{name}`: {reason}")]
    InvalidSection { name: String, reason: String },

    #[error("label `{name}`: {reason}")]
    InvalidLabel { name: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u64),
    Text(String),
}

impl Number {
    fn value(&self) -> Result<u64, ConfigError> {
        match self {
            Number::Int(value) => Ok(*value),
            Number::Text(text) => parse_hex(text),
        }
    }
}

/// Parse `1f`, `$1f` or `0x1f`.
fn parse_hex(text: &str) -> Result<u64, ConfigError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('$')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidNumber {
        text: text.to_string(),
    })
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindEntry {
    Code,
    IncData,
    BinData,
}

impl From<KindEntry> for SectionKind {
    fn from(kind: KindEntry) -> Self {
        match kind {
            KindEntry::Code => SectionKind::Code,
            KindEntry::IncData => SectionKind::IncludeData,
            KindEntry::BinData => SectionKind::BinaryData,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionEntry {
    #[serde(rename = "type")]
    kind: KindEntry,
    bank: Number,
    org: Number,
    #[serde(default)]
    size: Option<Number>,
    #[serde(default)]
    mpr: Option<Vec<Number>>,
    #[serde(default)]
    output: Option<String>,
}

/// Section entries in file order, repeated names included.
struct SectionEntries(Vec<(String, SectionEntry)>);

impl<'de> Deserialize<'de> for SectionEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = SectionEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of section names to sections")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, entry)) = map.next_entry::<String, SectionEntry>()? {
                    entries.push((name, entry));
                }
                Ok(SectionEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelEntry {
    name: String,
    logical: Number,
    #[serde(default)]
    page: Option<Number>,
}

fn section_field(name: &str, field: &str, number: &Number, max: u64) -> Result<u64, ConfigError> {
    let value = number.value()?;
    if value > max {
        return Err(ConfigError::InvalidSection {
            name: name.to_string(),
            reason: format!("{field} {value:#x} is larger than {max:#x}"),
        });
    }
    Ok(value)
}

fn build_section(name: String, id: u8, entry: SectionEntry) -> Result<Section, ConfigError> {
    let bank = section_field(&name, "bank", &entry.bank, 0xFF)? as u8;
    let org = section_field(&name, "org", &entry.org, 0xFFFF)? as u16;
    let size = match &entry.size {
        Some(size) => section_field(&name, "size", size, 0x20_0000)? as u32,
        None => 0,
    };
    let kind = SectionKind::from(entry.kind);

    if kind != SectionKind::Code && size == 0 {
        return Err(ConfigError::InvalidSection {
            name,
            reason: format!("{kind} sections need an explicit size"),
        });
    }

    let mut section = Section::new(name, id, kind, bank, org, size);

    if let Some(registers) = &entry.mpr {
        if registers.len() != PAGE_COUNT {
            return Err(ConfigError::InvalidSection {
                name: section.name,
                reason: format!("mpr needs {PAGE_COUNT} values, got {}", registers.len()),
            });
        }
        let mut mpr = [0u8; PAGE_COUNT];
        for (slot, value) in mpr.iter_mut().zip(registers) {
            *slot = section_field(&section.name, "mpr", value, 0xFF)? as u8;
        }
        section.mpr = AddressTranslator::new(mpr);
        section.mpr.set_bank(page_of(org), bank);
    }

    if let Some(output) = entry.output {
        section.output = output;
    }

    Ok(section)
}

/// Parse a section file.
///
/// A name defined twice is an error.
pub fn parse_sections(text: &str) -> Result<Vec<Section>, ConfigError> {
    let SectionEntries(list) = serde_json::from_str(text)?;

    let mut entries = IndexMap::with_capacity(list.len());
    for (name, entry) in list {
        if entries.contains_key(&name) {
            return Err(ConfigError::InvalidSection {
                name,
                reason: "defined twice".to_string(),
            });
        }
        entries.insert(name, entry);
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (name, entry))| {
            let id = u8::try_from(index).map_err(|_| ConfigError::InvalidSection {
                name: name.clone(),
                reason: "more than 256 sections".to_string(),
            })?;
            build_section(name, id, entry)
        })
        .collect()
}

/// Read and parse a section file.
pub fn load_sections(path: impl AsRef<Path>) -> Result<Vec<Section>, ConfigError> {
    parse_sections(&read(path.as_ref())?)
}

/// Parse a label file into `labels`. Returns the number of labels added.
pub fn parse_labels(text: &str, labels: &mut LabelRepository) -> Result<usize, ConfigError> {
    let entries: Vec<LabelEntry> = serde_json::from_str(text)?;
    let count = entries.len();

    for entry in entries {
        let invalid = |reason: String| ConfigError::InvalidLabel {
            name: entry.name.clone(),
            reason,
        };

        let logical = entry.logical.value()?;
        if logical > 0xFFFF {
            return Err(invalid(format!("logical address {logical:#x} out of range")));
        }
        let physical = match &entry.page {
            Some(page) => {
                let page = page.value()?;
                if page > 0xFF {
                    return Err(invalid(format!("page {page:#x} out of range")));
                }
                Some((page as u32) << PAGE_SHIFT | (logical as u32 & PAGE_MASK))
            }
            None => None,
        };

        labels
            .add(entry.name.as_str(), logical as u16, physical, LabelKind::User)
            .map_err(|_| invalid("already defined".to_string()))?;
    }

    Ok(count)
}

/// Read a label file into `labels`.
pub fn load_labels(path: impl AsRef<Path>, labels: &mut LabelRepository) -> Result<usize, ConfigError> {
    parse_labels(&read(path.as_ref())?, labels)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
