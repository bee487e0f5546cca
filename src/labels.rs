//! Label repository.
//!
//! Labels are looked up by physical address first. A label whose physical
//! address is unknown (a jump into a page whose bank is not known when the
//! jump is analysed) can only be found through its logical address.
//!
//! When two labels share an address, lookups return the one registered
//! first. Section labels are registered before their body is scanned, so
//! they win over branch targets landing on the same byte.

use std::collections::HashMap;

use thiserror::Error;

use crate::mapping::PAGE_SHIFT;

/// Where a label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// First byte of a section.
    SectionStart,
    /// Target of a relative branch.
    BranchTarget,
    /// Target of an absolute jump or call.
    JumpTarget,
    /// Loaded from a label file.
    User,
}

impl LabelKind {
    /// True for labels generated while scanning code.
    pub fn is_generated(self) -> bool {
        matches!(self, LabelKind::BranchTarget | LabelKind::JumpTarget)
    }
}

/// A named address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Unique name.
    pub name: String,
    /// 16-bit logical address.
    pub logical: u16,
    /// 21-bit physical address, `None` when unresolved.
    pub physical: Option<u32>,
    /// Origin.
    pub kind: LabelKind,
}

/// Errors raised by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label `{name}` is already defined")]
    Duplicate { name: String },
}

/// Canonical name of a generated label: `l<logical:04x>_<section:02>`.
///
/// ```
/// assert_eq!(huc6280_disasm::labels::generated_name(0x04A0, 7), "l04a0_07");
/// ```
pub fn generated_name(logical: u16, section_id: u8) -> String {
    format!("l{logical:04x}_{section_id:02}")
}

/// Name ↔ address store shared by both passes.
#[derive(Debug, Clone, Default)]
pub struct LabelRepository {
    labels: Vec<Label>,
    by_name: HashMap<String, usize>,
    by_physical: HashMap<u32, usize>,
    by_logical: HashMap<u16, usize>,
}

impl LabelRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label.
    ///
    /// Returns `Err` if the name already exists; the stored label is left
    /// untouched.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        logical: u16,
        physical: Option<u32>,
        kind: LabelKind,
    ) -> Result<(), LabelError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(LabelError::Duplicate { name });
        }

        let index = self.labels.len();
        self.by_name.insert(name.clone(), index);
        if let Some(physical) = physical {
            self.by_physical.entry(physical).or_insert(index);
        }
        self.by_logical.entry(logical).or_insert(index);
        self.labels.push(Label {
            name,
            logical,
            physical,
            kind,
        });

        Ok(())
    }

    /// Name of the first label registered at a physical address.
    pub fn find_by_physical(&self, physical: u32) -> Option<&str> {
        self.by_physical
            .get(&physical)
            .map(|&i| self.labels[i].name.as_str())
    }

    /// Name of the first label registered at a logical address.
    pub fn find_by_logical(&self, logical: u16) -> Option<&str> {
        self.by_logical
            .get(&logical)
            .map(|&i| self.labels[i].name.as_str())
    }

    /// Look up a label by name.
    pub fn get(&self, name: &str) -> Option<&Label> {
        self.by_name.get(name).map(|&i| &self.labels[i])
    }

    /// Labels in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Remove labels whose logical address lies in `first..=last` and whose
    /// physical address sits in `bank`. Returns the number removed.
    ///
    /// Label-file editing helper; the passes never delete.
    pub fn remove_range(&mut self, first: u16, last: u16, bank: u8) -> usize {
        let before = self.labels.len();
        self.labels.retain(|label| {
            let in_range = (first..=last).contains(&label.logical);
            let in_bank = label.physical.map(|p| p >> PAGE_SHIFT) == Some(bank as u32);
            !(in_range && in_bank)
        });
        let removed = before - self.labels.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        self.by_physical.clear();
        self.by_logical.clear();
        for (index, label) in self.labels.iter().enumerate() {
            self.by_name.insert(label.name.clone(), index);
            if let Some(physical) = label.physical {
                self.by_physical.entry(physical).or_insert(index);
            }
            self.by_logical.entry(label.logical).or_insert(index);
        }
    }
}
