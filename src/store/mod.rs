// 💾 Durable state - what survives between runs
//
// Only identity decisions are remembered: which raw names merge into which
// canonical item, and which section each canonical item belongs to.
// Quantities are never persisted.
//
// The state is loaded once at start and saved once at the end. A run that
// dies in between loses its decisions and will ask again next time.

pub mod json;
pub mod sqlite;

pub use json::JsonStateStore;
pub use sqlite::SqliteStateStore;

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw item name → canonical item. Direct entries only, never chained.
pub type EquivalenceMap = IndexMap<String, String>;

// ============================================================================
// SECTION ASSIGNMENT
// ============================================================================

/// Section display name → items filed under it, in insertion order
///
/// An item appears in at most one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionAssignment {
    sections: IndexMap<String, Vec<String>>,
}

impl SectionAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section an item is filed under, if any
    pub fn section_of(&self, item: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(_, items)| items.iter().any(|i| i == item))
            .map(|(section, _)| section.as_str())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.section_of(item).is_some()
    }

    /// File an item under a section. Returns false (and changes nothing)
    /// when the item already has a section.
    pub fn assign(&mut self, section: &str, item: &str) -> bool {
        if self.contains(item) {
            return false;
        }
        self.sections
            .entry(section.to_string())
            .or_default()
            .push(item.to_string());
        true
    }

    /// Restore a whole section as stored
    pub fn insert_section(&mut self, section: &str, items: Vec<String>) {
        self.sections.insert(section.to_string(), items);
    }

    /// Sections in stored order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sections
            .iter()
            .map(|(section, items)| (section.as_str(), items.as_slice()))
    }

    pub fn items_in(&self, section: &str) -> &[String] {
        self.sections
            .get(section)
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of filed items
    pub fn item_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// ============================================================================
// DURABLE STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurableState {
    #[serde(default)]
    pub items_per_section: SectionAssignment,

    #[serde(default)]
    pub equivalence: EquivalenceMap,
}

impl DurableState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Where durable state lives
pub trait StateStore {
    /// Previous state, or empty maps when nothing was saved yet
    fn load(&self) -> Result<DurableState>;

    /// Replace the stored state wholesale
    fn save(&self, state: &DurableState) -> Result<()>;

    /// Short name for logs
    fn describe(&self) -> String;
}
