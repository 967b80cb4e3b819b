// 🗂️ Sections - where in the shop an item is found
//
// The catalog maps short codes ("GE") to display names ("Gemüse") and is
// read from a two-column CSV: display name, code.
//
// Classification asks the operator for a code until a known one is typed.
// There is no skip: an unknown code just asks again.

use crate::operator::Operator;
use crate::store::SectionAssignment;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Fatal registry faults
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Key {code} used for {conflicting} was already assigned to {existing}")]
    DuplicateCode {
        code: String,
        existing: String,
        conflicting: String,
    },

    #[error("Section registry line {line} needs two columns (name, code)")]
    MissingColumn { line: usize },
}

// ============================================================================
// SECTION CATALOG
// ============================================================================

/// Code → display name, in registry order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionCatalog {
    sections: IndexMap<String, String>,
}

impl SectionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry file; duplicate codes are fatal
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open section registry: {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut catalog = SectionCatalog::new();
        for (index, result) in reader.records().enumerate() {
            let line = index + 1;
            let row = result.with_context(|| format!("Failed to parse section registry line {}", line))?;

            let (name, code) = match (row.get(0), row.get(1)) {
                (Some(name), Some(code)) => (name, code),
                _ => return Err(CatalogError::MissingColumn { line }.into()),
            };
            catalog.insert(code, name)?;
        }

        debug!(sections = catalog.len(), "section catalog loaded");
        Ok(catalog)
    }

    /// Register a section under a code
    pub fn insert(&mut self, code: &str, name: &str) -> Result<(), CatalogError> {
        if let Some(existing) = self.sections.get(code) {
            return Err(CatalogError::DuplicateCode {
                code: code.to_string(),
                existing: existing.clone(),
                conflicting: name.to_string(),
            });
        }
        self.sections.insert(code.to_string(), name.to_string());
        Ok(())
    }

    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.sections.get(code).map(String::as_str)
    }

    /// "Gemüse [GE]" lines for the operator
    pub fn listing(&self) -> String {
        self.sections
            .iter()
            .map(|(code, name)| format!("{} [{}]", name, code))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// ============================================================================
// SECTION CLASSIFIER
// ============================================================================

pub struct SectionClassifier<'a> {
    catalog: &'a SectionCatalog,

    /// Input that prints the catalog instead of answering
    list_token: String,
}

impl<'a> SectionClassifier<'a> {
    pub fn new(catalog: &'a SectionCatalog, list_token: impl Into<String>) -> Self {
        SectionClassifier {
            catalog,
            list_token: list_token.into(),
        }
    }

    /// Ask until the operator gives a known code, then file the item
    ///
    /// Items that already have a section are returned as-is without asking.
    pub fn classify(
        &self,
        item: &str,
        assignment: &mut SectionAssignment,
        operator: &mut dyn Operator,
    ) -> Result<String> {
        if let Some(section) = assignment.section_of(item) {
            return Ok(section.to_string());
        }

        let prompt = format!("In which category is {}? [{} for list]", item, self.list_token);
        let section = loop {
            let answer = operator.ask(&prompt)?;

            if answer == self.list_token {
                operator.show(&self.catalog.listing())?;
            }
            if let Some(name) = self.catalog.name_for(&answer) {
                break name.to_string();
            }
            debug!(item, answer = %answer, "unknown section code, asking again");
        };

        assignment.assign(&section, item);
        info!(item, section = %section, "item classified");
        Ok(section)
    }
}
