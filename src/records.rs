// 📄 Purchase-line records - CSV input → RawRecord
// Format (no header): ignore-flag, item name, amount, unit
// Example: "0","Tomaten","1,5","kg"

use crate::units::{Quantity, Rejection, UnitNormalizer};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

// ============================================================================
// RAW RECORD
// ============================================================================

/// One input line before any resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// "1" in the first column
    pub ignore: bool,

    /// Item name, trimmed
    pub name: String,

    /// Amount exactly as written ("1,5")
    pub amount: String,

    /// Unit token ("kg", "Stück", ...)
    pub unit: String,

    /// 1-indexed line in the source file
    pub line_number: usize,
}

impl RawRecord {
    pub fn new(ignore: bool, name: &str, amount: &str, unit: &str) -> Self {
        RawRecord {
            ignore,
            name: name.trim().to_string(),
            amount: amount.to_string(),
            unit: unit.to_string(),
            line_number: 0,
        }
    }

    /// Apply the skip rules, then convert the quantity
    pub fn normalize(&self, normalizer: &UnitNormalizer) -> Result<Quantity, Rejection> {
        if self.ignore {
            return Err(Rejection::Ignored);
        }
        if self.name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        normalizer.convert(&self.amount, &self.unit)
    }
}

// ============================================================================
// READER
// ============================================================================

/// Load all records from a CSV file
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    read_records(file).with_context(|| format!("Failed to read records from {}", path.display()))
}

/// Read records from any CSV source
pub fn read_records<R: Read>(source: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let line_number = index + 1;
        let row = result.with_context(|| format!("Failed to parse CSV line {}", line_number))?;

        // Short rows read as empty fields and get skipped later
        let mut record = RawRecord::new(
            row.get(0).unwrap_or("") == "1",
            row.get(1).unwrap_or(""),
            row.get(2).unwrap_or(""),
            row.get(3).unwrap_or(""),
        );
        record.line_number = line_number;
        records.push(record);
    }

    Ok(records)
}
