// ⚖️ Unit Normalizer - Raw (amount, unit) → canonical quantity
// Large units fold into their small counterpart so they can be summed.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CANONICAL UNIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalUnit {
    /// Grams (kg folds into this)
    Gram,

    /// Millilitres (L folds into this)
    Milliliter,

    /// Single pieces
    Piece,

    /// Packing unit / case ("VE")
    Case,

    /// Pot / tub
    Pot,
}

impl CanonicalUnit {
    /// Declared iteration order, used for quantity vectors and the report
    pub const ALL: [CanonicalUnit; 5] = [
        CanonicalUnit::Gram,
        CanonicalUnit::Milliliter,
        CanonicalUnit::Piece,
        CanonicalUnit::Case,
        CanonicalUnit::Pot,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CanonicalUnit::Gram => "g",
            CanonicalUnit::Milliliter => "ml",
            CanonicalUnit::Piece => "Stück",
            CanonicalUnit::Case => "VE",
            CanonicalUnit::Pot => "Pott",
        }
    }

    /// Position inside `ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// RAW UNIT
// ============================================================================

/// Every unit token accepted on input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawUnit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
    Case,
    Pot,
}

impl RawUnit {
    /// Parse an input token. Matching is exact: "KG" or "l" are not units.
    pub fn parse(token: &str) -> Option<RawUnit> {
        match token {
            "g" => Some(RawUnit::Gram),
            "kg" => Some(RawUnit::Kilogram),
            "ml" => Some(RawUnit::Milliliter),
            "L" => Some(RawUnit::Liter),
            "Stück" => Some(RawUnit::Piece),
            "VE" => Some(RawUnit::Case),
            "Pott" => Some(RawUnit::Pot),
            _ => None,
        }
    }

    /// Canonical unit plus the factor an amount is multiplied by
    pub fn conversion(&self) -> (CanonicalUnit, f64) {
        match self {
            RawUnit::Gram => (CanonicalUnit::Gram, 1.0),
            RawUnit::Kilogram => (CanonicalUnit::Gram, 1000.0),
            RawUnit::Milliliter => (CanonicalUnit::Milliliter, 1.0),
            RawUnit::Liter => (CanonicalUnit::Milliliter, 1000.0),
            RawUnit::Piece => (CanonicalUnit::Piece, 1.0),
            RawUnit::Case => (CanonicalUnit::Case, 1.0),
            RawUnit::Pot => (CanonicalUnit::Pot, 1.0),
        }
    }
}

// ============================================================================
// DECIMAL STYLE
// ============================================================================

/// How decimal numbers are written in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalStyle {
    pub separator: char,
}

impl DecimalStyle {
    pub fn new(separator: char) -> Self {
        DecimalStyle { separator }
    }

    /// German input: "1,5" means one and a half
    pub fn comma() -> Self {
        DecimalStyle::new(',')
    }

    /// Parse a raw amount, `None` when it is not a finite number
    pub fn parse(&self, raw: &str) -> Option<f64> {
        let normalized = raw.trim().replace(self.separator, ".");
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl Default for DecimalStyle {
    fn default() -> Self {
        Self::comma()
    }
}

// ============================================================================
// NORMALIZED QUANTITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub amount: f64,
    pub unit: CanonicalUnit,
}

/// Why a record did not produce a quantity
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Ignored,
    EmptyName,
    InvalidUnit(String),
    InvalidAmount(String),
}

// ============================================================================
// UNIT NORMALIZER
// ============================================================================

pub struct UnitNormalizer {
    decimal: DecimalStyle,
}

impl UnitNormalizer {
    pub fn new(decimal: DecimalStyle) -> Self {
        UnitNormalizer { decimal }
    }

    /// Convert a raw amount/unit pair into a canonical quantity
    pub fn convert(&self, raw_amount: &str, raw_unit: &str) -> Result<Quantity, Rejection> {
        let unit = RawUnit::parse(raw_unit)
            .ok_or_else(|| Rejection::InvalidUnit(raw_unit.to_string()))?;
        let amount = self
            .decimal
            .parse(raw_amount)
            .filter(|v| *v >= 0.0)
            .ok_or_else(|| Rejection::InvalidAmount(raw_amount.to_string()))?;

        let (canonical, factor) = unit.conversion();
        Ok(Quantity {
            amount: amount * factor,
            unit: canonical,
        })
    }
}

impl Default for UnitNormalizer {
    fn default() -> Self {
        Self::new(DecimalStyle::default())
    }
}

/// Render an amount with at most three fractional digits, no trailing zeros
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.3}", amount);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
