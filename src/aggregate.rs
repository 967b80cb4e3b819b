// ➕ Aggregator - per-item totals for the current run
// Trusts the canonical name it is given; merging happens before this.

use crate::units::{format_amount, CanonicalUnit, Quantity};
use indexmap::IndexMap;

// ============================================================================
// QUANTITY VECTOR
// ============================================================================

/// One slot per canonical unit, all starting at zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuantityVector {
    amounts: [f64; CanonicalUnit::ALL.len()],
}

impl QuantityVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to one unit; negative or non-finite amounts are ignored
    pub fn add(&mut self, unit: CanonicalUnit, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.amounts[unit.index()] += amount;
        }
    }

    pub fn get(&self, unit: CanonicalUnit) -> f64 {
        self.amounts[unit.index()]
    }

    /// Units with a positive total, in declared order
    pub fn positive(&self) -> impl Iterator<Item = (CanonicalUnit, f64)> + '_ {
        CanonicalUnit::ALL
            .into_iter()
            .map(move |unit| (unit, self.get(unit)))
            .filter(|(_, amount)| *amount > 0.0)
    }

    /// "500g + 2Stück"; empty when nothing is positive
    pub fn render(&self) -> String {
        self.positive()
            .map(|(unit, amount)| format!("{}{}", format_amount(amount), unit))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Canonical item → totals, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    items: IndexMap<String, QuantityVector>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a converted quantity, creating a zeroed vector for new items
    pub fn add(&mut self, item: &str, quantity: Quantity) {
        self.items
            .entry(item.to_string())
            .or_default()
            .add(quantity.unit, quantity.amount);
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    pub fn get(&self, item: &str) -> Option<&QuantityVector> {
        self.items.get(item)
    }

    /// Canonical items seen this run, first-seen order
    pub fn items(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QuantityVector)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grams(amount: f64) -> Quantity {
        Quantity { amount, unit: CanonicalUnit::Gram }
    }

    #[test]
    fn test_same_item_sums_per_unit() {
        let mut aggregator = Aggregator::new();
        aggregator.add("Tomaten", grams(200.0));
        aggregator.add("Tomaten", grams(300.0));

        let totals = aggregator.get("Tomaten").unwrap();
        assert_eq!(totals.get(CanonicalUnit::Gram), 500.0);
        for unit in CanonicalUnit::ALL.iter().filter(|u| **u != CanonicalUnit::Gram) {
            assert_eq!(totals.get(*unit), 0.0);
        }
        assert_eq!(totals.positive().count(), 1);
    }

    #[test]
    fn test_units_kept_apart() {
        let mut aggregator = Aggregator::new();
        aggregator.add("Tomaten", grams(500.0));
        aggregator.add("Tomaten", Quantity { amount: 2.0, unit: CanonicalUnit::Piece });

        assert_eq!(aggregator.get("Tomaten").unwrap().render(), "500g + 2Stück");
    }

    #[test]
    fn test_first_seen_order() {
        let mut aggregator = Aggregator::new();
        aggregator.add("Milch", Quantity { amount: 1000.0, unit: CanonicalUnit::Milliliter });
        aggregator.add("Brot", Quantity { amount: 1.0, unit: CanonicalUnit::Piece });
        aggregator.add("Milch", Quantity { amount: 500.0, unit: CanonicalUnit::Milliliter });

        let names: Vec<&String> = aggregator.items().collect();
        assert_eq!(names, ["Milch", "Brot"]);
        assert_eq!(aggregator.len(), 2);
    }

    #[test]
    fn test_zero_amount_creates_item_without_totals() {
        let mut aggregator = Aggregator::new();
        aggregator.add("Salz", grams(0.0));

        assert!(aggregator.contains("Salz"));
        assert_eq!(aggregator.get("Salz").unwrap().render(), "");
    }

    #[test]
    fn test_render_declared_unit_order() {
        let mut totals = QuantityVector::new();
        totals.add(CanonicalUnit::Pot, 1.0);
        totals.add(CanonicalUnit::Milliliter, 250.0);
        totals.add(CanonicalUnit::Gram, 1.5);

        assert_eq!(totals.render(), "1.5g + 250ml + 1Pott");
    }

    #[test]
    fn test_negative_amount_ignored() {
        let mut totals = QuantityVector::new();
        totals.add(CanonicalUnit::Gram, -5.0);
        assert_eq!(totals.get(CanonicalUnit::Gram), 0.0);
    }
}
