// 🔍 Equivalence Resolver - which canonical item does a raw name mean?
//
// 1. Known merge in the equivalence map → use it, never ask again
// 2. Otherwise score against every canonical item seen this run
// 3. No candidate above the threshold → the name stands for itself
// 4. Candidates → operator picks one, or "do not merge"
//
// Only confirmed merges are written to the map. "Do not merge" and
// "nothing similar" are not remembered, so they are re-evaluated next run.

use crate::operator::Operator;
use crate::similarity::similarity_ratio;
use crate::store::EquivalenceMap;
use anyhow::Result;
use tracing::{debug, info};

pub const DEFAULT_THRESHOLD: f64 = 85.0;
pub const DEFAULT_NO_MERGE_LABEL: &str = "Do not merge.";

/// How a raw name was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Looked up in the persisted equivalence map
    Remembered(String),

    /// Operator confirmed a merge (now persisted)
    Merged(String),

    /// Operator declined all candidates
    Declined(String),

    /// Nothing scored above the threshold
    Unmatched(String),
}

impl Resolution {
    /// The canonical item, whatever path led there
    pub fn canonical(&self) -> &str {
        match self {
            Resolution::Remembered(c)
            | Resolution::Merged(c)
            | Resolution::Declined(c)
            | Resolution::Unmatched(c) => c,
        }
    }

    pub fn into_canonical(self) -> String {
        match self {
            Resolution::Remembered(c)
            | Resolution::Merged(c)
            | Resolution::Declined(c)
            | Resolution::Unmatched(c) => c,
        }
    }
}

pub struct EquivalenceResolver {
    /// Candidates must score strictly above this (0-100)
    pub threshold: f64,

    /// Escape choice appended after the candidates
    pub no_merge_label: String,
}

impl EquivalenceResolver {
    pub fn new(threshold: f64, no_merge_label: impl Into<String>) -> Self {
        EquivalenceResolver {
            threshold,
            no_merge_label: no_merge_label.into(),
        }
    }

    /// Whether a score is close enough to offer a merge
    pub fn qualifies(&self, score: f64) -> bool {
        score > self.threshold
    }

    /// Known canonical items similar enough to `raw`, in the order given
    pub fn candidates<'k, I>(&self, raw: &str, known: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'k String>,
    {
        known
            .into_iter()
            .filter(|item| self.qualifies(similarity_ratio(item, raw)))
            .cloned()
            .collect()
    }

    /// Resolve a raw name not yet seen in this run
    ///
    /// `known` are the canonical items seen so far this run.
    pub fn resolve<'k, I>(
        &self,
        raw: &str,
        known: I,
        equivalence: &mut EquivalenceMap,
        operator: &mut dyn Operator,
    ) -> Result<Resolution>
    where
        I: IntoIterator<Item = &'k String>,
    {
        if let Some(canonical) = equivalence.get(raw) {
            debug!(raw, canonical = %canonical, "known equivalence");
            return Ok(Resolution::Remembered(canonical.clone()));
        }

        let mut choices = self.candidates(raw, known);
        if choices.is_empty() {
            return Ok(Resolution::Unmatched(raw.to_string()));
        }

        choices.push(self.no_merge_label.clone());
        let prompt = format!(
            "Do you want to merge *{}* with one of the following?",
            raw
        );
        let answer = operator.choose(&prompt, &choices)?;

        if answer == self.no_merge_label {
            debug!(raw, "operator declined merge");
            return Ok(Resolution::Declined(raw.to_string()));
        }

        info!(raw, canonical = %answer, "merge confirmed");
        equivalence.insert(raw.to_string(), answer.clone());
        Ok(Resolution::Merged(answer))
    }
}

impl Default for EquivalenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_NO_MERGE_LABEL)
    }
}
