// 🧺 Session - one run from raw records to a classified shopping list
//
// Owns the run's mutable state (durable decisions + per-run totals) and
// threads it through the resolver and classifier. Nothing here touches
// the filesystem; loading and saving happen around it.

use crate::aggregate::Aggregator;
use crate::equivalence::{EquivalenceResolver, Resolution};
use crate::operator::Operator;
use crate::records::RawRecord;
use crate::report::ReportFormatter;
use crate::sections::{SectionCatalog, SectionClassifier};
use crate::store::DurableState;
use crate::units::{Rejection, UnitNormalizer};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Counters for the end-of-run log line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub skipped: usize,
    pub invalid_amounts: usize,
    pub merges_confirmed: usize,
    pub merges_declined: usize,
    pub items_classified: usize,
}

pub struct Session {
    pub state: DurableState,
    pub aggregator: Aggregator,
    pub summary: RunSummary,
}

impl Session {
    pub fn new(state: DurableState) -> Self {
        Session {
            state,
            aggregator: Aggregator::new(),
            summary: RunSummary::default(),
        }
    }

    /// Normalize, resolve and accumulate one record
    pub fn ingest(
        &mut self,
        record: &RawRecord,
        normalizer: &UnitNormalizer,
        resolver: &EquivalenceResolver,
        operator: &mut dyn Operator,
    ) -> Result<()> {
        self.summary.records += 1;

        let quantity = match record.normalize(normalizer) {
            Ok(quantity) => quantity,
            Err(Rejection::InvalidAmount(raw)) => {
                warn!("{} with amount {} is invalid and ignored", record.name, raw);
                self.summary.skipped += 1;
                self.summary.invalid_amounts += 1;
                return Ok(());
            }
            Err(reason) => {
                debug!(line = record.line_number, name = %record.name, ?reason, "record skipped");
                self.summary.skipped += 1;
                return Ok(());
            }
        };

        // Seen this run: no resolution at all
        let canonical = if self.aggregator.contains(&record.name) {
            record.name.clone()
        } else {
            let resolution = resolver.resolve(
                &record.name,
                self.aggregator.items(),
                &mut self.state.equivalence,
                operator,
            )?;
            match &resolution {
                Resolution::Merged(_) => self.summary.merges_confirmed += 1,
                Resolution::Declined(_) => self.summary.merges_declined += 1,
                _ => {}
            }
            resolution.into_canonical()
        };

        self.aggregator.add(&canonical, quantity);
        Ok(())
    }

    /// Ingest a batch of records in order
    pub fn ingest_all(
        &mut self,
        records: &[RawRecord],
        normalizer: &UnitNormalizer,
        resolver: &EquivalenceResolver,
        operator: &mut dyn Operator,
    ) -> Result<()> {
        for record in records {
            self.ingest(record, normalizer, resolver, operator)?;
        }
        Ok(())
    }

    /// Give every item bought this run a section, asking for new ones
    pub fn classify_all(
        &mut self,
        catalog: &SectionCatalog,
        list_token: &str,
        operator: &mut dyn Operator,
    ) -> Result<()> {
        let classifier = SectionClassifier::new(catalog, list_token);

        let pending: Vec<String> = self
            .aggregator
            .items()
            .filter(|item| !self.state.items_per_section.contains(item))
            .cloned()
            .collect();

        for item in pending {
            classifier.classify(&item, &mut self.state.items_per_section, operator)?;
            self.summary.items_classified += 1;
        }
        Ok(())
    }

    pub fn report(&self, formatter: &ReportFormatter) -> String {
        formatter.render(&self.aggregator, &self.state.items_per_section)
    }

    pub fn log_summary(&self) {
        info!(
            records = self.summary.records,
            skipped = self.summary.skipped,
            invalid_amounts = self.summary.invalid_amounts,
            items = self.aggregator.len(),
            merges_confirmed = self.summary.merges_confirmed,
            merges_declined = self.summary.merges_declined,
            classified = self.summary.items_classified,
            "run complete"
        );
    }
}
