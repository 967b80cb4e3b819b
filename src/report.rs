// 📋 Report - the final shopping list, grouped by section
//
// * Gemüse:
// Gurke: 2Stück
// Tomaten: 1500g + 2Stück

use crate::aggregate::Aggregator;
use crate::collation::Collation;
use crate::store::SectionAssignment;

pub struct ReportFormatter<'c> {
    collation: &'c dyn Collation,
}

impl<'c> ReportFormatter<'c> {
    pub fn new(collation: &'c dyn Collation) -> Self {
        ReportFormatter { collation }
    }

    /// Render every section in stored order. Sections with nothing bought
    /// this run still get their header.
    pub fn render(&self, aggregator: &Aggregator, sections: &SectionAssignment) -> String {
        let mut out = String::new();

        for (section, members) in sections.iter() {
            out.push_str(&format!("\n* {}:\n", section));

            let mut lines: Vec<(&String, String)> = aggregator
                .iter()
                .filter(|(item, _)| members.contains(item))
                .map(|(item, totals)| (item, totals.render()))
                .collect();
            lines.sort_by(|(a, _), (b, _)| self.collation.compare(a, b));

            for (item, amounts) in lines {
                out.push_str(&format!("{}: {}\n", item, amounts));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::{CodepointCollation, GermanCollation};
    use crate::units::{CanonicalUnit, Quantity};

    fn q(amount: f64, unit: CanonicalUnit) -> Quantity {
        Quantity { amount, unit }
    }

    fn fixture() -> (Aggregator, SectionAssignment) {
        let mut aggregator = Aggregator::new();
        aggregator.add("Zwiebeln", q(1000.0, CanonicalUnit::Gram));
        aggregator.add("Äpfel", q(6.0, CanonicalUnit::Piece));
        aggregator.add("Milch", q(2000.0, CanonicalUnit::Milliliter));
        aggregator.add("Äpfel", q(500.0, CanonicalUnit::Gram));

        let mut sections = SectionAssignment::new();
        sections.assign("Obst & Gemüse", "Zwiebeln");
        sections.assign("Kühlregal", "Milch");
        sections.assign("Obst & Gemüse", "Äpfel");
        sections.assign("Tiefkühl", "Erbsen");

        (aggregator, sections)
    }

    #[test]
    fn test_render_grouped_and_sorted() {
        let (aggregator, sections) = fixture();
        let report = ReportFormatter::new(&GermanCollation).render(&aggregator, &sections);

        assert_eq!(
            report,
            "\n* Obst & Gemüse:\n\
             Äpfel: 500g + 6Stück\n\
             Zwiebeln: 1000g\n\
             \n* Kühlregal:\n\
             Milch: 2000ml\n\
             \n* Tiefkühl:\n"
        );
    }

    #[test]
    fn test_collation_decides_item_order() {
        let (aggregator, sections) = fixture();
        let report = ReportFormatter::new(&CodepointCollation).render(&aggregator, &sections);

        let zwiebeln = report.find("Zwiebeln").unwrap();
        let apfel = report.find("Äpfel").unwrap();
        assert!(zwiebeln < apfel);
    }

    #[test]
    fn test_empty_section_prints_header_only() {
        let aggregator = Aggregator::new();
        let mut sections = SectionAssignment::new();
        sections.assign("Getränke", "Wasser");

        let report = ReportFormatter::new(&GermanCollation).render(&aggregator, &sections);
        assert_eq!(report, "\n* Getränke:\n");
    }
}
