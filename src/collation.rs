// Sort keys for item names
//
// The report orders items inside a section by one collation key. The key
// is passed in explicitly so results do not depend on the host locale.

use std::cmp::Ordering;

pub trait Collation {
    fn key(&self, s: &str) -> String;

    /// Order by key, then by the raw string so ties are stable
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b)).then_with(|| a.cmp(b))
    }
}

/// German dictionary order: case-insensitive, umlauts beside their base
/// letter, ß as "ss"
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanCollation;

impl Collation for GermanCollation {
    fn key(&self, s: &str) -> String {
        let mut key = String::with_capacity(s.len());
        for c in s.chars().flat_map(char::to_lowercase) {
            match c {
                'ä' => key.push('a'),
                'ö' => key.push('o'),
                'ü' => key.push('u'),
                'ß' => key.push_str("ss"),
                other => key.push(other),
            }
        }
        key
    }
}

/// Plain Unicode code point order
#[derive(Debug, Clone, Copy, Default)]
pub struct CodepointCollation;

impl Collation for CodepointCollation {
    fn key(&self, s: &str) -> String {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted<C: Collation>(collation: &C, names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        names.sort_by(|a, b| collation.compare(a, b));
        names
    }

    #[test]
    fn test_german_umlauts_sort_with_base_letter() {
        let names = ["Zucker", "Äpfel", "Birnen", "apfelsaft"];
        assert_eq!(
            sorted(&GermanCollation, &names),
            ["Äpfel", "apfelsaft", "Birnen", "Zucker"]
        );
    }

    #[test]
    fn test_codepoint_puts_umlauts_last() {
        let names = ["Zucker", "Äpfel", "Birnen"];
        assert_eq!(sorted(&CodepointCollation, &names), ["Birnen", "Zucker", "Äpfel"]);
    }

    #[test]
    fn test_sharp_s_expands() {
        assert_eq!(GermanCollation.key("Weißbrot"), "weissbrot");
    }

    #[test]
    fn test_ties_broken_by_raw_string() {
        // Same key, different case
        assert_eq!(sorted(&GermanCollation, &["milch", "Milch"]), ["Milch", "milch"]);
    }
}
