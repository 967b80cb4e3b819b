// 🔤 Fuzzy similarity - normalized 0-100 ratio between two names
//
// ratio = 100 * (|a| + |b| - indel(a, b)) / (|a| + |b|)
// indel = insertions + deletions needed to turn a into b
//       = |a| + |b| - 2 * LCS(a, b)
//
// Lengths count Unicode scalar values, so "Möhre" has length 5.

/// Similarity of two strings on a 0-100 scale
///
/// Example:
/// - similarity_ratio("Tomate", "Tomaten") ≈ 92.3
/// - similarity_ratio("Tomate", "Gurke") ≈ 18.2
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let distance = indel_distance(&a, &b);

    // Integer numerator keeps whole-number scores exact (85 stays 85.0)
    (100 * (total - distance)) as f64 / total as f64
}

/// Minimum number of insertions and deletions turning `a` into `b`
pub fn indel_distance(a: &[char], b: &[char]) -> usize {
    a.len() + b.len() - 2 * longest_common_subsequence(a, b)
}

/// Length of the longest common subsequence
///
/// Two-row table: only the previous row is needed.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("Tomaten", "Tomaten"), 100.0);
        assert_eq!(similarity_ratio("", ""), 100.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_plural_is_close() {
        // LCS 6, total 13 → 12/13
        let score = similarity_ratio("Tomate", "Tomaten");
        assert!((score - 1200.0 / 13.0).abs() < 1e-9);
        assert!(score > 85.0);
    }

    #[test]
    fn test_case_matters() {
        // Case is not folded: "t" and "T" differ
        assert!(similarity_ratio("tomaten", "Tomaten") < 100.0);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // One substitution in five characters → LCS 4, total 10
        assert_eq!(similarity_ratio("Möhre", "Mohre"), 80.0);
    }

    #[test]
    fn test_exact_integer_scores() {
        // LCS 17 of 20 + 20 → exactly 85
        let a = format!("{}{}", "a".repeat(17), "bbb");
        let b = format!("{}{}", "a".repeat(17), "ccc");
        assert_eq!(similarity_ratio(&a, &b), 85.0);

        // LCS 43 of 50 + 50 → exactly 86
        let a = format!("{}{}", "a".repeat(43), "b".repeat(7));
        let b = format!("{}{}", "a".repeat(43), "c".repeat(7));
        assert_eq!(similarity_ratio(&a, &b), 86.0);
    }

    #[test]
    fn test_indel_distance() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        // LCS "ittn" = 4 → 6 + 7 - 8
        assert_eq!(indel_distance(&a, &b), 5);
    }
}
