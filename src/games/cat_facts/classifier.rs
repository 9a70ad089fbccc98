//! Keyword heuristic that labels a fact "true" or "false".
//!
//! This is not fact-checking. A fact counts as true when it reads like
//! typical cat behavior: at least two keywords, or one keyword in a fact
//! longer than [`LONG_FACT_LENGTH`].

use super::types::Fact;
use tracing::{instrument, trace};

/// Vocabulary of typical cat behavior.
pub const FACT_KEYWORDS: [&str; 14] = [
    "cat", "cats", "feline", "purr", "whiskers", "paws", "tail", "meow", "kitten", "sleep",
    "hunt", "night", "eyes", "hearing",
];

/// Reported length above which a single keyword is enough.
pub const LONG_FACT_LENGTH: usize = 50;

/// Counts distinct keywords occurring anywhere in `text`, ignoring case.
///
/// Matching is by substring, so "cats" also counts "cat", and
/// "location" counts "cat".
pub fn keyword_hits(text: &str) -> usize {
    let lowered = text.to_lowercase();
    FACT_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count()
}

/// Returns the truth label used to grade answers.
#[instrument(skip(fact), fields(length = fact.length()))]
pub fn classify(fact: &Fact) -> bool {
    let hits = keyword_hits(fact.text());
    let verdict = hits >= 2 || (hits >= 1 && fact.length() > LONG_FACT_LENGTH);
    trace!(hits, verdict, "Classified fact");
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_keywords_is_true() {
        let fact = Fact::new("Cats purr".to_string(), 9);
        assert_eq!(keyword_hits(fact.text()), 3);
        assert!(classify(&fact));
    }

    #[test]
    fn test_single_keyword_short_is_false() {
        let fact = Fact::new("A meow".to_string(), 6);
        assert!(!classify(&fact));
    }

    #[test]
    fn test_single_keyword_long_is_true() {
        let fact = Fact::new("A meow".to_string(), 51);
        assert!(classify(&fact));
    }

    #[test]
    fn test_length_fifty_is_not_long() {
        let fact = Fact::new("A meow".to_string(), 50);
        assert!(!classify(&fact));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(keyword_hits("FELINE WHISKERS"), 2);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        assert_eq!(keyword_hits("tail tail tail"), 1);
    }

    #[test]
    fn test_no_keywords() {
        let fact = Fact::new("Dogs bark loudly".to_string(), 200);
        assert_eq!(keyword_hits(fact.text()), 0);
        assert!(!classify(&fact));
    }
}
