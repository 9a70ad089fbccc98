//! Tests for the fact truth heuristic.

use cat_facts_game::{FACT_KEYWORDS, FALLBACK_FACTS, Fact, LONG_FACT_LENGTH, classify, keyword_hits};

#[test]
fn test_classify_is_deterministic() {
    let facts = [
        Fact::from_text("Cats sleep most of the night"),
        Fact::from_text("Dogs bark loudly"),
        Fact::new("A kitten".to_string(), 80),
        Fact::new(String::new(), 0),
    ];
    for fact in &facts {
        let first = classify(fact);
        for _ in 0..5 {
            assert_eq!(classify(fact), first, "classify flipped for {:?}", fact);
        }
    }
}

#[test]
fn test_many_keywords_is_true() {
    let fact = Fact::from_text("Cats sleep most of the night");
    // cat, cats, sleep, night
    assert_eq!(keyword_hits(fact.text()), 4);
    assert!(classify(&fact));
}

#[test]
fn test_keyword_inside_other_word_counts() {
    // "location" contains "cat"
    assert_eq!(keyword_hits("Location"), 1);
    let fact = Fact::new("Location".to_string(), LONG_FACT_LENGTH + 1);
    assert!(classify(&fact));
}

#[test]
fn test_reported_length_drives_single_keyword() {
    let short = Fact::new("A group of kittens".to_string(), 18);
    let long = Fact::new("A group of kittens".to_string(), 120);
    assert_eq!(keyword_hits(short.text()), 1);
    assert!(!classify(&short));
    assert!(classify(&long));
}

#[test]
fn test_empty_fact_is_false() {
    assert!(!classify(&Fact::new(String::new(), 0)));
}

#[test]
fn test_keyword_list_is_lowercase_and_unique() {
    let mut seen = std::collections::HashSet::new();
    for keyword in FACT_KEYWORDS {
        assert_eq!(keyword, keyword.to_lowercase());
        assert!(seen.insert(keyword), "duplicate keyword {}", keyword);
    }
    assert_eq!(seen.len(), 14);
}

#[test]
fn test_fallback_facts_have_both_labels() {
    let labels: Vec<bool> = FALLBACK_FACTS
        .iter()
        .map(|text| classify(&Fact::from_text(*text)))
        .collect();
    assert!(labels.iter().any(|label| *label));
    assert!(labels.iter().any(|label| !*label));
}
