// Integration tests for word dataset invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use typeship::{MOTHERSHIP_WORDS, REGULAR_WORDS};

#[test]
fn regular_words_are_unique_and_valid() {
    let mut seen = HashSet::new();
    for w in REGULAR_WORDS {
        assert!(seen.insert(*w), "duplicate word '{}' in REGULAR_WORDS", w);
        assert!(!w.is_empty(), "empty word in REGULAR_WORDS");
        for c in w.chars() {
            assert!(c.is_ascii_lowercase(), "invalid char '{}' in '{}'", c, w);
        }
    }
}

#[test]
fn mothership_words_are_unique_and_valid() {
    let mut seen = HashSet::new();
    for w in MOTHERSHIP_WORDS {
        assert!(seen.insert(*w), "duplicate word '{}' in MOTHERSHIP_WORDS", w);
        assert!(!w.is_empty(), "empty word in MOTHERSHIP_WORDS");
        for c in w.chars() {
            assert!(c.is_ascii_lowercase(), "invalid char '{}' in '{}'", c, w);
        }
    }
}

#[test]
fn mothership_words_are_longer_than_regular_words() {
    let longest_regular = REGULAR_WORDS.iter().map(|w| w.len()).max().unwrap();
    let shortest_mother = MOTHERSHIP_WORDS.iter().map(|w| w.len()).min().unwrap();
    assert!(
        shortest_mother > longest_regular,
        "mothership words must out-length regular words ({shortest_mother} <= {longest_regular})"
    );
}

#[test]
fn vocabularies_do_not_overlap() {
    let regular: HashSet<&str> = REGULAR_WORDS.iter().copied().collect();
    for w in MOTHERSHIP_WORDS {
        assert!(!regular.contains(w), "'{}' appears in both vocabularies", w);
    }
}
