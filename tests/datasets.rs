// Additional integration tests for symbol set invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use emoji_pairs::deck::playable_cards;
use emoji_pairs::{FILLER, SYMBOLS};

#[test]
fn symbols_are_unique_and_nonempty() {
    let mut seen = HashSet::new();
    for s in SYMBOLS {
        assert!(!s.is_empty(), "empty symbol in SYMBOLS");
        assert!(seen.insert(*s), "duplicate symbol '{}' in SYMBOLS", s);
    }
}

#[test]
fn filler_is_not_a_playable_symbol() {
    assert!(!SYMBOLS.contains(&FILLER), "filler '{}' must not be dealt as a pair", FILLER);
}

#[test]
fn pool_covers_the_first_six_levels() {
    for level in 1..=6 {
        assert!(
            playable_cards(level) / 2 <= SYMBOLS.len(),
            "level {} needs more than {} symbols",
            level,
            SYMBOLS.len()
        );
    }
    assert!(playable_cards(7) / 2 > SYMBOLS.len());
}
