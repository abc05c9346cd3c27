//! Spelling comparison.
//!
//! Exact match after trimming, lowercasing and NFC normalization. Near
//! misses are wrong.

use unicode_normalization::UnicodeNormalization;

/// Canonical form of a word or guess for comparison
pub fn normalize_spelling(input: &str) -> String {
  input.trim().to_lowercase().nfc().collect()
}

pub fn spelling_matches(guess: &str, word: &str) -> bool {
  normalize_spelling(guess) == normalize_spelling(word)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_case_and_whitespace_are_ignored() {
    assert!(spelling_matches("  RHYTHM ", "rhythm"));
    assert!(spelling_matches("paris", "Paris"));
  }

  #[test]
  fn test_near_misses_fail() {
    assert!(!spelling_matches("rythm", "rhythm"));
    assert!(!spelling_matches("rhythms", "rhythm"));
    assert!(!spelling_matches("", "rhythm"));
  }

  #[test]
  fn test_inner_whitespace_is_significant() {
    assert!(!spelling_matches("ice cream", "icecream"));
    assert!(spelling_matches("ice cream", " Ice cream"));
  }

  #[test]
  fn test_canonically_equivalent_accents_match() {
    // "café" precomposed vs. "e" + combining acute
    assert!(spelling_matches("cafe\u{0301}", "caf\u{00e9}"));
    assert!(!spelling_matches("cafe", "caf\u{00e9}"));
  }
}
