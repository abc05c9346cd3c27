use serde::{Deserialize, Serialize};

/// Shown when the word list has no definition for a word
pub const NO_DEFINITION: &str = "No definition available.";

/// Shown when the word list has no example sentence for a word
pub const NO_SENTENCE: &str = "No example sentence available.";

/// One row of the word list, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
  /// Original casing, used for display and speech
  pub word: String,
  pub definition: String,
  pub sentence: String,
}

impl WordEntry {
  /// Build an entry from raw cell text. Returns None for a blank word.
  pub fn new(word: &str, definition: Option<&str>, sentence: Option<&str>) -> Option<Self> {
    let word = word.trim();
    if word.is_empty() {
      return None;
    }

    Some(Self {
      word: word.to_string(),
      definition: non_blank_or(definition, NO_DEFINITION),
      sentence: non_blank_or(sentence, NO_SENTENCE),
    })
  }

  /// Key used for alphabetical ordering
  pub fn sort_key(&self) -> String {
    self.word.to_lowercase()
  }

  /// Case-insensitive identity check against another word
  pub fn is_word(&self, other: &str) -> bool {
    self.word.to_lowercase() == other.trim().to_lowercase()
  }
}

fn non_blank_or(value: Option<&str>, placeholder: &str) -> String {
  match value.map(str::trim) {
    // Spreadsheet exports sometimes spell missing cells as "nan"
    Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("nan") => v.to_string(),
    _ => placeholder.to_string(),
  }
}

/// Replace every vowel with an underscore, keeping everything else
pub fn mask_vowels(word: &str) -> String {
  word
    .chars()
    .map(|c| if "AEIOUaeiou".contains(c) { '_' } else { c })
    .collect()
}
