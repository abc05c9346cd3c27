use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which words a quiz draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PoolMode {
  /// Whole catalog
  All,
  /// One alphabetical group, numbered from 1
  Group(usize),
  /// Words with at least one recorded misspelling
  Incorrect,
}

impl PoolMode {
  /// Label stored in the score log's mode column
  pub fn label(&self) -> String {
    match self {
      Self::All => "all".to_string(),
      Self::Group(n) => format!("group-{}", n),
      Self::Incorrect => "incorrect".to_string(),
    }
  }

  /// Human readable name for page headings
  pub fn display_name(&self) -> String {
    match self {
      Self::All => "All words".to_string(),
      Self::Group(n) => format!("Group {}", n),
      Self::Incorrect => "Incorrect words".to_string(),
    }
  }
}

impl fmt::Display for PoolMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.label())
  }
}

impl FromStr for PoolMode {
  type Err = String;

  /// Accepts "all", "incorrect", a bare group number, or "group-N"/"group:N"
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
      "all" => return Ok(Self::All),
      "incorrect" => return Ok(Self::Incorrect),
      _ => {}
    }

    let number = s
      .strip_prefix("group-")
      .or_else(|| s.strip_prefix("group:"))
      .unwrap_or(&s);
    number
      .parse::<usize>()
      .map(Self::Group)
      .map_err(|_| format!("unknown quiz mode '{}'", s))
  }
}

impl TryFrom<String> for PoolMode {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<PoolMode> for String {
  fn from(mode: PoolMode) -> Self {
    mode.label()
  }
}
