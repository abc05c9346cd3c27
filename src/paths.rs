//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! This allows running isolated instances side by side:
//! ```bash
//! DATA_DIR=data/test PORT=5001 cargo run
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
  DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Score database path
pub fn db_path() -> String {
  format!("{}/scores.db", data_dir())
}

/// Default word list spreadsheet
pub fn words_path() -> String {
  format!("{}/words.xlsx", data_dir())
}

/// Cached synthesized audio, served under /audio
pub fn audio_dir() -> String {
  format!("{}/audio", data_dir())
}

/// Static assets directory (not under DATA_DIR)
pub const STATIC_DIR: &str = "static";
