//! Application configuration.
//!
//! Every value is resolved with the same priority: `config.toml` section,
//! then environment variable (a `.env` file is honoured), then the default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "config.toml";

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 5000;

// ==================== Session Configuration ====================

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 12;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Quiz Configuration ====================

/// Correct spellings per day shown as the daily goal
pub const DEFAULT_DAILY_GOAL: u32 = 33;

/// Number of alphabetical groups the catalog is split into
pub const DEFAULT_GROUP_COUNT: usize = 13;

/// Days of history shown on the stats page
pub const STATS_WINDOW_DAYS: i64 = 30;

// ==================== Audio Configuration ====================

/// Default speech command; `{word}` is replaced with the word to speak
/// `--` ends option parsing so a word can never be read as a flag
pub const DEFAULT_TTS_COMMAND: [&str; 4] = ["espeak-ng", "--stdout", "--", "{word}"];

/// Extension of the files the speech command produces
pub const DEFAULT_AUDIO_EXTENSION: &str = "wav";

/// Upper bound on a single synthesis call
pub const DEFAULT_TTS_TIMEOUT_SECS: u64 = 10;

// ==================== Inspection Limits ====================

/// Default page size for attempt listings
pub const DEFAULT_LIST_LIMIT: i64 = 100;

// ==================== config.toml structure ====================

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
  database: Option<DatabaseSection>,
  words: Option<WordsSection>,
  quiz: Option<QuizSection>,
  audio: Option<AudioSection>,
  server: Option<ServerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
  path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WordsSection {
  path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QuizSection {
  daily_goal: Option<u32>,
  group_count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct AudioSection {
  dir: Option<String>,
  command: Option<Vec<String>>,
  extension: Option<String>,
  timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
  addr: Option<String>,
  port: Option<u16>,
}

impl ConfigFile {
  pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(contents)
  }

  /// Read the config file, falling back to an empty config when it is
  /// missing or malformed
  pub fn read(path: &Path) -> Self {
    let Ok(contents) = std::fs::read_to_string(path) else {
      return Self::default();
    };
    match Self::parse(&contents) {
      Ok(config) => config,
      Err(e) => {
        tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
        Self::default()
      }
    }
  }
}

// ==================== Resolved configuration ====================

/// Speech synthesis settings
#[derive(Debug, Clone)]
pub struct AudioConfig {
  pub dir: PathBuf,
  pub command: Vec<String>,
  pub extension: String,
  pub timeout: Duration,
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_path: PathBuf,
  pub words_path: PathBuf,
  pub daily_goal: u32,
  pub group_count: usize,
  pub audio: AudioConfig,
  pub server_addr: String,
  pub server_port: u16,
}

impl AppConfig {
  /// Load configuration from config.toml, .env and the process environment
  pub fn load() -> Self {
    let _ = dotenvy::dotenv();
    let file = ConfigFile::read(Path::new(CONFIG_FILE));
    Self::from_sources(file, |key| std::env::var(key).ok())
  }

  /// Resolve a config from an already-parsed file and an env lookup
  pub fn from_sources(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
    let database = file.database.unwrap_or_default();
    let words = file.words.unwrap_or_default();
    let quiz = file.quiz.unwrap_or_default();
    let audio = file.audio.unwrap_or_default();
    let server = file.server.unwrap_or_default();

    let database_path =
      resolve_path("database", database.path, env("DATABASE_PATH"), paths::db_path());
    let words_path = resolve_path("word list", words.path, env("WORDS_FILE"), paths::words_path());
    let audio_dir = resolve_path("audio cache", audio.dir, env("AUDIO_DIR"), paths::audio_dir());

    let server_port = server
      .port
      .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
      .unwrap_or(SERVER_PORT);

    Self {
      database_path,
      words_path,
      daily_goal: quiz.daily_goal.unwrap_or(DEFAULT_DAILY_GOAL),
      // Zero groups would leave nothing to select
      group_count: quiz.group_count.unwrap_or(DEFAULT_GROUP_COUNT).max(1),
      audio: AudioConfig {
        dir: audio_dir,
        command: audio
          .command
          .filter(|argv| !argv.is_empty())
          .unwrap_or_else(|| DEFAULT_TTS_COMMAND.iter().map(|s| s.to_string()).collect()),
        extension: audio.extension.unwrap_or_else(|| DEFAULT_AUDIO_EXTENSION.to_string()),
        timeout: Duration::from_secs(audio.timeout_secs.unwrap_or(DEFAULT_TTS_TIMEOUT_SECS)),
      },
      server_addr: server.addr.unwrap_or_else(|| SERVER_ADDR.to_string()),
      server_port,
    }
  }

  /// Get the full server bind address
  pub fn server_bind_addr(&self) -> String {
    format!("{}:{}", self.server_addr, self.server_port)
  }
}

fn resolve_path(
  what: &str,
  from_file: Option<String>,
  from_env: Option<String>,
  default: String,
) -> PathBuf {
  if let Some(path) = from_file {
    tracing::info!("Using {} from {}: {}", what, CONFIG_FILE, path);
    return PathBuf::from(path);
  }
  if let Some(path) = from_env {
    tracing::info!("Using {} from environment: {}", what, path);
    return PathBuf::from(path);
  }
  tracing::info!("Using default {} path: {}", what, default);
  PathBuf::from(default)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn no_env(_: &str) -> Option<String> {
    None
  }

  #[test]
  fn test_defaults_without_file_or_env() {
    let config = AppConfig::from_sources(ConfigFile::default(), no_env);
    assert_eq!(config.daily_goal, DEFAULT_DAILY_GOAL);
    assert_eq!(config.group_count, DEFAULT_GROUP_COUNT);
    assert_eq!(config.server_port, SERVER_PORT);
    assert_eq!(config.audio.extension, "wav");
    assert_eq!(config.audio.command[0], "espeak-ng");
    assert!(config.database_path.ends_with("scores.db"));
  }

  #[test]
  fn test_default_command_ends_options_before_word() {
    let config = AppConfig::from_sources(ConfigFile::default(), no_env);
    let word_at = config.audio.command.iter().position(|a| a == "{word}").unwrap();
    assert_eq!(config.audio.command[word_at - 1], "--");
  }

  #[test]
  fn test_file_sections_are_applied() {
    let file = ConfigFile::parse(
      r#"
      [database]
      path = "/tmp/custom.db"

      [words]
      path = "lists/bee.csv"

      [quiz]
      daily_goal = 10
      group_count = 4

      [audio]
      command = ["say", "-o", "-", "{word}"]
      extension = "aiff"
      timeout_secs = 3

      [server]
      port = 8080
      "#,
    )
    .unwrap();

    let config = AppConfig::from_sources(file, no_env);
    assert_eq!(config.database_path, PathBuf::from("/tmp/custom.db"));
    assert_eq!(config.words_path, PathBuf::from("lists/bee.csv"));
    assert_eq!(config.daily_goal, 10);
    assert_eq!(config.group_count, 4);
    assert_eq!(config.audio.command, vec!["say", "-o", "-", "{word}"]);
    assert_eq!(config.audio.extension, "aiff");
    assert_eq!(config.audio.timeout, Duration::from_secs(3));
    assert_eq!(config.server_bind_addr(), "0.0.0.0:8080");
  }

  #[test]
  fn test_file_beats_env() {
    let file = ConfigFile::parse("[database]\npath = \"from-file.db\"\n").unwrap();
    let env = |key: &str| match key {
      "DATABASE_PATH" => Some("from-env.db".to_string()),
      "WORDS_FILE" => Some("env-words.csv".to_string()),
      "PORT" => Some("6000".to_string()),
      _ => None,
    };

    let config = AppConfig::from_sources(file, env);
    assert_eq!(config.database_path, PathBuf::from("from-file.db"));
    assert_eq!(config.words_path, PathBuf::from("env-words.csv"));
    assert_eq!(config.server_port, 6000);
  }

  #[test]
  fn test_zero_group_count_is_clamped() {
    let file = ConfigFile::parse("[quiz]\ngroup_count = 0\n").unwrap();
    let config = AppConfig::from_sources(file, no_env);
    assert_eq!(config.group_count, 1);
  }

  #[test]
  fn test_empty_command_falls_back_to_default() {
    let file = ConfigFile::parse("[audio]\ncommand = []\n").unwrap();
    let config = AppConfig::from_sources(file, no_env);
    assert_eq!(config.audio.command.len(), DEFAULT_TTS_COMMAND.len());
  }

  #[test]
  fn test_missing_file_reads_as_default() {
    let config = ConfigFile::read(Path::new("/nonexistent/config.toml"));
    assert!(config.database.is_none());
  }
}
