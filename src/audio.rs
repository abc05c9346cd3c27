//! Spoken audio for quiz words.
//!
//! Words are synthesized by an external command and cached on disk under a
//! name derived from a hash of the word, so file names never reveal the
//! answer. Synthesis is best effort: failure or timeout means "no audio".

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::AudioConfig;

/// URL prefix the audio directory is served under
pub const AUDIO_URL_PREFIX: &str = "/audio";

/// Placeholder in the command argv replaced with the word
const WORD_PLACEHOLDER: &str = "{word}";

/// Hex characters of the SHA-256 digest kept in cache file names
const HASH_PREFIX_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("no speech command configured")]
    NoCommand,
    #[error("failed to run speech command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("speech command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("speech command produced no audio")]
    Empty,
}

/// Turns a word into encoded audio bytes
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, word: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// Runs a configured command and captures the audio it writes to stdout
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    argv: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    fn command_for(&self, word: &str) -> Result<Command, SynthesisError> {
        let (program, args) = self.argv.split_first().ok_or(SynthesisError::NoCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(args.iter().map(|arg| arg.replace(WORD_PLACEHOLDER, word)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future on timeout must not leave the process behind
            .kill_on_drop(true);
        Ok(cmd)
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn synthesize(&self, word: &str) -> Result<Vec<u8>, SynthesisError> {
        let output = self.command_for(word)?.output().await?;

        if !output.status.success() {
            return Err(SynthesisError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(SynthesisError::Empty);
        }
        Ok(output.stdout)
    }
}

/// Cached, time-bounded speech for quiz words
pub struct AudioService {
    dir: PathBuf,
    extension: String,
    timeout: Duration,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl AudioService {
    pub fn new(config: &AudioConfig) -> Self {
        Self::with_synthesizer(
            config.dir.clone(),
            &config.extension,
            config.timeout,
            Arc::new(CommandSynthesizer::new(config.command.clone())),
        )
    }

    pub fn with_synthesizer(
        dir: PathBuf,
        extension: &str,
        timeout: Duration,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            dir,
            extension: extension.trim_start_matches('.').to_string(),
            timeout,
            synthesizer,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file name for a word. Case-sensitive, so "Paris" and "paris"
    /// are spoken separately.
    pub fn file_name(&self, word: &str) -> String {
        let digest = hex::encode(Sha256::digest(word.as_bytes()));
        format!("{}.{}", &digest[..HASH_PREFIX_LEN], self.extension)
    }

    /// Return the URL of the word's audio, synthesizing it on a cache miss.
    /// None when synthesis fails or times out.
    pub async fn audio_url(&self, word: &str) -> Option<String> {
        let file_name = self.file_name(word);
        let path = self.dir.join(&file_name);
        let url = format!("{}/{}", AUDIO_URL_PREFIX, file_name);

        if is_cached(&path).await {
            return Some(url);
        }

        let bytes = match timeout(self.timeout, self.synthesizer.synthesize(word)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                tracing::warn!("Speech synthesis failed for {}: {}", file_name, e);
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    "Speech synthesis for {} timed out after {:?}",
                    file_name,
                    self.timeout
                );
                return None;
            }
        };

        match self.store(&path, &bytes).await {
            Ok(()) => {
                tracing::debug!("Cached {} ({} bytes)", file_name, bytes.len());
                Some(url)
            }
            Err(e) => {
                tracing::warn!("Failed to cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write via a temporary file so a half-written file is never served
    async fn store(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let partial = path.with_extension("part");
        tokio::fs::write(&partial, bytes).await?;
        tokio::fs::rename(&partial, path).await
    }
}

async fn is_cached(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
