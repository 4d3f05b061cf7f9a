//! Transcript persister - the durable ordered log of chat messages.
//!
//! The transcript is a pretty-printed UTF-8 JSON array of `{role, content}`
//! objects, fully overwritten on each save. Storage is not incremental:
//! appending a turn is an explicit load-extend-save, which is safe only
//! because a session has a single writer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chat::Message;

/// Reads and writes the transcript file for a session.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored message sequence in order.
    ///
    /// A missing or empty file is treated as an empty history.
    pub fn load(&self) -> Result<Vec<Message>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading transcript: {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("parsing transcript: {}", self.path.display()))
    }

    /// Serialize the full sequence, replacing prior file content.
    pub fn save(&self, messages: &[Message]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("creating transcript directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(messages).context("serializing transcript")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing transcript: {}", self.path.display()))?;
        Ok(())
    }

    /// Append a turn by reading the existing transcript, extending it, and
    /// writing the merged result back.
    pub fn append(&self, turn: &[Message]) -> Result<()> {
        let mut messages = self.load()?;
        messages.extend_from_slice(turn);
        self.save(&messages)
    }
}
