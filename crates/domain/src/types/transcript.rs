//! Transcript produced by the speech recognition collaborator

use serde::{Deserialize, Serialize};

/// Text recovered from one audio input, plus the detected language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Trimmed, non-empty transcription text.
    pub text: String,
    /// ISO 639-1 language code reported by the recognizer, when available.
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(text: impl Into<String>, language: Option<String>) -> Self {
        Self { text: text.into(), language }
    }
}
