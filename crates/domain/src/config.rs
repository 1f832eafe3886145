//! Application configuration structures
//!
//! Typed configuration shared by every crate. Values are loaded by the
//! infrastructure config loader from environment variables with a file
//! fallback; API keys are read from the environment only and never stored
//! in these structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_TIMEZONE, PRIMARY_CALENDAR_ID};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub speech: SpeechConfig,
    pub language_model: LanguageModelConfig,
    pub calendar: CalendarConfig,
}

/// Speech recognition and synthesis collaborator endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// OpenAI-compatible transcription endpoint (multipart audio upload).
    pub transcription_endpoint: String,
    pub transcription_model: String,
    /// Optional language hint; `None` lets the model auto-detect.
    pub language_hint: Option<String>,
    /// OpenAI-compatible speech synthesis endpoint.
    pub synthesis_endpoint: String,
    pub synthesis_model: String,
    pub voice: String,
    /// Disable to keep the session silent (responses are still printed).
    pub speak_responses: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            transcription_endpoint: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            transcription_model: "whisper-1".to_string(),
            language_hint: None,
            synthesis_endpoint: "https://api.openai.com/v1/audio/speech".to_string(),
            synthesis_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            speak_responses: true,
        }
    }
}

/// Text-generation collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageModelConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for LanguageModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Calendar provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Directory holding `credentials.json` and the persisted token artifact.
    pub credentials_dir: PathBuf,
    pub calendar_id: String,
    /// IANA timezone applied when a parsed moment carries no zone of its own.
    pub timezone: String,
    pub max_results: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            credentials_dir: PathBuf::from("credentials"),
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
