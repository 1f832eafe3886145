//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for VoiceCal
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AssistantError {
    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Interpretation error: {0}")]
    Interpretation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for VoiceCal operations
pub type Result<T> = std::result::Result<T, AssistantError>;
