//! # VoiceCal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with retry/backoff
//! - Configuration loading
//! - External service integrations (Google Calendar + OAuth, language
//!   model, speech transcription and synthesis)
//!
//! ## Architecture
//! - Implements traits defined in `voicecal-core`
//! - Depends on `voicecal-domain` and `voicecal-core`
//! - Contains all "impure" code (network, filesystem, audio)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::calendar::{CredentialManager, GoogleCalendarClient};
pub use integrations::openai::OpenAiClient;
pub use integrations::speech::{OpenAiSynthesizer, OpenAiTranscriber};
