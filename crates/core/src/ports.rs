//! Port interfaces to external collaborators
//!
//! Defines the narrow contracts this application depends on: speech
//! recognition, text generation, the calendar provider, and voice output.
//! Infrastructure adapters implement these traits; core logic never sees
//! anything more concrete.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voicecal_domain::{Result, Transcript};

/// Event resource ready for provider submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResource {
    pub summary: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

/// RFC 3339 instant plus an explicit IANA timezone, as the provider requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Provider acknowledgement for a created event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedEvent {
    pub id: String,
    pub summary: String,
}

/// Upcoming event as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedEvent {
    pub summary: Option<String>,
    /// Start as reported by the provider: a dateTime, or a date for
    /// all-day events.
    pub start: String,
}

/// Trait for the speech recognition collaborator
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe the audio file at `audio`.
    ///
    /// Fails with `AssistantError::Transcription` when the file is missing,
    /// unreadable, or the underlying model errors; callers treat that as
    /// "no command this cycle".
    async fn transcribe(&self, audio: &Path) -> Result<Transcript>;
}

/// Trait for the text-generation collaborator
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Obtain a free-text reply for `prompt`.
    ///
    /// May take seconds; callers must treat the call as blocking.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Trait for calendar provider operations
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Submit a new event to the given calendar.
    async fn insert_event(&self, calendar_id: &str, event: &EventResource)
        -> Result<InsertedEvent>;

    /// Upcoming events starting at or after `time_min`, ordered by start
    /// time ascending, recurring series expanded to single occurrences,
    /// capped at `max_results`.
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<ListedEvent>>;
}

/// Trait for the speech synthesis side channel
#[async_trait]
pub trait VoiceOutput: Send + Sync {
    /// Render `text` audibly.
    ///
    /// Non-essential: failures carry `AssistantError::Synthesis` and are
    /// logged and swallowed by callers.
    async fn speak(&self, text: &str) -> Result<()>;
}
