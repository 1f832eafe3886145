//! Transcription adapter for an OpenAI-compatible audio endpoint.
//!
//! Uploads an audio file as multipart form data and returns the trimmed
//! transcript plus the detected language. The multipart body cannot be
//! replayed, so requests go through a plain reqwest client with no retry.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use voicecal_core::ports::SpeechRecognizer;
use voicecal_domain::{AssistantError, Result, Transcript};

/// Transcription endpoint reply (`response_format=verbose_json`).
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    language: Option<String>,
}

/// Client for an OpenAI-compatible `/v1/audio/transcriptions` endpoint.
pub struct OpenAiTranscriber {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    /// Optional language hint; `None` lets the model auto-detect.
    language_hint: Option<String>,
}

impl OpenAiTranscriber {
    pub fn new(
        api_key: String,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        language_hint: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: endpoint.into(),
            model: model.into(),
            language_hint,
        }
    }
}

#[async_trait]
impl SpeechRecognizer for OpenAiTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        let bytes = tokio::fs::read(audio).await.map_err(|err| {
            AssistantError::Transcription(format!("cannot read {}: {err}", audio.display()))
        })?;

        let file_name = audio
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        debug!(path = %audio.display(), bytes = bytes.len(), "uploading audio for transcription");

        let mut form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", Part::bytes(bytes).file_name(file_name));

        if let Some(language) = &self.language_hint {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|err| AssistantError::Transcription(format!("upload failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Transcription(format!(
                "transcription API error ({status}): {error_text}"
            )));
        }

        let payload: VerboseTranscription = response.json().await.map_err(|err| {
            AssistantError::Transcription(format!("failed to parse transcription: {err}"))
        })?;

        let text = payload.text.trim().to_string();
        if text.is_empty() {
            return Err(AssistantError::Transcription("empty transcription".to_string()));
        }

        if let Some(language) = &payload.language {
            info!(language, "detected language");
        }

        Ok(Transcript::new(text, payload.language))
    }
}
