//! Speech synthesis side channel.
//!
//! Posts response text to an OpenAI-compatible `/v1/audio/speech` endpoint
//! and plays the returned audio. Playback blocks an OS thread, so it runs
//! under `spawn_blocking`; callers log and swallow every failure since
//! spoken output is non-essential.

use std::io::Cursor;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use voicecal_core::ports::VoiceOutput;
use voicecal_domain::{AssistantError, Result};

/// Client for an OpenAI-compatible speech synthesis endpoint.
pub struct OpenAiSynthesizer {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    voice: String,
}

impl OpenAiSynthesizer {
    pub fn new(
        api_key: String,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: endpoint.into(),
            model: model.into(),
            voice: voice.into(),
        }
    }

    /// Fetch synthesized audio bytes for `text`.
    async fn fetch_audio(&self, text: &str) -> Result<Vec<u8>> {
        let payload = json!({
            "model": self.model,
            "voice": self.voice,
            "input": text,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AssistantError::Synthesis(format!("synthesis request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Synthesis(format!(
                "synthesis API error ({status}): {error_text}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| AssistantError::Synthesis(format!("cannot read audio body: {err}")))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl VoiceOutput for OpenAiSynthesizer {
    async fn speak(&self, text: &str) -> Result<()> {
        let audio = self.fetch_audio(text).await?;
        debug!(bytes = audio.len(), "playing synthesized response");

        tokio::task::spawn_blocking(move || play_audio(audio))
            .await
            .map_err(|err| AssistantError::Synthesis(format!("playback task failed: {err}")))?
    }
}

/// Decode and play the audio on the default output device, blocking until
/// playback completes.
fn play_audio(audio: Vec<u8>) -> Result<()> {
    let (_stream, handle) = rodio::OutputStream::try_default()
        .map_err(|err| AssistantError::Synthesis(format!("no audio output device: {err}")))?;

    let sink = rodio::Sink::try_new(&handle)
        .map_err(|err| AssistantError::Synthesis(format!("cannot open audio sink: {err}")))?;

    let source = rodio::Decoder::new(Cursor::new(audio))
        .map_err(|err| AssistantError::Synthesis(format!("cannot decode audio: {err}")))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn synthesizer(endpoint: String) -> OpenAiSynthesizer {
        OpenAiSynthesizer::new("test-api-key".to_string(), endpoint, "tts-1", "alloy")
    }

    #[tokio::test]
    async fn fetches_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "voice": "alloy",
                "input": "Event created successfully: Meeting"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake-mp3-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let audio = synthesizer(format!("{}/v1/audio/speech", server.uri()))
            .fetch_audio("Event created successfully: Meeting")
            .await
            .expect("audio");

        assert_eq!(audio, b"fake-mp3-bytes");
    }

    #[tokio::test]
    async fn api_error_maps_to_synthesis_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(ResponseTemplate::new(500).set_body_string("synth down"))
            .mount(&server)
            .await;

        let result =
            synthesizer(format!("{}/v1/audio/speech", server.uri())).fetch_audio("hello").await;

        assert!(matches!(result, Err(AssistantError::Synthesis(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_synthesis_error() {
        let result =
            synthesizer("http://127.0.0.1:1/v1/audio/speech".to_string()).fetch_audio("hi").await;

        assert!(matches!(result, Err(AssistantError::Synthesis(_))));
    }
}
