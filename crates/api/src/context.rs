//! Application context
//!
//! Every collaborator is constructed exactly once at startup and owned by
//! [`AppContext`] — no ambient globals, no module-load side effects. The
//! session loop borrows the context for the lifetime of the process.

use std::sync::Arc;

use chrono_tz::Tz;
use voicecal_core::ports::{SpeechRecognizer, VoiceOutput};
use voicecal_core::{CalendarService, CommandInterpreter};
use voicecal_domain::{AssistantError, Config, Result};
use voicecal_infra::config::openai_api_key;
use voicecal_infra::{
    CredentialManager, GoogleCalendarClient, HttpClient, OpenAiClient, OpenAiSynthesizer,
    OpenAiTranscriber,
};

/// Collaborator set driving one interactive session.
pub struct AppContext {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub interpreter: CommandInterpreter,
    pub calendar: CalendarService,
    pub voice: Option<Arc<dyn VoiceOutput>>,
    pub timezone: Tz,
}

impl AppContext {
    /// Construct every collaborator from configuration.
    ///
    /// Failure here is an unrecoverable startup failure: without the
    /// calendar gateway the assistant cannot operate.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = openai_api_key()?;

        let timezone: Tz = config.calendar.timezone.parse().map_err(|_| {
            AssistantError::Config(format!("invalid timezone: {}", config.calendar.timezone))
        })?;

        let llm_http = HttpClient::builder().build()?;
        // Calendar operations are never retried automatically
        let calendar_http = HttpClient::builder().max_attempts(1).build()?;

        let credentials = Arc::new(CredentialManager::from_credentials_dir(
            &config.calendar.credentials_dir,
            calendar_http.clone(),
        )?);
        let provider = Arc::new(GoogleCalendarClient::new(credentials, calendar_http));
        let calendar =
            CalendarService::new(provider, config.calendar.calendar_id.clone(), timezone);

        let model = Arc::new(OpenAiClient::new(
            api_key.clone(),
            config.language_model.model.clone(),
            config.language_model.endpoint.clone(),
            llm_http,
        ));
        let interpreter = CommandInterpreter::new(model, config.calendar.max_results);

        let recognizer: Arc<dyn SpeechRecognizer> = Arc::new(OpenAiTranscriber::new(
            api_key.clone(),
            config.speech.transcription_endpoint.clone(),
            config.speech.transcription_model.clone(),
            config.speech.language_hint.clone(),
        ));

        let voice: Option<Arc<dyn VoiceOutput>> = config.speech.speak_responses.then(|| {
            Arc::new(OpenAiSynthesizer::new(
                api_key,
                config.speech.synthesis_endpoint.clone(),
                config.speech.synthesis_model.clone(),
                config.speech.voice.clone(),
            )) as Arc<dyn VoiceOutput>
        });

        Ok(Self { recognizer, interpreter, calendar, voice, timezone })
    }

    /// Assemble a context from pre-built collaborators.
    pub fn from_parts(
        recognizer: Arc<dyn SpeechRecognizer>,
        interpreter: CommandInterpreter,
        calendar: CalendarService,
        voice: Option<Arc<dyn VoiceOutput>>,
        timezone: Tz,
    ) -> Self {
        Self { recognizer, interpreter, calendar, voice, timezone }
    }
}
