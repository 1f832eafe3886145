//! Configuration loader
//!
//! Loads application configuration from an optional TOML file and applies
//! environment-variable overrides on top.
//!
//! ## Loading Strategy
//! 1. Parse the explicit file when one is given, else probe `voicecal.toml`
//!    then `config.toml` in the working directory
//! 2. Fall back to built-in defaults when no file is present
//! 3. Apply `VOICECAL_*` environment overrides last
//!
//! ## Environment Variables
//! - `VOICECAL_TRANSCRIPTION_ENDPOINT` / `VOICECAL_TRANSCRIPTION_MODEL`
//! - `VOICECAL_LANGUAGE_HINT`
//! - `VOICECAL_SYNTHESIS_ENDPOINT` / `VOICECAL_SYNTHESIS_MODEL` / `VOICECAL_VOICE`
//! - `VOICECAL_SPEAK_RESPONSES` (true/false)
//! - `VOICECAL_LLM_ENDPOINT` / `VOICECAL_LLM_MODEL`
//! - `VOICECAL_CREDENTIALS_DIR` / `VOICECAL_CALENDAR_ID`
//! - `VOICECAL_TIMEZONE` / `VOICECAL_MAX_RESULTS`
//! - `OPENAI_API_KEY` (required at startup, read separately)

use std::path::{Path, PathBuf};

use voicecal_domain::{AssistantError, Config, Result};

const PROBE_PATHS: &[&str] = &["voicecal.toml", "config.toml"];

/// Load configuration with file fallback and environment overrides.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut config = match resolve_path(path) {
        Some(file) => {
            tracing::info!(path = %file.display(), "loading configuration file");
            let raw = std::fs::read_to_string(&file).map_err(|err| {
                AssistantError::Config(format!("cannot read {}: {err}", file.display()))
            })?;
            from_toml_str(&raw)?
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// API key for the OpenAI-compatible collaborators.
pub fn openai_api_key() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .map_err(|_| AssistantError::Config("OPENAI_API_KEY not set".into()))
}

/// Parse a TOML configuration document.
pub fn from_toml_str(raw: &str) -> Result<Config> {
    toml::from_str(raw)
        .map_err(|err| AssistantError::Config(format!("invalid configuration: {err}")))
}

/// Apply environment overrides via an injectable lookup (testable without
/// touching the process environment).
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("VOICECAL_TRANSCRIPTION_ENDPOINT") {
        config.speech.transcription_endpoint = value;
    }
    if let Some(value) = lookup("VOICECAL_TRANSCRIPTION_MODEL") {
        config.speech.transcription_model = value;
    }
    if let Some(value) = lookup("VOICECAL_LANGUAGE_HINT") {
        config.speech.language_hint = Some(value);
    }
    if let Some(value) = lookup("VOICECAL_SYNTHESIS_ENDPOINT") {
        config.speech.synthesis_endpoint = value;
    }
    if let Some(value) = lookup("VOICECAL_SYNTHESIS_MODEL") {
        config.speech.synthesis_model = value;
    }
    if let Some(value) = lookup("VOICECAL_VOICE") {
        config.speech.voice = value;
    }
    if let Some(value) = lookup("VOICECAL_SPEAK_RESPONSES") {
        config.speech.speak_responses = matches!(value.as_str(), "true" | "1" | "yes");
    }
    if let Some(value) = lookup("VOICECAL_LLM_ENDPOINT") {
        config.language_model.endpoint = value;
    }
    if let Some(value) = lookup("VOICECAL_LLM_MODEL") {
        config.language_model.model = value;
    }
    if let Some(value) = lookup("VOICECAL_CREDENTIALS_DIR") {
        config.calendar.credentials_dir = PathBuf::from(value);
    }
    if let Some(value) = lookup("VOICECAL_CALENDAR_ID") {
        config.calendar.calendar_id = value;
    }
    if let Some(value) = lookup("VOICECAL_TIMEZONE") {
        config.calendar.timezone = value;
    }
    if let Some(value) = lookup("VOICECAL_MAX_RESULTS") {
        if let Ok(parsed) = value.parse() {
            config.calendar.max_results = parsed;
        }
    }
}

fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => PROBE_PATHS.iter().map(PathBuf::from).find(|candidate| candidate.is_file()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = Config::default();

        assert_eq!(config.calendar.timezone, "Asia/Kolkata");
        assert_eq!(config.calendar.max_results, 10);
        assert_eq!(config.calendar.calendar_id, "primary");
        assert!(config.speech.speak_responses);
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let config = from_toml_str(
            r#"
            [language_model]
            model = "gpt-4o"

            [calendar]
            max_results = 5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.language_model.model, "gpt-4o");
        assert_eq!(config.calendar.max_results, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.speech.transcription_model, "whisper-1");
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = from_toml_str("language_model = [not toml");

        assert!(matches!(result, Err(AssistantError::Config(_))));
    }

    #[test]
    fn environment_overrides_win() {
        let mut env = HashMap::new();
        env.insert("VOICECAL_LLM_MODEL", "llama-3.1-70b");
        env.insert("VOICECAL_TIMEZONE", "Europe/Berlin");
        env.insert("VOICECAL_SPEAK_RESPONSES", "false");
        env.insert("VOICECAL_MAX_RESULTS", "25");

        let mut config = Config::default();
        apply_overrides(&mut config, |name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.language_model.model, "llama-3.1-70b");
        assert_eq!(config.calendar.timezone, "Europe/Berlin");
        assert!(!config.speech.speak_responses);
        assert_eq!(config.calendar.max_results, 25);
    }

    #[test]
    fn invalid_max_results_override_is_ignored() {
        let mut config = Config::default();
        apply_overrides(&mut config, |name| {
            (name == "VOICECAL_MAX_RESULTS").then(|| "not-a-number".to_string())
        });

        assert_eq!(config.calendar.max_results, 10);
    }
}
