//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use reqwest::Error as HttpError;
use voicecal_domain::AssistantError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AssistantError);

impl From<InfraError> for AssistantError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AssistantError> for InfraError {
    fn from(value: AssistantError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAssistantError {
    fn into_assistant(self) -> AssistantError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AssistantError */
/* -------------------------------------------------------------------------- */

impl IntoAssistantError for HttpError {
    fn into_assistant(self) -> AssistantError {
        if self.is_timeout() {
            AssistantError::Network(format!("request timed out: {self}"))
        } else if self.is_connect() {
            AssistantError::Network(format!("connection failed: {self}"))
        } else if self.is_decode() {
            AssistantError::InvalidInput(format!("failed to decode response body: {self}"))
        } else if self.is_builder() {
            AssistantError::Internal(format!("invalid HTTP request: {self}"))
        } else {
            AssistantError::Network(self.to_string())
        }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_assistant())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → AssistantError */
/* -------------------------------------------------------------------------- */

impl IntoAssistantError for IoError {
    fn into_assistant(self) -> AssistantError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => AssistantError::InvalidInput(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                AssistantError::InvalidInput(format!("permission denied: {self}"))
            }
            _ => AssistantError::Internal(format!("io error: {self}")),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_assistant())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → AssistantError */
/* -------------------------------------------------------------------------- */

impl IntoAssistantError for serde_json::Error {
    fn into_assistant(self) -> AssistantError {
        AssistantError::InvalidInput(format!("invalid JSON: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_assistant())
    }
}
