//! Calendar integration type definitions
//!
//! Credential artifact types and Google Calendar v3 wire types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Refresh this many seconds before the provider-reported expiry.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Persisted credential artifact (contents of `credentials/token.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Whether the access token is expired (with a safety margin) at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECONDS) >= self.expires_at
    }
}

/// Client secret configuration (`credentials/credentials.json`) in Google
/// "installed app" format.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub installed: InstalledSecrets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Token endpoint reply for both authorization-code and refresh grants.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenEndpointResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Event payload submitted to the provider's insert operation.
#[derive(Debug, Serialize)]
pub(crate) struct EventBody {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Start/end of an event; a `dateTime` with zone, or a bare `date` for
/// all-day events.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleCalendarEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleCalendarEvent {
    pub summary: Option<String>,
    pub start: EventDateTime,
}
