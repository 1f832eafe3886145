//! Calendar integration module
//!
//! Provides OAuth2 authentication, the persisted credential artifact, and
//! event insert/list operations against the Google Calendar v3 API.

pub mod client;
pub mod oauth;
pub mod types;

pub use client::GoogleCalendarClient;
pub use oauth::{CredentialManager, OAuthCallbackServer, TokenStore, CALENDAR_EVENTS_SCOPE};
pub use types::{ClientSecrets, StoredCredential};
