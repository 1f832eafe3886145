//! Google Calendar provider implementation
//!
//! Insert and list operations against the Calendar v3 REST API. Tokens come
//! from the [`CredentialManager`]; every request is a single attempt because
//! failed calendar operations are never retried automatically.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use tracing::debug;
use voicecal_core::ports::{CalendarProvider, EventResource, InsertedEvent, ListedEvent};
use voicecal_domain::{AssistantError, Result};

use super::oauth::CredentialManager;
use super::types::{CreatedEvent, EventBody, EventDateTime, EventsResponse};
use crate::http::HttpClient;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar client
pub struct GoogleCalendarClient {
    http_client: HttpClient,
    credentials: Arc<CredentialManager>,
    api_base: String,
}

impl GoogleCalendarClient {
    pub fn new(credentials: Arc<CredentialManager>, http_client: HttpClient) -> Self {
        Self { http_client, credentials, api_base: GOOGLE_CALENDAR_API_BASE.to_string() }
    }

    /// Point the client at a different API base (tests, compatible servers).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.api_base, calendar_id)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventResource,
    ) -> Result<InsertedEvent> {
        let access_token = self.credentials.access_token().await?;

        let body = EventBody {
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: EventDateTime {
                date_time: Some(event.start.date_time.clone()),
                time_zone: Some(event.start.time_zone.clone()),
                date: None,
            },
            end: EventDateTime {
                date_time: Some(event.end.date_time.clone()),
                time_zone: Some(event.end.time_zone.clone()),
                date: None,
            },
        };

        debug!(calendar_id, summary = %event.summary, "inserting calendar event");

        let request = self
            .http_client
            .request(Method::POST, self.events_url(calendar_id))
            .bearer_auth(&access_token)
            .json(&body);

        let response = self.http_client.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Calendar(format!(
                "calendar API error ({status}): {error_text}"
            )));
        }

        let created: CreatedEvent = response.json().await.map_err(|err| {
            AssistantError::Calendar(format!("failed to parse insert response: {err}"))
        })?;

        Ok(InsertedEvent {
            id: created.id,
            summary: created.summary.unwrap_or_else(|| event.summary.clone()),
        })
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<ListedEvent>> {
        let access_token = self.credentials.access_token().await?;

        let query = [
            ("timeMin", time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("maxResults", max_results.to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];

        debug!(calendar_id, max_results, "listing upcoming calendar events");

        let request = self
            .http_client
            .request(Method::GET, self.events_url(calendar_id))
            .bearer_auth(&access_token)
            .query(&query);

        let response = self.http_client.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Calendar(format!(
                "calendar API error ({status}): {error_text}"
            )));
        }

        let listed: EventsResponse = response.json().await.map_err(|err| {
            AssistantError::Calendar(format!("failed to parse list response: {err}"))
        })?;

        let events = listed
            .items
            .into_iter()
            .map(|item| ListedEvent {
                summary: item.summary.filter(|s| !s.trim().is_empty()),
                start: item.start.date_time.or(item.start.date).unwrap_or_default(),
            })
            .collect();

        Ok(events)
    }
}
