//! Calendar service
//!
//! Gateway policy in front of the calendar provider port: serializes drafts
//! with explicit timezones, formats user-facing responses, and downgrades
//! every provider error to one of two fixed strings. No retries — a failed
//! operation requires the user to reissue the command.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{error, info};
use voicecal_domain::{Action, EventDraft};

use crate::ports::{CalendarProvider, EventResource, EventTime};

pub const CREATE_FAILURE_MESSAGE: &str = "Failed to create event. Please try again.";
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch events. Please try again.";
pub const NO_EVENTS_MESSAGE: &str = "No upcoming events found.";
pub const UNRECOGNIZED_MESSAGE: &str = "Action not recognized.";

/// Calendar gateway: one per process, owning the provider session.
pub struct CalendarService {
    provider: Arc<dyn CalendarProvider>,
    calendar_id: String,
    default_timezone: Tz,
}

impl CalendarService {
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        calendar_id: impl Into<String>,
        default_timezone: Tz,
    ) -> Self {
        Self { provider, calendar_id: calendar_id.into(), default_timezone }
    }

    /// Resolve an action to exactly one user-facing response.
    pub async fn dispatch(&self, action: &Action) -> String {
        match action {
            Action::Create(draft) => self.create_event(draft).await,
            Action::Fetch { max_results } => self.list_upcoming(*max_results).await,
            Action::Unrecognized => UNRECOGNIZED_MESSAGE.to_string(),
        }
    }

    /// Create a calendar event from the draft.
    pub async fn create_event(&self, draft: &EventDraft) -> String {
        let resource = self.to_resource(draft);

        match self.provider.insert_event(&self.calendar_id, &resource).await {
            Ok(created) => {
                info!(summary = %created.summary, id = %created.id, "event created");
                format!("Event created successfully: {}", created.summary)
            }
            Err(err) => {
                error!(error = %err, summary = %draft.summary, "failed to create event");
                CREATE_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// List upcoming events starting from the current UTC instant.
    pub async fn list_upcoming(&self, max_results: u32) -> String {
        match self.provider.list_events(&self.calendar_id, Utc::now(), max_results).await {
            Ok(events) if events.is_empty() => NO_EVENTS_MESSAGE.to_string(),
            Ok(events) => {
                let mut response = String::from("Upcoming events:\n");
                for event in events {
                    let summary = event.summary.as_deref().unwrap_or("(untitled)");
                    response.push_str(&format!("\n{} at {}", summary, event.start));
                }
                response
            }
            Err(err) => {
                error!(error = %err, "failed to fetch events");
                FETCH_FAILURE_MESSAGE.to_string()
            }
        }
    }

    fn to_resource(&self, draft: &EventDraft) -> EventResource {
        EventResource {
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            start: self.to_event_time(&draft.start),
            end: self.to_event_time(&draft.end),
        }
    }

    fn to_event_time(&self, moment: &voicecal_domain::ParsedMoment) -> EventTime {
        EventTime {
            date_time: moment.to_rfc3339(self.default_timezone),
            time_zone: moment.effective_timezone(self.default_timezone).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use voicecal_domain::{AssistantError, ParsedMoment, Result};

    use super::*;
    use crate::ports::{InsertedEvent, ListedEvent};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum RecordedCall {
        Insert(EventResource),
        List { max_results: u32 },
    }

    /// Stub provider with programmable outcomes that records every call.
    struct StubProvider {
        fail: bool,
        listed: Vec<ListedEvent>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl StubProvider {
        fn succeeding(listed: Vec<ListedEvent>) -> Arc<Self> {
            Arc::new(Self { fail: false, listed, calls: Mutex::new(Vec::new()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { fail: true, listed: Vec::new(), calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl CalendarProvider for StubProvider {
        async fn insert_event(
            &self,
            _calendar_id: &str,
            event: &EventResource,
        ) -> Result<InsertedEvent> {
            self.calls.lock().expect("calls lock").push(RecordedCall::Insert(event.clone()));
            if self.fail {
                return Err(AssistantError::Network("boom".to_string()));
            }
            Ok(InsertedEvent { id: "evt-1".to_string(), summary: event.summary.clone() })
        }

        async fn list_events(
            &self,
            _calendar_id: &str,
            _time_min: DateTime<Utc>,
            max_results: u32,
        ) -> Result<Vec<ListedEvent>> {
            self.calls.lock().expect("calls lock").push(RecordedCall::List { max_results });
            if self.fail {
                return Err(AssistantError::Network("boom".to_string()));
            }
            Ok(self.listed.clone())
        }
    }

    fn kolkata() -> Tz {
        "Asia/Kolkata".parse().expect("valid zone")
    }

    fn draft() -> EventDraft {
        let start = ParsedMoment::new(
            NaiveDate::from_ymd_opt(2026, 8, 7)
                .and_then(|d| d.and_hms_opt(15, 0, 0))
                .expect("valid test datetime"),
        );
        EventDraft::with_default_duration("Meeting", start)
    }

    fn service(provider: Arc<StubProvider>) -> CalendarService {
        CalendarService::new(provider, "primary", kolkata())
    }

    #[tokio::test]
    async fn create_confirms_with_summary() {
        let provider = StubProvider::succeeding(Vec::new());
        let response = service(provider.clone()).create_event(&draft()).await;

        assert_eq!(response, "Event created successfully: Meeting");
    }

    #[tokio::test]
    async fn create_serializes_default_timezone_and_duration() {
        let provider = StubProvider::succeeding(Vec::new());
        service(provider.clone()).create_event(&draft()).await;

        let calls = provider.calls();
        let RecordedCall::Insert(resource) = &calls[0] else {
            panic!("expected insert call");
        };
        assert_eq!(resource.start.date_time, "2026-08-07T15:00:00+05:30");
        assert_eq!(resource.start.time_zone, "Asia/Kolkata");
        assert_eq!(resource.end.date_time, "2026-08-07T16:00:00+05:30");
        assert_eq!(resource.end.time_zone, "Asia/Kolkata");
    }

    #[tokio::test]
    async fn create_failure_uses_fixed_message() {
        let response = service(StubProvider::failing()).create_event(&draft()).await;

        assert_eq!(response, CREATE_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn empty_list_uses_fixed_message() {
        let response = service(StubProvider::succeeding(Vec::new())).list_upcoming(10).await;

        assert_eq!(response, "No upcoming events found.");
    }

    #[tokio::test]
    async fn list_formats_summary_at_start() {
        let listed = vec![
            ListedEvent {
                summary: Some("Meeting".to_string()),
                start: "2026-08-07T15:00:00+05:30".to_string(),
            },
            ListedEvent { summary: None, start: "2026-08-08".to_string() },
        ];
        let response = service(StubProvider::succeeding(listed)).list_upcoming(10).await;

        assert_eq!(
            response,
            "Upcoming events:\n\nMeeting at 2026-08-07T15:00:00+05:30\n(untitled) at 2026-08-08"
        );
    }

    #[tokio::test]
    async fn list_failure_uses_fixed_message() {
        let response = service(StubProvider::failing()).list_upcoming(10).await;

        assert_eq!(response, FETCH_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn repeated_lists_issue_identical_read_only_queries() {
        let provider = StubProvider::succeeding(Vec::new());
        let service = service(provider.clone());

        service.list_upcoming(10).await;
        service.list_upcoming(10).await;

        assert_eq!(
            provider.calls(),
            vec![RecordedCall::List { max_results: 10 }, RecordedCall::List { max_results: 10 }]
        );
    }

    #[tokio::test]
    async fn dispatch_resolves_every_action_to_a_response() {
        let provider = StubProvider::succeeding(Vec::new());
        let service = service(provider);

        let created = service.dispatch(&Action::Create(draft())).await;
        let fetched = service.dispatch(&Action::Fetch { max_results: 5 }).await;
        let unknown = service.dispatch(&Action::Unrecognized).await;

        assert!(created.starts_with("Event created successfully"));
        assert_eq!(fetched, NO_EVENTS_MESSAGE);
        assert_eq!(unknown, UNRECOGNIZED_MESSAGE);
    }
}
