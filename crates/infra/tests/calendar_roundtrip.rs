//! Calendar round-trip integration: an event created through the client
//! appears in a subsequent list with the same summary and start.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use voicecal_core::ports::{CalendarProvider, EventResource, EventTime};
use voicecal_infra::integrations::calendar::{
    CredentialManager, GoogleCalendarClient, StoredCredential,
};
use voicecal_infra::HttpClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn seeded_credentials_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let secrets = serde_json::json!({
        "installed": { "client_id": "client-1", "client_secret": "secret-1" }
    });
    std::fs::write(dir.path().join("credentials.json"), secrets.to_string())
        .expect("write secrets");

    let credential = StoredCredential {
        access_token: "valid-token".to_string(),
        refresh_token: None,
        expires_at: Utc::now() + Duration::hours(1),
    };
    std::fs::write(
        dir.path().join("token.json"),
        serde_json::to_string(&credential).expect("serialize credential"),
    )
    .expect("write token");

    dir
}

fn event_time(date_time: &str) -> EventTime {
    EventTime { date_time: date_time.to_string(), time_zone: "Asia/Kolkata".to_string() }
}

#[tokio::test]
async fn created_event_round_trips_through_list() {
    let server = MockServer::start().await;
    let stored_events: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));

    let insert_store = stored_events.clone();
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(move |request: &Request| {
            let body: serde_json::Value =
                serde_json::from_slice(&request.body).expect("json body");
            let mut guard = insert_store.lock().expect("store lock");
            let event = serde_json::json!({
                "id": format!("evt-{}", guard.len() + 1),
                "summary": body["summary"],
                "start": body["start"],
            });
            guard.push(event.clone());
            ResponseTemplate::new(200).set_body_json(event)
        })
        .mount(&server)
        .await;

    let list_store = stored_events.clone();
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(move |_request: &Request| {
            let guard = list_store.lock().expect("store lock");
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": *guard }))
        })
        .mount(&server)
        .await;

    let dir = seeded_credentials_dir();
    let http_client = HttpClient::builder().max_attempts(1).build().expect("http client");
    let manager =
        CredentialManager::from_credentials_dir(dir.path(), http_client.clone()).expect("manager");
    let client =
        GoogleCalendarClient::new(Arc::new(manager), http_client).with_api_base(server.uri());

    // Empty calendar first
    let before = client.list_events("primary", Utc::now(), 10).await.expect("list");
    assert!(before.is_empty());

    let resource = EventResource {
        summary: "Meeting".to_string(),
        description: None,
        start: event_time("2026-08-07T15:00:00+05:30"),
        end: event_time("2026-08-07T16:00:00+05:30"),
    };
    let created = client.insert_event("primary", &resource).await.expect("insert");
    assert_eq!(created.summary, "Meeting");

    let after = client.list_events("primary", Utc::now(), 10).await.expect("list");
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].summary.as_deref(), Some("Meeting"));
    assert_eq!(after[0].start, "2026-08-07T15:00:00+05:30");
}
