//! OAuth2 credential lifecycle for the calendar provider.
//!
//! Loads the persisted token artifact, refreshes it transparently when
//! expired and a refresh token exists, and otherwise drives the interactive
//! authorization flow through a loopback HTTP server that receives the
//! provider redirect. Exactly one credential is live per process; it is
//! owned here and shared by all calendar operations.

use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration as StdDuration, Instant};

use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::{Duration, Utc};
use reqwest::Method;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};
use voicecal_domain::{AssistantError, Result};

use super::types::{ClientSecrets, InstalledSecrets, StoredCredential, TokenEndpointResponse};
use crate::http::HttpClient;

/// Scope restricted to calendar event read/write, not full calendar
/// management.
pub const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

const TOKEN_FILE: &str = "token.json";
const SECRETS_FILE: &str = "credentials.json";
const CALLBACK_TIMEOUT: StdDuration = StdDuration::from_secs(300);

/// File-backed persistence for the credential artifact.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted credential. A missing or unreadable artifact is
    /// reported as absent so the caller falls back to authorization.
    pub fn load(&self) -> Result<Option<StoredCredential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            AssistantError::Auth(format!("cannot read {}: {err}", self.path.display()))
        })?;

        match serde_json::from_str(&raw) {
            Ok(credential) => Ok(Some(credential)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "discarding corrupt token artifact");
                Ok(None)
            }
        }
    }

    /// Persist the credential, creating the parent directory if needed.
    pub fn save(&self, credential: &StoredCredential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                AssistantError::Auth(format!("cannot create {}: {err}", parent.display()))
            })?;
        }

        let raw = serde_json::to_string_pretty(credential)
            .map_err(|err| AssistantError::Internal(format!("cannot serialize token: {err}")))?;

        std::fs::write(&self.path, raw).map_err(|err| {
            AssistantError::Auth(format!("cannot write {}: {err}", self.path.display()))
        })
    }
}

/// Manager owning the single live credential for the calendar provider.
pub struct CredentialManager {
    secrets: InstalledSecrets,
    store: TokenStore,
    http_client: HttpClient,
    current: Mutex<Option<StoredCredential>>,
}

impl CredentialManager {
    /// Build from a credentials directory holding `credentials.json` and
    /// (once authorized) `token.json`.
    pub fn from_credentials_dir(dir: &Path, http_client: HttpClient) -> Result<Self> {
        let secrets_path = dir.join(SECRETS_FILE);
        let raw = std::fs::read_to_string(&secrets_path).map_err(|err| {
            AssistantError::Config(format!("cannot read {}: {err}", secrets_path.display()))
        })?;
        let secrets: ClientSecrets = serde_json::from_str(&raw).map_err(|err| {
            AssistantError::Config(format!("invalid {}: {err}", secrets_path.display()))
        })?;

        Ok(Self {
            secrets: secrets.installed,
            store: TokenStore::new(dir.join(TOKEN_FILE)),
            http_client,
            current: Mutex::new(None),
        })
    }

    /// Current access token, refreshing or re-authorizing as needed.
    ///
    /// Acquisition order: in-memory credential, persisted artifact,
    /// transparent refresh, interactive flow. Every renewal is persisted
    /// before the token is handed out.
    pub async fn access_token(&self) -> Result<String> {
        let mut guard = self.current.lock().await;

        if guard.is_none() {
            *guard = self.store.load()?;
        }

        if let Some(credential) = guard.clone() {
            if !credential.is_expired(Utc::now()) {
                return Ok(credential.access_token);
            }

            if let Some(refresh_token) = credential.refresh_token.clone() {
                match self.refresh(&refresh_token).await {
                    Ok(mut renewed) => {
                        // The refresh grant usually omits the refresh token
                        if renewed.refresh_token.is_none() {
                            renewed.refresh_token = Some(refresh_token);
                        }
                        self.store.save(&renewed)?;
                        let token = renewed.access_token.clone();
                        *guard = Some(renewed);
                        return Ok(token);
                    }
                    Err(err) => {
                        error!(error = %err, "token refresh failed, re-authorizing interactively");
                    }
                }
            }
        }

        let fresh = self.authorize_interactively().await?;
        self.store.save(&fresh)?;
        let token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredCredential> {
        let request = self.http_client.request(Method::POST, &self.secrets.token_uri).form(&[
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ]);

        let response = self.http_client.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Auth(format!(
                "token refresh failed ({status}): {error_text}"
            )));
        }

        let token: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::Auth(format!("cannot parse token response: {err}")))?;

        Ok(credential_from(token))
    }

    async fn authorize_interactively(&self) -> Result<StoredCredential> {
        let server = OAuthCallbackServer::start(generate_state()).await?;
        let redirect_uri = server.redirect_uri();
        let url = self.authorization_url(&redirect_uri, server.state())?;

        info!("waiting for interactive calendar authorization");
        println!("\nOpen this URL in your browser to authorize calendar access:\n{url}\n");

        let code = server.wait_for_code(CALLBACK_TIMEOUT).await?;
        server.shutdown().await?;
        self.exchange_code(&code, &redirect_uri).await
    }

    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String> {
        let mut url = url::Url::parse(&self.secrets.auth_uri).map_err(|err| {
            AssistantError::Config(format!("invalid authorization endpoint: {err}"))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.secrets.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", CALENDAR_EVENTS_SCOPE)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", state);

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<StoredCredential> {
        let request = self.http_client.request(Method::POST, &self.secrets.token_uri).form(&[
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ]);

        let response = self.http_client.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Auth(format!(
                "code exchange failed ({status}): {error_text}"
            )));
        }

        let token: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::Auth(format!("cannot parse token response: {err}")))?;

        Ok(credential_from(token))
    }
}

fn credential_from(token: TokenEndpointResponse) -> StoredCredential {
    StoredCredential {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at: Utc::now() + Duration::seconds(token.expires_in),
    }
}

/// Opaque per-flow state for callback validation.
fn generate_state() -> String {
    let entropy = (std::process::id(), Instant::now());
    format!("{:016x}", RandomState::new().hash_one(format!("{entropy:?}")))
}

/// Loopback HTTP server that receives the OAuth redirect callback.
pub struct OAuthCallbackServer {
    port: u16,
    state: String,
    received_code: Arc<StdMutex<Option<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl OAuthCallbackServer {
    /// Start the loopback server on an ephemeral port.
    pub async fn start(state: String) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await.map_err(|err| {
            AssistantError::Network(format!("failed to bind OAuth loopback server: {err}"))
        })?;

        let port = listener
            .local_addr()
            .map_err(|err| AssistantError::Network(format!("failed to determine port: {err}")))?
            .port();

        let received_code = Arc::new(StdMutex::new(None));

        let code_slot = received_code.clone();
        let expected_state = state.clone();

        let app = Router::new().route(
            "/callback",
            get(move |query: Query<HashMap<String, String>>| {
                handle_oauth_callback(query, code_slot.clone(), expected_state.clone())
            }),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("OAuth callback server error: {}", err);
            }
        });

        Ok(Self { port, state, received_code, shutdown_tx: Some(shutdown_tx), handle: Some(handle) })
    }

    /// Redirect URI used in the authorization request.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// State the provider must echo back.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Await the OAuth callback with a timeout.
    pub async fn wait_for_code(&self, timeout: StdDuration) -> Result<String> {
        let deadline = Instant::now() + timeout;

        loop {
            {
                let guard = self.received_code.lock().map_err(|_| {
                    AssistantError::Internal("callback state lock poisoned".to_string())
                })?;
                if let Some(code) = guard.clone() {
                    return Ok(code);
                }
            }

            if Instant::now() > deadline {
                return Err(AssistantError::Auth(
                    "timed out waiting for the authorization callback".into(),
                ));
            }

            sleep(StdDuration::from_millis(100)).await;
        }
    }

    /// Shut down the loopback server gracefully.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    return Err(AssistantError::Internal(format!(
                        "OAuth callback server panicked: {err}"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Drop for OAuthCallbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

async fn handle_oauth_callback(
    Query(params): Query<HashMap<String, String>>,
    received_code: Arc<StdMutex<Option<String>>>,
    expected_state: String,
) -> Html<&'static str> {
    let code = params.get("code").cloned();
    let state = params.get("state").cloned();

    match (code, state) {
        (Some(code), Some(state)) if state == expected_state => {
            if let Ok(mut guard) = received_code.lock() {
                *guard = Some(code);
            }

            Html(
                r#"<!DOCTYPE html>
<html>
<head><title>Authorization Complete</title></head>
<body><h1>Authorization Successful</h1><p>You can close this window.</p></body>
</html>"#,
            )
        }
        _ => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Authorization Failed</title></head>
<body><h1>Authorization Failed</h1><p>Invalid or unexpected callback parameters.</p></body>
</html>"#,
        ),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn write_secrets(dir: &Path, token_uri: &str) {
        let secrets = serde_json::json!({
            "installed": {
                "client_id": "client-1",
                "client_secret": "secret-1",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": token_uri,
            }
        });
        std::fs::write(dir.join(SECRETS_FILE), secrets.to_string()).expect("write secrets");
    }

    fn seed_token(dir: &Path, credential: &StoredCredential) {
        let raw = serde_json::to_string(credential).expect("serialize credential");
        std::fs::write(dir.join(TOKEN_FILE), raw).expect("write token");
    }

    fn http_client() -> HttpClient {
        HttpClient::builder().max_attempts(1).build().expect("http client")
    }

    #[tokio::test]
    async fn valid_stored_credential_is_used_without_network() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_secrets(dir.path(), "http://127.0.0.1:1/token");
        seed_token(
            dir.path(),
            &StoredCredential {
                access_token: "still-good".to_string(),
                refresh_token: None,
                expires_at: Utc::now() + Duration::hours(1),
            },
        );

        let manager =
            CredentialManager::from_credentials_dir(dir.path(), http_client()).expect("manager");

        let token = manager.access_token().await.expect("token");
        assert_eq!(token, "still-good");
    }

    #[tokio::test]
    async fn expired_credential_refreshes_without_interactive_flow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "renewed-token",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        write_secrets(dir.path(), &format!("{}/token", server.uri()));
        seed_token(
            dir.path(),
            &StoredCredential {
                access_token: "stale".to_string(),
                refresh_token: Some("refresh-1".to_string()),
                expires_at: Utc::now() - Duration::hours(1),
            },
        );

        let manager =
            CredentialManager::from_credentials_dir(dir.path(), http_client()).expect("manager");

        let token = manager.access_token().await.expect("token");
        assert_eq!(token, "renewed-token");

        // Renewal is persisted, keeping the original refresh token
        let persisted = TokenStore::new(dir.path().join(TOKEN_FILE))
            .load()
            .expect("load")
            .expect("credential present");
        assert_eq!(persisted.access_token, "renewed-token");
        assert_eq!(persisted.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn refresh_is_performed_once_per_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "renewed-token",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        write_secrets(dir.path(), &format!("{}/token", server.uri()));
        seed_token(
            dir.path(),
            &StoredCredential {
                access_token: "stale".to_string(),
                refresh_token: Some("refresh-1".to_string()),
                expires_at: Utc::now() - Duration::hours(1),
            },
        );

        let manager =
            CredentialManager::from_credentials_dir(dir.path(), http_client()).expect("manager");

        assert_eq!(manager.access_token().await.expect("first"), "renewed-token");
        // Second call hits the in-memory credential, not the endpoint
        assert_eq!(manager.access_token().await.expect("second"), "renewed-token");
    }

    #[tokio::test]
    async fn missing_secrets_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        let result = CredentialManager::from_credentials_dir(dir.path(), http_client());

        assert!(matches!(result, Err(AssistantError::Config(_))));
    }

    #[tokio::test]
    async fn corrupt_token_artifact_is_treated_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(TOKEN_FILE), "{not json").expect("write");

        let store = TokenStore::new(dir.path().join(TOKEN_FILE));

        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn callback_server_round_trips_the_code() {
        let server = OAuthCallbackServer::start("state-1".to_string()).await.expect("server");
        let callback = format!("{}?code=auth-code-1&state=state-1", server.redirect_uri());

        reqwest::get(&callback).await.expect("callback request");

        let code = server.wait_for_code(StdDuration::from_secs(5)).await.expect("code");
        assert_eq!(code, "auth-code-1");
        server.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn callback_server_ignores_mismatched_state() {
        let server = OAuthCallbackServer::start("state-1".to_string()).await.expect("server");
        let callback = format!("{}?code=auth-code-1&state=wrong", server.redirect_uri());

        reqwest::get(&callback).await.expect("callback request");

        let result = server.wait_for_code(StdDuration::from_millis(300)).await;
        assert!(matches!(result, Err(AssistantError::Auth(_))));
    }

    #[test]
    fn authorization_url_carries_scope_and_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_secrets(dir.path(), "https://oauth2.googleapis.com/token");

        let manager =
            CredentialManager::from_credentials_dir(dir.path(), http_client()).expect("manager");

        let url = manager
            .authorization_url("http://localhost:9/callback", "state-xyz")
            .expect("url");

        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar.events"));
        assert!(url.contains("state=state-xyz"));
        assert!(url.contains("access_type=offline"));
    }
}
