use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use voicecal_domain::AssistantError;

use crate::errors::InfraError;

/// HTTP client with timeout and bounded-retry support.
///
/// Calendar operations are constructed with a single attempt: a failed
/// create or list must be reissued by the user, never retried silently.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request, retrying server errors and transport failures
    /// up to the configured attempt budget.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AssistantError> {
        let attempts = self.max_attempts.max(1);
        let mut last_error: Option<AssistantError> = None;

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    AssistantError::Internal(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(|err| AssistantError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt < attempts {
                        self.pause_before_retry(attempt).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    let retryable = is_transient(&err);
                    last_error = Some(InfraError::from(err).into());

                    if attempt < attempts && retryable {
                        self.pause_before_retry(attempt).await;
                        continue;
                    }

                    break;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AssistantError::Internal("http client exhausted retries without a result".into())
        }))
    }

    async fn pause_before_retry(&self, completed_attempts: usize) {
        // Exponential backoff: base * 2^(n-1), capped at 2^8.
        let shift = completed_attempts.saturating_sub(1).min(8) as u32;
        let delay = self.base_backoff.saturating_mul(1 << shift);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<HttpClient, AssistantError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| AssistantError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
