//! Shared HTTP client for HTTP-based generators
//!
//! One `reqwest::Client` per backend with connection reuse. The client makes a
//! single attempt per call: retry and backoff belong to the orchestrator, which
//! only retries rate limits.

use regex::Regex;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, warn};

use procsynth_utils::error::GeneratorError;

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body marker OpenAI uses for a 429 caused by billing rather than throughput
const INSUFFICIENT_QUOTA_MARKER: &str = "insufficient_quota";

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `GeneratorError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                GeneratorError::Misconfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute a request once and classify the outcome.
    ///
    /// Success statuses return the response for the backend to parse; every
    /// error status is read and mapped through [`map_error_status`].
    ///
    /// # Errors
    ///
    /// Returns the classified `GeneratorError`.
    pub async fn execute(
        &self,
        request_builder: reqwest::RequestBuilder,
        timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, GeneratorError> {
        let request = request_builder
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::Transient(format!("Failed to build request: {e}")))?;

        debug!(
            provider = provider_name,
            timeout_secs = timeout.as_secs(),
            "Executing HTTP request"
        );

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                let body = response.text().await.unwrap_or_default();

                warn!(
                    provider = provider_name,
                    status = status.as_u16(),
                    retry_after_secs = ?retry_after,
                    "Generator returned error status"
                );
                Err(map_error_status(status, retry_after, &body, provider_name))
            }
            Err(e) if e.is_timeout() => Err(GeneratorError::Timeout { duration: timeout }),
            Err(e) => Err(GeneratorError::Transient(format!(
                "{} request failed: {}",
                provider_name,
                redact_error_message(&e.to_string())
            ))),
        }
    }
}

/// Map an HTTP error status to a `GeneratorError` variant
///
/// - 429 → `RateLimited`, unless the body reports `insufficient_quota`
/// - 402 → `QuotaExceeded`
/// - 401/403 → `Misconfiguration`
/// - anything else → `Transient`
pub(crate) fn map_error_status(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
    provider_name: &str,
) -> GeneratorError {
    match status {
        StatusCode::TOO_MANY_REQUESTS if body.contains(INSUFFICIENT_QUOTA_MARKER) => {
            GeneratorError::QuotaExceeded(format!(
                "{provider_name} reports insufficient quota: {status}"
            ))
        }
        StatusCode::TOO_MANY_REQUESTS => GeneratorError::RateLimited { retry_after_secs },
        StatusCode::PAYMENT_REQUIRED => {
            GeneratorError::QuotaExceeded(format!("{provider_name} requires payment: {status}"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GeneratorError::Misconfiguration(
            format!("{provider_name} authentication failed: {status}"),
        ),
        _ => GeneratorError::Transient(format!(
            "{} returned error: {}",
            provider_name,
            redact_error_message(&status.to_string())
        )),
    }
}

/// Pattern to match URLs with embedded credentials
static URL_WITH_CREDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://)[^:@\s]+:[^@\s]+@").unwrap());

/// Pattern to match potential API keys (32+ key-like characters)
static POTENTIAL_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_-])[A-Za-z0-9_-]{32,}(?:[^A-Za-z0-9_-]|$)").unwrap()
});

/// Redact credentials from error messages before they are logged
pub(crate) fn redact_error_message(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    let redacted = POTENTIAL_KEY.replace_all(&redacted, "[REDACTED_KEY]");
    redacted.to_string()
}

/// Test seam; not part of public API stability guarantees.
#[doc(hidden)]
pub fn redact_error_message_for_testing(message: &str) -> String {
    redact_error_message(message)
}
