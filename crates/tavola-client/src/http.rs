//! # HTTP Transport
//!
//! The one place that turns requests into backend calls.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ApiClient request                                │
//! │                                                                         │
//! │  base_url + segments ──► bearer token? ──► send ──► status?             │
//! │                                                        │                │
//! │                              2xx ◄─────────────────────┤                │
//! │                               │                        │ 4xx / 5xx      │
//! │                               ▼                        ▼                │
//! │                          decode JSON           body.message             │
//! │                                                or operation default     │
//! │                                                        │                │
//! │  GET only:  retryable? (transport, timeout, 5xx) ──────┘                │
//! │             └── sleep(backoff) and try again, up to max_retries         │
//! │                                                                         │
//! │  BACKOFF (exponential with jitter)                                      │
//! │  Attempt 1: 250ms   Attempt 2: 500ms   Attempt 3: 1s   ...  Max: 5s     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! POSTs are never retried.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use tavola_core::ValidationError;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Retry Policy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Never retry.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };
        // current_interval still holds the library default until reset
        backoff.reset();
        backoff
    }
}

/// Error body the backend sends on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// Api Client
// =============================================================================

/// REST client for the ordering backend.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Builds a client from a loaded configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let retry = RetryPolicy {
            max_retries: config.api.max_retries,
            initial_backoff: config.api.initial_backoff(),
            max_backoff: config.api.max_backoff(),
        };
        Self::new(config.base_url()?, config.api.timeout(), retry)
    }

    pub fn new(base_url: Url, timeout: Duration, retry: RetryPolicy) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tavola/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url,
            retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL. Each segment is escaped on
    /// its own, so an id can never add segments or a query string.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ValidationError::InvalidFormat {
                field: "id".to_string(),
                reason: format!("'{}' is not a valid path segment", bad),
            }
            .into());
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // -------------------------------------------------------------------------
    // Verbs
    // -------------------------------------------------------------------------

    /// GET with retries on transport failures and 5xx responses.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, String)],
        token: Option<&str>,
        fallback: &str,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        let mut backoff = self.retry.create_backoff();
        let mut attempt = 0u32;

        loop {
            let mut request = self.http.get(url.clone()).query(query);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            match self.execute(request, "GET", &url, fallback).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(err);
                    };
                    warn!(
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// POST a JSON body. Never retried.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &[&str],
        body: &B,
        token: Option<&str>,
        fallback: &str,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        let mut request = self.http.post(url.clone()).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.execute(request, "POST", &url, fallback).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &Url,
        fallback: &str,
    ) -> ClientResult<T> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, method, url = %url, "Sending request");

        let response = request
            .header("X-Request-Id", request_id.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());

            debug!(%request_id, status = status.as_u16(), %message, "Request rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        debug!(%request_id, status = status.as_u16(), bytes = bytes.len(), "Response received");
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(
            Url::parse(base).unwrap(),
            Duration::from_secs(1),
            RetryPolicy::none(),
        )
        .unwrap()
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let client = client("http://localhost:5000/prefix/");

        assert_eq!(
            client.url(&["api", "cuisines"]).unwrap().as_str(),
            "http://localhost:5000/prefix/api/cuisines"
        );
    }

    #[test]
    fn test_url_escapes_each_segment() {
        let client = client("http://localhost:5000/");

        let url = client.url(&["api", "orders", "../auth/profile"]).unwrap();
        assert_eq!(url.path(), "/api/orders/..%2Fauth%2Fprofile");

        let url = client
            .url(&["api", "restaurants", "1?userId=2", "menu"])
            .unwrap();
        assert_eq!(url.path(), "/api/restaurants/1%3FuserId=2/menu");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_url_rejects_dot_and_empty_segments() {
        let client = client("http://localhost:5000/");

        for id in ["", ".", ".."] {
            let err = client.url(&["api", "orders", id]).unwrap_err();
            assert!(matches!(err, ClientError::Core(_)), "{id:?} accepted");
        }
    }

    #[test]
    fn test_backoff_grows() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(400),
        };
        let mut backoff = policy.create_backoff();
        backoff.randomization_factor = 0.0;

        let mut next_ms = || backoff.next_backoff().map(|d| d.as_millis());
        assert_eq!(next_ms(), Some(100));
        assert_eq!(next_ms(), Some(200));
        assert_eq!(next_ms(), Some(400));
        assert_eq!(next_ms(), Some(400));
    }
}
