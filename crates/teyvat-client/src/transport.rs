//! HTTP transport layer for Teyvat API requests

use crate::gate::RateLimitSnapshot;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use teyvat_core::{Config, Error, Result};
use tracing::{debug, error, instrument, warn};
use url::Url;

/// HTTP transport layer for making requests to the Teyvat API
pub struct Transport {
  client: Client,
  base_url: Url,
  token: String,
  timeout: Duration,
}

/// A response that reached us, whatever its status.
#[derive(Debug, Clone)]
pub struct RawResponse {
  /// HTTP status
  pub status: StatusCode,
  /// Rate-limit headers found on the response
  pub rate: RateLimitSnapshot,
  /// Raw response text
  pub body: String,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("teyvat-client/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    let base_url = Url::parse(&teyvat_core::config::normalize_base_url(&config.base_url)?)?;

    Ok(Self { client, base_url, token: config.token.clone(), timeout })
  }

  /// Create a mock transport for testing
  #[cfg(test)]
  pub fn new_mock() -> Self {
    Self {
      client: Client::new(),
      base_url: Url::parse("https://mock.teyvat.dev/").unwrap(),
      token: "test_token".to_string(),
      timeout: Duration::from_secs(60),
    }
  }

  /// Send a POST to `endpoint` with the given query pairs and JSON body.
  ///
  /// Any HTTP response, including error statuses, comes back as `Ok` so the
  /// caller can still read its rate-limit headers. Only transport failures
  /// (connect, DNS, timeout) are returned as `Err`.
  #[instrument(skip(self, query, body), fields(endpoint = %endpoint))]
  pub async fn post(
    &self,
    endpoint: &str,
    query: &[(&str, String)],
    body: &Value,
    authorize: bool,
  ) -> Result<RawResponse> {
    let url = self.build_url(endpoint, query)?;
    debug!("Making request to: {}", url);

    let mut request = self.client.post(url).json(body);
    if authorize {
      request = request.bearer_auth(&self.token);
    }

    let response = request.send().await.map_err(|e| {
      if e.is_timeout() {
        warn!("Request to {} timed out after {:?}", endpoint, self.timeout);
        Error::Http(format!("Request timed out after {}s", self.timeout.as_secs()))
      } else {
        error!("Request to {} failed: {}", endpoint, e);
        Error::Http(format!("Request failed: {}", e))
      }
    })?;

    let status = response.status();
    let rate = RateLimitSnapshot::from_headers(response.headers());
    let body = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    debug!(%status, bytes = body.len(), "Received response");
    Ok(RawResponse { status, rate, body })
  }

  /// Build the full URL for an API request
  fn build_url(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Url> {
    let mut url = self.base_url.join(endpoint)?;

    if !query.is_empty() {
      let mut query_pairs = url.query_pairs_mut();
      for (key, value) in query {
        query_pairs.append_pair(key, value);
      }
    }

    Ok(url)
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    self.base_url.as_str()
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url.as_str())
      .field("timeout", &self.timeout)
      .field("token", &"<redacted>")
      .finish()
  }
}

impl RawResponse {
  /// Check the status and decode the body.
  ///
  /// An empty or `null` body is `Ok(None)`.
  pub fn into_data<T>(self) -> Result<Option<T>>
  where
    T: DeserializeOwned,
  {
    if self.status == StatusCode::TOO_MANY_REQUESTS {
      return Err(Error::RateLimit(format!("server rejected request: {}", snippet(&self.body, 200))));
    }

    if !self.status.is_success() {
      error!("Request failed with status: {}", self.status);
      return Err(Error::Status { status: self.status.as_u16(), body: snippet(&self.body, 200).to_string() });
    }

    let text = self.body.trim();
    if text.is_empty() || text == "null" {
      return Ok(None);
    }

    serde_json::from_str::<T>(text).map(Some).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      error!("Response text (first 500 chars): {}", snippet(text, 500));
      Error::Parse(format!("Failed to parse response: {}. Response: {}", e, snippet(text, 200)))
    })
  }
}

fn snippet(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
