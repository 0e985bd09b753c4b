//! Endpoint groups
//!
//! Every group wraps the same [`EndpointCore`], so all calls of one client
//! share its gate, queue and cache.

pub mod auth;
pub mod entity;

use crate::cache::CacheStore;
use crate::error_handler::ErrorHandler;
use crate::gate::QuotaGate;
use crate::queue::RequestQueue;
use crate::transport::{RawResponse, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use teyvat_core::Result;
use teyvat_models::RequestOptions;

/// Common endpoint structure
///
/// Every endpoint group shares the transport, quota gate, queue and cache of
/// the client that created it.
#[derive(Debug, Clone)]
pub struct EndpointCore {
  /// HTTP transport
  pub transport: Arc<Transport>,
  /// Quota gate consulted before entity calls
  pub gate: Arc<QuotaGate>,
  /// Serial queue every call goes through
  pub queue: Arc<RequestQueue>,
  /// Response cache
  pub cache: Arc<CacheStore>,
  /// Failure policy of the plain accessors
  pub errors: ErrorHandler,
  /// Whether responses may be cached at all
  pub caching: bool,
}

impl EndpointCore {
  /// Create a new endpoint core
  pub fn new(transport: Arc<Transport>, caching: bool, silent: bool) -> Self {
    Self {
      transport,
      gate: Arc::new(QuotaGate::new()),
      queue: Arc::new(RequestQueue::new()),
      cache: Arc::new(CacheStore::new()),
      errors: ErrorHandler::new(silent),
      caching,
    }
  }

  /// Queue a POST and record its rate-limit headers, without consulting the
  /// gate.
  pub async fn send(
    &self,
    endpoint: &str,
    query: &[(&str, String)],
    body: &Value,
    authorize: bool,
  ) -> Result<RawResponse> {
    let response =
      self.queue.enqueue(move || self.transport.post(endpoint, query, body, authorize)).await?;
    self.gate.update_from_response(&response.rate);
    Ok(response)
  }

  /// Gate, queue and decode one authorized entity call.
  pub async fn dispatch<T>(&self, endpoint: &str, query: &[(&str, String)], body: &Value) -> Result<Option<T>>
  where
    T: DeserializeOwned,
  {
    self.gate.check_and_wait().await;
    self.send(endpoint, query, body, true).await?.into_data()
  }

  /// Whether a response fetched with `options` may be written to the cache.
  pub fn should_cache(&self, options: Option<&RequestOptions>) -> bool {
    self.caching && options.map_or(true, |o| o.cache)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_core_creation() {
    let core = EndpointCore::new(Arc::new(Transport::new_mock()), true, true);

    assert_eq!(core.transport.base_url(), "https://mock.teyvat.dev/");
    assert!(!core.gate.snapshot().has_observed_rates);
    assert!(core.errors.is_silent());
  }

  #[test]
  fn test_cache_condition() {
    let core = EndpointCore::new(Arc::new(Transport::new_mock()), true, true);
    assert!(core.should_cache(None));
    assert!(!core.should_cache(Some(&RequestOptions::new().with_take(5))));
    assert!(core.should_cache(Some(&RequestOptions::new().with_cache(true))));

    let disabled = EndpointCore::new(Arc::new(Transport::new_mock()), false, true);
    assert!(!disabled.should_cache(None));
    assert!(!disabled.should_cache(Some(&RequestOptions::new().with_cache(true))));
  }
}
