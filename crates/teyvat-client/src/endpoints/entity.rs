//! Entity endpoints
//!
//! One generic endpoint group serves every collection. A call goes through
//! the cache first, then the quota gate and the serial queue:
//!
//! - `get` / `try_get` fetch a single record by name or id
//! - `list` / `try_list` walk the paged list endpoint to the end
//!
//! Supplying [`RequestOptions`] skips the cache lookup. The response is
//! written back only when caching is enabled and either no options were
//! given or `options.cache` is set.

use super::EndpointCore;
use crate::cache::CachedEntity;
use crate::pagination::{fetch_all, PageRequest};
use serde_json::{json, Value};
use std::marker::PhantomData;
use teyvat_core::{Error, Result};
use teyvat_models::{Lookup, RequestOptions};
use tracing::{debug, instrument};

/// Accessors for one entity collection
pub struct EntityEndpoints<T> {
  core: EndpointCore,
  _entity: PhantomData<fn() -> T>,
}

impl<T: CachedEntity> EntityEndpoints<T> {
  /// Create a new endpoint group for `T`
  pub fn new(core: EndpointCore) -> Self {
    Self { core, _entity: PhantomData }
  }

  /// Fetch the whole collection, or `None` when it is empty.
  #[instrument(skip(self, options), fields(kind = %T::KIND, custom = options.is_some()))]
  pub async fn try_list(&self, options: Option<RequestOptions>) -> Result<Option<Vec<T>>> {
    if let Some(cached) = self.core.cache.lookup_list::<T>(options.is_some()) {
      debug!(records = cached.len(), "Serving listing from cache");
      return Ok(Some(cached));
    }

    let endpoint = T::KIND.list_endpoint();
    let base_body = self.list_body(options.as_ref());
    let core = &self.core;

    let records = fetch_all(PageRequest::from_options(options.as_ref()), |page| {
      let mut body = base_body.clone();
      page.apply(&mut body);
      async move {
        let batch: Option<Vec<T>> = core.dispatch(endpoint, &[], &body).await?;
        Ok(batch.unwrap_or_default())
      }
    })
    .await?;

    if records.is_empty() {
      return Ok(None);
    }

    if self.core.should_cache(options.as_ref()) {
      self.core.cache.store_list(records.clone());
    }

    Ok(Some(records))
  }

  /// Like [`try_list`](Self::try_list), with failures resolved to `None`.
  pub async fn list(&self, options: Option<RequestOptions>) -> Option<Vec<T>> {
    let result = self.try_list(options).await;
    self.core.errors.resolve(T::KIND.list_endpoint(), result)
  }

  fn list_body(&self, options: Option<&RequestOptions>) -> Value {
    let mut body = options.map(RequestOptions::to_body).unwrap_or_else(|| json!({}));
    if let (Value::Object(map), Some(include)) = (&mut body, T::KIND.default_include()) {
      map.entry("include").or_insert(include);
    }
    body
  }
}

impl<T: CachedEntity + Lookup> EntityEndpoints<T> {
  /// Fetch one record by its name or id.
  #[instrument(skip(self, options), fields(kind = %T::KIND, custom = options.is_some()))]
  pub async fn try_get(&self, key: &str, options: Option<RequestOptions>) -> Result<Option<T>> {
    if key.trim().is_empty() {
      return Err(Error::InvalidArgument(format!("empty {} lookup key", T::KIND)));
    }

    if let Some(cached) = self.core.cache.lookup::<T>(key, options.is_some()) {
      debug!("Serving record from cache");
      return Ok(Some(cached));
    }

    let endpoint = T::KIND
      .single_endpoint()
      .ok_or_else(|| Error::Unexpected(format!("{} has no single-record endpoint", T::KIND)))?;
    let query = [(T::KIND.lookup_field().param(), key.to_string())];
    let body = options.as_ref().map(RequestOptions::to_body).unwrap_or_else(|| json!({}));

    let record: Option<T> = self.core.dispatch(endpoint, &query, &body).await?;

    if let Some(record) = &record {
      if self.core.should_cache(options.as_ref()) {
        self.core.cache.store(key, record.clone());
      }
    }

    Ok(record)
  }

  /// Like [`try_get`](Self::try_get), with failures resolved to `None`.
  pub async fn get(&self, key: &str, options: Option<RequestOptions>) -> Option<T> {
    let result = self.try_get(key, options).await;
    let context = T::KIND.single_endpoint().unwrap_or_else(|| T::KIND.list_endpoint());
    self.core.errors.resolve(context, result)
  }
}
