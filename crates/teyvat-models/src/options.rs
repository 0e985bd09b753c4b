//! Per-call request options

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use teyvat_core::MAX_PAGE_SIZE;

/// Options accepted by every entity accessor.
///
/// Supplying any options makes the call bypass the cache, since cached
/// entries only ever hold default-option responses. Whether the result is
/// written back to the cache is governed by [`RequestOptions::cache`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
  /// Number of records to skip (pagination offset)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub skip: Option<u32>,

  /// Page size; anything outside `1..=100` is sent as 100
  #[serde(skip_serializing_if = "Option::is_none")]
  pub take: Option<i64>,

  /// Nested relations to include, e.g. `{"talents": true}`
  #[serde(skip_serializing_if = "Option::is_none")]
  pub include: Option<Value>,

  /// Field selection hint
  #[serde(skip_serializing_if = "Option::is_none")]
  pub select: Option<Value>,

  /// Store the response in the cache even though options were given.
  /// Never sent to the server.
  #[serde(skip)]
  pub cache: bool,
}

impl RequestOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_skip(mut self, skip: u32) -> Self {
    self.skip = Some(skip);
    self
  }

  pub fn with_take(mut self, take: i64) -> Self {
    self.take = Some(take);
    self
  }

  pub fn with_include(mut self, include: Value) -> Self {
    self.include = Some(include);
    self
  }

  pub fn with_select(mut self, select: Value) -> Self {
    self.select = Some(select);
    self
  }

  pub fn with_cache(mut self, cache: bool) -> Self {
    self.cache = cache;
    self
  }

  /// Page size after clamping.
  pub fn page_size(&self) -> u32 {
    clamp_take(self.take)
  }

  /// JSON body sent to the server, with `take` already clamped.
  pub fn to_body(&self) -> Value {
    let mut body = Map::new();
    if let Some(skip) = self.skip {
      body.insert("skip".to_string(), Value::from(skip));
    }
    if self.take.is_some() {
      body.insert("take".to_string(), Value::from(self.page_size()));
    }
    if let Some(include) = &self.include {
      body.insert("include".to_string(), include.clone());
    }
    if let Some(select) = &self.select {
      body.insert("select".to_string(), select.clone());
    }
    Value::Object(body)
  }
}

/// Force a requested page size into `(0, 100]`, defaulting to 100.
pub fn clamp_take(take: Option<i64>) -> u32 {
  match take {
    Some(t) if t > 0 && t <= i64::from(MAX_PAGE_SIZE) => t as u32,
    _ => MAX_PAGE_SIZE,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_take_clamping() {
    assert_eq!(clamp_take(Some(500)), 100);
    assert_eq!(clamp_take(Some(-1)), 100);
    assert_eq!(clamp_take(Some(0)), 100);
    assert_eq!(clamp_take(Some(100)), 100);
    assert_eq!(clamp_take(Some(5)), 5);
    assert_eq!(clamp_take(None), 100);
  }

  #[test]
  fn test_body_omits_cache_flag() {
    let options = RequestOptions::new()
      .with_take(500)
      .with_include(json!({ "talents": true }))
      .with_cache(true);

    assert_eq!(options.to_body(), json!({ "take": 100, "include": { "talents": true } }));
    assert!(serde_json::to_value(&options).unwrap().get("cache").is_none());
  }

  #[test]
  fn test_empty_options_send_empty_body() {
    assert_eq!(RequestOptions::new().to_body(), json!({}));
  }
}
