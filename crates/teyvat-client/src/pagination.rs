//! Offset-based pagination
//!
//! List endpoints return at most `take` records per call and no "has more"
//! marker; a page shorter than requested is the only end-of-collection
//! signal.

use serde_json::Value;
use std::future::Future;
use teyvat_core::Result;
use teyvat_models::RequestOptions;
use tracing::debug;

/// Window of one paged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  /// Records per page, within (0, 100]
  pub take: u32,
  /// Records already consumed
  pub skip: u32,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self { take: teyvat_core::MAX_PAGE_SIZE, skip: 0 }
  }
}

impl PageRequest {
  /// First page for the given options, with `take` clamped.
  pub fn from_options(options: Option<&RequestOptions>) -> Self {
    match options {
      Some(options) => Self { take: options.page_size(), skip: options.skip.unwrap_or(0) },
      None => Self::default(),
    }
  }

  /// Write this window into a request body.
  pub fn apply(&self, body: &mut Value) {
    if let Value::Object(map) = body {
      map.insert("take".to_string(), Value::from(self.take));
      map.insert("skip".to_string(), Value::from(self.skip));
    }
  }

  fn advance(self, received: usize) -> Self {
    let received = u32::try_from(received).unwrap_or(u32::MAX);
    Self { skip: self.skip.saturating_add(received), ..self }
  }
}

/// Call `fetch` page after page until a short page comes back, returning
/// every record in fetch order.
///
/// A collection whose size is an exact multiple of `take` costs one extra
/// call that returns nothing. Any failed page fails the whole listing.
pub async fn fetch_all<T, F, Fut>(first: PageRequest, mut fetch: F) -> Result<Vec<T>>
where
  F: FnMut(PageRequest) -> Fut,
  Fut: Future<Output = Result<Vec<T>>>,
{
  let mut records = Vec::new();
  let mut page = first;
  let mut calls = 0usize;

  loop {
    let batch = fetch(page).await?;
    calls += 1;
    let received = batch.len();
    records.extend(batch);

    if page.take == 0 || received < page.take as usize {
      break;
    }
    page = page.advance(received);
  }

  debug!(calls, records = records.len(), "Pagination finished");
  Ok(records)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::collections::VecDeque;
  use teyvat_core::Error;

  /// Serves pages of the given sizes and records every window requested.
  async fn run(sizes: &[usize], first: PageRequest) -> (Result<Vec<usize>>, Vec<PageRequest>) {
    let mut pages: VecDeque<usize> = sizes.iter().copied().collect();
    let mut seen = Vec::new();
    let mut next_value = 0usize;

    let result = fetch_all(first, |page| {
      seen.push(page);
      let size = pages.pop_front().unwrap_or(0);
      let batch: Vec<usize> = (next_value..next_value + size).collect();
      next_value += size;
      async move { Ok(batch) }
    })
    .await;

    (result, seen)
  }

  #[tokio::test]
  async fn test_short_last_page() {
    let (result, seen) = run(&[100, 100, 37], PageRequest::default()).await;
    let records = result.unwrap();

    assert_eq!(records.len(), 237);
    assert_eq!(records, (0..237).collect::<Vec<_>>());
    assert_eq!(seen.len(), 3);
    assert_eq!(seen.iter().map(|p| p.skip).collect::<Vec<_>>(), vec![0, 100, 200]);
  }

  #[test]
  fn test_exact_multiple_costs_an_empty_call() {
    let (result, seen) = tokio_test::block_on(run(&[100, 100, 0], PageRequest::default()));

    assert_eq!(result.unwrap().len(), 200);
    assert_eq!(seen.len(), 3);
  }

  #[tokio::test]
  async fn test_custom_window() {
    let first = PageRequest::from_options(Some(&RequestOptions::new().with_take(5).with_skip(10)));
    let (result, seen) = run(&[5, 2], first).await;

    assert_eq!(result.unwrap().len(), 7);
    assert_eq!(seen, vec![PageRequest { take: 5, skip: 10 }, PageRequest { take: 5, skip: 15 }]);
  }

  #[tokio::test]
  async fn test_error_aborts_listing() {
    let mut calls = 0;
    let result: Result<Vec<u8>> = fetch_all(PageRequest::default(), |_| {
      calls += 1;
      let outcome = if calls == 1 { Ok(vec![0; 100]) } else { Err(Error::Http("reset".to_string())) };
      async move { outcome }
    })
    .await;

    assert!(matches!(result, Err(Error::Http(_))));
    assert_eq!(calls, 2);
  }

  #[test]
  fn test_apply_window() {
    let mut body = json!({ "include": { "talents": true } });
    PageRequest { take: 100, skip: 200 }.apply(&mut body);

    assert_eq!(body, json!({ "include": { "talents": true }, "take": 100, "skip": 200 }));
  }

  #[test]
  fn test_oversized_take_is_clamped() {
    let first = PageRequest::from_options(Some(&RequestOptions::new().with_take(500)));
    assert_eq!(first, PageRequest { take: 100, skip: 0 });
  }
}
