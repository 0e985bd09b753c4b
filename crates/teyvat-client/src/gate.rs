/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Server-driven quota gate
//!
//! The Teyvat API advertises its rate-limit window through
//! `x-ratelimit-*` headers. The gate never counts calls itself: it only
//! records what the server last reported and, when fewer than
//! [`QUOTA_SAFETY_MARGIN`] calls remain, holds the caller until the
//! advertised reset time.

use chrono::Utc;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::time::Duration;
use teyvat_core::{FALLBACK_WAIT_SECS, INITIAL_QUOTA_LIMIT, QUOTA_SAFETY_MARGIN};
use tracing::{debug, info};

/// Calls left in the current window
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
/// Window size
pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
/// Unix seconds at which the window resets
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Rate-limit values found on one response; each may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
  /// `x-ratelimit-remaining`
  pub remaining: Option<i64>,
  /// `x-ratelimit-limit`
  pub limit: Option<i64>,
  /// Unix seconds
  pub reset: Option<i64>,
}

impl RateLimitSnapshot {
  /// Read the three rate-limit headers; unparsable values count as absent.
  pub fn from_headers(headers: &HeaderMap) -> Self {
    Self {
      remaining: header_number(headers, HEADER_REMAINING),
      limit: header_number(headers, HEADER_LIMIT),
      reset: header_number(headers, HEADER_RESET),
    }
  }

  /// True when none of the headers was present
  pub fn is_empty(&self) -> bool {
    self.remaining.is_none() && self.limit.is_none() && self.reset.is_none()
  }
}

/// Integer header value; fractional values are rounded up.
fn header_number(headers: &HeaderMap, name: &str) -> Option<i64> {
  let raw = headers.get(name)?.to_str().ok()?.trim();
  raw.parse::<i64>().ok().or_else(|| {
    raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.ceil() as i64)
  })
}

/// Quota as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
  /// Calls left in the current window
  pub remaining: i64,
  /// Size of the window (informational)
  pub limit: i64,
  /// Unix seconds at which the window resets
  pub reset_at: i64,
  /// Whether any response has reported rate-limit headers yet
  pub has_observed_rates: bool,
}

impl QuotaState {
  /// Startup state: nothing left, reset fifteen minutes out.
  pub fn new(now: i64) -> Self {
    Self {
      remaining: 0,
      limit: INITIAL_QUOTA_LIMIT,
      reset_at: now + FALLBACK_WAIT_SECS as i64,
      has_observed_rates: false,
    }
  }

  /// How long a call issued at `now` must wait, if at all.
  ///
  /// Until the server has reported rates the startup defaults are not
  /// trusted and calls go straight through.
  pub fn wait_duration(&self, now: i64) -> Option<Duration> {
    if !self.has_observed_rates || self.remaining >= QUOTA_SAFETY_MARGIN {
      return None;
    }

    let secs = self.reset_at - now;
    if secs <= 0 {
      Some(Duration::from_secs(FALLBACK_WAIT_SECS))
    } else {
      Some(Duration::from_secs(secs as u64))
    }
  }

  /// Overwrite whichever fields the response carried. A response without
  /// any rate-limit header changes nothing.
  pub fn apply(&mut self, rate: &RateLimitSnapshot) {
    if rate.is_empty() {
      return;
    }
    if let Some(remaining) = rate.remaining {
      self.remaining = remaining;
    }
    if let Some(limit) = rate.limit {
      self.limit = limit;
    }
    if let Some(reset) = rate.reset {
      self.reset_at = reset;
    }
    self.has_observed_rates = true;
  }
}

/// Owns the quota state of one client.
#[derive(Debug)]
pub struct QuotaGate {
  state: Mutex<QuotaState>,
}

impl Default for QuotaGate {
  fn default() -> Self {
    Self::new()
  }
}

impl QuotaGate {
  /// Gate in the startup state
  pub fn new() -> Self {
    Self::with_state(QuotaState::new(Utc::now().timestamp()))
  }

  /// Gate seeded with a known state
  pub fn with_state(state: QuotaState) -> Self {
    Self { state: Mutex::new(state) }
  }

  /// Copy of the current state
  pub fn snapshot(&self) -> QuotaState {
    *self.state.lock()
  }

  /// Suspend the caller until quota is believed available.
  ///
  /// Waits at most once; a call that still fails afterwards surfaces as an
  /// ordinary HTTP error.
  pub async fn check_and_wait(&self) {
    let (wait, remaining) = {
      let state = self.state.lock();
      (state.wait_duration(Utc::now().timestamp()), state.remaining)
    };

    if let Some(wait) = wait {
      info!(remaining, wait_secs = wait.as_secs(), "Quota nearly exhausted, waiting for reset");
      tokio::time::sleep(wait).await;
      debug!("Quota wait elapsed");
    }
  }

  /// Record the rate-limit headers of a completed response.
  pub fn update_from_response(&self, rate: &RateLimitSnapshot) {
    let mut state = self.state.lock();
    state.apply(rate);
    debug!(remaining = state.remaining, limit = state.limit, reset_at = state.reset_at, "Quota updated");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::header::HeaderValue;

  fn observed(remaining: i64, reset_at: i64) -> QuotaState {
    QuotaState { remaining, limit: 100, reset_at, has_observed_rates: true }
  }

  #[test]
  fn test_startup_state_does_not_block() {
    let state = QuotaState::new(1_000);
    assert_eq!(state.remaining, 0);
    assert_eq!(state.reset_at, 1_900);
    assert_eq!(state.wait_duration(1_000), None);
  }

  #[test]
  fn test_wait_until_reset() {
    assert_eq!(observed(2, 1_005).wait_duration(1_000), Some(Duration::from_secs(5)));
    assert_eq!(observed(3, 1_060).wait_duration(1_000), Some(Duration::from_secs(60)));
  }

  #[test]
  fn test_enough_quota_passes() {
    assert_eq!(observed(4, 1_005).wait_duration(1_000), None);
    assert_eq!(observed(90, 1_005).wait_duration(1_000), None);
  }

  #[test]
  fn test_past_or_current_reset_clamps_to_fallback() {
    assert_eq!(observed(0, 900).wait_duration(1_000), Some(Duration::from_secs(900)));
    assert_eq!(observed(0, 1_000).wait_duration(1_000), Some(Duration::from_secs(900)));
  }

  #[test]
  fn test_apply_keeps_missing_fields() {
    let mut state = observed(50, 2_000);
    state.limit = 120;
    state.apply(&RateLimitSnapshot { remaining: Some(49), limit: None, reset: None });

    assert_eq!(state.remaining, 49);
    assert_eq!(state.limit, 120);
    assert_eq!(state.reset_at, 2_000);
  }

  #[test]
  fn test_apply_marks_rates_observed() {
    let mut state = QuotaState::new(0);
    state.apply(&RateLimitSnapshot { remaining: None, limit: Some(100), reset: None });
    assert!(state.has_observed_rates);
    assert_eq!(state.remaining, 0);
  }

  #[test]
  fn test_headerless_response_changes_nothing() {
    let mut state = QuotaState::new(0);
    state.apply(&RateLimitSnapshot::default());
    assert_eq!(state, QuotaState::new(0));
  }

  #[test]
  fn test_snapshot_from_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(HEADER_REMAINING, HeaderValue::from_static("97"));
    headers.insert(HEADER_RESET, HeaderValue::from_static("1700000000.4"));
    headers.insert(HEADER_LIMIT, HeaderValue::from_static("lots"));

    let rate = RateLimitSnapshot::from_headers(&headers);
    assert_eq!(rate.remaining, Some(97));
    assert_eq!(rate.reset, Some(1_700_000_001));
    assert_eq!(rate.limit, None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_check_and_wait_sleeps_until_reset() {
    let gate = QuotaGate::with_state(observed(2, Utc::now().timestamp() + 5));

    let start = tokio::time::Instant::now();
    gate.check_and_wait().await;
    let waited = start.elapsed();

    assert!(waited >= Duration::from_secs(4), "waited {:?}", waited);
    assert!(waited <= Duration::from_secs(5), "waited {:?}", waited);
  }

  #[tokio::test(start_paused = true)]
  async fn test_check_and_wait_passes_with_quota() {
    let gate = QuotaGate::with_state(observed(50, Utc::now().timestamp() + 600));

    let start = tokio::time::Instant::now();
    gate.check_and_wait().await;
    assert_eq!(start.elapsed(), Duration::ZERO);
  }

  #[test]
  fn test_update_from_response() {
    let gate = QuotaGate::new();
    gate.update_from_response(&RateLimitSnapshot { remaining: Some(3), limit: Some(100), reset: Some(42) });

    let state = gate.snapshot();
    assert_eq!(state, QuotaState { remaining: 3, limit: 100, reset_at: 42, has_observed_rates: true });
  }
}
