//! Disposition of accessor failures
//!
//! The `try_*` accessors hand back the full [`Error`]. The plain accessors
//! resolve failures to `None` through this handler, which only decides how
//! loudly the failure is logged.

use teyvat_core::{Error, Result};
use tracing::{debug, error};

/// Logs failures of the plain accessors, at `debug` when silent.
#[derive(Debug, Clone, Copy)]
pub struct ErrorHandler {
  silent: bool,
}

impl ErrorHandler {
  /// Create a handler with the given silent flag
  pub fn new(silent: bool) -> Self {
    Self { silent }
  }

  /// Whether failures are logged at `debug` only
  pub fn is_silent(&self) -> bool {
    self.silent
  }

  /// Turn a typed result into the "value or nothing" answer of the plain
  /// accessors. Never panics and never propagates.
  pub fn resolve<T>(&self, context: &str, result: Result<Option<T>>) -> Option<T> {
    match result {
      Ok(value) => value,
      Err(err) => {
        self.report(context, &err);
        None
      }
    }
  }

  /// Log `err` at the level the silent flag selects.
  pub fn report(&self, context: &str, err: &Error) {
    if self.silent {
      debug!(context, error = %err, "Request failed");
    } else {
      error!(context, error = %err, "Request failed");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_errors_resolve_to_none() {
    for silent in [true, false] {
      let handler = ErrorHandler::new(silent);
      let resolved: Option<u32> = handler.resolve("character", Err(Error::Http("refused".to_string())));
      assert_eq!(resolved, None);
    }
  }

  #[test]
  fn test_values_pass_through() {
    let handler = ErrorHandler::new(true);
    assert_eq!(handler.resolve("weapons", Ok(Some(3))), Some(3));
    assert_eq!(handler.resolve::<u32>("weapons", Ok(None)), None);
  }
}
