//! Account endpoints
//!
//! `auth/signup` and `auth/login` are plain POSTs: they are neither gated
//! nor cached and carry no bearer token. They still go through the serial
//! queue so no two calls of a client overlap.

use super::EndpointCore;
use teyvat_core::{Error, Result};
use teyvat_models::{Credentials, LoginSession, Signup};
use tracing::{info, instrument};

const LOGIN_ENDPOINT: &str = "auth/login";
const SIGNUP_ENDPOINT: &str = "auth/signup";

/// Account registration and login
pub struct AuthEndpoints {
  core: EndpointCore,
}

impl AuthEndpoints {
  /// Create the auth endpoint group
  pub fn new(core: EndpointCore) -> Self {
    Self { core }
  }

  /// Exchange credentials for a bearer token.
  #[instrument(skip(self, password))]
  pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession> {
    require("email", email)?;
    require("password", password)?;

    let body = serde_json::to_value(Credentials { email: email.to_string(), password: password.to_string() })?;
    let session: Option<LoginSession> =
      self.core.send(LOGIN_ENDPOINT, &[], &body, false).await?.into_data()?;

    session.ok_or_else(|| Error::InvalidResponse("login returned no session".to_string()))
  }

  /// Register a new account. The account must be activated through the
  /// emailed link before [`login`](Self::login) succeeds.
  #[instrument(skip(self, password))]
  pub async fn create_account(&self, email: &str, username: &str, password: &str) -> Result<()> {
    require("email", email)?;
    require("username", username)?;
    require("password", password)?;

    let body = serde_json::to_value(Signup {
      email: email.to_string(),
      username: username.to_string(),
      password: password.to_string(),
    })?;
    self.core.send(SIGNUP_ENDPOINT, &[], &body, false).await?.into_data::<serde_json::Value>()?;

    info!("Account registered, activation email sent");
    Ok(())
  }
}

fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::InvalidArgument(format!("No {} provided, or empty string", field)));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::transport::Transport;
  use std::sync::Arc;

  fn auth() -> AuthEndpoints {
    AuthEndpoints::new(EndpointCore::new(Arc::new(Transport::new_mock()), true, true))
  }

  #[tokio::test]
  async fn test_login_requires_credentials() {
    assert!(matches!(auth().login("", "secret").await, Err(Error::InvalidArgument(_))));
    assert!(matches!(auth().login("traveler@example.com", " ").await, Err(Error::InvalidArgument(_))));
  }

  #[tokio::test]
  async fn test_signup_requires_username() {
    let result = auth().create_account("traveler@example.com", "", "secret").await;
    match result {
      Err(Error::InvalidArgument(msg)) => assert!(msg.contains("username")),
      other => panic!("Expected InvalidArgument, got {:?}", other),
    }
  }
}
