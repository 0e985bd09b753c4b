//! Account registration and login payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
  pub email: String,
  pub password: String,
}

/// Body of `auth/signup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signup {
  pub email: String,
  pub username: String,
  pub password: String,
}

/// Account details returned alongside a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub username: String,
  pub email: String,
  pub role: String,
  #[serde(default)]
  pub slime_color: Option<i64>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Successful login: the bearer token to configure the client with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginSession {
  pub token: String,
  pub user: User,
}
