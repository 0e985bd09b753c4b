//! Configuration management for the Teyvat client

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Main configuration struct for the Teyvat client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// Bearer token sent on every entity request
  pub token: String,

  /// Base URL for the Teyvat API, always ending in `/`
  pub base_url: String,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Warm every cache once the client is ready
  pub aggressive: bool,

  /// Enable the in-memory response cache
  pub cache: bool,

  /// Swallow accessor errors instead of logging them as errors
  pub silent: bool,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let token = env::var("TEYVAT_TOKEN")
      .map_err(|_| Error::Token("TEYVAT_TOKEN not set".to_string()))?;

    let timeout_secs = env::var("TEYVAT_TIMEOUT_SECS")
      .unwrap_or_else(|_| crate::DEFAULT_TIMEOUT_SECS.to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid TEYVAT_TIMEOUT_SECS".to_string()))?;

    let base_url = env::var("TEYVAT_BASE_URL").unwrap_or_else(|_| crate::TEYVAT_BASE_URL.to_string());

    let aggressive = env_flag("TEYVAT_AGGRESSIVE", false)?;
    let cache = env_flag("TEYVAT_CACHE", true)?;
    let silent = env_flag("TEYVAT_SILENT", true)?;

    Ok(Config { token, base_url: normalize_base_url(&base_url)?, timeout_secs, aggressive, cache, silent })
  }

  /// Create a config with default values
  pub fn default_with_token(token: impl Into<String>) -> Self {
    Config {
      token: token.into(),
      base_url: crate::TEYVAT_BASE_URL.to_string(),
      timeout_secs: crate::DEFAULT_TIMEOUT_SECS,
      aggressive: false,
      cache: true,
      silent: true,
    }
  }

  /// Point the client at another service root
  pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
    self.base_url = normalize_base_url(base_url)?;
    Ok(self)
  }

  /// Per-request timeout in seconds
  pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
    self.timeout_secs = timeout_secs;
    self
  }

  /// Warm every cache once the client connects
  pub fn with_aggressive(mut self, aggressive: bool) -> Self {
    self.aggressive = aggressive;
    self
  }

  /// Enable or disable the response cache
  pub fn with_cache(mut self, cache: bool) -> Self {
    self.cache = cache;
    self
  }

  /// Log accessor failures at `debug` instead of `error`
  pub fn with_silent(mut self, silent: bool) -> Self {
    self.silent = silent;
    self
  }
}

/// Validate a base URL and make sure relative endpoints join beneath it.
pub fn normalize_base_url(raw: &str) -> Result<String> {
  let mut url = Url::parse(raw)?;
  if url.cannot_be_a_base() {
    return Err(Error::Config(format!("{} cannot be used as a base URL", raw)));
  }
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url.to_string())
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
  match env::var(name) {
    Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
      "1" | "true" | "yes" | "on" => Ok(true),
      "0" | "false" | "no" | "off" => Ok(false),
      _ => Err(Error::Config(format!("Invalid {}", name))),
    },
    Err(_) => Ok(default),
  }
}
