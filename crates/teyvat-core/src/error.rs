use thiserror::Error;

/// The main error type for teyvat-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Bearer token missing
  #[error("Failed to retrieve API token: {0}")]
  Token(String),

  /// Serialization/Deserialization error
  #[error("Serialization error")]
  Serde(#[from] serde_json::Error),

  /// Invalid base URL or endpoint
  #[error("URL error: {0}")]
  Url(#[from] url::ParseError),

  /// Caller supplied an empty or malformed argument
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  /// Server rejected the call for quota reasons
  #[error("Rate limit exceeded: {0}")]
  RateLimit(String),

  /// Any non-success HTTP status
  #[error("API returned status {status}: {body}")]
  Status { status: u16, body: String },

  /// Invalid response from API
  #[error("Invalid API response: {0}")]
  InvalidResponse(String),

  /// General unexpected error
  #[error("Unexpected error: {0}")]
  Unexpected(String),

  /// HTTP transport error (connect, DNS, timeout)
  #[error("HTTP error: {0}")]
  Http(String),

  /// Parse error for response bodies
  #[error("Parse error: {0}")]
  Parse(String),
}

/// Result type alias for teyvat-* crates
pub type Result<T> = std::result::Result<T, Error>;
