//! # teyvat-client
//!
//! A client for the Teyvat game-data REST API.
//!
//! ## Features
//!
//! - **Typed accessors**: characters, weapons, regions, elements, talents,
//!   character profiles, artifacts and artifact sets
//! - **Response cache**: repeat lookups without options never hit the
//!   network, and a fetched list also answers single lookups
//! - **Quota gate**: calls wait for the advertised reset once fewer than
//!   four remain in the server's rate-limit window
//! - **Serial queue**: never more than one request in flight per client
//! - **Pagination**: list accessors walk every page automatically
//!
//! ## Usage
//!
//! ```rust,no_run
//! use teyvat_client::{Config, TeyvatClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TeyvatClient::connect(Config::from_env()?).await?;
//!
//!     if let Some(amber) = client.get_character("Amber", None).await {
//!         println!("{} {:?}", amber.name, amber.attribute("rarity"));
//!     }
//!
//!     // Typed errors instead of `None`
//!     let regions = client.regions().try_list(None).await?;
//!     println!("{} regions", regions.map_or(0, |r| r.len()));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The `get_*` accessors resolve to `None` when a record could not be
//! fetched and log the cause through `tracing` (at `debug` in silent mode,
//! `error` otherwise). The `try_*` methods on the endpoint groups return
//! `Result<Option<T>, teyvat_core::Error>` instead.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod client;
pub mod endpoints;
pub mod error_handler;
pub mod gate;
pub mod pagination;
pub mod queue;
pub mod transport;

// Re-export the main client and common types
pub use client::TeyvatClient;
pub use gate::{QuotaGate, QuotaState, RateLimitSnapshot};
pub use teyvat_core::{Config, EntityKind, Error, FlushScope, Result};
pub use teyvat_models::*;

// Re-export endpoint groups for direct access if needed
pub use endpoints::{auth::AuthEndpoints, entity::EntityEndpoints};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_creation() {
    let config = Config::default_with_token("test_token".to_string());
    assert_eq!(config.token, "test_token");
    assert!(TeyvatClient::new(config).is_ok());
  }
}
