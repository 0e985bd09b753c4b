//! # teyvat-models
//!
//! Data models for Teyvat API responses.
//!
//! Entity records are kept deliberately loose: the client only relies on the
//! `id` and `name` of a record, every other field the API returns is kept
//! verbatim in `attributes`.
//!
//! ## Usage
//!
//! ```ignore
//! use teyvat_models::{Character, Entity};
//!
//! let amber: Character = serde_json::from_str(&response_json)?;
//! assert_eq!(amber.cache_key(), Some("Amber"));
//! ```

#![warn(clippy::all)]

pub mod auth;
pub mod entities;
pub mod options;

pub use auth::*;
pub use entities::*;
pub use options::*;
