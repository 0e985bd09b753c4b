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

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::FlushScope;

use std::str::FromStr;

/// Entity collections served by the Teyvat API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
  Character,
  Weapon,
  Region,
  Element,
  Talent,
  CharacterProfile,
  // Extended collections, list endpoints only
  Artifact,
  ArtifactSet,
}

/// Which record field identifies an entity in lookups and in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
  Name,
  Id,
}

impl LookupField {
  /// Query parameter name sent to the server.
  pub fn param(&self) -> &'static str {
    match self {
      LookupField::Name => "name",
      LookupField::Id => "id",
    }
  }
}

impl EntityKind {
  /// Every kind, in the order `cache_all` walks them.
  pub const ALL: [EntityKind; 8] = [
    EntityKind::Character,
    EntityKind::Weapon,
    EntityKind::Region,
    EntityKind::Element,
    EntityKind::Talent,
    EntityKind::CharacterProfile,
    EntityKind::Artifact,
    EntityKind::ArtifactSet,
  ];

  /// Endpoint for a single record, if the API exposes one.
  pub fn single_endpoint(&self) -> Option<&'static str> {
    match self {
      EntityKind::Character => Some("character"),
      EntityKind::Weapon => Some("weapon"),
      EntityKind::Region => Some("region"),
      EntityKind::Element => Some("element"),
      EntityKind::Talent => Some("talent"),
      EntityKind::CharacterProfile => Some("characterProfile"),
      EntityKind::Artifact | EntityKind::ArtifactSet => None,
    }
  }

  /// Paged list endpoint.
  pub fn list_endpoint(&self) -> &'static str {
    match self {
      EntityKind::Character => "characters",
      EntityKind::Weapon => "weapons",
      EntityKind::Region => "regions",
      EntityKind::Element => "elements",
      EntityKind::Talent => "talents",
      EntityKind::CharacterProfile => "characterProfiles",
      EntityKind::Artifact => "artifacts",
      EntityKind::ArtifactSet => "artifactSets",
    }
  }

  pub fn lookup_field(&self) -> LookupField {
    match self {
      EntityKind::Character => LookupField::Name,
      _ => LookupField::Id,
    }
  }

  /// Relation hints sent with list requests when the caller supplies none.
  pub fn default_include(&self) -> Option<serde_json::Value> {
    match self {
      EntityKind::Character => Some(serde_json::json!({ "talents": true, "ascensions": true })),
      EntityKind::Weapon => Some(serde_json::json!({ "weaponAscensions": true })),
      EntityKind::ArtifactSet => Some(serde_json::json!({ "artifacts": true })),
      _ => None,
    }
  }
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.list_endpoint())
  }
}

impl FromStr for EntityKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "characters" => Ok(EntityKind::Character),
      "weapons" => Ok(EntityKind::Weapon),
      "regions" => Ok(EntityKind::Region),
      "elements" => Ok(EntityKind::Element),
      "talents" => Ok(EntityKind::Talent),
      "characterProfiles" | "charactersProfiles" => Ok(EntityKind::CharacterProfile),
      "artifacts" => Ok(EntityKind::Artifact),
      "artifactSets" => Ok(EntityKind::ArtifactSet),
      other => Err(Error::InvalidArgument(format!("unknown entity collection: {}", other))),
    }
  }
}

/// Root of the public Teyvat REST service
pub const TEYVAT_BASE_URL: &str = "https://rest.teyvat.dev/";

/// Socket-level timeout for every request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Calls are held back once fewer than this many remain in the window
pub const QUOTA_SAFETY_MARGIN: i64 = 4;

/// `cache_all` refuses to start below this remaining quota
pub const CACHE_ALL_MIN_QUOTA: i64 = 6;

/// Wait used when the advertised reset time is already in the past
pub const FALLBACK_WAIT_SECS: u64 = 900;

/// Largest page the API serves; also the default page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Window size assumed before the server has reported one
pub const INITIAL_QUOTA_LIMIT: i64 = 100;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_kind_parsing() {
    assert_eq!("characters".parse::<EntityKind>().unwrap(), EntityKind::Character);
    assert_eq!("charactersProfiles".parse::<EntityKind>().unwrap(), EntityKind::CharacterProfile);
    assert_eq!("characterProfiles".parse::<EntityKind>().unwrap(), EntityKind::CharacterProfile);
    assert!(matches!("amber".parse::<EntityKind>(), Err(Error::InvalidArgument(_))));
  }

  #[test]
  fn test_endpoints() {
    assert_eq!(EntityKind::CharacterProfile.single_endpoint(), Some("characterProfile"));
    assert_eq!(EntityKind::ArtifactSet.single_endpoint(), None);
    assert_eq!(EntityKind::Talent.to_string(), "talents");
    assert_eq!(EntityKind::Character.lookup_field().param(), "name");
    assert_eq!(EntityKind::Region.lookup_field().param(), "id");
  }
}
