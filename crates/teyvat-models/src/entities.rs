/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
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

//! Game entity records returned by the Teyvat API

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use teyvat_core::{EntityKind, LookupField};

/// A record served by one of the entity collections.
pub trait Entity: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
  /// Collection the record belongs to
  const KIND: EntityKind;

  /// Server-side identifier
  fn id(&self) -> &str;

  /// Display name, empty when the API omits it
  fn name(&self) -> &str;

  /// Key the record is indexed under in the response cache.
  ///
  /// This is the same field singular lookups send to the server, so a record
  /// cached from a list answers a later lookup by that value.
  fn cache_key(&self) -> Option<&str> {
    let key = match Self::KIND.lookup_field() {
      LookupField::Name => self.name(),
      LookupField::Id => self.id(),
    };
    (!key.is_empty()).then_some(key)
  }
}

/// Entities that can be fetched one at a time by key.
pub trait Lookup: Entity {}

/// Ids arrive as CUID strings on most collections and as integers on a few.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    Value::Null => Ok(String::new()),
    other => Err(D::Error::custom(format!("expected string or number id, got {}", other))),
  }
}

/// Names are optional on some records and sent as `null`.
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! entity_record {
  ($(#[$doc:meta])* $name:ident, $kind:expr, lookup) => {
    entity_record!($(#[$doc])* $name, $kind);
    impl Lookup for $name {}
  };
  ($(#[$doc:meta])* $name:ident, $kind:expr) => {
    $(#[$doc])*
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct $name {
      /// Server-side identifier
      #[serde(default, deserialize_with = "string_or_number")]
      pub id: String,

      /// Display name
      #[serde(default, deserialize_with = "string_or_null")]
      pub name: String,

      /// Every other field, passed through untouched
      #[serde(flatten)]
      pub attributes: Map<String, Value>,
    }

    impl $name {
      /// Look up a raw attribute by its API field name.
      pub fn attribute(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
      }
    }

    impl Entity for $name {
      const KIND: EntityKind = $kind;

      fn id(&self) -> &str {
        &self.id
      }

      fn name(&self) -> &str {
        &self.name
      }
    }
  };
}

entity_record!(
  /// Playable character
  Character,
  EntityKind::Character,
  lookup
);
entity_record!(
  /// Weapon, including ascension materials when requested
  Weapon,
  EntityKind::Weapon,
  lookup
);
entity_record!(
  /// Region of Teyvat such as Mondstadt or Liyue
  Region,
  EntityKind::Region,
  lookup
);
entity_record!(
  /// Elemental type
  Element,
  EntityKind::Element,
  lookup
);
entity_record!(
  /// Character talent
  Talent,
  EntityKind::Talent,
  lookup
);
entity_record!(
  /// Lore profile of a character
  CharacterProfile,
  EntityKind::CharacterProfile,
  lookup
);
entity_record!(
  /// Single artifact piece
  Artifact,
  EntityKind::Artifact
);
entity_record!(
  /// Artifact set with its pieces when requested
  ArtifactSet,
  EntityKind::ArtifactSet
);
