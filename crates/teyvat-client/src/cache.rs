//! In-memory response cache, one slot per entity collection
//!
//! Entries never expire on their own; they are replaced by newer fetches or
//! dropped by [`CacheStore::flush`].

use parking_lot::RwLock;
use std::collections::HashMap;
use teyvat_core::{EntityKind, FlushScope};
use teyvat_models::{
  Artifact, ArtifactSet, Character, CharacterProfile, Element, Entity, Region, Talent, Weapon,
};
use tracing::debug;

/// Cached records of one collection.
#[derive(Debug, Clone)]
pub struct EntityCache<T> {
  single_index: HashMap<String, T>,
  full_list: Option<Vec<T>>,
}

impl<T> Default for EntityCache<T> {
  fn default() -> Self {
    Self { single_index: HashMap::new(), full_list: None }
  }
}

impl<T: Entity> EntityCache<T> {
  /// Empty cache
  pub fn new() -> Self {
    Self::default()
  }

  /// Cached record for `key`, unless the caller asked to bypass the cache.
  pub fn lookup(&self, key: &str, bypass: bool) -> Option<T> {
    if bypass {
      return None;
    }
    self.single_index.get(key).cloned()
  }

  /// The last full default-options listing, unless bypassed.
  pub fn lookup_list(&self, bypass: bool) -> Option<Vec<T>> {
    if bypass {
      return None;
    }
    self.full_list.clone()
  }

  /// Index a single record under `key`, replacing any previous entry.
  pub fn store(&mut self, key: &str, value: T) {
    self.single_index.insert(key.to_string(), value);
  }

  /// Keep `list` as the full listing and index every element by its own key.
  pub fn store_list(&mut self, list: Vec<T>) {
    for record in &list {
      if let Some(key) = record.cache_key() {
        self.single_index.insert(key.to_string(), record.clone());
      }
    }
    self.full_list = Some(list);
  }

  /// Drop both the index and the full listing.
  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// Number of individually indexed records
  pub fn len(&self) -> usize {
    self.single_index.len()
  }

  /// Nothing indexed and no listing stored
  pub fn is_empty(&self) -> bool {
    self.single_index.is_empty() && self.full_list.is_none()
  }
}

/// Entities with a slot in the [`CacheStore`].
pub trait CachedEntity: Entity {
  /// The slot holding records of this type.
  fn slot(store: &CacheStore) -> &RwLock<EntityCache<Self>>;
}

/// Every entity cache of one client.
///
/// Locks are only ever held for a single synchronous read or write.
#[derive(Debug, Default)]
pub struct CacheStore {
  characters: RwLock<EntityCache<Character>>,
  weapons: RwLock<EntityCache<Weapon>>,
  regions: RwLock<EntityCache<Region>>,
  elements: RwLock<EntityCache<Element>>,
  talents: RwLock<EntityCache<Talent>>,
  character_profiles: RwLock<EntityCache<CharacterProfile>>,
  artifacts: RwLock<EntityCache<Artifact>>,
  artifact_sets: RwLock<EntityCache<ArtifactSet>>,
}

macro_rules! impl_cached_entity {
  ($($entity:ty => $field:ident),* $(,)?) => {
    $(
      impl CachedEntity for $entity {
        fn slot(store: &CacheStore) -> &RwLock<EntityCache<Self>> {
          &store.$field
        }
      }
    )*
  };
}

impl_cached_entity!(
  Character => characters,
  Weapon => weapons,
  Region => regions,
  Element => elements,
  Talent => talents,
  CharacterProfile => character_profiles,
  Artifact => artifacts,
  ArtifactSet => artifact_sets,
);

impl CacheStore {
  /// Empty store
  pub fn new() -> Self {
    Self::default()
  }

  /// See [`EntityCache::lookup`].
  pub fn lookup<T: CachedEntity>(&self, key: &str, bypass: bool) -> Option<T> {
    T::slot(self).read().lookup(key, bypass)
  }

  /// See [`EntityCache::lookup_list`].
  pub fn lookup_list<T: CachedEntity>(&self, bypass: bool) -> Option<Vec<T>> {
    T::slot(self).read().lookup_list(bypass)
  }

  /// See [`EntityCache::store`].
  pub fn store<T: CachedEntity>(&self, key: &str, value: T) {
    T::slot(self).write().store(key, value);
  }

  /// See [`EntityCache::store_list`].
  pub fn store_list<T: CachedEntity>(&self, list: Vec<T>) {
    debug!(kind = %T::KIND, records = list.len(), "Caching full listing");
    T::slot(self).write().store_list(list);
  }

  /// Empty the caches selected by `scope`.
  pub fn flush(&self, scope: &FlushScope) {
    for kind in EntityKind::ALL {
      if scope.covers(kind) {
        self.clear(kind);
      }
    }
  }

  fn clear(&self, kind: EntityKind) {
    debug!(%kind, "Flushing cache");
    match kind {
      EntityKind::Character => self.characters.write().clear(),
      EntityKind::Weapon => self.weapons.write().clear(),
      EntityKind::Region => self.regions.write().clear(),
      EntityKind::Element => self.elements.write().clear(),
      EntityKind::Talent => self.talents.write().clear(),
      EntityKind::CharacterProfile => self.character_profiles.write().clear(),
      EntityKind::Artifact => self.artifacts.write().clear(),
      EntityKind::ArtifactSet => self.artifact_sets.write().clear(),
    }
  }
}
