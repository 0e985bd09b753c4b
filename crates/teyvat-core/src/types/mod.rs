//! Common types used across teyvat-* crates

use crate::error::Result;
use crate::EntityKind;

/// Which entity caches a flush clears.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlushScope {
  /// Every entity cache
  #[default]
  All,
  /// Only the listed collections
  Only(Vec<EntityKind>),
}

impl FlushScope {
  /// Build a scope from collection names such as `"characters"` or `"weapons"`.
  pub fn from_names<I, S>(names: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let kinds = names.into_iter().map(|n| n.as_ref().parse()).collect::<Result<Vec<_>>>()?;
    Ok(FlushScope::Only(kinds))
  }

  /// Whether this scope clears the given collection.
  pub fn covers(&self, kind: EntityKind) -> bool {
    match self {
      FlushScope::All => true,
      FlushScope::Only(kinds) => kinds.contains(&kind),
    }
  }
}

impl From<EntityKind> for FlushScope {
  fn from(kind: EntityKind) -> Self {
    FlushScope::Only(vec![kind])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_scope_from_names() {
    let scope = FlushScope::from_names(["characters", "talents"]).unwrap();
    assert!(scope.covers(EntityKind::Character));
    assert!(scope.covers(EntityKind::Talent));
    assert!(!scope.covers(EntityKind::Weapon));
    assert!(FlushScope::All.covers(EntityKind::ArtifactSet));
  }

  #[test]
  fn test_scope_rejects_unknown_names() {
    assert!(FlushScope::from_names(["characters", "mora"]).is_err());
  }
}
