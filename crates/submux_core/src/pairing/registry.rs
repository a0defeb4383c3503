//! Pair registry: authoritative ownership of pairs with stable identities.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Pair, PairStatus};

/// Errors from registry operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no pair with id {0}")]
    NotFound(u64),

    #[error("pair {id} cannot transition from {from} to {to}")]
    InvalidTransition {
        id: u64,
        from: PairStatus,
        to: PairStatus,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Mapping from id to pair plus the monotonically increasing next-id counter.
///
/// Ids start at 1 and are never reused, even after removal. Iteration order
/// is ascending by id.
#[derive(Debug, Default, Clone)]
pub struct PairRegistry {
    pairs: BTreeMap<u64, Pair>,
    next_id: u64,
}

impl PairRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            pairs: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate the next id and store a new pending pair.
    pub fn create(&mut self, media_path: PathBuf, subtitle_path: PathBuf) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pairs.insert(id, Pair::new(id, media_path, subtitle_path));
        id
    }

    /// Remove a pair, returning it so the caller can reinsert its paths
    /// into the candidate pools. Does not itself touch the pools.
    pub fn remove(&mut self, id: u64) -> RegistryResult<Pair> {
        self.pairs.remove(&id).ok_or(RegistryError::NotFound(id))
    }

    /// Read-only lookup.
    pub fn get(&self, id: u64) -> RegistryResult<&Pair> {
        self.pairs.get(&id).ok_or(RegistryError::NotFound(id))
    }

    /// All current pairs, ascending by id.
    pub fn list_ordered(&self) -> Vec<&Pair> {
        self.pairs.values().collect()
    }

    /// Ids of all current pairs, ascending.
    pub fn ids(&self) -> Vec<u64> {
        self.pairs.keys().copied().collect()
    }

    /// Update a pair's status.
    ///
    /// Only the `Pending -> Success` and `Pending -> Failed` transitions are
    /// legal; a resolved pair never transitions again.
    pub fn set_status(&mut self, id: u64, status: PairStatus) -> RegistryResult<()> {
        let pair = self.pairs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        if pair.status.is_resolved() || !status.is_resolved() {
            return Err(RegistryError::InvalidTransition {
                id,
                from: pair.status,
                to: status,
            });
        }
        pair.status = status;
        Ok(())
    }

    /// Mark a pair failed and record the captured diagnostic text.
    pub fn set_failed(&mut self, id: u64, diagnostic: impl Into<String>) -> RegistryResult<()> {
        self.set_status(id, PairStatus::Failed)?;
        // set_status verified presence above
        if let Some(pair) = self.pairs.get_mut(&id) {
            pair.diagnostic = Some(diagnostic.into());
        }
        Ok(())
    }

    /// Number of pairs currently registered.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the registry holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(registry: &mut PairRegistry, stem: &str) -> u64 {
        registry.create(
            PathBuf::from(format!("{stem}.mkv")),
            PathBuf::from(format!("{stem}.srt")),
        )
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut registry = PairRegistry::new();
        assert_eq!(create(&mut registry, "a"), 1);
        assert_eq!(create(&mut registry, "b"), 2);
        assert_eq!(create(&mut registry, "c"), 3);
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut registry = PairRegistry::new();
        create(&mut registry, "a");
        create(&mut registry, "b");
        registry.remove(1).unwrap();

        assert_eq!(create(&mut registry, "c"), 3);
        assert_eq!(registry.ids(), vec![2, 3]);
    }

    #[test]
    fn remove_returns_the_pair_paths() {
        let mut registry = PairRegistry::new();
        let id = registry.create(PathBuf::from("m.mkv"), PathBuf::from("s.srt"));

        let pair = registry.remove(id).unwrap();
        assert_eq!(pair.media_path, PathBuf::from("m.mkv"));
        assert_eq!(pair.subtitle_path, PathBuf::from("s.srt"));
        assert_eq!(registry.remove(id), Err(RegistryError::NotFound(id)));
    }

    #[test]
    fn list_ordered_is_ascending() {
        let mut registry = PairRegistry::new();
        create(&mut registry, "z");
        create(&mut registry, "a");
        create(&mut registry, "m");

        let ids: Vec<u64> = registry.list_ordered().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn status_resolves_exactly_once() {
        let mut registry = PairRegistry::new();
        let id = create(&mut registry, "a");

        registry.set_status(id, PairStatus::Success).unwrap();
        let err = registry.set_status(id, PairStatus::Failed).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTransition { .. }));
        assert_eq!(registry.get(id).unwrap().status, PairStatus::Success);
    }

    #[test]
    fn status_never_goes_back_to_pending() {
        let mut registry = PairRegistry::new();
        let id = create(&mut registry, "a");

        let err = registry.set_status(id, PairStatus::Pending).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTransition { .. }));
    }

    #[test]
    fn set_failed_records_diagnostic() {
        let mut registry = PairRegistry::new();
        let id = create(&mut registry, "a");

        registry.set_failed(id, "mkvmerge: invalid track").unwrap();
        let pair = registry.get(id).unwrap();
        assert_eq!(pair.status, PairStatus::Failed);
        assert_eq!(pair.diagnostic.as_deref(), Some("mkvmerge: invalid track"));
    }

    #[test]
    fn set_status_on_missing_pair_fails() {
        let mut registry = PairRegistry::new();
        assert_eq!(
            registry.set_status(99, PairStatus::Success),
            Err(RegistryError::NotFound(99))
        );
    }
}
