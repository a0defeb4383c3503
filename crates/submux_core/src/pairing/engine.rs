//! Pairing operations bridging the candidate pools and the pair registry.
//!
//! All operations take the pool and registry as explicit arguments; there
//! is no ambient state. Errors leave both structures unmutated.

use thiserror::Error;

use crate::models::{CandidateKind, Pair};

use super::pool::{CandidatePool, PoolError};
use super::registry::{PairRegistry, RegistryError};

/// Errors from pairing operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PairingError {
    /// Manual pairing attempted without both selections set.
    #[error("manual pairing requires a selected {0} file")]
    IncompleteSelection(CandidateKind),

    /// Automatic pairing attempted with an empty pool.
    #[error("cannot pair automatically: the {0} pool is empty")]
    EmptyPool(CandidateKind),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for pairing operations.
pub type PairingResult<T> = Result<T, PairingError>;

/// Outcome of an automatic pairing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoPairOutcome {
    /// Ids of the pairs created, in creation order.
    pub pair_ids: Vec<u64>,
    /// Media paths left unpaired in the pool.
    pub unpaired_media: usize,
    /// Subtitle paths left unpaired in the pool.
    pub unpaired_subtitles: usize,
}

impl AutoPairOutcome {
    /// Whether the pools had different sizes (non-fatal; the overlapping
    /// prefix was still paired).
    pub fn count_mismatch(&self) -> bool {
        self.unpaired_media > 0 || self.unpaired_subtitles > 0
    }
}

/// Pair the currently selected media and subtitle files.
///
/// Requires both selections to be set. On success the two paths leave
/// their pools, a new pending pair is registered, both selections are
/// cleared, and the new pair's id is returned.
pub fn pair_manual(pool: &mut CandidatePool, registry: &mut PairRegistry) -> PairingResult<u64> {
    let media = pool
        .selection(CandidateKind::Media)
        .ok_or(PairingError::IncompleteSelection(CandidateKind::Media))?
        .to_path_buf();
    let subtitle = pool
        .selection(CandidateKind::Subtitle)
        .ok_or(PairingError::IncompleteSelection(CandidateKind::Subtitle))?
        .to_path_buf();

    pool.remove(&media, CandidateKind::Media)?;
    pool.remove(&subtitle, CandidateKind::Subtitle)?;
    // remove() already cleared both selections

    let id = registry.create(media.clone(), subtitle.clone());
    tracing::info!(
        "Paired id {}: '{}' with '{}'",
        id,
        media.display(),
        subtitle.display()
    );
    Ok(id)
}

/// Pair the two pools positionally after sorting.
///
/// Zips the sorted pools for `i in 0 .. min(len)`, creating pairs in
/// increasing `i` order so the assigned ids are monotonic in the same
/// order. Lexicographic path order is the single source of ordering truth;
/// no filename heuristic is applied. Surplus entries of the longer pool
/// stay in the pool and are reported in the outcome.
pub fn pair_all_automatic(
    pool: &mut CandidatePool,
    registry: &mut PairRegistry,
) -> PairingResult<AutoPairOutcome> {
    if pool.is_empty(CandidateKind::Media) {
        return Err(PairingError::EmptyPool(CandidateKind::Media));
    }
    if pool.is_empty(CandidateKind::Subtitle) {
        return Err(PairingError::EmptyPool(CandidateKind::Subtitle));
    }

    let media_count = pool.len(CandidateKind::Media);
    let subtitle_count = pool.len(CandidateKind::Subtitle);
    let n = media_count.min(subtitle_count);

    if media_count != subtitle_count {
        tracing::warn!(
            "File counts do not match ({} media, {} subtitles); pairing the first {}",
            media_count,
            subtitle_count,
            n
        );
    }

    // The pools are already sorted; take the overlapping prefix.
    let matched: Vec<(std::path::PathBuf, std::path::PathBuf)> = pool
        .list(CandidateKind::Media)
        .iter()
        .take(n)
        .cloned()
        .zip(pool.list(CandidateKind::Subtitle).iter().take(n).cloned())
        .collect();

    let mut pair_ids = Vec::with_capacity(n);
    for (media, subtitle) in matched {
        pool.remove(&media, CandidateKind::Media)?;
        pool.remove(&subtitle, CandidateKind::Subtitle)?;
        let id = registry.create(media.clone(), subtitle.clone());
        tracing::info!(
            "Auto-paired id {}: '{}' with '{}'",
            id,
            media.display(),
            subtitle.display()
        );
        pair_ids.push(id);
    }

    Ok(AutoPairOutcome {
        pair_ids,
        unpaired_media: pool.len(CandidateKind::Media),
        unpaired_subtitles: pool.len(CandidateKind::Subtitle),
    })
}

/// Remove a pair and return its paths to the candidate pools.
pub fn unpair(
    pool: &mut CandidatePool,
    registry: &mut PairRegistry,
    id: u64,
) -> PairingResult<Pair> {
    let pair = registry.remove(id)?;
    pool.add([pair.media_path.clone()], CandidateKind::Media);
    pool.add([pair.subtitle_path.clone()], CandidateKind::Subtitle);
    tracing::info!("Pair id {} removed; files returned to the pools", id);
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::models::PairStatus;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn manual_pairing_requires_both_selections() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        pool.add(paths(&["a.mkv"]), CandidateKind::Media);
        pool.add(paths(&["a.srt"]), CandidateKind::Subtitle);
        pool.select(Path::new("a.mkv"), CandidateKind::Media).unwrap();

        let err = pair_manual(&mut pool, &mut registry).unwrap_err();
        assert_eq!(
            err,
            PairingError::IncompleteSelection(CandidateKind::Subtitle)
        );
        // nothing was mutated
        assert_eq!(pool.len(CandidateKind::Media), 1);
        assert_eq!(pool.len(CandidateKind::Subtitle), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn manual_pairing_moves_paths_and_clears_selections() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        pool.add(paths(&["a.mkv", "b.mkv"]), CandidateKind::Media);
        pool.add(paths(&["a.srt"]), CandidateKind::Subtitle);
        pool.select(Path::new("b.mkv"), CandidateKind::Media).unwrap();
        pool.select(Path::new("a.srt"), CandidateKind::Subtitle).unwrap();

        let id = pair_manual(&mut pool, &mut registry).unwrap();
        assert_eq!(id, 1);
        assert_eq!(pool.list(CandidateKind::Media), paths(&["a.mkv"]));
        assert!(pool.is_empty(CandidateKind::Subtitle));
        assert_eq!(pool.selection(CandidateKind::Media), None);
        assert_eq!(pool.selection(CandidateKind::Subtitle), None);

        let pair = registry.get(id).unwrap();
        assert_eq!(pair.media_path, PathBuf::from("b.mkv"));
        assert_eq!(pair.status, PairStatus::Pending);
    }

    #[test]
    fn automatic_pairing_rejects_empty_pools() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        pool.add(paths(&["a.mkv"]), CandidateKind::Media);

        let err = pair_all_automatic(&mut pool, &mut registry).unwrap_err();
        assert_eq!(err, PairingError::EmptyPool(CandidateKind::Subtitle));
        assert_eq!(pool.len(CandidateKind::Media), 1);
    }

    #[test]
    fn automatic_pairing_zips_the_sorted_prefix() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        pool.add(paths(&["c", "a", "b"]), CandidateKind::Media);
        pool.add(paths(&["y", "x"]), CandidateKind::Subtitle);

        let outcome = pair_all_automatic(&mut pool, &mut registry).unwrap();
        assert_eq!(outcome.pair_ids, vec![1, 2]);
        assert!(outcome.count_mismatch());
        assert_eq!(outcome.unpaired_media, 1);
        assert_eq!(outcome.unpaired_subtitles, 0);

        let first = registry.get(1).unwrap();
        assert_eq!(first.media_path, PathBuf::from("a"));
        assert_eq!(first.subtitle_path, PathBuf::from("x"));
        let second = registry.get(2).unwrap();
        assert_eq!(second.media_path, PathBuf::from("b"));
        assert_eq!(second.subtitle_path, PathBuf::from("y"));

        // surplus stays in the pool
        assert_eq!(pool.list(CandidateKind::Media), paths(&["c"]));
        assert!(pool.is_empty(CandidateKind::Subtitle));
    }

    #[test]
    fn automatic_pairing_with_equal_counts_has_no_mismatch() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        pool.add(paths(&["a", "b"]), CandidateKind::Media);
        pool.add(paths(&["x", "y"]), CandidateKind::Subtitle);

        let outcome = pair_all_automatic(&mut pool, &mut registry).unwrap();
        assert!(!outcome.count_mismatch());
        assert!(pool.is_empty(CandidateKind::Media));
        assert!(pool.is_empty(CandidateKind::Subtitle));
    }

    #[test]
    fn unpair_restores_pre_pairing_pool_contents() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        pool.add(paths(&["a.mkv", "b.mkv"]), CandidateKind::Media);
        pool.add(paths(&["a.srt", "b.srt"]), CandidateKind::Subtitle);
        let before_media = pool.list(CandidateKind::Media).to_vec();
        let before_subs = pool.list(CandidateKind::Subtitle).to_vec();

        pool.select(Path::new("a.mkv"), CandidateKind::Media).unwrap();
        pool.select(Path::new("b.srt"), CandidateKind::Subtitle).unwrap();
        let id = pair_manual(&mut pool, &mut registry).unwrap();

        let removed = unpair(&mut pool, &mut registry, id).unwrap();
        assert_eq!(removed.media_path, PathBuf::from("a.mkv"));
        assert_eq!(removed.subtitle_path, PathBuf::from("b.srt"));
        assert_eq!(pool.list(CandidateKind::Media), before_media);
        assert_eq!(pool.list(CandidateKind::Subtitle), before_subs);
        assert!(registry.is_empty());
    }

    #[test]
    fn unpair_unknown_id_fails() {
        let mut pool = CandidatePool::new();
        let mut registry = PairRegistry::new();
        let err = unpair(&mut pool, &mut registry, 7).unwrap_err();
        assert_eq!(err, PairingError::Registry(RegistryError::NotFound(7)));
    }
}
