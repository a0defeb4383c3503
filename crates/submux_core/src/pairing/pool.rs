//! Candidate pool state management.
//!
//! Holds the unpaired media and subtitle paths as deduplicated, sorted
//! collections. Sorting is byte-lexicographic over the path string, which
//! is the single source of ordering truth for automatic pairing.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::CandidateKind;

/// Errors from pool operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    #[error("{kind} path not present in pool: {path}")]
    NotFound { kind: CandidateKind, path: PathBuf },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Two sets of unpaired candidate paths, one per kind, each kept sorted.
///
/// Also carries the ephemeral selection state used by manual pairing: at
/// most one selected path per kind, cleared by any mutation of that kind's
/// collection.
#[derive(Debug, Default, Clone)]
pub struct CandidatePool {
    media: Vec<PathBuf>,
    subtitles: Vec<PathBuf>,
    selected_media: Option<PathBuf>,
    selected_subtitle: Option<PathBuf>,
}

/// Byte-lexicographic path comparison (not component-wise).
fn path_cmp(a: &Path, b: &Path) -> Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

impl CandidatePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert paths into the set for `kind`.
    ///
    /// Duplicates are silently absorbed; the collection stays sorted.
    /// Clears the kind's selection. Returns the number of distinct paths
    /// actually added.
    pub fn add(&mut self, paths: impl IntoIterator<Item = PathBuf>, kind: CandidateKind) -> usize {
        let mut added = 0;
        for path in paths {
            let entries = self.entries_mut(kind);
            if let Err(pos) = entries.binary_search_by(|e| path_cmp(e, &path)) {
                entries.insert(pos, path);
                added += 1;
            }
        }
        self.clear_selection(kind);
        added
    }

    /// Remove an exact path from the set for `kind`.
    ///
    /// Clears the kind's selection on success.
    pub fn remove(&mut self, path: &Path, kind: CandidateKind) -> PoolResult<()> {
        let entries = self.entries_mut(kind);
        match entries.binary_search_by(|e| path_cmp(e, path)) {
            Ok(pos) => {
                entries.remove(pos);
                self.clear_selection(kind);
                Ok(())
            }
            Err(_) => Err(PoolError::NotFound {
                kind,
                path: path.to_path_buf(),
            }),
        }
    }

    /// Select a path for manual pairing. The path must be in the pool.
    pub fn select(&mut self, path: &Path, kind: CandidateKind) -> PoolResult<()> {
        if !self.contains(path, kind) {
            return Err(PoolError::NotFound {
                kind,
                path: path.to_path_buf(),
            });
        }
        match kind {
            CandidateKind::Media => self.selected_media = Some(path.to_path_buf()),
            CandidateKind::Subtitle => self.selected_subtitle = Some(path.to_path_buf()),
        }
        Ok(())
    }

    /// Clear the selection pointer for `kind`.
    pub fn clear_selection(&mut self, kind: CandidateKind) {
        match kind {
            CandidateKind::Media => self.selected_media = None,
            CandidateKind::Subtitle => self.selected_subtitle = None,
        }
    }

    /// Current selection for `kind`, if any.
    pub fn selection(&self, kind: CandidateKind) -> Option<&Path> {
        match kind {
            CandidateKind::Media => self.selected_media.as_deref(),
            CandidateKind::Subtitle => self.selected_subtitle.as_deref(),
        }
    }

    /// The sorted sequence of current paths for `kind`.
    pub fn list(&self, kind: CandidateKind) -> &[PathBuf] {
        self.entries(kind)
    }

    /// Whether `path` is present in the set for `kind`.
    pub fn contains(&self, path: &Path, kind: CandidateKind) -> bool {
        self.entries(kind)
            .binary_search_by(|e| path_cmp(e, path))
            .is_ok()
    }

    /// Number of paths in the set for `kind`.
    pub fn len(&self, kind: CandidateKind) -> usize {
        self.entries(kind).len()
    }

    /// Whether the set for `kind` is empty.
    pub fn is_empty(&self, kind: CandidateKind) -> bool {
        self.entries(kind).is_empty()
    }

    /// Empty both pools and both selections.
    pub fn clear(&mut self) {
        self.media.clear();
        self.subtitles.clear();
        self.selected_media = None;
        self.selected_subtitle = None;
    }

    fn entries(&self, kind: CandidateKind) -> &Vec<PathBuf> {
        match kind {
            CandidateKind::Media => &self.media,
            CandidateKind::Subtitle => &self.subtitles,
        }
    }

    fn entries_mut(&mut self, kind: CandidateKind) -> &mut Vec<PathBuf> {
        match kind {
            CandidateKind::Media => &mut self.media,
            CandidateKind::Subtitle => &mut self.subtitles,
        }
    }
}
