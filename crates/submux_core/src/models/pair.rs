//! The pair entity: one media file matched with one subtitle file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::PairStatus;

/// An association of one media candidate and one subtitle candidate.
///
/// Paths are immutable for the lifetime of the pair; only `status` and
/// `diagnostic` change, and only through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    /// Registry-assigned identity. Strictly increasing, never reused.
    pub id: u64,
    /// Path to the media file.
    pub media_path: PathBuf,
    /// Path to the subtitle file.
    pub subtitle_path: PathBuf,
    /// Current lifecycle status.
    pub status: PairStatus,
    /// Captured tool output for failed pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl Pair {
    /// Create a new pending pair.
    pub fn new(id: u64, media_path: PathBuf, subtitle_path: PathBuf) -> Self {
        Self {
            id,
            media_path,
            subtitle_path,
            status: PairStatus::Pending,
            diagnostic: None,
        }
    }

    /// Basename of the media file for display, falling back to the full
    /// path when there is no final component.
    pub fn media_display(&self) -> String {
        file_display(&self.media_path)
    }

    /// Basename of the subtitle file for display.
    pub fn subtitle_display(&self) -> String {
        file_display(&self.subtitle_path)
    }
}

fn file_display(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
