//! Candidate discovery from files and directories.
//!
//! The headless stand-in for the file pickers: explicit files are taken
//! as-is, directories are scanned recursively and filtered by the known
//! extensions for each kind.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use submux_core::models::CandidateKind;
use walkdir::WalkDir;

/// Extensions recognized as media containers.
pub const MEDIA_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "webm", "flv"];

/// Extensions recognized as subtitle files.
pub const SUBTITLE_EXTENSIONS: &[&str] = &["ass", "srt", "sub", "idx"];

/// Collect candidate paths of one kind from a mix of files and directories.
///
/// Explicit file arguments bypass the extension filter; scanned directory
/// entries must match it. A missing input path is an error.
pub fn collect_candidates(inputs: &[PathBuf], kind: CandidateKind) -> Result<Vec<PathBuf>> {
    let extensions = match kind {
        CandidateKind::Media => MEDIA_EXTENSIONS,
        CandidateKind::Subtitle => SUBTITLE_EXTENSIONS,
    };

    let mut found = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let before = found.len();
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                    found.push(entry.into_path());
                }
            }
            tracing::info!(
                "Scanned {} for {} files: {} found",
                input.display(),
                kind,
                found.len() - before
            );
        } else if input.is_file() {
            found.push(input.clone());
        } else {
            bail!("{} path does not exist: {}", kind, input.display());
        }
    }

    Ok(found)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            extensions.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
