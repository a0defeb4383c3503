//! mkvmerge command options builder.
//!
//! Builds command-line tokens for one subtitle-embedding invocation:
//!
//! ```text
//! <tool> -o <output> -S <media> --language 0:<code> --default-track 0:yes \
//!     --sub-charset 0:cp1256 <subtitle>
//! ```
//!
//! `-S` strips any subtitle tracks already embedded in the media file; the
//! appended subtitle file becomes track 0 of the new subtitle set, tagged
//! with the run's language, marked default, and decoded as cp1256.

use std::path::Path;

use crate::models::TrackLanguage;

/// Builder for one pair's mkvmerge command tokens.
///
/// Generates the list of string tokens that form the complete command,
/// tool path included.
pub struct MuxOptionsBuilder<'a> {
    tool_path: &'a Path,
    media_path: &'a Path,
    subtitle_path: &'a Path,
    output_path: &'a Path,
    language: TrackLanguage,
}

impl<'a> MuxOptionsBuilder<'a> {
    /// Create a new options builder.
    pub fn new(
        tool_path: &'a Path,
        media_path: &'a Path,
        subtitle_path: &'a Path,
        output_path: &'a Path,
        language: TrackLanguage,
    ) -> Self {
        Self {
            tool_path,
            media_path,
            subtitle_path,
            output_path,
            language,
        }
    }

    /// Build the complete command tokens.
    ///
    /// The flag set and ordering are fixed; do not reorder.
    pub fn build(&self) -> Vec<String> {
        vec![
            self.tool_path.to_string_lossy().to_string(),
            "-o".to_string(),
            self.output_path.to_string_lossy().to_string(),
            "-S".to_string(),
            self.media_path.to_string_lossy().to_string(),
            "--language".to_string(),
            format!("0:{}", self.language.code()),
            "--default-track".to_string(),
            "0:yes".to_string(),
            "--sub-charset".to_string(),
            "0:cp1256".to_string(),
            self.subtitle_path.to_string_lossy().to_string(),
        ]
    }
}

/// Join tokens into a single line for log output.
pub fn format_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}
