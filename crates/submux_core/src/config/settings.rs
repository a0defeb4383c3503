//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::TrackLanguage;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Muxing tool location.
    #[serde(default)]
    pub tool: ToolSettings,

    /// Muxing options.
    #[serde(default)]
    pub mux: MuxSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for output and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for muxed files.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Folder for per-run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "submux_output".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Location of the external muxing tool.
///
/// Persisted across runs so a user-corrected path survives restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Path to mkvmerge; a bare name is resolved via PATH.
    #[serde(default = "default_mkvmerge_path")]
    pub mkvmerge_path: String,
}

fn default_mkvmerge_path() -> String {
    "mkvmerge".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            mkvmerge_path: default_mkvmerge_path(),
        }
    }
}

/// Muxing options applied uniformly to a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MuxSettings {
    /// Subtitle track language for embedded tracks.
    #[serde(default)]
    pub language: TrackLanguage,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for stderr output.
    #[serde(default)]
    pub level: LogLevel,

    /// Write a per-run log file to the logs folder.
    #[serde(default = "default_true")]
    pub write_run_log: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            write_run_log: true,
        }
    }
}

/// Identifies a settings section for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tool,
    Mux,
    Logging,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tool => "tool",
            ConfigSection::Mux => "mux",
            ConfigSection::Logging => "logging",
        }
    }

    /// All sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Paths,
            ConfigSection::Tool,
            ConfigSection::Mux,
            ConfigSection::Logging,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.tool.mkvmerge_path, "mkvmerge");
        assert_eq!(settings.mux.language, TrackLanguage::Persian);
        assert!(settings.logging.write_run_log);
    }

    #[test]
    fn missing_sections_get_defaults() {
        let settings: Settings = toml::from_str("[tool]\nmkvmerge_path = \"/opt/mkvmerge\"\n").unwrap();
        assert_eq!(settings.tool.mkvmerge_path, "/opt/mkvmerge");
        assert_eq!(settings.paths.output_folder, "submux_output");
    }

    #[test]
    fn language_round_trips_through_toml() {
        let settings = Settings {
            mux: MuxSettings {
                language: TrackLanguage::Hebrew,
            },
            ..Settings::default()
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed.mux.language, TrackLanguage::Hebrew);
    }
}
