//! Configuration management for SubMux.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed section is modified)
//!
//! # Example
//!
//! ```no_run
//! use submux_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! // Correct the tool path and persist just that section
//! config.settings_mut().tool.mkvmerge_path = "/opt/mkvtoolnix/mkvmerge".into();
//! config.update_section(ConfigSection::Tool).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, MuxSettings, PathSettings, Settings, ToolSettings,
};
