//! Muxing module for mkvmerge integration.
//!
//! Builds the mkvmerge command tokens that embed one subtitle file into
//! one media file. The flag set and ordering are fixed for compatibility
//! with the external tool.

mod options_builder;

pub use options_builder::{format_tokens, MuxOptionsBuilder};
