//! SubMux Core - Backend logic for the SubMux subtitle embedder
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be used by the CLI tool or a graphical frontend.

pub mod batch;
pub mod config;
pub mod logging;
pub mod models;
pub mod mux;
pub mod pairing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
