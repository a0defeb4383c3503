//! Candidate pools, the pair registry, and the pairing engine.
//!
//! This module provides:
//! - `CandidatePool`: deduplicated, sorted sets of unpaired media and
//!   subtitle paths, plus the ephemeral selection state
//! - `PairRegistry`: authoritative owner of pairs with stable ids
//! - `engine`: operations that bridge the pools and the registry
//!   (manual pairing, automatic positional pairing, unpairing)

mod engine;
mod pool;
mod registry;

pub use engine::{pair_all_automatic, pair_manual, unpair, AutoPairOutcome, PairingError};
pub use pool::{CandidatePool, PoolError};
pub use registry::{PairRegistry, RegistryError};
