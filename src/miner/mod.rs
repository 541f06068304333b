// src/miner/mod.rs
//! Core mining functionality
//!
//! - Proof-of-work search with hash-power pacing
//! - Block selection over chain progress snapshots
//! - Background parameter refresh
//! - The mining loop tying them together

/// Proof-of-work engine
pub mod pow;

/// Block selection
pub mod selector;

/// Shared mining parameters and their periodic refresh
pub mod params;

/// Mining strategy abstraction
pub mod strategy;

/// Mining loop orchestrator
pub mod mining_loop;

pub use self::mining_loop::{MinerState, MiningLoop, RoundOutcome};
pub use self::params::{ParamsRefresher, SharedParams};
pub use self::pow::{ProofOfWorkEngine, meets_difficulty, pacing_interval};
pub use self::selector::select_block;
pub use self::strategy::MiningStrategy;
