// src/utils/mod.rs
//! Utilities shared across the miner: error type and logging setup

/// Error types
///
/// Contains the [`MinerError`] enum and its conversions.
pub mod error;

/// Logging initialization
pub mod logging;

pub use error::MinerError;
pub use logging::init_logging;
