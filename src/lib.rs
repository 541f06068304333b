//! Blocksim Miner - proof-of-work participant for a simulated blockchain network
//!
//! The miner registers with a coordination service, then loops forever:
//! it picks the block it trails the network leader on the least, searches
//! for a SHA-256 proof of work at the service-issued difficulty, and reports
//! progress back without waiting on the reports. Difficulty updates are
//! fetched in the background and swapped in between searches.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Mining loop, proof-of-work engine, block selection and parameter refresh
pub mod miner;

/// Coordination service client
pub mod network;

/// Update reporting
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{MinerState, MiningLoop, MiningStrategy, ProofOfWorkEngine};
pub use network::{CoordinatorClient, HttpCoordinatorClient};
pub use stats::{ReportStats, UpdateReporter};
pub use types::{BlockProgress, MinerIdentity, MiningParameters, ProofOfWork, SelectionMetric};
pub use utils::{MinerError, init_logging};
