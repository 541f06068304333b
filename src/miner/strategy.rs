// src/miner/strategy.rs
use crate::types::ProofOfWork;
use crate::utils::error::MinerError;
use async_trait::async_trait;

/// Common interface for mining strategies
///
/// A strategy owns how proofs are searched for and how rounds are driven.
/// [`crate::miner::MiningLoop`] is the random-search implementation.
#[async_trait]
pub trait MiningStrategy: Send + Sync {
    /// Searches for a proof meeting `challenge_size` leading zero bits
    ///
    /// # Returns
    /// `None` when the search was cancelled before a proof was found
    async fn generate_proof_of_work(&self, challenge_size: u32) -> Option<ProofOfWork>;

    /// Registers and mines until cancelled
    ///
    /// # Errors
    /// Only startup failures are returned; round-level failures are handled
    /// inside the strategy.
    async fn start(&mut self) -> Result<(), MinerError>;
}
