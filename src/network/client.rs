// src/network/client.rs
use crate::types::{BlockProgress, LogEntry, MinerIdentity, MiningParameters, ProgressUpdate};
use crate::utils::error::MinerError;
use async_trait::async_trait;

/// Calls offered by the coordination service
///
/// Implementations own connection setup and transport-level retries; the
/// mining loop treats every call as an opaque remote operation.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    /// Registers the miner and returns its initial parameters
    async fn register(&self, identity: &MinerIdentity) -> Result<MiningParameters, MinerError>;

    /// Fetches the current parameters for the miner
    async fn get_mining_params(
        &self,
        identity: &MinerIdentity,
    ) -> Result<MiningParameters, MinerError>;

    /// Fetches per-block progress of every miner for the current round
    async fn get_chain_progress(&self) -> Result<Vec<BlockProgress>, MinerError>;

    /// Records progress made by this miner on a block
    async fn put_chain_progress(&self, update: &ProgressUpdate) -> Result<(), MinerError>;

    /// Appends an entry to the service log
    async fn write_log(&self, entry: &LogEntry) -> Result<(), MinerError>;
}
