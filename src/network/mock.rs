// src/network/mock.rs
//! In-memory coordination service used by unit tests

use crate::network::client::CoordinatorClient;
use crate::types::{BlockProgress, LogEntry, MinerIdentity, MiningParameters, ProgressUpdate};
use crate::utils::error::MinerError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Records every write and serves scripted reads
#[derive(Default)]
pub(crate) struct MockClient {
    pub params: Mutex<MiningParameters>,
    pub snapshot: Mutex<Vec<BlockProgress>>,
    pub fail_params: AtomicBool,
    pub fail_writes: AtomicBool,
    pub params_calls: AtomicUsize,
    pub logs: Mutex<Vec<LogEntry>>,
    pub progress: Mutex<Vec<ProgressUpdate>>,
}

impl MockClient {
    pub fn with_challenge(bits: u32) -> Self {
        let client = Self::default();
        client.set_challenge(bits);
        client
    }

    pub fn set_challenge(&self, bits: u32) {
        *self.params.lock().unwrap() = MiningParameters {
            round_block_challenge_size: bits,
        };
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<ProgressUpdate> {
        self.progress.lock().unwrap().clone()
    }
}

#[async_trait]
impl CoordinatorClient for MockClient {
    async fn register(&self, _identity: &MinerIdentity) -> Result<MiningParameters, MinerError> {
        Ok(*self.params.lock().unwrap())
    }

    async fn get_mining_params(
        &self,
        _identity: &MinerIdentity,
    ) -> Result<MiningParameters, MinerError> {
        self.params_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_params.load(Ordering::SeqCst) {
            return Err(MinerError::ProtocolError("params unavailable".into()));
        }
        Ok(*self.params.lock().unwrap())
    }

    async fn get_chain_progress(&self) -> Result<Vec<BlockProgress>, MinerError> {
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn put_chain_progress(&self, update: &ProgressUpdate) -> Result<(), MinerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MinerError::ProtocolError("write rejected".into()));
        }
        self.progress.lock().unwrap().push(update.clone());
        Ok(())
    }

    async fn write_log(&self, entry: &LogEntry) -> Result<(), MinerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MinerError::ProtocolError("write rejected".into()));
        }
        self.logs.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
