//! In-memory coordination service for driving the mining loop end to end

use async_trait::async_trait;
use blocksim_miner::miner::pow::{DIGEST_LEN, PowHasher};
use blocksim_miner::types::{LogEntry, ProgressUpdate};
use blocksim_miner::{
    BlockProgress, CoordinatorClient, MinerError, MinerIdentity, MiningParameters,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Scripted service: snapshots are served in order (the last one repeats)
/// and the token is cancelled once a configured number of rounds is
/// reached. With `stall_calls` set, parameter fetches and report writes
/// never complete.
pub struct SimService {
    pub register_params: Option<MiningParameters>,
    pub refreshed_params: Mutex<MiningParameters>,
    pub snapshots: Mutex<VecDeque<Vec<BlockProgress>>>,
    pub fail_chain_progress: Mutex<VecDeque<bool>>,
    pub chain_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub params_calls: AtomicUsize,
    pub cancel: CancellationToken,
    pub cancel_after_puts: Option<usize>,
    pub cancel_on_chain_call: Option<usize>,
    pub stall_calls: bool,
    pub logs: Mutex<Vec<LogEntry>>,
    pub progress: Mutex<Vec<ProgressUpdate>>,
}

impl SimService {
    pub fn new(challenge_size: u32, cancel: CancellationToken) -> Self {
        let params = MiningParameters {
            round_block_challenge_size: challenge_size,
        };
        Self {
            register_params: Some(params),
            refreshed_params: Mutex::new(params),
            snapshots: Mutex::new(VecDeque::new()),
            fail_chain_progress: Mutex::new(VecDeque::new()),
            chain_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            params_calls: AtomicUsize::new(0),
            cancel,
            cancel_after_puts: None,
            cancel_on_chain_call: None,
            stall_calls: false,
            logs: Mutex::new(Vec::new()),
            progress: Mutex::new(Vec::new()),
        }
    }

    pub fn with_snapshots(self, snapshots: Vec<Vec<BlockProgress>>) -> Self {
        *self.snapshots.lock().unwrap() = snapshots.into();
        self
    }

    pub fn logs_tagged(&self, tag: &str) -> Vec<LogEntry> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.tag.to_string() == tag)
            .cloned()
            .collect()
    }

    pub fn progress(&self) -> Vec<ProgressUpdate> {
        self.progress.lock().unwrap().clone()
    }

    async fn stall_if_configured(&self) {
        if self.stall_calls {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl CoordinatorClient for SimService {
    async fn register(&self, _identity: &MinerIdentity) -> Result<MiningParameters, MinerError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_params
            .ok_or_else(|| MinerError::ProtocolError("registration refused".into()))
    }

    async fn get_mining_params(
        &self,
        _identity: &MinerIdentity,
    ) -> Result<MiningParameters, MinerError> {
        self.params_calls.fetch_add(1, Ordering::SeqCst);
        self.stall_if_configured().await;
        tokio::task::yield_now().await;
        Ok(*self.refreshed_params.lock().unwrap())
    }

    async fn get_chain_progress(&self) -> Result<Vec<BlockProgress>, MinerError> {
        let call = self.chain_calls.fetch_add(1, Ordering::SeqCst) + 1;
        // a real service always yields here
        tokio::task::yield_now().await;

        if Some(call) == self.cancel_on_chain_call {
            self.cancel.cancel();
            return Err(MinerError::ProtocolError("service going away".into()));
        }
        if self.fail_chain_progress.lock().unwrap().pop_front() == Some(true) {
            return Err(MinerError::ProtocolError("snapshot unavailable".into()));
        }

        let mut snapshots = self.snapshots.lock().unwrap();
        let snapshot = if snapshots.len() > 1 {
            snapshots.pop_front().unwrap_or_default()
        } else {
            snapshots.front().cloned().unwrap_or_default()
        };
        Ok(snapshot)
    }

    async fn put_chain_progress(&self, update: &ProgressUpdate) -> Result<(), MinerError> {
        self.stall_if_configured().await;
        let puts = {
            let mut progress = self.progress.lock().unwrap();
            progress.push(update.clone());
            progress.len()
        };
        if Some(puts) == self.cancel_after_puts {
            self.cancel.cancel();
        }
        Ok(())
    }

    async fn write_log(&self, entry: &LogEntry) -> Result<(), MinerError> {
        self.stall_if_configured().await;
        self.logs.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Misses every attempt except the one numbered `success_at`
pub struct ScriptedHasher {
    pub calls: AtomicUsize,
    pub success_at: usize,
}

impl ScriptedHasher {
    pub fn succeeding_at(success_at: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            success_at,
        }
    }
}

impl PowHasher for ScriptedHasher {
    fn digest(&self, _data: &[u8]) -> [u8; DIGEST_LEN] {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.success_at {
            [0u8; DIGEST_LEN]
        } else {
            [0xFFu8; DIGEST_LEN]
        }
    }
}

pub fn block(index: i64, ordinal: i64, progress: &[(&str, u64)]) -> BlockProgress {
    BlockProgress {
        block_index: index,
        block_ordinal: ordinal,
        miner_round_block_progress: progress
            .iter()
            .map(|(id, p)| (id.to_string(), *p))
            .collect(),
    }
}
