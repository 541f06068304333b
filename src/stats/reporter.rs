// src/stats/reporter.rs
use crate::network::CoordinatorClient;
use crate::types::{
    BlockId, BlockProgress, LogEntry, MinerIdentity, ProgressUpdate, ProofOfWork, Severity,
    UpdateTag,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;

/// Counters of what the reporter has sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Mining updates dispatched
    pub rounds_reported: u64,
    /// Block-switch updates dispatched
    pub block_switches: u64,
    /// Remote calls that failed
    pub failed_calls: u64,
}

/// Atomic version of ReportStats shared with the report tasks
#[derive(Default)]
struct ReportStatsAtomic {
    rounds: AtomicU64,
    switches: AtomicU64,
    failed: AtomicU64,
}

/// Fire-and-forget notifications to the coordination service
///
/// Every notification runs as a detached task. Failures are logged locally
/// and counted, never returned to the mining loop.
#[derive(Clone)]
pub struct UpdateReporter {
    client: Arc<dyn CoordinatorClient>,
    identity: Arc<MinerIdentity>,
    stats: Arc<ReportStatsAtomic>,
}

impl UpdateReporter {
    /// Creates a reporter posting on behalf of `identity`
    pub fn new(client: Arc<dyn CoordinatorClient>, identity: Arc<MinerIdentity>) -> Self {
        Self {
            client,
            identity,
            stats: Arc::new(ReportStatsAtomic::default()),
        }
    }

    /// Reports a mined round on `block`
    ///
    /// Sends a `MiningUpdate` log entry and bumps this miner's progress on
    /// the block to one more than the snapshot recorded.
    pub fn post_mining_update(&self, block: &BlockProgress, pow: &ProofOfWork) -> JoinHandle<()> {
        self.stats.rounds.fetch_add(1, Ordering::Relaxed);

        let encoded = pow.encode();
        let timestamp = now_millis();
        let elapsed_ms = pow.elapsed.as_millis();

        let entry = LogEntry {
            log_level: Severity::Info.into(),
            message: format!("Round block mined in {} ms.", elapsed_ms),
            token: encoded.clone(),
            miner_id: self.identity.miner_id.clone(),
            tag: UpdateTag::MiningUpdate,
            timestamp,
        };
        let update = ProgressUpdate {
            block_index: block.block_index,
            block_ordinal: block.block_ordinal,
            miner_id: self.identity.miner_id.clone(),
            pow: encoded,
            block_progress: block.progress_of(&self.identity.miner_id) + 1,
            time_at_progress: timestamp,
        };

        log::info!(
            "Mined round on block {} in {} ms ({} attempts)",
            block.id(),
            elapsed_ms,
            pow.attempts
        );
        log::debug!("Proof {} for block {}", hex::encode(pow.candidate), block.id());

        let client = self.client.clone();
        let stats = self.stats.clone();
        tokio::spawn(async move {
            // the two calls are independent; neither waits on the other
            let (logged, stored) = tokio::join!(
                client.write_log(&entry),
                client.put_chain_progress(&update)
            );
            if let Err(e) = logged {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to post mining update log: {}", e);
            }
            if let Err(e) = stored {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to post chain progress for {}: {}", update.block_index, e);
            }
        })
    }

    /// Reports that the miner moved from `old` to `new`
    pub fn post_block_switch(&self, old: Option<BlockId>, new: BlockId) -> JoinHandle<()> {
        self.stats.switches.fetch_add(1, Ordering::Relaxed);

        let message = block_switch_message(old, new);
        log::info!("{}", message);

        let entry = LogEntry {
            log_level: Severity::Info.into(),
            message,
            token: String::new(),
            miner_id: self.identity.miner_id.clone(),
            tag: UpdateTag::TacticalUpdate,
            timestamp: now_millis(),
        };

        let client = self.client.clone();
        let stats = self.stats.clone();
        tokio::spawn(async move {
            if let Err(e) = client.write_log(&entry).await {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to post block switch: {}", e);
            }
        })
    }

    /// Snapshot of the report counters
    pub fn stats(&self) -> ReportStats {
        ReportStats {
            rounds_reported: self.stats.rounds.load(Ordering::Relaxed),
            block_switches: self.stats.switches.load(Ordering::Relaxed),
            failed_calls: self.stats.failed.load(Ordering::Relaxed),
        }
    }
}

/// Human-readable block switch, `none` standing in for a missing block
pub fn block_switch_message(old: Option<BlockId>, new: BlockId) -> String {
    let old_index = old.map_or_else(|| "none".to_string(), |id| id.index.to_string());
    let old_ordinal = old.map_or_else(|| "none".to_string(), |id| id.ordinal.to_string());
    format!(
        "Switching to a different block{{ index {}->{}, ordinal {}->{}}}.",
        old_index, new.index, old_ordinal, new.ordinal
    )
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::MockClient;
    use crate::types::CANDIDATE_LEN;
    use std::time::Duration;

    fn reporter(client: Arc<MockClient>) -> UpdateReporter {
        UpdateReporter::new(client, Arc::new(MinerIdentity::new("m1", 1.0).unwrap()))
    }

    fn pow() -> ProofOfWork {
        ProofOfWork {
            candidate: [7u8; CANDIDATE_LEN],
            elapsed: Duration::from_millis(1234),
            attempts: 3,
        }
    }

    #[test]
    fn test_switch_message_from_nothing() {
        let msg = block_switch_message(None, BlockId { index: 4, ordinal: 1 });
        assert_eq!(
            msg,
            "Switching to a different block{ index none->4, ordinal none->1}."
        );
    }

    #[test]
    fn test_switch_message_between_blocks() {
        let msg = block_switch_message(
            Some(BlockId { index: 3, ordinal: 0 }),
            BlockId { index: 4, ordinal: 2 },
        );
        assert_eq!(msg, "Switching to a different block{ index 3->4, ordinal 0->2}.");
    }

    #[tokio::test]
    async fn test_mining_update_increments_progress() {
        let client = Arc::new(MockClient::default());
        let reporter = reporter(client.clone());
        let block = BlockProgress {
            block_index: 9,
            block_ordinal: 2,
            miner_round_block_progress: [("m1".to_string(), 4), ("m2".to_string(), 6)]
                .into_iter()
                .collect(),
        };

        reporter.post_mining_update(&block, &pow()).await.unwrap();

        let progress = client.progress();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].block_index, 9);
        assert_eq!(progress[0].block_ordinal, 2);
        assert_eq!(progress[0].block_progress, 5);
        assert_eq!(progress[0].pow, pow().encode());

        let logs = client.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].tag, UpdateTag::MiningUpdate);
        assert_eq!(logs[0].log_level, 2);
        assert_eq!(logs[0].message, "Round block mined in 1234 ms.");
        assert_eq!(logs[0].token, pow().encode());
        assert_eq!(logs[0].miner_id, "m1");
    }

    #[tokio::test]
    async fn test_absent_progress_starts_at_one() {
        let client = Arc::new(MockClient::default());
        let reporter = reporter(client.clone());

        reporter
            .post_mining_update(&BlockProgress::default(), &pow())
            .await
            .unwrap();

        assert_eq!(client.progress()[0].block_progress, 1);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed_and_counted() {
        let client = Arc::new(MockClient::default());
        client
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let reporter = reporter(client.clone());

        reporter
            .post_mining_update(&BlockProgress::default(), &pow())
            .await
            .unwrap();
        reporter
            .post_block_switch(None, BlockId { index: 1, ordinal: 0 })
            .await
            .unwrap();

        assert_eq!(
            reporter.stats(),
            ReportStats {
                rounds_reported: 1,
                block_switches: 1,
                failed_calls: 3,
            }
        );
    }
}
