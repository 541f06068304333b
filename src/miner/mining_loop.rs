// src/miner/mining_loop.rs
//! Mining loop
//!
//! Drives one mining identity from registration to cancellation. Each round:
//!
//! 1. kicks off a parameter refresh if one is due (never waits for it)
//! 2. fetches the chain progress snapshot and selects a block
//! 3. posts a block-switch update when the selected block changed
//! 4. searches for a proof of work against the live difficulty
//! 5. posts a mining update (never waits for it)

use crate::miner::params::{ParamsRefresher, REFRESH_INTERVAL, SharedParams};
use crate::miner::pow::ProofOfWorkEngine;
use crate::miner::selector::select_block;
use crate::miner::strategy::MiningStrategy;
use crate::network::CoordinatorClient;
use crate::stats::UpdateReporter;
use crate::types::{BlockProgress, MinerIdentity, ProofOfWork, SelectionMetric};
use crate::utils::error::MinerError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Lifecycle of the mining loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinerState {
    /// Created, registration not attempted or failed
    Unregistered,
    /// Initial parameters received
    Registered,
    /// Running rounds
    Mining,
    /// Stopped by the cancellation token or a fatal error
    Cancelled,
}

impl fmt::Display for MinerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinerState::Unregistered => write!(f, "unregistered"),
            MinerState::Registered => write!(f, "registered"),
            MinerState::Mining => write!(f, "mining"),
            MinerState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of one round
#[derive(Debug)]
pub enum RoundOutcome {
    /// A proof was found and reported
    Mined(ProofOfWork),
    /// Cancellation interrupted the search
    Cancelled,
}

/// Random-search miner driving the select, search and report cycle
pub struct MiningLoop {
    identity: Arc<MinerIdentity>,
    client: Arc<dyn CoordinatorClient>,
    engine: ProofOfWorkEngine,
    reporter: UpdateReporter,
    metric: SelectionMetric,
    refresh_interval: Duration,
    cancel: CancellationToken,
    state: MinerState,
    refresher: Option<ParamsRefresher>,
    preferred: Option<BlockProgress>,
}

impl MiningLoop {
    /// Creates an unregistered loop for `identity`
    ///
    /// # Arguments
    /// * `identity` - Validated miner identity
    /// * `client` - Coordination service client
    /// * `cancel` - Token stopping the loop when cancelled
    pub fn new(
        identity: MinerIdentity,
        client: Arc<dyn CoordinatorClient>,
        cancel: CancellationToken,
    ) -> Self {
        let identity = Arc::new(identity);
        Self {
            engine: ProofOfWorkEngine::new(identity.hash_power),
            reporter: UpdateReporter::new(client.clone(), identity.clone()),
            identity,
            client,
            metric: SelectionMetric::default(),
            refresh_interval: REFRESH_INTERVAL,
            cancel,
            state: MinerState::Unregistered,
            refresher: None,
            preferred: None,
        }
    }

    /// Replaces the proof-of-work engine
    pub fn with_engine(mut self, engine: ProofOfWorkEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the block selection metric
    pub fn with_selection(mut self, metric: SelectionMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Overrides the parameter refresh interval
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> MinerState {
        self.state
    }

    /// Live parameters, available once registered
    pub fn params(&self) -> Option<&SharedParams> {
        self.refresher.as_ref().map(ParamsRefresher::params)
    }

    /// Block the loop is currently working on
    pub fn preferred_block(&self) -> Option<&BlockProgress> {
        self.preferred.as_ref()
    }

    /// Reporter used for updates
    pub fn reporter(&self) -> &UpdateReporter {
        &self.reporter
    }

    fn transition(&mut self, next: MinerState) {
        log::info!(
            "Miner {}: {} -> {}",
            self.identity.miner_id,
            self.state,
            next
        );
        self.state = next;
    }

    /// Registers with the coordination service
    ///
    /// # Errors
    /// Any failure becomes `MinerError::RegistrationError`.
    pub async fn register(&mut self) -> Result<(), MinerError> {
        let params = self
            .client
            .register(&self.identity)
            .await
            .map_err(|e| MinerError::RegistrationError(e.to_string()))?;

        log::info!(
            "Registered as {} (hash power {}), difficulty {} bits",
            self.identity.miner_id,
            self.identity.hash_power,
            params.round_block_challenge_size
        );

        self.refresher = Some(
            ParamsRefresher::new(
                self.client.clone(),
                self.identity.clone(),
                SharedParams::new(params),
            )
            .with_interval(self.refresh_interval),
        );
        self.transition(MinerState::Registered);
        Ok(())
    }

    /// Runs a single select, search and report round
    ///
    /// # Errors
    /// Returns the transient error that made the round skip its search:
    /// a failed or empty snapshot query, or a loop that is not registered.
    pub async fn run_round(&mut self) -> Result<RoundOutcome, MinerError> {
        let Some(refresher) = self.refresher.as_ref() else {
            return Err(MinerError::RegistrationError(
                "mining loop is not registered".into(),
            ));
        };
        refresher.maybe_refresh();
        let params = refresher.params().clone();

        let snapshot = self.client.get_chain_progress().await?;
        let selected = select_block(&snapshot, &self.identity.miner_id, self.metric)?.clone();

        let previous = self.preferred.as_ref().map(BlockProgress::id);
        if previous != Some(selected.id()) {
            self.reporter.post_block_switch(previous, selected.id());
        }
        // fresher progress counts even when the block is the same
        let block = self.preferred.insert(selected);

        let challenge_size = params.challenge_size();
        log::debug!("Searching on block {} at {} bits", block.id(), challenge_size);

        match self.engine.search(challenge_size, &self.cancel).await {
            Some(pow) => {
                self.reporter.post_mining_update(block, &pow);
                Ok(RoundOutcome::Mined(pow))
            }
            None => Ok(RoundOutcome::Cancelled),
        }
    }

    /// Runs rounds until the cancellation token fires
    ///
    /// Transient failures skip the round; a fatal one stops the loop.
    async fn mine(&mut self) -> Result<(), MinerError> {
        self.transition(MinerState::Mining);

        let result = loop {
            if self.cancel.is_cancelled() {
                break Ok(());
            }
            match self.run_round().await {
                Ok(RoundOutcome::Mined(_)) => {}
                Ok(RoundOutcome::Cancelled) => break Ok(()),
                Err(e) if !e.is_transient() => {
                    log::error!("Stopping miner {}: {}", self.identity.miner_id, e);
                    break Err(e);
                }
                Err(e) => {
                    log::warn!("Skipping round: {}", e);
                    // wait one pacing interval so a failing service is not spun on
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => {}
                        _ = tokio::time::sleep(self.engine.pacing()) => {}
                    }
                }
            }
        };

        self.transition(MinerState::Cancelled);
        let stats = self.reporter.stats();
        log::info!(
            "Mined {} rounds, {} block switches, {} failed reports",
            stats.rounds_reported,
            stats.block_switches,
            stats.failed_calls
        );
        result
    }
}

#[async_trait]
impl MiningStrategy for MiningLoop {
    async fn generate_proof_of_work(&self, challenge_size: u32) -> Option<ProofOfWork> {
        self.engine.search(challenge_size, &self.cancel).await
    }

    async fn start(&mut self) -> Result<(), MinerError> {
        self.register().await?;
        self.mine().await
    }
}
