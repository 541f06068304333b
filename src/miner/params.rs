// src/miner/params.rs
//! Mining parameter sharing and background refresh
//!
//! The live [`MiningParameters`] sit behind an `ArcSwap`: the mining loop
//! takes a snapshot at the start of every search and the refresh task swaps
//! in a whole new value, so readers never wait on a lock and never see a
//! half-written value.

use crate::network::CoordinatorClient;
use crate::types::{MinerIdentity, MiningParameters};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Minimum time between two parameter fetches
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Live mining parameters, cheap to clone and share
#[derive(Clone)]
pub struct SharedParams {
    current: Arc<ArcSwap<MiningParameters>>,
}

impl SharedParams {
    /// Wraps the initial parameters
    pub fn new(params: MiningParameters) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(params)),
        }
    }

    /// Snapshot of the live parameters
    pub fn load(&self) -> Arc<MiningParameters> {
        self.current.load_full()
    }

    /// Live difficulty in bits
    pub fn challenge_size(&self) -> u32 {
        self.current.load().round_block_challenge_size
    }

    /// Replaces the live parameters, returning the previous value
    pub fn replace(&self, params: MiningParameters) -> Arc<MiningParameters> {
        self.current.swap(Arc::new(params))
    }
}

/// Clears the in-flight flag even if the refresh task panics
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Periodically re-fetches mining parameters without blocking the caller
pub struct ParamsRefresher {
    client: Arc<dyn CoordinatorClient>,
    identity: Arc<MinerIdentity>,
    params: SharedParams,
    interval: Duration,
    /// Reference point for `last_refresh_ms`
    epoch: Instant,
    /// Milliseconds after `epoch` of the last refresh attempt
    last_refresh_ms: Arc<AtomicU64>,
    in_flight: Arc<AtomicBool>,
}

impl ParamsRefresher {
    /// Creates a refresher; the clock starts now, at registration time
    pub fn new(
        client: Arc<dyn CoordinatorClient>,
        identity: Arc<MinerIdentity>,
        params: SharedParams,
    ) -> Self {
        Self {
            client,
            identity,
            params,
            interval: REFRESH_INTERVAL,
            epoch: Instant::now(),
            last_refresh_ms: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overrides the refresh interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Parameters this refresher writes into
    pub fn params(&self) -> &SharedParams {
        &self.params
    }

    /// Whether the interval has elapsed since the last refresh
    pub fn is_due(&self) -> bool {
        let last = Duration::from_millis(self.last_refresh_ms.load(Ordering::SeqCst));
        self.epoch.elapsed().saturating_sub(last) >= self.interval
    }

    /// Dispatches a parameter fetch if one is due and none is running
    ///
    /// Returns immediately. The fetch runs as a detached task that swaps the
    /// new parameters in on success; on failure the current parameters stay
    /// live and the next attempt happens one interval later.
    pub fn maybe_refresh(&self) -> Option<JoinHandle<()>> {
        if !self.is_due() || self.in_flight.swap(true, Ordering::SeqCst) {
            return None;
        }
        let guard = InFlight(self.in_flight.clone());
        stamp(&self.last_refresh_ms, self.epoch);

        let client = self.client.clone();
        let identity = self.identity.clone();
        let params = self.params.clone();
        let last_refresh_ms = self.last_refresh_ms.clone();
        let epoch = self.epoch;

        Some(tokio::spawn(async move {
            let _guard = guard;
            match client.get_mining_params(&identity).await {
                Ok(fresh) => {
                    let previous = params.replace(fresh);
                    stamp(&last_refresh_ms, epoch);
                    if previous.round_block_challenge_size != fresh.round_block_challenge_size {
                        log::info!(
                            "Difficulty changed from {} to {} bits",
                            previous.round_block_challenge_size,
                            fresh.round_block_challenge_size
                        );
                    } else {
                        log::debug!("Mining parameters refreshed, unchanged");
                    }
                }
                Err(e) => log::warn!("Parameter refresh failed, keeping current: {}", e),
            }
        }))
    }
}

fn stamp(last_refresh_ms: &AtomicU64, epoch: Instant) {
    let now = u64::try_from(epoch.elapsed().as_millis()).unwrap_or(u64::MAX);
    last_refresh_ms.store(now, Ordering::SeqCst);
}
