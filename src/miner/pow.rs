// src/miner/pow.rs
//! Proof-of-work engine
//!
//! Searches for a random 16-byte candidate whose SHA-256 digest starts with a
//! required number of zero bits. Attempts are paced by the miner's hash power:
//! after every miss the engine waits `100ms / hash_power` before trying again,
//! and that wait is where cancellation is observed.

use crate::types::{CANDIDATE_LEN, ProofOfWork};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Pacing constant in milliseconds for a hash power of 1.0
pub const PACING_CONSTANT_MS: f64 = 100.0;

/// Length of a digest produced by a [`PowHasher`]
pub const DIGEST_LEN: usize = 32;

/// Wait between two failed attempts for the given hash-power factor
///
/// `hash_power` must be positive; [`crate::types::MinerIdentity`] guarantees it.
pub fn pacing_interval(hash_power: f64) -> Duration {
    Duration::from_nanos((PACING_CONSTANT_MS * 1_000_000.0 / hash_power).round() as u64)
}

/// Checks that the first `challenge_size` bits of `hash` are zero
///
/// A challenge longer than the hash itself can never be met.
pub fn meets_difficulty(hash: &[u8], challenge_size: u32) -> bool {
    let full_zero_bytes = (challenge_size / 8) as usize;
    let partial_bits = challenge_size % 8;

    let needed = full_zero_bytes + usize::from(partial_bits != 0);
    if hash.len() < needed {
        return false;
    }

    if hash[..full_zero_bytes].iter().any(|&b| b != 0x00) {
        return false;
    }

    if partial_bits == 0 {
        return true;
    }

    let mask = 0xFFu8 << (8 - partial_bits);
    hash[full_zero_bytes] & mask == 0
}

/// Hash function applied to candidates
pub trait PowHasher: Send + Sync {
    /// Digest of `data`
    fn digest(&self, data: &[u8]) -> [u8; DIGEST_LEN];
}

/// SHA-256, the hash the coordination service verifies against
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PowHasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        Sha256::digest(data).into()
    }
}

/// Producer of fresh candidates
pub trait CandidateSource: Send + Sync {
    /// Next candidate to try
    fn next_candidate(&self) -> [u8; CANDIDATE_LEN];
}

/// Uniformly random candidates from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCandidates;

impl CandidateSource for RandomCandidates {
    fn next_candidate(&self) -> [u8; CANDIDATE_LEN] {
        rand::random()
    }
}

/// Paced random search for a proof of work
#[derive(Clone)]
pub struct ProofOfWorkEngine {
    hasher: Arc<dyn PowHasher>,
    candidates: Arc<dyn CandidateSource>,
    pacing: Duration,
}

impl ProofOfWorkEngine {
    /// Creates an engine using SHA-256 and random candidates
    ///
    /// # Arguments
    /// * `hash_power` - Miner hash-power factor, sets the retry pacing
    pub fn new(hash_power: f64) -> Self {
        Self {
            hasher: Arc::new(Sha256Hasher),
            candidates: Arc::new(RandomCandidates),
            pacing: pacing_interval(hash_power),
        }
    }

    /// Replaces the hash function
    pub fn with_hasher(mut self, hasher: Arc<dyn PowHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Replaces the candidate source
    pub fn with_candidates(mut self, candidates: Arc<dyn CandidateSource>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Wait applied after each failed attempt
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Whether `candidate` is a valid proof for `challenge_size`
    pub fn check(&self, candidate: &[u8], challenge_size: u32) -> bool {
        meets_difficulty(&self.hasher.digest(candidate), challenge_size)
    }

    /// Searches until a candidate meets `challenge_size` or `cancel` fires
    ///
    /// The difficulty is fixed for the duration of one search; callers pass
    /// the live value at the start of every search.
    ///
    /// # Returns
    /// * `Some(ProofOfWork)` - The accepted candidate with search time and attempt count
    /// * `None` - The search was cancelled
    pub async fn search(
        &self,
        challenge_size: u32,
        cancel: &CancellationToken,
    ) -> Option<ProofOfWork> {
        let started = Instant::now();
        let mut attempts = 0u64;

        loop {
            if cancel.is_cancelled() {
                return None;
            }

            let candidate = self.candidates.next_candidate();
            attempts += 1;

            if self.check(&candidate, challenge_size) {
                return Some(ProofOfWork {
                    candidate,
                    elapsed: started.elapsed(),
                    attempts,
                });
            }
            log::trace!("Attempt {} missed {}-bit challenge", attempts, challenge_size);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                _ = tokio::time::sleep(self.pacing) => {}
            }
        }
    }
}
