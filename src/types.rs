// src/types.rs
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::utils::error::MinerError;

/// Upper bound accepted for a miner's hash-power factor
pub const MAX_HASH_POWER: f64 = 10.0;

/// Identity of this mining node, fixed for the lifetime of the process
///
/// Serialized as the `MinerInfo` payload of the register and
/// parameter-lookup calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerIdentity {
    /// Unique miner name (no whitespace)
    pub miner_id: String,
    /// Relative mining speed
    pub hash_power: f64,
}

impl MinerIdentity {
    /// Builds a validated identity
    ///
    /// # Errors
    /// Returns `MinerError::InputError` if the name is empty or contains
    /// whitespace, or if the hash power is not a finite value in `(0, 10]`.
    pub fn new(name: impl Into<String>, hash_power: f64) -> Result<Self, MinerError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(MinerError::InputError(format!(
                "Miner name must be non-empty and contain no whitespace: {:?}",
                name
            )));
        }
        if !hash_power.is_finite() || hash_power <= 0.0 || hash_power > MAX_HASH_POWER {
            return Err(MinerError::InputError(format!(
                "Hash power factor must be in (0, {}], got {}",
                MAX_HASH_POWER, hash_power
            )));
        }

        Ok(Self {
            miner_id: name,
            hash_power,
        })
    }
}

/// Parameters handed out by the coordination service
///
/// Always replaced as a whole value, never mutated field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningParameters {
    /// Number of leading zero bits a valid proof's hash must have
    pub round_block_challenge_size: u32,
}

/// Unique key of a block: index plus ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Block index in the chain
    pub index: i64,
    /// Ordinal among blocks sharing the index
    pub ordinal: i64,
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.ordinal)
    }
}

/// Per-block record of a chain progress snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProgress {
    /// Block index in the chain
    pub block_index: i64,
    /// Ordinal among blocks sharing the index
    pub block_ordinal: i64,
    /// Progress count per miner id for the current round
    #[serde(default)]
    pub miner_round_block_progress: HashMap<String, u64>,
}

impl BlockProgress {
    /// Identity key of this record
    pub fn id(&self) -> BlockId {
        BlockId {
            index: self.block_index,
            ordinal: self.block_ordinal,
        }
    }

    /// Progress recorded for `miner_id`, zero when absent
    pub fn progress_of(&self, miner_id: &str) -> u64 {
        self.miner_round_block_progress
            .get(miner_id)
            .copied()
            .unwrap_or(0)
    }

    /// Highest progress recorded by any miner, zero when nobody has progressed
    pub fn leader_progress(&self) -> u64 {
        self.miner_round_block_progress
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// How far `miner_id` trails the leader on this block
    pub fn deficit(&self, miner_id: &str) -> u64 {
        self.leader_progress()
            .saturating_sub(self.progress_of(miner_id))
    }
}

/// Size in bytes of a proof-of-work candidate
pub const CANDIDATE_LEN: usize = 16;

/// A found proof of work together with the time spent searching for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOfWork {
    /// Candidate bytes whose SHA-256 meets the difficulty
    pub candidate: [u8; CANDIDATE_LEN],
    /// Wall-clock search time
    pub elapsed: Duration,
    /// Number of candidates hashed, the accepted one included
    pub attempts: u64,
}

impl ProofOfWork {
    /// Base64 form sent to the coordination service
    pub fn encode(&self) -> String {
        STANDARD.encode(self.candidate)
    }
}

/// Metric used to pick the block to mine on
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMetric {
    /// Smallest gap between the network leader and this miner
    #[default]
    #[clap(name = "deficit")]
    Deficit,

    /// Smallest absolute progress of this miner
    #[clap(name = "least-progress")]
    LeastProgress,
}

impl fmt::Display for SelectionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMetric::Deficit => write!(f, "deficit"),
            SelectionMetric::LeastProgress => write!(f, "least-progress"),
        }
    }
}

/// Severity of a remote log entry, sent as its integer value
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Severity {
    /// Very verbose diagnostics
    Trace = 0,
    /// Diagnostics
    Debug = 1,
    /// Normal operation
    Info = 2,
    /// Something unexpected but recoverable
    Warning = 3,
    /// Operation failed
    Error = 4,
}

impl From<Severity> for i32 {
    fn from(severity: Severity) -> Self {
        severity as i32
    }
}

/// Classification tag carried by remote log entries
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateTag {
    /// A round of proof of work was completed
    MiningUpdate,
    /// The miner changed the block it works on
    TacticalUpdate,
}

impl fmt::Display for UpdateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateTag::MiningUpdate => write!(f, "MiningUpdate"),
            UpdateTag::TacticalUpdate => write!(f, "TacticalUpdate"),
        }
    }
}

/// Payload of the `WriteLog` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Integer severity, see [`Severity`]
    pub log_level: i32,
    /// Free-text message
    pub message: String,
    /// Optional opaque token (the encoded proof for mining updates)
    #[serde(default)]
    pub token: String,
    /// Reporting miner
    pub miner_id: String,
    /// Classification tag
    pub tag: UpdateTag,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

/// Payload of the `PutChainProgress` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Block index in the chain
    pub block_index: i64,
    /// Ordinal among blocks sharing the index
    pub block_ordinal: i64,
    /// Reporting miner
    pub miner_id: String,
    /// Encoded proof of work
    pub pow: String,
    /// New progress count of this miner on the block
    pub block_progress: u64,
    /// Unix timestamp in milliseconds
    pub time_at_progress: i64,
}
