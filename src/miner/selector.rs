// src/miner/selector.rs
//! Block selection
//!
//! Picks, from a chain progress snapshot, the block this miner should work on
//! next. Ties always go to the record that comes first in the snapshot.

use crate::types::{BlockProgress, SelectionMetric};
use crate::utils::error::MinerError;

/// Selects the block with the lowest score under `metric`
///
/// * `Deficit` scores a block by `leader progress - own progress`.
/// * `LeastProgress` scores a block by own progress alone.
///
/// A miner missing from a record counts as having zero progress on it.
///
/// # Errors
/// Returns `MinerError::NoCandidateBlocks` for an empty snapshot.
pub fn select_block<'a>(
    snapshot: &'a [BlockProgress],
    miner_id: &str,
    metric: SelectionMetric,
) -> Result<&'a BlockProgress, MinerError> {
    let score = |record: &BlockProgress| match metric {
        SelectionMetric::Deficit => record.deficit(miner_id),
        SelectionMetric::LeastProgress => record.progress_of(miner_id),
    };

    let mut best: Option<(&BlockProgress, u64)> = None;
    for record in snapshot {
        let s = score(record);
        // strict comparison keeps the first record on ties
        if best.is_none_or(|(_, best_score)| s < best_score) {
            best = Some((record, s));
        }
    }

    best.map(|(record, _)| record)
        .ok_or(MinerError::NoCandidateBlocks)
}
