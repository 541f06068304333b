//! Reporting of mining progress
//!
//! [`UpdateReporter`] sends mining and block-switch updates to the
//! coordination service without ever blocking the mining loop, and keeps
//! local counters of what it sent.

/// Fire-and-forget update reporter
pub mod reporter;

pub use reporter::{ReportStats, UpdateReporter};
