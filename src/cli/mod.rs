// src/cli/mod.rs
//! Command-line interface

/// Argument and subcommand definitions
pub mod commands;

pub use commands::{Action, BenchmarkOptions, Commands, ConfigOptions, StartOptions};
