// src/cli/commands.rs
use crate::types::SelectionMetric;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blocksim Miner CLI - proof-of-work participant for a simulated blockchain
#[derive(Parser, Debug)]
#[command(name = "blocksim-miner")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (start mining, run a local benchmark, or generate config)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the miner application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Register with the coordination service and mine until interrupted
    Start(StartOptions),

    /// Time proof-of-work searches locally, without a service
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for starting the mining loop
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// The name of the miner (a string without spaces)
    #[arg(long)]
    pub name: String,

    /// Hash power of the miner, in (0, 10]
    #[arg(short = 'f', long)]
    pub hash_power_factor: f64,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Block selection metric (overrides config)
    #[arg(short, long)]
    pub selection: Option<SelectionMetric>,

    /// Set output to verbose messages
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for running a local proof-of-work benchmark
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Difficulty in leading zero bits
    #[arg(short, long, default_value_t = 8)]
    pub challenge_size: u32,

    /// Hash power factor setting the retry pacing
    #[arg(short = 'f', long, default_value_t = 1.0)]
    pub hash_power_factor: f64,

    /// Number of proofs to find
    #[arg(short, long, default_value_t = 5)]
    pub rounds: u32,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}
