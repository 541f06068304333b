// src/main.rs
use blocksim_miner::utils::logging::init_bench_logging;
use blocksim_miner::*;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

/// Main entry point for the miner
///
/// Any error returned here (bad configuration, invalid identity, failed
/// registration) ends the process with a non-zero exit code.
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Start(opts) => start_mining(opts),
        cli::Action::Benchmark(opts) => run_benchmark(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Registers with the coordination service and mines until Ctrl-C
fn start_mining(opts: cli::StartOptions) -> Result<(), MinerError> {
    utils::init_logging(opts.verbose);

    let mut config = config::load_or_default(&opts.config)?;
    if let Some(selection) = opts.selection {
        config.selection = selection;
    }

    let identity = MinerIdentity::new(opts.name, opts.hash_power_factor)?;
    let client = Arc::new(HttpCoordinatorClient::new(
        &config.service_url,
        config.request_timeout(),
    )?);

    let rt = Runtime::new()?;
    rt.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => log::info!("Interrupt received, stopping"),
                Err(e) => log::error!("Failed to listen for interrupt: {}", e),
            }
            on_signal.cancel();
        });

        log::info!(
            "Starting miner {} against {} (selection: {})",
            identity.miner_id,
            config.service_url,
            config.selection
        );

        let mut miner = MiningLoop::new(identity, client, cancel).with_selection(config.selection);
        miner.start().await
    })
}

/// Finds `rounds` proofs locally and logs how long each took
fn run_benchmark(opts: cli::BenchmarkOptions) -> Result<(), MinerError> {
    init_bench_logging();

    // validates the factor the same way the mining loop does
    let identity = MinerIdentity::new("benchmark", opts.hash_power_factor)?;
    let engine = ProofOfWorkEngine::new(identity.hash_power);

    log::info!(
        "Benchmarking {} rounds at {} bits, pacing {:?}",
        opts.rounds,
        opts.challenge_size,
        engine.pacing()
    );

    let rt = Runtime::new()?;
    let (total, attempts) = rt.block_on(async {
        let cancel = CancellationToken::new();
        let mut total = Duration::ZERO;
        let mut attempts = 0u64;
        for round in 1..=opts.rounds {
            let Some(pow) = engine.search(opts.challenge_size, &cancel).await else {
                break;
            };
            log::debug!(
                "Round {}: {} ms, {} attempts",
                round,
                pow.elapsed.as_millis(),
                pow.attempts
            );
            total += pow.elapsed;
            attempts += pow.attempts;
        }
        (total, attempts)
    });

    let rounds = opts.rounds.max(1);
    log::info!("Benchmark results:");
    log::info!("Total attempts: {}", attempts);
    log::info!("Average search time: {} ms", (total / rounds).as_millis());
    log::info!(
        "Average attempts per proof: {:.1} (expected {:.1})",
        attempts as f64 / f64::from(rounds),
        2f64.powi(opts.challenge_size as i32)
    );
    log::logger().flush();

    Ok(())
}

/// Writes a configuration template file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    let config = config::generate_template();
    std::fs::write(opts.output, config)?;
    Ok(())
}
