// src/utils/logging.rs
//! Logging configuration
//!
//! Uses `env_logger` with a compact single-line format. `RUST_LOG`, when set,
//! always wins over the built-in defaults.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes logging for the mining loop
///
/// Default level is Info, or Debug when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_with_default(level);
}

/// Initializes logging for local benchmarks (Debug by default)
pub fn init_bench_logging() {
    init_with_default(LevelFilter::Debug);
}

fn init_with_default(level: LevelFilter) {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(level);
    } else {
        builder.parse_env("RUST_LOG");
    }

    // A logger may already be installed (tests, embedding); keep it.
    let _ = builder.try_init();
}

/// Base builder: `[ts LEVEL module:line] message` on stdout
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}
