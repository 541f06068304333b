// src/utils/error.rs
use std::io;
use thiserror::Error;

/// Main error type for the mining application
///
/// Only configuration, identity validation and registration failures are
/// fatal. Everything raised while mining is absorbed by the component that
/// owns the failing call and logged locally.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Initial registration with the coordination service failed
    #[error("Registration failed: {0}")]
    RegistrationError(String),

    /// The chain progress snapshot held no blocks to choose from
    #[error("No candidate blocks in chain progress snapshot")]
    NoCandidateBlocks,

    /// The remote service answered a call with an error
    #[error("RPC error ({code}): {message}")]
    RpcError {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the service
        message: String,
    },

    /// Errors in protocol handling or invalid protocol messages
    #[error("Protocol violation: {0}")]
    ProtocolError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),
}

/// Converts TOML parse errors into MinerError
impl From<toml::de::Error> for MinerError {
    fn from(e: toml::de::Error) -> Self {
        MinerError::ConfigError(format!("Invalid config format: {}", e))
    }
}

impl MinerError {
    /// Whether the mining loop may carry on after this error
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            MinerError::RegistrationError(_)
                | MinerError::ConfigError(_)
                | MinerError::InputError(_)
        )
    }
}
