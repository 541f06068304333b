// src/network/mod.rs
//! Communication with the coordination service
//!
//! - `CoordinatorClient`: the five calls the mining loop depends on
//! - `HttpCoordinatorClient`: JSON-RPC over HTTP implementation

/// Coordination service call contract
pub mod client;

/// HTTP transport
pub mod http;

pub use client::CoordinatorClient;
pub use http::HttpCoordinatorClient;

#[cfg(test)]
pub(crate) mod mock;
