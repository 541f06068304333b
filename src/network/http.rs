// src/network/http.rs
//! JSON-RPC over HTTP client for the coordination service

use crate::network::client::CoordinatorClient;
use crate::types::{
    BlockProgress, LogEntry, MinerIdentity, MiningParameters, ProgressUpdate,
};
use crate::utils::error::MinerError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

/// Client for the coordination service's JSON-RPC endpoint
pub struct HttpCoordinatorClient {
    /// Endpoint receiving every call
    endpoint: Url,
    /// HTTP client for making RPC requests
    client: Client,
    /// Request id counter
    next_id: AtomicU64,
}

impl HttpCoordinatorClient {
    /// Creates a client for `service_url`
    ///
    /// # Errors
    /// Returns `MinerError::UrlError` for a malformed URL and
    /// `MinerError::ConfigError` for a non-HTTP scheme.
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, MinerError> {
        let endpoint = Url::parse(service_url)?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(MinerError::ConfigError(format!(
                "Service URL '{}' must use http or https",
                service_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("blocksim-miner/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Makes an RPC call and decodes its `result`
    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, MinerError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let response: Value = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_response(method, response)
    }
}

/// Extracts the `result` member of a JSON-RPC response
fn decode_response<R: DeserializeOwned>(
    method: &str,
    mut response: Value,
) -> Result<R, MinerError> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        return Err(MinerError::RpcError {
            code: error["code"].as_i64().unwrap_or(0),
            message: error["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let result = response
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| MinerError::ProtocolError(format!("Missing result for {}", method)))?;

    Ok(serde_json::from_value(result)?)
}

#[async_trait]
impl CoordinatorClient for HttpCoordinatorClient {
    async fn register(&self, identity: &MinerIdentity) -> Result<MiningParameters, MinerError> {
        self.call("register", identity).await
    }

    async fn get_mining_params(
        &self,
        identity: &MinerIdentity,
    ) -> Result<MiningParameters, MinerError> {
        self.call("get_mining_params", identity).await
    }

    async fn get_chain_progress(&self) -> Result<Vec<BlockProgress>, MinerError> {
        let progress: Value = self.call("get_chain_progress", &json!({})).await?;
        // Accept both a bare array and the `{ "blockProgress": [...] }` envelope
        let records = match progress {
            Value::Object(mut obj) => obj.remove("blockProgress").unwrap_or(Value::Null),
            other => other,
        };
        if records.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(records)?)
    }

    async fn put_chain_progress(&self, update: &ProgressUpdate) -> Result<(), MinerError> {
        let _: Value = self.call("put_chain_progress", update).await?;
        Ok(())
    }

    async fn write_log(&self, entry: &LogEntry) -> Result<(), MinerError> {
        let _: Value = self.call("write_log", entry).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = HttpCoordinatorClient::new("ws://localhost:5000", Duration::from_secs(1));
        assert!(matches!(err, Err(MinerError::ConfigError(_))));
        assert!(matches!(
            HttpCoordinatorClient::new("not a url", Duration::from_secs(1)),
            Err(MinerError::UrlError(_))
        ));
    }

    #[test]
    fn test_decode_result() {
        let params: MiningParameters = decode_response(
            "register",
            json!({"jsonrpc": "2.0", "id": 1, "result": {"roundBlockChallengeSize": 12}}),
        )
        .unwrap();
        assert_eq!(params.round_block_challenge_size, 12);
    }

    #[test]
    fn test_decode_error_member() {
        let err = decode_response::<Value>(
            "register",
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32601, "message": "no such miner"}
            }),
        )
        .unwrap_err();
        match err {
            MinerError::RpcError { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "no such miner");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_result() {
        let err = decode_response::<Value>("write_log", json!({"jsonrpc": "2.0", "id": 1}))
            .unwrap_err();
        assert!(matches!(err, MinerError::ProtocolError(_)));
    }
}
