//! EVM JSON-RPC endpoint client.
//!
//! Speaks `eth_blockNumber` and `eth_getBlockByNumber` over HTTP. One
//! instance per configured URL; the endpoint pool picks between them.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use forkwatch_core::{Header, HeaderSource, MonitorError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One EVM JSON-RPC endpoint.
///
/// No internal retry; the monitor's retry policy decides when a failed call
/// is attempted again.
pub struct EvmEndpoint {
    url: String,
    http: reqwest::Client,
}

impl EvmEndpoint {
    /// Create a client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>) -> Result<Self, MonitorError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MonitorError::Rpc(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    /// The endpoint's URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, MonitorError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MonitorError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MonitorError::Rpc(format!(
                "HTTP {} from {}",
                response.status().as_u16(),
                self.url
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MonitorError::Rpc(e.to_string()))?;

        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            return Err(MonitorError::Rpc(format!("{method} failed: {err}")));
        }
        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl HeaderSource for EvmEndpoint {
    async fn current_height(&self) -> Result<u64, MonitorError> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        result
            .as_str()
            .and_then(parse_hex_u64)
            .ok_or_else(|| MonitorError::Rpc(format!("bad eth_blockNumber result: {result}")))
    }

    async fn header_at(&self, height: u64) -> Result<Header, MonitorError> {
        let result = self
            .call("eth_getBlockByNumber", json!([format!("{height:#x}"), false]))
            .await?;
        if result.is_null() {
            // The node has announced the height but not the block yet.
            return Err(MonitorError::Rpc(format!("block {height} not available")));
        }
        header_from_json(&result)
            .ok_or_else(|| MonitorError::Rpc(format!("malformed block response at {height}")))
    }
}

/// Parse a hex-encoded quantity (with or without `0x`) to u64.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).ok()
}

/// Build a `Header` from an `eth_getBlockByNumber` result object.
pub fn header_from_json(v: &Value) -> Option<Header> {
    Some(Header {
        height: parse_hex_u64(v["number"].as_str()?)?,
        hash: v["hash"].as_str()?.to_string(),
        parent_hash: v["parentHash"].as_str()?.to_string(),
    })
}
