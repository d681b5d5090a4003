//! JSON-RPC client abstraction and the reqwest implementation

use std::time::Duration;

use alloy_primitives::U256;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::debug;

use super::types::{into_result, RpcRequest};
use super::RpcError;
use crate::domain::{parse_block_number, parse_quantity, Address};

/// Abstract JSON-RPC client
///
/// `call` is the only transport hook; the typed helpers interpret the
/// results of the two methods this tool uses.
#[async_trait::async_trait]
pub trait RpcClient: Send + Sync + 'static {
    /// Send one request and return its `result` member untouched
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError>;

    /// Endpoint display name
    fn endpoint(&self) -> &str;

    /// `eth_getBalance(address, "latest")`
    async fn get_balance(&self, address: &Address) -> Result<U256, RpcError> {
        let result = self
            .call(
                "eth_getBalance",
                vec![json!(address.as_str()), json!("latest")],
            )
            .await?;
        Ok(parse_quantity(expect_str(&result, "eth_getBalance")?)?)
    }

    /// `eth_blockNumber()`
    async fn block_number(&self) -> Result<u64, RpcError> {
        let result = self.call("eth_blockNumber", Vec::new()).await?;
        Ok(parse_block_number(expect_str(&result, "eth_blockNumber")?)?)
    }
}

fn expect_str<'a>(value: &'a Value, method: &str) -> Result<&'a str, RpcError> {
    value.as_str().ok_or_else(|| {
        RpcError::protocol(format!(
            "{} returned {} instead of a hex string",
            method, value
        ))
    })
}

/// JSON-RPC over HTTP POST
pub struct HttpRpcClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRpcClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl RpcClient for HttpRpcClient {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        debug!(method, endpoint = %self.endpoint, "rpc request");

        // `.json()` sets Content-Type: application/json
        let response = self
            .http
            .post(&self.endpoint)
            .json(&RpcRequest::new(method, params))
            .send()
            .await
            .map_err(RpcError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Network {
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.bytes().await.map_err(RpcError::from_transport)?;
        let body: Value = serde_json::from_slice(&body)
            .map_err(|err| RpcError::protocol(format!("malformed response body: {}", err)))?;

        into_result(body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
