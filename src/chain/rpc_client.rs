/// JSON-RPC over HTTP client for an EVM node
/// One request per call, awaited to completion; the envelope id is always 1.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::chain::quantity::parse_quantity;
use crate::chain::transaction::GasEstimateRequest;
use crate::error::{Result, TransferError};

/// Request envelope shared by every call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Value,
    pub id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransferError::transport(&endpoint, e))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one JSON-RPC request and return its `result`
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = JsonRpcRequest::new(method, params);
        debug!("RPC {} -> {}", method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransferError::transport(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransferError::transport(&self.endpoint, e))?;

        let envelope: JsonRpcResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TransferError::transport(
                    &self.endpoint,
                    format!("HTTP {}: {}", status, body),
                ));
            }
            Err(e) => {
                return Err(TransferError::rpc(method, format!("malformed response: {}", e)));
            }
        };

        // Nodes may send JSON-RPC errors with a non-2xx status; the error body wins
        if let Some(error) = envelope.error {
            return Err(TransferError::rpc(method, describe_error(&error)));
        }

        if !status.is_success() {
            return Err(TransferError::transport(
                &self.endpoint,
                format!("HTTP {}: {}", status, body),
            ));
        }

        envelope
            .result
            .ok_or_else(|| TransferError::rpc(method, "response has neither result nor error"))
    }

    /// Next nonce for `address`, counting transactions still in the mempool
    pub async fn get_nonce(&self, address: &str) -> Result<u64> {
        let method = "eth_getTransactionCount";
        let result = self.call(method, json!([address, "pending"])).await?;
        let nonce = quantity_result(method, &result)?;
        u64::try_from(nonce)
            .map_err(|_| TransferError::rpc(method, format!("nonce {} out of range", nonce)))
    }

    pub async fn get_gas_price(&self) -> Result<u128> {
        let method = "eth_gasPrice";
        let result = self.call(method, json!([])).await?;
        quantity_result(method, &result)
    }

    pub async fn estimate_gas(&self, request: &GasEstimateRequest) -> Result<u64> {
        let method = "eth_estimateGas";
        let result = self.call(method, json!([request])).await?;
        let gas = quantity_result(method, &result)?;
        u64::try_from(gas)
            .map_err(|_| TransferError::rpc(method, format!("gas estimate {} out of range", gas)))
    }

    /// Submit a signed transaction. The hash is returned as the node sent it.
    pub async fn broadcast(&self, raw_tx_hex: &str) -> Result<String> {
        let method = "eth_sendRawTransaction";
        let result = self.call(method, json!([raw_tx_hex])).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                TransferError::rpc(method, format!("expected transaction hash, got {}", result))
            })
    }
}

fn quantity_result(method: &str, result: &Value) -> Result<u128> {
    result
        .as_str()
        .and_then(parse_quantity)
        .ok_or_else(|| TransferError::rpc(method, format!("expected hex quantity, got {}", result)))
}

fn describe_error(error: &Value) -> String {
    match error.get("message").and_then(Value::as_str) {
        Some(message) => match error.get("code").and_then(Value::as_i64) {
            Some(code) => format!("{} (code {})", message, code),
            None => message.to_string(),
        },
        None => error.to_string(),
    }
}
