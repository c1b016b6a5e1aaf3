/// Client for the local transaction signing service
/// The service holds the keys; we only ship the unsigned transaction and read back `tx_hex`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::chain::quantity::{u128_to_quantity, u256_to_quantity};
use crate::chain::transaction::UnsignedTransaction;
use crate::error::{Result, TransferError};

pub const SIGN_TRANSACTION_PATH: &str = "/v1/sign/transaction";
pub const PING_PATH: &str = "/ping";

/// Transaction as the signer expects it; `data` travels as `input`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerTransaction {
    pub to: String,
    pub value: String,
    pub gas: String,
    #[serde(rename = "gasPrice")]
    pub gas_price: String,
    pub nonce: String,
    pub input: String,
}

impl From<&UnsignedTransaction> for SignerTransaction {
    fn from(tx: &UnsignedTransaction) -> Self {
        Self {
            to: tx.to.clone(),
            value: u256_to_quantity(tx.value),
            gas: u128_to_quantity(tx.gas as u128),
            gas_price: u128_to_quantity(tx.gas_price),
            nonce: u128_to_quantity(tx.nonce as u128),
            input: tx.data.clone(),
        }
    }
}

/// Outer payload. `transaction` is the JSON of `SignerTransaction` as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    pub chain_id: u64,
    pub account: String,
    pub transaction: String,
}

impl SignRequest {
    pub fn new(chain_id: u64, tx: &UnsignedTransaction) -> Result<Self> {
        let transaction = serde_json::to_string(&SignerTransaction::from(tx))
            .map_err(|e| {
                TransferError::Encoding(format!("failed to serialize transaction: {}", e))
            })?;

        Ok(Self {
            chain_id,
            account: tx.from.clone(),
            transaction,
        })
    }
}

/// Successful signer reply. Only `tx_hex` is read; `signature` and `tx` pass
/// through in whatever shape the service sends.
#[derive(Debug, Deserialize)]
pub struct SignResponse {
    #[serde(default)]
    pub signature: Option<Value>,
    #[serde(default)]
    pub tx: Option<Value>,
    pub tx_hex: Option<String>,
}

#[derive(Clone)]
pub struct SignerClient {
    client: Client,
    base_url: String,
}

impl SignerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransferError::transport(&base_url, e))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the signing service is up
    pub async fn health_check(&self) -> bool {
        let url = format!("{}{}", self.base_url, PING_PATH);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Signer ping failed: {}", e);
                false
            }
        }
    }

    /// Sign `tx` for `chain_id` and return the raw transaction hex
    pub async fn sign(&self, chain_id: u64, tx: &UnsignedTransaction) -> Result<String> {
        let request = SignRequest::new(chain_id, tx)?;
        let data = serde_json::to_string(&request)
            .map_err(|e| {
                TransferError::Encoding(format!("failed to serialize sign request: {}", e))
            })?;

        let url = format!("{}{}", self.base_url, SIGN_TRANSACTION_PATH);
        info!("Requesting signature from {} for account {}", url, tx.from);

        let response = self
            .client
            .post(&url)
            .form(&[("data", data.as_str())])
            .send()
            .await
            .map_err(|e| TransferError::transport(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransferError::transport(&url, e))?;

        if !status.is_success() {
            return Err(signer_error(status.as_u16(), &body));
        }

        let parsed: SignResponse = serde_json::from_str(&body)
            .map_err(|_| TransferError::UnexpectedResponse(body.clone()))?;

        parsed
            .tx_hex
            .ok_or(TransferError::UnexpectedResponse(body))
    }
}

/// Prefer the service's `msg`, fall back to the raw body
fn signer_error(status: u16, body: &str) -> TransferError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("msg").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    TransferError::Signer { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use mockito::Matcher;

    const FROM: &str = "0x1111111111111111111111111111111111111111";
    const TO: &str = "0x2222222222222222222222222222222222222222";

    fn unsigned_tx() -> UnsignedTransaction {
        UnsignedTransaction {
            from: FROM.to_string(),
            to: TO.to_string(),
            value: U256::from(1_000_000_000_000_000_000u64),
            data: "0x".to_string(),
            nonce: 7,
            gas_price: 20_000_000_000,
            gas: 21000,
        }
    }

    fn signer(url: String) -> SignerClient {
        SignerClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_wire_transaction_fields() {
        let json = serde_json::to_value(SignerTransaction::from(&unsigned_tx())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "to": TO,
                "value": "0xde0b6b3a7640000",
                "gas": "0x5208",
                "gasPrice": "0x4a817c800",
                "nonce": "0x7",
                "input": "0x",
            })
        );
    }

    #[test]
    fn test_sign_request_nests_transaction_as_string() {
        let request = SignRequest::new(1, &unsigned_tx()).unwrap();
        assert_eq!(request.chain_id, 1);
        assert_eq!(request.account, FROM);

        let inner: SignerTransaction = serde_json::from_str(&request.transaction).unwrap();
        assert_eq!(inner.input, "0x");
        assert_eq!(inner.nonce, "0x7");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = signer("http://localhost:8080/".to_string());
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_sign_success() {
        let request = SignRequest::new(1, &unsigned_tx()).unwrap();
        let expected = serde_json::to_string(&request).unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/sign/transaction")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded("data".into(), expected))
            .with_status(200)
            .with_body(r#"{"signature":"0xsig","tx":{},"tx_hex":"0xf86c07"}"#)
            .expect(1)
            .create_async()
            .await;

        let raw = signer(server.url()).sign(1, &unsigned_tx()).await.unwrap();
        assert_eq!(raw, "0xf86c07");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unused_fields_in_any_shape() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/sign/transaction")
            .with_body(r#"{"signature":{"r":"0x1","s":"0x2","v":27},"tx":"abc","tx_hex":"0xf86c"}"#)
            .create_async()
            .await;

        let raw = signer(server.url()).sign(1, &unsigned_tx()).await.unwrap();
        assert_eq!(raw, "0xf86c");
    }

    #[tokio::test]
    async fn test_missing_tx_hex() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/sign/transaction")
            .with_body(r#"{"signature":"0xsig"}"#)
            .create_async()
            .await;

        let err = signer(server.url()).sign(1, &unsigned_tx()).await.unwrap_err();
        match err {
            TransferError::UnexpectedResponse(body) => assert!(body.contains("signature")),
            other => panic!("expected UnexpectedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_body_not_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/sign/transaction")
            .with_body("ok")
            .create_async()
            .await;

        let err = signer(server.url()).sign(1, &unsigned_tx()).await.unwrap_err();
        assert!(matches!(err, TransferError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_error_with_msg() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/sign/transaction")
            .with_status(400)
            .with_body(r#"{"code":1003,"msg":"insufficient funds"}"#)
            .create_async()
            .await;

        let err = signer(server.url()).sign(1, &unsigned_tx()).await.unwrap_err();
        match err {
            TransferError::Signer { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("insufficient funds"));
            }
            other => panic!("expected Signer error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_with_plain_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/sign/transaction")
            .with_status(500)
            .with_body("internal failure")
            .create_async()
            .await;

        let err = signer(server.url()).sign(1, &unsigned_tx()).await.unwrap_err();
        assert_eq!(err.to_string(), "signer error (500): internal failure");
    }

    #[tokio::test]
    async fn test_health_check() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ping")
            .with_body(r#"{"code":0,"msg":"success","data":"pong"}"#)
            .create_async()
            .await;

        assert!(signer(server.url()).health_check().await);
        assert!(!signer("http://127.0.0.1:1".to_string()).health_check().await);
    }
}
