//! JSON-RPC 2.0 request primitive over HTTP POST.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, RpcError};

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcResponseError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponseError {
    message: String,
}

/// Sends one JSON-RPC call to one fixed address. No retry, no peer
/// selection.
#[async_trait]
pub trait JsonRpcClient: Send + Sync {
    /// Send `method` with `params` to `address` ("host:port") and return
    /// the decoded `result` field.
    async fn request(&self, address: &str, method: &str, params: Value)
        -> Result<Value, RpcError>;
}

/// [`JsonRpcClient`] over an HTTP connection pool with a per-request
/// timeout.
#[derive(Debug, Clone)]
pub struct HttpJsonRpcClient {
    http: reqwest::Client,
}

impl HttpJsonRpcClient {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
        })
    }
}

#[async_trait]
impl JsonRpcClient for HttpJsonRpcClient {
    async fn request(
        &self,
        address: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, RpcError> {
        let url = format!("http://{}", address);
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params: &params,
            id: 1,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_send_error(e, address, method))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_send_error(e, address, method))?;

        if !status.is_success() {
            return Err(RpcError::HttpStatus {
                status: status.as_u16(),
                address: address.to_owned(),
                method: method.to_owned(),
                body: text,
            });
        }

        let parsed: JsonRpcResponse =
            serde_json::from_str(&text).map_err(|e| RpcError::Decode {
                method: method.to_owned(),
                source: e,
            })?;

        if let Some(error) = parsed.error {
            return Err(RpcError::Rpc {
                method: method.to_owned(),
                message: error.message,
            });
        }

        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

fn classify_send_error(error: reqwest::Error, address: &str, method: &str) -> RpcError {
    if error.is_timeout() {
        RpcError::Timeout {
            address: address.to_owned(),
            method: method.to_owned(),
        }
    } else {
        // Connection refused, aborted, or otherwise failed mid-flight.
        RpcError::Connection {
            address: address.to_owned(),
            method: method.to_owned(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_matches_wire_format() {
        let params = serde_json::json!({ "height": 0 });
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "getBlockHash",
            params: &params,
            id: 1,
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "getBlockHash",
                "params": { "height": 0 },
                "id": 1,
            })
        );
    }

    #[test]
    fn response_error_is_decoded() {
        let raw = r#"{"result": null, "error": {"message": "Block height out of range"}}"#;
        let parsed: JsonRpcResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.unwrap().message, "Block height out of range");
    }

    #[test]
    fn retriability_classification() {
        let timeout = RpcError::Timeout {
            address: "127.0.0.1:3000".into(),
            method: "getStatus".into(),
        };
        let application = RpcError::Rpc {
            method: "getStatus".into(),
            message: "bad params".into(),
        };
        assert!(timeout.is_retriable());
        assert!(!application.is_retriable());
    }
}
