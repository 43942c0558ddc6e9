//! JSON-RPC transport with peer fail-over.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ConfigError, RpcError, TransportError};
use crate::rpc::JsonRpcClient;
use crate::sml::MasternodeDiscovery;

/// Dispatches JSON-RPC calls to randomly selected masternodes, excluding
/// peers that failed within the same logical call.
pub struct JsonRpcTransport {
    discovery: Arc<MasternodeDiscovery>,
    client: Arc<dyn JsonRpcClient>,
    port: u16,
    retries: u32,
}

impl JsonRpcTransport {
    /// Validates the configuration before any network activity.
    pub fn new(
        discovery: Arc<MasternodeDiscovery>,
        client: Arc<dyn JsonRpcClient>,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            discovery,
            client,
            port: config.port,
            retries: config.retries,
        })
    }

    /// Send `method` to some reachable masternode and return the raw
    /// `result` value.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let mut excluded: Vec<String> = Vec::new();
        let mut attempts_left = self.retries + 1;

        loop {
            let node = self.discovery.random_masternode(&excluded).await?;
            let address = format!("{}:{}", node.host(), self.port);

            match self.client.request(&address, method, params.clone()).await {
                Ok(result) => return Ok(result),
                Err(err) if err.is_retriable() => {
                    attempts_left -= 1;
                    if attempts_left == 0 {
                        return Err(TransportError::MaxRetriesReached {
                            method: method.to_owned(),
                            attempts: self.retries + 1,
                            last_error: err.to_string(),
                        });
                    }
                    tracing::warn!(
                        %err,
                        address = %address,
                        method,
                        "retriable transport failure, excluding peer"
                    );
                    excluded.push(node.host().to_owned());
                }
                Err(err) => return Err(TransportError::Rpc(err)),
            }
        }
    }

    /// Like [`request`](Self::request), decoding the result into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, TransportError> {
        let result = self.request(method, params).await?;
        serde_json::from_value(result).map_err(|e| {
            TransportError::Rpc(RpcError::Decode {
                method: method.to_owned(),
                source: e,
            })
        })
    }

    pub fn discovery(&self) -> &Arc<MasternodeDiscovery> {
        &self.discovery
    }
}
