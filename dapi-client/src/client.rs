//! Client facade wiring configuration, discovery, and transports together.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;

use crate::chain::{BlockHeader, HeaderChain};
use crate::config::ClientConfig;
use crate::error::DapiClientError;
use crate::rpc::{HttpJsonRpcClient, JsonRpcClient};
use crate::sml::{MasternodeDiscovery, MasternodeListDiff, MasternodeListProvider};
use crate::sync::{HeaderChainProvider, HeaderSyncOutcome};
use crate::transport::{
    GrpcTransport, JsonRpcTransport, Transport, TransportKind, TransportManager,
};

/// A client for the Dash masternode network.
///
/// One instance owns its discovery state and transports; construct it once
/// per process (or per network) and share it by reference.
pub struct DapiClient {
    discovery: Arc<MasternodeDiscovery>,
    json_rpc: Arc<JsonRpcTransport>,
    transports: TransportManager,
}

impl DapiClient {
    /// Build a client with the default HTTP JSON-RPC primitive.
    pub fn new(config: ClientConfig) -> Result<Self, DapiClientError> {
        config.validate()?;
        let client: Arc<dyn JsonRpcClient> = Arc::new(HttpJsonRpcClient::new(config.timeout)?);
        Self::with_json_rpc_client(config, client)
    }

    /// Build a client around a caller-supplied JSON-RPC primitive.
    pub fn with_json_rpc_client(
        config: ClientConfig,
        client: Arc<dyn JsonRpcClient>,
    ) -> Result<Self, DapiClientError> {
        config.validate()?;

        let provider = MasternodeListProvider::new(client.clone(), &config);
        let discovery = Arc::new(MasternodeDiscovery::new(provider));

        let json_rpc = Arc::new(JsonRpcTransport::new(
            discovery.clone(),
            client,
            &config,
        )?);

        let mut transports = TransportManager::new();
        transports.register(TransportKind::JsonRpc, Transport::JsonRpc(json_rpc.clone()));
        for kind in [
            TransportKind::CoreGrpc,
            TransportKind::PlatformGrpc,
            TransportKind::TxFilterStreamGrpc,
        ] {
            transports.register(
                kind,
                Transport::Grpc(Arc::new(GrpcTransport::new(discovery.clone(), &config)?)),
            );
        }

        Ok(Self {
            discovery,
            json_rpc,
            transports,
        })
    }

    pub fn discovery(&self) -> &Arc<MasternodeDiscovery> {
        &self.discovery
    }

    pub fn transports(&self) -> &TransportManager {
        &self.transports
    }

    pub async fn get_best_block_hash(&self) -> Result<String, DapiClientError> {
        Ok(self.json_rpc.request_as("getBestBlockHash", json!({})).await?)
    }

    pub async fn get_best_block_height(&self) -> Result<u32, DapiClientError> {
        Ok(self.json_rpc.request_as("getBestBlockHeight", json!({})).await?)
    }

    pub async fn get_block_hash(&self, height: u32) -> Result<String, DapiClientError> {
        Ok(self
            .json_rpc
            .request_as("getBlockHash", json!({ "height": height }))
            .await?)
    }

    pub async fn get_block_headers(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<BlockHeader>, DapiClientError> {
        Ok(self
            .json_rpc
            .request_as("getBlockHeaders", json!({ "offset": offset, "limit": limit }))
            .await?)
    }

    pub async fn get_mn_list_diff(
        &self,
        base_block_hash: &str,
        block_hash: &str,
    ) -> Result<MasternodeListDiff, DapiClientError> {
        Ok(self
            .json_rpc
            .request_as(
                "getMnListDiff",
                json!({ "baseBlockHash": base_block_hash, "blockHash": block_hash }),
            )
            .await?)
    }

    /// Synchronize headers from `from_height` to the network tip into
    /// `chain`, fanning requests out across the discovered peer set.
    pub async fn sync_headers<C: HeaderChain>(
        &self,
        chain: Arc<Mutex<C>>,
        from_height: u32,
    ) -> Result<HeaderSyncOutcome, DapiClientError> {
        let provider =
            HeaderChainProvider::new(self.json_rpc.clone(), self.discovery.clone(), chain);
        provider.fetch(from_height).await
    }
}
