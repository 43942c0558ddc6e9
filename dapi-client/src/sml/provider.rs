//! Cached masternode list maintenance via incremental diffs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::error::{DiscoveryError, RpcError};
use crate::rpc::JsonRpcClient;
use crate::sml::diff::{DiffVerifier, MasternodeListDiff, NoopVerifier};
use crate::sml::entry::MasternodeListEntry;
use crate::sml::list::MasternodeList;
use crate::sml::sample_excluding;

/// Marker meaning "no diff applied yet"; resolved to the genesis block
/// hash on the first update.
pub const NULL_BLOCK_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone)]
struct ProviderState {
    list: MasternodeList,
    base_block_hash: String,
    last_update: Option<Instant>,
}

/// Owns the cached masternode list and keeps it fresh.
///
/// Reads refresh lazily: a stale list triggers one diff fetch before the
/// entries are returned. Concurrent readers may both observe staleness and
/// both refresh; diff application is idempotent, so duplicate fetches are
/// tolerated rather than coordinated.
pub struct MasternodeListProvider {
    client: Arc<dyn JsonRpcClient>,
    verifier: Arc<dyn DiffVerifier>,
    port: u16,
    refresh_interval: Duration,
    seeds: Vec<MasternodeListEntry>,
    state: RwLock<ProviderState>,
}

impl MasternodeListProvider {
    pub fn new(client: Arc<dyn JsonRpcClient>, config: &ClientConfig) -> Self {
        let seeds: Vec<MasternodeListEntry> = config
            .seeds
            .iter()
            .map(|s| MasternodeListEntry::from_seed(s))
            .collect();

        Self {
            client,
            verifier: Arc::new(NoopVerifier),
            port: config.port,
            refresh_interval: config.refresh_interval,
            state: RwLock::new(ProviderState {
                list: MasternodeList::from_entries(seeds.iter().cloned()),
                base_block_hash: NULL_BLOCK_HASH.to_owned(),
                last_update: None,
            }),
            seeds,
        }
    }

    /// Replace the diff verification hook.
    pub fn with_verifier(mut self, verifier: Arc<dyn DiffVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// The current valid entries, refreshed first if the cache is stale.
    ///
    /// An update failure is fatal for this call and leaves the cache at its
    /// last-good state; calling again retries the update.
    pub async fn masternode_list(&self) -> Result<Vec<MasternodeListEntry>, DiscoveryError> {
        if self.needs_update().await {
            self.update_masternode_list().await?;
        }
        Ok(self.state.read().await.list.valid_entries())
    }

    /// The cached valid entries without any refresh.
    pub async fn cached_list(&self) -> Vec<MasternodeListEntry> {
        self.state.read().await.list.valid_entries()
    }

    /// Whether the cache has outlived the refresh interval (or was never
    /// updated).
    pub async fn needs_update(&self) -> bool {
        match self.state.read().await.last_update {
            None => true,
            Some(at) => at.elapsed() > self.refresh_interval,
        }
    }

    /// Fetch and apply the next masternode list diff.
    ///
    /// A missing diff or a diff producing an empty valid list is a fatal
    /// error for this update; the cached list is never overwritten with a
    /// partial result.
    pub async fn update_masternode_list(&self) -> Result<(), DiscoveryError> {
        let (mut base_block_hash, snapshot) = {
            let state = self.state.read().await;
            (state.base_block_hash.clone(), state.list.clone())
        };

        if base_block_hash == NULL_BLOCK_HASH {
            base_block_hash = self.fetch_genesis_hash(&snapshot).await?;
        }

        let best_block_hash = self.fetch_best_block_hash(&snapshot).await?;
        let diff = self.fetch_diff(&snapshot, &base_block_hash, &best_block_hash).await?;

        if diff.base_block_hash != base_block_hash {
            return Err(DiscoveryError::BaseBlockHashMismatch {
                expected: base_block_hash,
                found: diff.base_block_hash,
            });
        }

        self.verifier.verify(&diff)?;

        let updated = snapshot.apply_diff(&diff).valid();
        if updated.is_empty() {
            return Err(DiscoveryError::EmptyMasternodeList);
        }

        tracing::debug!(
            entries = updated.len(),
            deleted = diff.deleted_mns.len(),
            block_hash = %diff.block_hash,
            "masternode list updated"
        );

        let mut state = self.state.write().await;
        state.list = updated;
        state.base_block_hash = diff.block_hash;
        state.last_update = Some(Instant::now());
        Ok(())
    }

    /// Discard all cached state, reverting to the configured seeds.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.list = MasternodeList::from_entries(self.seeds.iter().cloned());
        state.base_block_hash = NULL_BLOCK_HASH.to_owned();
        state.last_update = None;
    }

    async fn fetch_genesis_hash(&self, list: &MasternodeList) -> Result<String, DiscoveryError> {
        let result = self.call(list, "getBlockHash", json!({ "height": 0 })).await?;
        decode("getBlockHash", result)
    }

    async fn fetch_best_block_hash(&self, list: &MasternodeList) -> Result<String, DiscoveryError> {
        let result = self.call(list, "getBestBlockHash", json!({})).await?;
        decode("getBestBlockHash", result)
    }

    async fn fetch_diff(
        &self,
        list: &MasternodeList,
        base_block_hash: &str,
        block_hash: &str,
    ) -> Result<MasternodeListDiff, DiscoveryError> {
        let result = self
            .call(
                list,
                "getMnListDiff",
                json!({ "baseBlockHash": base_block_hash, "blockHash": block_hash }),
            )
            .await
            .map_err(|e| DiscoveryError::DiffFetchFailed(e.to_string()))?;

        if result.is_null() {
            return Err(DiscoveryError::DiffFetchFailed("empty response".to_owned()));
        }

        serde_json::from_value(result)
            .map_err(|e| DiscoveryError::DiffFetchFailed(e.to_string()))
    }

    /// Issue one RPC against a masternode sampled uniformly at random from
    /// `list`. Sampling may pick the same peer repeatedly.
    async fn call(
        &self,
        list: &MasternodeList,
        method: &str,
        params: Value,
    ) -> Result<Value, DiscoveryError> {
        let entry = {
            let mut rng = rand::thread_rng();
            sample_excluding(list.entries(), &mut rng, |_| false).cloned()
        }
        .ok_or(DiscoveryError::NoAvailableMasternodes)?;

        let address = format!("{}:{}", entry.host(), self.port);
        Ok(self.client.request(&address, method, params).await?)
    }
}

fn decode(method: &str, value: Value) -> Result<String, DiscoveryError> {
    serde_json::from_value(value).map_err(|e| {
        DiscoveryError::Rpc(RpcError::Decode {
            method: method.to_owned(),
            source: e,
        })
    })
}
