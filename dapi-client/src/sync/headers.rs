//! Parallel header fetch and merge.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;
use tokio::sync::Mutex;

use crate::chain::{BlockHeader, HeaderChain};
use crate::error::DapiClientError;
use crate::sml::MasternodeDiscovery;
use crate::sync::chunk::{HeaderChainChunk, HeaderRange, MAX_HEADERS_PER_REQUEST};
use crate::transport::JsonRpcTransport;

/// Attempts per sub-range before it is given up.
pub const SUB_RANGE_RETRY_LIMIT: u32 = 5;

/// Result of a header synchronization pass.
///
/// A sub-range that exhausts its retries does not fail the sync; it is
/// reported here so callers can detect partial coverage.
#[derive(Debug, Clone)]
pub struct HeaderSyncOutcome {
    /// Longest connected chain, ordered from the starting height to the
    /// new tip.
    pub longest_chain: Vec<BlockHeader>,
    /// Sub-ranges whose headers could not be fetched and inserted.
    pub failed_ranges: Vec<HeaderRange>,
}

/// Fetches a height range of headers across the discovered peer set in
/// parallel and merges the results into a shared chain structure.
pub struct HeaderChainProvider<C> {
    transport: Arc<JsonRpcTransport>,
    discovery: Arc<MasternodeDiscovery>,
    chain: Arc<Mutex<C>>,
}

impl<C: HeaderChain> HeaderChainProvider<C> {
    pub fn new(
        transport: Arc<JsonRpcTransport>,
        discovery: Arc<MasternodeDiscovery>,
        chain: Arc<Mutex<C>>,
    ) -> Self {
        Self {
            transport,
            discovery,
            chain,
        }
    }

    /// Synchronize headers from `last_chain_tip_height` to the network tip
    /// and return the resulting longest chain.
    pub async fn fetch(
        &self,
        last_chain_tip_height: u32,
    ) -> Result<HeaderSyncOutcome, DapiClientError> {
        self.build_header_chain(last_chain_tip_height).await
    }

    /// Resolve the anchor and the network tip, partition the range across
    /// the peer set, and fan the page fetches out concurrently. Waits for
    /// every page to settle before returning.
    async fn build_header_chain(
        &self,
        from_height: u32,
    ) -> Result<HeaderSyncOutcome, DapiClientError> {
        let from_hash: String = self
            .transport
            .request_as("getBlockHash", json!({ "height": from_height }))
            .await?;

        let anchor: Vec<BlockHeader> = self
            .transport
            .request_as(
                "getBlockHeaders",
                json!({ "offset": from_height, "limit": 1 }),
            )
            .await?;
        self.chain.lock().await.add_headers(&anchor)?;

        let peer_count = self.discovery.masternode_list().await?.len();
        let tip_height: u32 = self
            .transport
            .request_as("getBestBlockHeight", json!({}))
            .await?;

        let chunks = HeaderChainChunk::partition(
            from_height,
            tip_height,
            peer_count,
            MAX_HEADERS_PER_REQUEST,
        );

        tracing::debug!(
            from_height,
            tip_height,
            peer_count,
            chunks = chunks.len(),
            anchor = %from_hash,
            "starting header chain sync"
        );

        let results = join_all(
            chunks
                .iter()
                .map(|chunk| self.populate_header_chain(*chunk)),
        )
        .await;

        let failed_ranges: Vec<HeaderRange> = results.into_iter().flatten().collect();
        if !failed_ranges.is_empty() {
            tracing::warn!(
                failed = failed_ranges.len(),
                "header sync finished with uncovered sub-ranges"
            );
        }

        Ok(HeaderSyncOutcome {
            longest_chain: self.chain.lock().await.longest_chain(),
            failed_ranges,
        })
    }

    /// Fetch every page of one chunk concurrently, returning the
    /// sub-ranges that exhausted their retries.
    async fn populate_header_chain(&self, chunk: HeaderChainChunk) -> Vec<HeaderRange> {
        let results = join_all(
            chunk
                .pages()
                .into_iter()
                .map(|range| self.populate_range(range)),
        )
        .await;
        results.into_iter().flatten().collect()
    }

    /// Fetch one sub-range and insert it into the chain, retrying up to
    /// [`SUB_RANGE_RETRY_LIMIT`] attempts. Returns the range on exhaustion.
    async fn populate_range(&self, range: HeaderRange) -> Option<HeaderRange> {
        let mut attempts = 0;
        loop {
            attempts += 1;

            let outcome = match self
                .transport
                .request_as::<Vec<BlockHeader>>(
                    "getBlockHeaders",
                    json!({ "offset": range.from_height, "limit": range.count }),
                )
                .await
            {
                Ok(headers) => self
                    .chain
                    .lock()
                    .await
                    .add_headers(&headers)
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(()) => return None,
                Err(error) if attempts < SUB_RANGE_RETRY_LIMIT => {
                    tracing::debug!(
                        from_height = range.from_height,
                        count = range.count,
                        attempts,
                        %error,
                        "retrying header sub-range"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        from_height = range.from_height,
                        count = range.count,
                        %error,
                        "giving up on header sub-range"
                    );
                    return Some(range);
                }
            }
        }
    }
}
