#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    use crate::chain::{BlockHeader, HeaderChain, InMemoryHeaderChain};
    use crate::config::ClientConfig;
    use crate::error::{ChainError, RpcError};
    use crate::rpc::JsonRpcClient;
    use crate::sml::{MasternodeDiscovery, MasternodeListProvider};
    use crate::sync::chunk::HeaderRange;
    use crate::sync::headers::{HeaderChainProvider, SUB_RANGE_RETRY_LIMIT};
    use crate::test_utils::{entry, list_serving_handler, timeout_error, MockJsonRpcClient};
    use crate::transport::jsonrpc::JsonRpcTransport;

    const SEED: &str = "seed.example.net:3000";

    fn header(height: u32) -> BlockHeader {
        BlockHeader {
            hash: format!("h{height}"),
            height,
            version: 0,
            merkle_root: String::new(),
            time: 0,
            bits: String::new(),
            nonce: 0,
            previous_block_hash: (height > 0).then(|| format!("h{}", height - 1)),
        }
    }

    /// Serve a linear chain up to `tip`: block hashes are `h{height}` and
    /// `getBlockHeaders` pages come back fully linked.
    fn chain_serving_fallback(
        tip: u32,
    ) -> impl Fn(&str, &str, &Value) -> Result<Value, RpcError> + Send + Sync {
        move |_, method, params| match method {
            "getBestBlockHeight" => Ok(json!(tip)),
            "getBlockHash" => {
                let height = params["height"].as_u64().unwrap() as u32;
                Ok(json!(format!("h{height}")))
            }
            "getBlockHeaders" => {
                let offset = params["offset"].as_u64().unwrap() as u32;
                let limit = params["limit"].as_u64().unwrap() as u32;
                let headers: Vec<BlockHeader> = (offset..offset + limit).map(header).collect();
                Ok(serde_json::to_value(headers).unwrap())
            }
            other => Err(RpcError::Rpc {
                method: other.to_owned(),
                message: "unexpected".to_owned(),
            }),
        }
    }

    fn setup<F>(
        peer_count: usize,
        retries: u32,
        fallback: F,
    ) -> (Arc<MockJsonRpcClient>, Arc<JsonRpcTransport>, Arc<MasternodeDiscovery>)
    where
        F: Fn(&str, &str, &Value) -> Result<Value, RpcError> + Send + Sync + 'static,
    {
        let entries = (0..peer_count).map(|i| entry(&format!("mn-{i}"))).collect();
        let handler = list_serving_handler(vec![SEED.to_owned()], entries, fallback);
        let mock = Arc::new(MockJsonRpcClient::new(handler));
        let config = ClientConfig::default()
            .with_seeds(vec![SEED.to_owned()])
            .with_retries(retries);
        let provider =
            MasternodeListProvider::new(mock.clone() as Arc<dyn JsonRpcClient>, &config);
        let discovery = Arc::new(MasternodeDiscovery::new(provider));
        let transport = Arc::new(
            JsonRpcTransport::new(
                discovery.clone(),
                mock.clone() as Arc<dyn JsonRpcClient>,
                &config,
            )
            .unwrap(),
        );
        (mock, transport, discovery)
    }

    #[tokio::test]
    async fn parallel_fetch_converges_on_the_full_chain() {
        let (_, transport, discovery) = setup(4, 3, chain_serving_fallback(120));
        let chain = Arc::new(Mutex::new(InMemoryHeaderChain::new()));
        let provider = HeaderChainProvider::new(transport, discovery, chain);

        let outcome = provider.fetch(100).await.unwrap();

        assert!(outcome.failed_ranges.is_empty());
        assert_eq!(outcome.longest_chain.len(), 20);
        assert_eq!(outcome.longest_chain[0].hash, "h100");
        assert_eq!(outcome.longest_chain[19].hash, "h119");
        for pair in outcome.longest_chain.windows(2) {
            assert_eq!(pair[1].previous_block_hash.as_deref(), Some(&*pair[0].hash));
        }
    }

    /// Rejects any batch starting at the poisoned height.
    struct FailingChain {
        inner: InMemoryHeaderChain,
        poisoned_height: u32,
    }

    impl HeaderChain for FailingChain {
        fn add_headers(&mut self, headers: &[BlockHeader]) -> Result<(), ChainError> {
            if headers.first().map(|h| h.height) == Some(self.poisoned_height) {
                return Err(ChainError::InvalidHeader {
                    hash: headers[0].hash.clone(),
                    reason: "rejected by test".to_owned(),
                });
            }
            self.inner.add_headers(headers)
        }

        fn longest_chain(&self) -> Vec<BlockHeader> {
            self.inner.longest_chain()
        }

        fn header(&self, hash: &str) -> Option<&BlockHeader> {
            self.inner.header(hash)
        }
    }

    #[tokio::test]
    async fn a_rejected_sub_range_is_reported_not_fatal() {
        let (mock, transport, discovery) = setup(4, 3, chain_serving_fallback(120));
        let chain = Arc::new(Mutex::new(FailingChain {
            inner: InMemoryHeaderChain::new(),
            poisoned_height: 110,
        }));
        let provider = HeaderChainProvider::new(transport, discovery, chain);

        let outcome = provider.fetch(100).await.unwrap();

        assert_eq!(
            outcome.failed_ranges,
            vec![HeaderRange { from_height: 110, count: 5 }]
        );
        // The poisoned range is refetched once per attempt.
        let poisoned_fetches = mock
            .calls_for("getBlockHeaders")
            .into_iter()
            .filter(|c| c.params["offset"] == json!(110))
            .count();
        assert_eq!(poisoned_fetches, SUB_RANGE_RETRY_LIMIT as usize);

        // Everything below the gap still connects.
        assert_eq!(outcome.longest_chain.len(), 10);
        assert_eq!(outcome.longest_chain.last().unwrap().hash, "h109");
    }

    #[tokio::test]
    async fn a_transport_dead_sub_range_is_reported_not_fatal() {
        let fallback = chain_serving_fallback(120);
        let handler = move |address: &str, method: &str, params: &Value| {
            if method == "getBlockHeaders" && params["offset"] == json!(115) {
                return Err(timeout_error(address, method));
            }
            fallback(address, method, params)
        };
        let (mock, transport, discovery) = setup(4, 0, handler);
        let chain = Arc::new(Mutex::new(InMemoryHeaderChain::new()));
        let provider = HeaderChainProvider::new(transport, discovery, chain);

        let outcome = provider.fetch(100).await.unwrap();

        assert_eq!(
            outcome.failed_ranges,
            vec![HeaderRange { from_height: 115, count: 5 }]
        );
        let dead_fetches = mock
            .calls_for("getBlockHeaders")
            .into_iter()
            .filter(|c| c.params["offset"] == json!(115))
            .count();
        assert_eq!(dead_fetches, SUB_RANGE_RETRY_LIMIT as usize);

        assert_eq!(outcome.longest_chain.len(), 15);
        assert_eq!(outcome.longest_chain.last().unwrap().hash, "h114");
    }

    #[tokio::test]
    async fn syncing_at_the_tip_yields_only_the_anchor() {
        let (_, transport, discovery) = setup(4, 3, chain_serving_fallback(120));
        let chain = Arc::new(Mutex::new(InMemoryHeaderChain::new()));
        let provider = HeaderChainProvider::new(transport, discovery, chain);

        let outcome = provider.fetch(120).await.unwrap();

        assert!(outcome.failed_ranges.is_empty());
        assert_eq!(outcome.longest_chain.len(), 1);
        assert_eq!(outcome.longest_chain[0].hash, "h120");
    }
}
