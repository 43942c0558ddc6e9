//! Shared helpers for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::RpcError;
use crate::rpc::JsonRpcClient;
use crate::sml::entry::MasternodeListEntry;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub address: String,
    pub method: String,
    pub params: Value,
}

type Handler = dyn Fn(&str, &str, &Value) -> Result<Value, RpcError> + Send + Sync;

/// Scriptable [`JsonRpcClient`] that records every dispatch.
pub(crate) struct MockJsonRpcClient {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockJsonRpcClient {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &str, &Value) -> Result<Value, RpcError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn calls_for(&self, method: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("calls lock").clear();
    }
}

#[async_trait]
impl JsonRpcClient for MockJsonRpcClient {
    async fn request(
        &self,
        address: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, RpcError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            address: address.to_owned(),
            method: method.to_owned(),
            params: params.clone(),
        });
        (self.handler)(address, method, &params)
    }
}

/// A valid entry whose service host is `{id}.example.net`.
pub(crate) fn entry(id: &str) -> MasternodeListEntry {
    MasternodeListEntry {
        pro_reg_tx_hash: id.to_owned(),
        confirmed_hash: format!("confirmed-{id}"),
        service: format!("{id}.example.net:9999"),
        pub_key_operator: format!("op-{id}"),
        key_id_voting: format!("vote-{id}"),
        is_valid: true,
    }
}

/// Answer the masternode-list maintenance methods (`getBlockHash`,
/// `getBestBlockHash`, `getMnListDiff`) so the provider converges on
/// `entries`. The diff deletes every configured seed and inserts the given
/// entries; other methods fall through to `fallback`.
pub(crate) fn list_serving_handler<F>(
    seeds: Vec<String>,
    entries: Vec<MasternodeListEntry>,
    fallback: F,
) -> impl Fn(&str, &str, &Value) -> Result<Value, RpcError> + Send + Sync
where
    F: Fn(&str, &str, &Value) -> Result<Value, RpcError> + Send + Sync,
{
    move |address, method, params| match method {
        "getBlockHash" if params["height"] == json!(0) => Ok(json!("genesis-hash")),
        "getBestBlockHash" => Ok(json!("best-hash")),
        "getMnListDiff" => Ok(json!({
            "baseBlockHash": params["baseBlockHash"],
            "blockHash": params["blockHash"],
            "deletedMNs": seeds,
            "mnList": entries,
        })),
        _ => fallback(address, method, params),
    }
}

pub(crate) fn timeout_error(address: &str, method: &str) -> RpcError {
    RpcError::Timeout {
        address: address.to_owned(),
        method: method.to_owned(),
    }
}
