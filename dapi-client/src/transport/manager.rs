//! Registry of configured transports.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::transport::grpc::GrpcTransport;
use crate::transport::jsonrpc::JsonRpcTransport;

/// The kinds of transport a client can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    JsonRpc,
    CoreGrpc,
    PlatformGrpc,
    TxFilterStreamGrpc,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::JsonRpc => "JSON-RPC",
            TransportKind::CoreGrpc => "core gRPC",
            TransportKind::PlatformGrpc => "platform gRPC",
            TransportKind::TxFilterStreamGrpc => "transaction-filter-stream gRPC",
        };
        f.write_str(name)
    }
}

/// A configured transport instance.
#[derive(Clone)]
pub enum Transport {
    JsonRpc(Arc<JsonRpcTransport>),
    Grpc(Arc<GrpcTransport>),
}

/// Maps transport kinds to configured transport instances. Selecting a
/// kind that was never registered is a configuration error.
#[derive(Default)]
pub struct TransportManager {
    transports: HashMap<TransportKind, Transport>,
}

impl TransportManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: TransportKind, transport: Transport) {
        self.transports.insert(kind, transport);
    }

    pub fn transport(&self, kind: TransportKind) -> Result<&Transport, ConfigError> {
        self.transports.get(&kind).ok_or(ConfigError::UnknownTransport(kind))
    }

    /// The JSON-RPC transport, if one is registered under
    /// [`TransportKind::JsonRpc`].
    pub fn json_rpc(&self) -> Result<&Arc<JsonRpcTransport>, ConfigError> {
        match self.transport(TransportKind::JsonRpc)? {
            Transport::JsonRpc(transport) => Ok(transport),
            Transport::Grpc(_) => Err(ConfigError::UnknownTransport(TransportKind::JsonRpc)),
        }
    }

    /// The gRPC transport registered under `kind`.
    pub fn grpc(&self, kind: TransportKind) -> Result<&Arc<GrpcTransport>, ConfigError> {
        match self.transport(kind)? {
            Transport::Grpc(transport) => Ok(transport),
            Transport::JsonRpc(_) => Err(ConfigError::UnknownTransport(kind)),
        }
    }
}
