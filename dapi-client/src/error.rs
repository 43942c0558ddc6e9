//! Error types for the DAPI client.

use thiserror::Error;

use crate::transport::TransportKind;

/// Main error type for the DAPI client.
#[derive(Debug, Error)]
pub enum DapiClientError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),
}

/// Configuration errors, raised synchronously at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("seed list is empty")]
    NoSeeds,

    #[error("no transport registered for {0}")]
    UnknownTransport(TransportKind),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from a single RPC dispatch. The primitive performs no retry;
/// retriability only classifies the failure for the transport layer.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("failed to connect to {address} for {method}: {message}")]
    Connection {
        address: String,
        method: String,
        message: String,
    },

    #[error("request to {address} for {method} timed out")]
    Timeout { address: String, method: String },

    #[error("HTTP status {status} from {address} for {method}: {body}")]
    HttpStatus {
        status: u16,
        address: String,
        method: String,
        body: String,
    },

    #[error("DAPI error for {method}: {message}")]
    Rpc { method: String, message: String },

    #[error("failed to decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RpcError {
    /// Whether the failure is transient and eligible for peer exclusion
    /// and retry. Application-level errors and malformed responses are not.
    pub fn is_retriable(&self) -> bool {
        matches!(self, RpcError::Connection { .. } | RpcError::Timeout { .. })
    }
}

/// Errors from the transport layer (peer selection + bounded retry).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("max retries to connect reached after {attempts} attempts for {method}: {last_error}")]
    MaxRetriesReached {
        method: String,
        attempts: u32,
        last_error: String,
    },

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("gRPC request failed: {0}")]
    Grpc(#[from] tonic::Status),

    #[error("invalid peer address {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Errors from masternode discovery and list maintenance.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no masternode found")]
    NoAvailableMasternodes,

    #[error("failed to fetch masternode list diff: {0}")]
    DiffFetchFailed(String),

    #[error("masternode list update produced an empty list")]
    EmptyMasternodeList,

    #[error("diff verification failed: {0}")]
    DiffVerification(String),

    #[error("base block hash mismatch: expected {expected}, diff is based on {found}")]
    BaseBlockHashMismatch { expected: String, found: String },

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Errors from a header-chain structure rejecting headers.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid header {hash}: {reason}")]
    InvalidHeader { hash: String, reason: String },
}

/// Logging initialization errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("subscriber initialization failed: {0}")]
    SubscriberInit(String),
}
