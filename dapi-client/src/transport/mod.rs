//! Request dispatch with peer selection, exclusion, and bounded retry.
//!
//! A transport asks discovery for a random masternode, dispatches via the
//! matching RPC primitive, and on a retriable failure excludes that peer
//! and tries another until the retry budget runs out. `retries = r` allows
//! exactly `r + 1` dispatch attempts; `retries = 0` still performs one.

pub mod grpc;
pub mod jsonrpc;
pub mod manager;


pub use grpc::GrpcTransport;
pub use jsonrpc::JsonRpcTransport;
pub use manager::{Transport, TransportKind, TransportManager};
