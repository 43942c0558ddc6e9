//! Single-dispatch RPC primitives.
//!
//! Each primitive sends exactly one request to one fixed address and
//! decodes the result. Peer selection and retry are transport-layer
//! responsibilities and never happen here.

pub mod grpc;
pub mod jsonrpc;

pub use grpc::{build_channel, is_retriable_status, GrpcRequest};
pub use jsonrpc::{HttpJsonRpcClient, JsonRpcClient};
