//! gRPC request primitive.
//!
//! A [`GrpcRequest`] wraps one typed call on a caller-supplied client stub.
//! The transport hands it a channel to a selected masternode; the request
//! performs exactly one dispatch.

use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

use crate::error::TransportError;

/// One typed gRPC call, executable against any masternode channel.
///
/// Implementations construct their generated client stub from the channel
/// and invoke a single method on it.
#[async_trait]
pub trait GrpcRequest: Send + Sync {
    type Response: Send;

    /// Method name, used in error messages and logs.
    fn method(&self) -> &'static str;

    /// Execute the call once against the given channel.
    async fn execute(&self, channel: Channel) -> Result<Self::Response, Status>;
}

/// Build a lazily connected channel to `address` ("host:port").
///
/// Connection establishment is deferred to the first call, so failures
/// surface as `UNAVAILABLE` statuses from the dispatch itself.
pub fn build_channel(address: &str, timeout: Option<Duration>) -> Result<Channel, TransportError> {
    let uri = format!("http://{}", address);
    let mut endpoint =
        Endpoint::from_shared(uri).map_err(|_| TransportError::InvalidAddress(address.to_owned()))?;
    if let Some(timeout) = timeout {
        endpoint = endpoint.timeout(timeout);
    }
    Ok(endpoint.connect_lazy())
}

/// Whether a gRPC status is transient and eligible for peer exclusion and
/// retry.
pub fn is_retriable_status(status: &Status) -> bool {
    matches!(
        status.code(),
        Code::DeadlineExceeded | Code::Unavailable | Code::Internal
    )
}
