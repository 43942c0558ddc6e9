//! gRPC transport with peer fail-over.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::rpc::grpc::{build_channel, is_retriable_status, GrpcRequest};
use crate::sml::MasternodeDiscovery;

/// Dispatches typed gRPC calls to randomly selected masternodes, excluding
/// peers that failed within the same logical call.
///
/// `DEADLINE_EXCEEDED`, `UNAVAILABLE`, and `INTERNAL` statuses are treated
/// as transient; any other status propagates immediately.
pub struct GrpcTransport {
    discovery: Arc<MasternodeDiscovery>,
    grpc_port: u16,
    timeout: Option<Duration>,
    retries: u32,
}

impl GrpcTransport {
    /// Validates the configuration before any network activity.
    pub fn new(
        discovery: Arc<MasternodeDiscovery>,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            discovery,
            grpc_port: config.grpc_port,
            timeout: Some(config.timeout),
            retries: config.retries,
        })
    }

    /// Execute `request` against some reachable masternode.
    pub async fn request<R: GrpcRequest>(
        &self,
        request: R,
    ) -> Result<R::Response, TransportError> {
        let mut excluded: Vec<String> = Vec::new();
        let mut attempts_left = self.retries + 1;

        loop {
            let node = self.discovery.random_masternode(&excluded).await?;
            let address = format!("{}:{}", node.host(), self.grpc_port);
            let channel = build_channel(&address, self.timeout)?;

            match request.execute(channel).await {
                Ok(response) => return Ok(response),
                Err(status) if is_retriable_status(&status) => {
                    attempts_left -= 1;
                    if attempts_left == 0 {
                        return Err(TransportError::MaxRetriesReached {
                            method: request.method().to_owned(),
                            attempts: self.retries + 1,
                            last_error: status.to_string(),
                        });
                    }
                    tracing::warn!(
                        code = ?status.code(),
                        address = %address,
                        method = request.method(),
                        "retriable gRPC failure, excluding peer"
                    );
                    excluded.push(node.host().to_owned());
                }
                Err(status) => return Err(TransportError::Grpc(status)),
            }
        }
    }
}
