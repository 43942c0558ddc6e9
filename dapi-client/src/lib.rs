//! Client library for the Dash masternode network (DAPI).
//!
//! This library lets a caller:
//!
//! - Discover which masternodes are currently valid and reachable, kept
//!   up to date through incremental masternode-list diffs
//! - Route JSON-RPC and gRPC calls to a random masternode with bounded
//!   retry and peer fail-over
//! - Reconstruct a verified block-header chain by fanning requests out
//!   across the discovered peer set and merging results
//!
//! # Quick Start
//!
//! ```no_run
//! use dapi_client::{ClientConfig, DapiClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default().with_seeds(vec!["127.0.0.1:19999".into()]);
//! let client = DapiClient::new(config)?;
//!
//! let height = client.get_best_block_height().await?;
//! println!("tip height: {height}");
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod rpc;
pub mod sml;
pub mod sync;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use chain::{BlockHeader, HeaderChain, InMemoryHeaderChain};
pub use client::DapiClient;
pub use config::ClientConfig;
pub use error::{
    ChainError, ConfigError, DapiClientError, DiscoveryError, LoggingError, RpcError,
    TransportError,
};
pub use sml::{MasternodeDiscovery, MasternodeList, MasternodeListDiff, MasternodeListEntry};
pub use sync::{HeaderChainProvider, HeaderRange, HeaderSyncOutcome};
pub use transport::{TransportKind, TransportManager};
