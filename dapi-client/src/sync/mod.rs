//! Parallel block-header synchronization across the masternode set.

pub mod chunk;
pub mod headers;

#[cfg(test)]
mod headers_test;

pub use chunk::{HeaderChainChunk, HeaderRange, MAX_HEADERS_PER_REQUEST};
pub use headers::{HeaderChainProvider, HeaderSyncOutcome, SUB_RANGE_RETRY_LIMIT};
