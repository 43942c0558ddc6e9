//! Block headers and the header-chain boundary.
//!
//! The synchronizer treats the chain structure as a collaborator: it
//! inserts headers in whatever order the parallel fetches complete and the
//! structure reconciles ordering through parent-hash linkage.

pub mod longest_chain;

#[cfg(test)]
mod longest_chain_test;

pub use longest_chain::InMemoryHeaderChain;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// A block header as returned by the verbose `getBlockHeaders` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: String,

    pub height: u32,

    #[serde(default)]
    pub version: i32,

    #[serde(rename = "merkleroot", default)]
    pub merkle_root: String,

    #[serde(default)]
    pub time: u32,

    #[serde(default)]
    pub bits: String,

    #[serde(default)]
    pub nonce: u32,

    #[serde(rename = "previousblockhash", default)]
    pub previous_block_hash: Option<String>,
}

/// A structure that accepts headers in any order within a session and
/// tracks the longest branch.
pub trait HeaderChain: Send + Sync {
    /// Insert a batch of headers. Rejecting a structurally invalid header
    /// fails the whole batch; the caller retries with the same batch.
    fn add_headers(&mut self, headers: &[BlockHeader]) -> Result<(), ChainError>;

    /// The longest connected branch, ordered from the session root to the
    /// tip.
    fn longest_chain(&self) -> Vec<BlockHeader>;

    /// Look up a stored header by hash.
    fn header(&self, hash: &str) -> Option<&BlockHeader>;
}
