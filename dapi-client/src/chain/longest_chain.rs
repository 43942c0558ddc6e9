//! In-memory header chain with longest-branch selection.

use std::collections::{HashMap, HashSet};

use crate::chain::{BlockHeader, HeaderChain};
use crate::error::ChainError;

/// Header store keyed by hash.
///
/// Headers may arrive out of order; linkage is re-derived from
/// `previous_block_hash` on every longest-chain query, so a parent arriving
/// after its child connects the child retroactively.
#[derive(Debug, Default)]
pub struct InMemoryHeaderChain {
    headers: HashMap<String, BlockHeader>,
}

impl InMemoryHeaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn validate(&self, header: &BlockHeader) -> Result<(), ChainError> {
        if header.hash.is_empty() {
            return Err(ChainError::InvalidHeader {
                hash: String::new(),
                reason: "empty block hash".to_owned(),
            });
        }
        if header.height > 0 && header.previous_block_hash.is_none() {
            return Err(ChainError::InvalidHeader {
                hash: header.hash.clone(),
                reason: "missing parent hash above height 0".to_owned(),
            });
        }
        if let Some(existing) = self.headers.get(&header.hash) {
            if existing != header {
                return Err(ChainError::InvalidHeader {
                    hash: header.hash.clone(),
                    reason: "conflicting header for the same hash".to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Length of the connected ancestor path ending at `tip`.
    fn connected_depth(&self, tip: &BlockHeader) -> usize {
        let mut depth = 1;
        let mut current = tip;
        while let Some(parent_hash) = &current.previous_block_hash {
            match self.headers.get(parent_hash) {
                Some(parent) => {
                    depth += 1;
                    current = parent;
                }
                None => break,
            }
        }
        depth
    }
}

impl HeaderChain for InMemoryHeaderChain {
    fn add_headers(&mut self, headers: &[BlockHeader]) -> Result<(), ChainError> {
        // Validate the whole batch before storing anything, so a rejected
        // batch can be retried as-is.
        for header in headers {
            self.validate(header)?;
        }
        for header in headers {
            self.headers.insert(header.hash.clone(), header.clone());
        }
        Ok(())
    }

    fn longest_chain(&self) -> Vec<BlockHeader> {
        let parents: HashSet<&String> = self
            .headers
            .values()
            .filter_map(|h| h.previous_block_hash.as_ref())
            .collect();

        // Tips are headers no other header points back to.
        let best_tip = self
            .headers
            .values()
            .filter(|h| !parents.contains(&h.hash))
            .map(|tip| (self.connected_depth(tip), tip))
            .max_by(|(depth_a, a), (depth_b, b)| {
                depth_a
                    .cmp(depth_b)
                    .then(a.height.cmp(&b.height))
                    .then(a.hash.cmp(&b.hash))
            });

        let Some((_, tip)) = best_tip else {
            return Vec::new();
        };

        let mut chain = vec![tip.clone()];
        let mut current = tip;
        while let Some(parent_hash) = &current.previous_block_hash {
            match self.headers.get(parent_hash) {
                Some(parent) => {
                    chain.push(parent.clone());
                    current = parent;
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    fn header(&self, hash: &str) -> Option<&BlockHeader> {
        self.headers.get(hash)
    }
}
