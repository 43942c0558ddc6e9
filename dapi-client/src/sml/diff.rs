//! Masternode list diffs and the diff verification hook.

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;
use crate::sml::entry::MasternodeListEntry;

/// An incremental delta moving the cached masternode list from
/// `base_block_hash` to `block_hash`.
///
/// The coinbase transaction and merkle fields carry the commitment proof
/// for the new list; they are handed to the configured [`DiffVerifier`]
/// before the diff is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasternodeListDiff {
    pub base_block_hash: String,

    pub block_hash: String,

    #[serde(rename = "deletedMNs", default)]
    pub deleted_mns: Vec<String>,

    #[serde(rename = "mnList", default)]
    pub mn_list: Vec<MasternodeListEntry>,

    #[serde(default)]
    pub cb_tx: String,

    #[serde(default)]
    pub cb_tx_merkle_tree: String,

    #[serde(rename = "merkleRootMNList", default)]
    pub merkle_root_mn_list: String,
}

/// Hook point for validating a diff's merkle-proof payload before it is
/// applied.
pub trait DiffVerifier: Send + Sync {
    fn verify(&self, diff: &MasternodeListDiff) -> Result<(), DiscoveryError>;
}

/// Accepts every diff. Proof validation of the coinbase commitment is not
/// wired up; callers that need it supply their own [`DiffVerifier`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVerifier;

impl DiffVerifier for NoopVerifier {
    fn verify(&self, _diff: &MasternodeListDiff) -> Result<(), DiscoveryError> {
        Ok(())
    }
}
