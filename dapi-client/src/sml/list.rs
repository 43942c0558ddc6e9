//! The simplified masternode list and diff application.

use std::collections::BTreeMap;

use crate::sml::diff::MasternodeListDiff;
use crate::sml::entry::MasternodeListEntry;

/// A set of masternode entries, unique by `pro_reg_tx_hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasternodeList {
    entries: BTreeMap<String, MasternodeListEntry>,
}

impl MasternodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = MasternodeListEntry>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.pro_reg_tx_hash.clone(), e))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, pro_reg_tx_hash: &str) -> bool {
        self.entries.contains_key(pro_reg_tx_hash)
    }

    pub fn get(&self, pro_reg_tx_hash: &str) -> Option<&MasternodeListEntry> {
        self.entries.get(pro_reg_tx_hash)
    }

    pub fn entries(&self) -> impl Iterator<Item = &MasternodeListEntry> + Clone {
        self.entries.values()
    }

    /// All entries flagged valid, cloned out of the list.
    pub fn valid_entries(&self) -> Vec<MasternodeListEntry> {
        self.entries.values().filter(|e| e.is_valid).cloned().collect()
    }

    /// Apply a diff: remove `deleted_mns`, then insert or replace every
    /// entry in `mn_list`. Untouched entries are preserved unchanged.
    pub fn apply_diff(&self, diff: &MasternodeListDiff) -> MasternodeList {
        let mut updated = self.entries.clone();

        for pro_reg_tx_hash in &diff.deleted_mns {
            updated.remove(pro_reg_tx_hash);
        }

        for entry in &diff.mn_list {
            updated.insert(entry.pro_reg_tx_hash.clone(), entry.clone());
        }

        MasternodeList {
            entries: updated,
        }
    }

    /// A copy of the list restricted to valid entries.
    pub fn valid(&self) -> MasternodeList {
        MasternodeList {
            entries: self
                .entries
                .iter()
                .filter(|(_, e)| e.is_valid)
                .map(|(k, e)| (k.clone(), e.clone()))
                .collect(),
        }
    }
}
