//! A single masternode list entry.

use serde::{Deserialize, Serialize};

/// One masternode record, as carried in masternode list diffs.
///
/// Entries are immutable value records, unique by `pro_reg_tx_hash`.
/// Field names follow the wire format of the `getMnListDiff` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasternodeListEntry {
    /// Provider registration transaction hash, the entry's unique key.
    pub pro_reg_tx_hash: String,

    pub confirmed_hash: String,

    /// Network service of the node, "host:port".
    pub service: String,

    pub pub_key_operator: String,

    #[serde(rename = "keyIDVoting")]
    pub key_id_voting: String,

    pub is_valid: bool,
}

impl MasternodeListEntry {
    /// The host part of the service address.
    pub fn host(&self) -> &str {
        self.service.split(':').next().unwrap_or(&self.service)
    }

    /// Build a placeholder entry for a configured seed service. Seeds are
    /// assumed valid until the first diff replaces them.
    pub fn from_seed(service: &str) -> Self {
        Self {
            pro_reg_tx_hash: service.to_owned(),
            confirmed_hash: String::new(),
            service: service.to_owned(),
            pub_key_operator: String::new(),
            key_id_voting: String::new(),
            is_valid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_splits_service() {
        let entry = MasternodeListEntry::from_seed("203.0.113.7:9999");
        assert_eq!(entry.host(), "203.0.113.7");

        let bare = MasternodeListEntry::from_seed("203.0.113.8");
        assert_eq!(bare.host(), "203.0.113.8");
    }

    #[test]
    fn wire_field_names_are_preserved() {
        let raw = r#"{
            "proRegTxHash": "aa11",
            "confirmedHash": "bb22",
            "service": "203.0.113.7:9999",
            "pubKeyOperator": "cc33",
            "keyIDVoting": "dd44",
            "isValid": true
        }"#;
        let entry: MasternodeListEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.pro_reg_tx_hash, "aa11");
        assert_eq!(entry.key_id_voting, "dd44");
        assert!(entry.is_valid);
    }
}
