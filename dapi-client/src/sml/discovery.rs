//! Random masternode selection over the cached list.

use crate::error::DiscoveryError;
use crate::sml::entry::MasternodeListEntry;
use crate::sml::provider::MasternodeListProvider;
use crate::sml::sample_excluding;

/// Facade over [`MasternodeListProvider`] adding uniform random peer
/// selection with an exclusion set.
pub struct MasternodeDiscovery {
    provider: MasternodeListProvider,
}

impl MasternodeDiscovery {
    pub fn new(provider: MasternodeListProvider) -> Self {
        Self {
            provider,
        }
    }

    /// The current valid masternode entries.
    pub async fn masternode_list(&self) -> Result<Vec<MasternodeListEntry>, DiscoveryError> {
        self.provider.masternode_list().await
    }

    /// Pick one masternode uniformly at random, skipping any entry whose
    /// host appears in `excluded_addresses`. An empty remainder is an
    /// error; there is no fallback peer.
    pub async fn random_masternode(
        &self,
        excluded_addresses: &[String],
    ) -> Result<MasternodeListEntry, DiscoveryError> {
        let entries = self.provider.masternode_list().await?;
        let mut rng = rand::thread_rng();
        sample_excluding(entries.iter(), &mut rng, |e| {
            excluded_addresses.iter().any(|a| a == e.host())
        })
        .cloned()
        .ok_or(DiscoveryError::NoAvailableMasternodes)
    }

    /// Revert to the configured seed list. Intended for test isolation.
    pub async fn reset(&self) {
        self.provider.reset().await
    }

    pub fn provider(&self) -> &MasternodeListProvider {
        &self.provider
    }
}
