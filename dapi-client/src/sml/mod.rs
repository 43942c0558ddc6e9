//! Simplified masternode list: entries, diffs, the cached list provider,
//! and random-peer discovery.

pub mod diff;
pub mod discovery;
pub mod entry;
pub mod list;
pub mod provider;


pub use diff::{DiffVerifier, MasternodeListDiff, NoopVerifier};
pub use discovery::MasternodeDiscovery;
pub use entry::MasternodeListEntry;
pub use list::MasternodeList;
pub use provider::{MasternodeListProvider, NULL_BLOCK_HASH};

use rand::Rng;

/// Pick one item uniformly at random from the candidates an exclusion
/// predicate lets through, without materializing the filtered set.
pub(crate) fn sample_excluding<T, I, R, F>(candidates: I, rng: &mut R, excluded: F) -> Option<T>
where
    I: Iterator<Item = T> + Clone,
    R: Rng + ?Sized,
    F: Fn(&T) -> bool,
{
    let total = candidates.clone().filter(|c| !excluded(c)).count();
    if total == 0 {
        return None;
    }
    let index = rng.gen_range(0..total);
    candidates.filter(|c| !excluded(c)).nth(index)
}
