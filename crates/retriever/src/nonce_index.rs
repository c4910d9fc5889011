//! In-memory nonce → header-hash index.
//!
//! Populated by the block-tracking side of the node as headers are observed;
//! resolvers only read it. A nonce may map to different hashes in different
//! shards' views during reorganizations, so entries carry the shard they
//! were observed for.

use dashmap::DashMap;
use shardsync_types::{Hash, ShardId};

/// Concurrent map from sequence number to per-shard header hashes.
///
/// Readers and the external writer proceed without blocking each other;
/// growth is bounded by the writer's own eviction.
#[derive(Default)]
pub struct NonceHashIndex {
    entries: DashMap<u64, Vec<(ShardId, Hash)>>,
}

impl NonceHashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hash observed for `nonce` in `shard`, replacing any
    /// previous entry for that shard.
    pub fn insert(&self, nonce: u64, shard: ShardId, hash: Hash) {
        let mut entry = self.entries.entry(nonce).or_default();
        match entry.iter_mut().find(|(s, _)| *s == shard) {
            Some(slot) => slot.1 = hash,
            None => entry.push((shard, hash)),
        }
    }

    /// Hash observed for `nonce` in `shard`, if any.
    pub fn hash_for_shard(&self, nonce: u64, shard: ShardId) -> Option<Hash> {
        self.entries
            .get(&nonce)
            .and_then(|entry| entry.iter().find(|(s, _)| *s == shard).map(|(_, h)| *h))
    }

    /// Drop all entries for a nonce.
    pub fn remove(&self, nonce: u64) {
        self.entries.remove(&nonce);
    }
}
