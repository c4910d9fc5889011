//! Collaborator seams for the resolver subsystem.
//!
//! The transport, storage engine, data pools, flood-control policy, and trie
//! storage are owned elsewhere in the node; resolvers consume them through
//! the narrow traits defined here. All traits are object-safe so resolvers
//! can hold `Arc<dyn ...>` handles wired in at factory time.

use crate::error::{FloodError, ResolveError, TransportError};
use shardsync_types::PeerId;
use std::sync::Arc;

/// Transport seam. Sends are fire-and-forget from the resolver's point of
/// view; delivery guarantees and timeouts are the transport's concern.
pub trait Messenger: Send + Sync {
    /// Peers currently connected and subscribed on a topic.
    fn connected_peers_on_topic(&self, topic: &str) -> Vec<PeerId>;

    /// Send a payload point-to-point to one connected peer on a topic.
    fn send_to_connected_peer(
        &self,
        topic: &str,
        payload: &[u8],
        peer: PeerId,
    ) -> Result<(), TransportError>;
}

/// Read-only view of one persistent key-value storage unit.
///
/// `None` means "not stored here", an expected steady-state condition while
/// peers are still syncing. This subsystem never writes.
pub trait Storer: Send + Sync {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
}

/// Read-only view of a bounded cache of decoded domain objects.
///
/// `peek` must not promote the entry in the eviction order; resolvers
/// observing a cache entry must not keep it alive.
pub trait Cacher<T>: Send + Sync {
    fn peek(&self, key: &[u8]) -> Option<Arc<T>>;
}

/// Read-only view of one trie storage, addressed by node hash.
pub trait Trie: Send + Sync {
    fn serialized_node(&self, hash: &[u8]) -> Option<Vec<u8>>;
}

/// Reports the epoch this node currently operates in. Used to resolve the
/// unknown-epoch request marker.
pub trait EpochProvider: Send + Sync {
    fn current_epoch(&self) -> u32;
}

/// Flood-control gate consulted before any resolution work.
///
/// Both checks must pass before a resolver touches its cache or storage,
/// which bounds the cost an adversarial requester can impose.
pub trait AntifloodHandler: Send + Sync {
    /// Global per-peer budget check.
    fn can_process(&self, peer: PeerId) -> Result<(), FloodError>;

    /// Per-peer, per-topic budget check.
    fn can_process_on_topic(&self, peer: PeerId, topic: &str) -> Result<(), FloodError>;
}

/// Produces the candidate peer set for outbound requests on a topic.
pub trait PeerListCreator: Send + Sync {
    fn peer_list(&self, topic: &str) -> Vec<PeerId>;
}

/// Packs multiple payloads into one response buffer and back.
///
/// Used by resolvers that answer batch (hash-array) requests.
pub trait DataPacker: Send + Sync {
    fn pack(&self, payloads: &[Vec<u8>]) -> Result<Vec<u8>, ResolveError>;
    fn unpack(&self, buffer: &[u8]) -> Result<Vec<Vec<u8>>, ResolveError>;
}

/// Names one persistent storage unit held by the storage provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Transactions,
    UnsignedTransactions,
    RewardTransactions,
    MiniBlocks,
    PeerChangeBlocks,
    BlockHeaders,
    MetaBlockHeaders,
    /// Per-shard nonce → header-hash index for shard headers.
    ShardHeaderNonceHash(u32),
    /// Nonce → header-hash index for metachain headers.
    MetaHeaderNonceHash,
}

/// Names one trie storage held by the trie holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrieKind {
    UserAccounts,
    ValidatorAccounts,
}

/// Storage engine seam: hands out read-only storage units by name.
pub trait StorageProvider: Send + Sync {
    fn unit(&self, unit: UnitType) -> Option<Arc<dyn Storer>>;
}

/// Trie storage seam: hands out read-only tries by role.
pub trait TriesHolder: Send + Sync {
    fn trie(&self, kind: TrieKind) -> Option<Arc<dyn Trie>>;
}

/// Result of serving one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// A response was sent to the requesting peer.
    Sent,
    /// The data is not held here. Not an error; nothing was sent.
    Missing,
}

/// One data-category resolver: serves inbound requests from cache/storage
/// and issues outbound requests for data this node is missing.
///
/// Categories that do not support a lookup key keep the default
/// `Unsupported` implementations; only the header resolver answers nonce
/// and epoch requests.
pub trait DataResolver: Send + Sync {
    /// Serve one inbound request message from a peer.
    fn process_message(&self, payload: &[u8], peer: PeerId) -> Result<ServeOutcome, ResolveError>;

    /// Request an object by hash on the bound request topic.
    fn request_by_hash(&self, hash: &[u8]) -> Result<(), ResolveError>;

    /// Request an object by sequence number.
    fn request_by_nonce(&self, _nonce: u64) -> Result<(), ResolveError> {
        Err(ResolveError::Unsupported("request_by_nonce"))
    }

    /// Request an epoch-scoped object by epoch identifier.
    fn request_by_epoch(&self, _identifier: &[u8]) -> Result<(), ResolveError> {
        Err(ResolveError::Unsupported("request_by_epoch"))
    }

    /// Request a batch of objects by hash in one message.
    fn request_by_hash_array(&self, _hashes: &[Vec<u8>]) -> Result<(), ResolveError> {
        Err(ResolveError::Unsupported("request_by_hash_array"))
    }
}

impl std::fmt::Debug for dyn DataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn DataResolver")
    }
}
