//! Shared mock collaborators and object builders for tests.
//!
//! The mocks count reads so tests can assert that gated paths never touch
//! cache or storage.

use crate::cache::DataCache;
use crate::error::{FloodError, TransportError};
use crate::traits::{
    AntifloodHandler, Cacher, EpochProvider, Messenger, StorageProvider, Storer, Trie, TrieKind,
    TriesHolder, UnitType,
};
use shardsync_types::{BlockHeader, Hash, MiniBlock, PeerId, ShardId, Transaction};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// One message captured by [`MockMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub topic: String,
    pub peer: PeerId,
    pub payload: Vec<u8>,
}

/// In-memory transport double recording every send.
#[derive(Default)]
pub struct MockMessenger {
    peers: RwLock<HashMap<String, Vec<PeerId>>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the connected peer set for a topic.
    pub fn set_peers(&self, topic: &str, peers: &[PeerId]) {
        self.peers
            .write()
            .expect("mock peers lock poisoned")
            .insert(topic.to_string(), peers.to_vec());
    }

    /// All messages sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("mock sent lock poisoned").clone()
    }
}

impl Messenger for MockMessenger {
    fn connected_peers_on_topic(&self, topic: &str) -> Vec<PeerId> {
        self.peers
            .read()
            .expect("mock peers lock poisoned")
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    fn send_to_connected_peer(
        &self,
        topic: &str,
        payload: &[u8],
        peer: PeerId,
    ) -> Result<(), TransportError> {
        self.sent
            .lock()
            .expect("mock sent lock poisoned")
            .push(SentMessage {
                topic: topic.to_string(),
                peer,
                payload: payload.to_vec(),
            });
        Ok(())
    }
}

/// In-memory storage unit counting reads.
#[derive(Default)]
pub struct CountingStorer {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    reads: AtomicUsize,
}

impl CountingStorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) {
        self.entries
            .write()
            .expect("mock storage lock poisoned")
            .insert(key, value);
    }

    /// Number of `get` calls observed.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Storer for CountingStorer {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.entries
            .read()
            .expect("mock storage lock poisoned")
            .get(key)
            .cloned()
    }
}

/// Cache double counting peeks.
pub struct CountingCache<T> {
    inner: DataCache<T>,
    peeks: AtomicUsize,
}

impl<T> CountingCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: DataCache::new(capacity),
            peeks: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, key: Vec<u8>, value: Arc<T>) {
        self.inner.insert(key, value);
    }

    /// Number of `peek` calls observed.
    pub fn peeks(&self) -> usize {
        self.peeks.load(Ordering::Relaxed)
    }
}

impl<T: Send + Sync + 'static> Cacher<T> for CountingCache<T> {
    fn peek(&self, key: &[u8]) -> Option<Arc<T>> {
        self.peeks.fetch_add(1, Ordering::Relaxed);
        self.inner.peek(key)
    }
}

/// In-memory trie storage double.
#[derive(Default)]
pub struct MockTrie {
    nodes: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MockTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, hash: Vec<u8>, node: Vec<u8>) {
        self.nodes
            .write()
            .expect("mock trie lock poisoned")
            .insert(hash, node);
    }
}

impl Trie for MockTrie {
    fn serialized_node(&self, hash: &[u8]) -> Option<Vec<u8>> {
        self.nodes
            .read()
            .expect("mock trie lock poisoned")
            .get(hash)
            .cloned()
    }
}

/// Epoch provider reporting one fixed epoch.
pub struct FixedEpoch(pub u32);

impl EpochProvider for FixedEpoch {
    fn current_epoch(&self) -> u32 {
        self.0
    }
}

/// Flood gate rejecting every message at the per-peer check.
pub struct RejectAllAntiflood;

impl AntifloodHandler for RejectAllAntiflood {
    fn can_process(&self, peer: PeerId) -> Result<(), FloodError> {
        Err(FloodError::PeerLimitExceeded(peer))
    }

    fn can_process_on_topic(&self, peer: PeerId, topic: &str) -> Result<(), FloodError> {
        Err(FloodError::TopicLimitExceeded(peer, topic.to_string()))
    }
}

/// Storage provider with one in-memory unit per name the shard factory
/// asks for.
pub struct MemStorageProvider {
    units: RwLock<HashMap<UnitType, Arc<CountingStorer>>>,
}

impl MemStorageProvider {
    /// Provider populated with every unit the shard factory needs for
    /// `self_shard`.
    pub fn for_shard(self_shard: ShardId) -> Self {
        let provider = Self {
            units: RwLock::new(HashMap::new()),
        };
        for unit in [
            UnitType::Transactions,
            UnitType::UnsignedTransactions,
            UnitType::RewardTransactions,
            UnitType::MiniBlocks,
            UnitType::PeerChangeBlocks,
            UnitType::BlockHeaders,
            UnitType::MetaBlockHeaders,
            UnitType::ShardHeaderNonceHash(self_shard.0),
            UnitType::MetaHeaderNonceHash,
        ] {
            provider.add_unit(unit);
        }
        provider
    }

    /// Provider with no units at all.
    pub fn empty() -> Self {
        Self {
            units: RwLock::new(HashMap::new()),
        }
    }

    pub fn add_unit(&self, unit: UnitType) {
        self.units
            .write()
            .expect("mock storage provider lock poisoned")
            .insert(unit, Arc::new(CountingStorer::new()));
    }

    pub fn remove_unit(&self, unit: UnitType) {
        self.units
            .write()
            .expect("mock storage provider lock poisoned")
            .remove(&unit);
    }

    /// Direct handle to a unit, for seeding test data.
    pub fn storer(&self, unit: UnitType) -> Option<Arc<CountingStorer>> {
        self.units
            .read()
            .expect("mock storage provider lock poisoned")
            .get(&unit)
            .cloned()
    }
}

impl StorageProvider for MemStorageProvider {
    fn unit(&self, unit: UnitType) -> Option<Arc<dyn Storer>> {
        self.storer(unit).map(|s| s as Arc<dyn Storer>)
    }
}

/// Trie holder with both trie roles backed by [`MockTrie`].
pub struct MemTriesHolder {
    user: Arc<MockTrie>,
    validator: Arc<MockTrie>,
}

impl MemTriesHolder {
    pub fn new() -> Self {
        Self {
            user: Arc::new(MockTrie::new()),
            validator: Arc::new(MockTrie::new()),
        }
    }
}

impl Default for MemTriesHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TriesHolder for MemTriesHolder {
    fn trie(&self, kind: TrieKind) -> Option<Arc<dyn Trie>> {
        match kind {
            TrieKind::UserAccounts => Some(self.user.clone()),
            TrieKind::ValidatorAccounts => Some(self.validator.clone()),
        }
    }
}

/// Header for `shard` at `nonce` with deterministic contents.
pub fn make_header(shard: ShardId, nonce: u64) -> BlockHeader {
    BlockHeader {
        shard,
        nonce,
        epoch: 0,
        prev_hash: Hash::from_bytes(&nonce.to_be_bytes()),
        state_root: Hash::from_bytes(b"state"),
        timestamp: 1_700_000_000_000 + nonce,
    }
}

/// Transaction with deterministic contents derived from `seed`.
pub fn make_transaction(seed: u64) -> Transaction {
    Transaction {
        nonce: seed,
        sender: Hash::from_bytes(b"sender"),
        receiver: Hash::from_bytes(b"receiver"),
        value: u128::from(seed) * 10,
        data: vec![],
    }
}

/// Miniblock routing two transaction hashes between the given shards.
pub fn make_miniblock(sender_shard: ShardId, receiver_shard: ShardId) -> MiniBlock {
    MiniBlock {
        sender_shard,
        receiver_shard,
        tx_hashes: vec![Hash::from_bytes(b"tx1"), Hash::from_bytes(b"tx2")],
    }
}
