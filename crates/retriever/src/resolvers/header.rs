//! Block-header resolver.
//!
//! The widest lookup policy in the family: headers are addressable by hash,
//! by nonce (persistent nonce-store first, then the in-memory index), and
//! by epoch-start identifier (storage only, with unknown-epoch substitution
//! through the epoch provider).

use crate::error::ResolveError;
use crate::nonce_index::NonceHashIndex;
use crate::request::{decode_request, RequestData, RequestKind};
use crate::sender::TopicResolverSender;
use crate::sharding::ShardTopology;
use crate::topic::{self, request_topic};
use crate::traits::{AntifloodHandler, Cacher, DataResolver, EpochProvider, ServeOutcome, Storer};
use sbor::prelude::*;
use shardsync_types::{
    epoch_start_identifier, is_unknown_epoch_identifier, nonce_from_bytes, BlockHeader, PeerId,
};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Epoch provider used until the node's epoch subsystem installs a real one.
///
/// Reports epoch 0, so an unknown-epoch request arriving before startup
/// wiring completes resolves against the genesis epoch-start key.
struct StartupEpochProvider;

impl EpochProvider for StartupEpochProvider {
    fn current_epoch(&self) -> u32 {
        0
    }
}

/// Dependencies for a [`HeaderResolver`].
pub struct HeaderResolverConfig {
    pub sender: TopicResolverSender,
    pub antiflood: Arc<dyn AntifloodHandler>,
    /// Pool of decoded headers, keyed by header hash.
    pub headers: Arc<dyn Cacher<BlockHeader>>,
    /// Persistent header storage, keyed by header hash and by epoch-start
    /// identifier.
    pub header_storage: Arc<dyn Storer>,
    /// Persistent nonce → header-hash store for the target shard.
    pub nonce_storage: Arc<dyn Storer>,
    /// In-memory nonce → header-hash index, written by the block tracker.
    pub nonce_index: Arc<NonceHashIndex>,
    /// Used only to derive the per-topic flood-check name from this node's
    /// shard role.
    pub topology: ShardTopology,
}

/// Serves header requests by hash, nonce, or epoch identifier.
pub struct HeaderResolver {
    sender: TopicResolverSender,
    antiflood: Arc<dyn AntifloodHandler>,
    headers: Arc<dyn Cacher<BlockHeader>>,
    header_storage: Arc<dyn Storer>,
    nonce_storage: Arc<dyn Storer>,
    nonce_index: Arc<NonceHashIndex>,
    flood_topic: String,
    epoch_provider: RwLock<Arc<dyn EpochProvider>>,
}

impl HeaderResolver {
    pub fn new(config: HeaderResolverConfig) -> Self {
        let topology = config.topology;
        let prefix = if topology.self_shard().is_metachain() {
            topic::METACHAIN_BLOCKS
        } else {
            topic::SHARD_BLOCKS
        };
        let flood_topic = request_topic(&format!(
            "{prefix}{}",
            topology.communication_identifier(topology.self_shard())
        ));
        Self {
            sender: config.sender,
            antiflood: config.antiflood,
            headers: config.headers,
            header_storage: config.header_storage,
            nonce_storage: config.nonce_storage,
            nonce_index: config.nonce_index,
            flood_topic,
            epoch_provider: RwLock::new(Arc::new(StartupEpochProvider)),
        }
    }

    /// Install the real epoch provider.
    ///
    /// Set once during startup, read-only in steady state. Until it is set,
    /// unknown-epoch requests resolve as epoch 0.
    pub fn set_epoch_provider(&self, provider: Arc<dyn EpochProvider>) {
        *self
            .epoch_provider
            .write()
            .expect("epoch provider lock poisoned") = provider;
    }

    /// Resolve by header hash: pool first (fresh serialization), then
    /// storage (raw bytes unchanged).
    fn resolve_by_hash(&self, hash: &[u8]) -> Result<Option<Vec<u8>>, ResolveError> {
        if let Some(header) = self.headers.peek(hash) {
            let bytes = basic_encode(header.as_ref())
                .map_err(|e| ResolveError::Encode(format!("{e:?}")))?;
            shardsync_metrics::record_request_served("header", "cache");
            return Ok(Some(bytes));
        }
        let stored = self.header_storage.get(hash);
        if stored.is_some() {
            shardsync_metrics::record_request_served("header", "storage");
        }
        Ok(stored)
    }

    /// Resolve by nonce: the persistent nonce-store takes precedence over
    /// the in-memory index.
    fn resolve_by_nonce(&self, value: &[u8]) -> Result<Option<Vec<u8>>, ResolveError> {
        if let Some(hash) = self.nonce_storage.get(value) {
            return self.resolve_by_hash(&hash);
        }
        let nonce = nonce_from_bytes(value)?;
        match self
            .nonce_index
            .hash_for_shard(nonce, self.sender.target_shard())
        {
            Some(hash) => self.resolve_by_hash(hash.as_bytes()),
            None => Ok(None),
        }
    }

    /// Resolve by epoch identifier. Epoch-start snapshots live in storage
    /// only; there is no cache tier for this path.
    fn resolve_by_epoch(&self, value: &[u8]) -> Result<Option<Vec<u8>>, ResolveError> {
        let key = if is_unknown_epoch_identifier(value) {
            let epoch = self
                .epoch_provider
                .read()
                .expect("epoch provider lock poisoned")
                .current_epoch();
            trace!(epoch, "substituting current epoch for unknown-epoch request");
            epoch_start_identifier(epoch)
        } else {
            value.to_vec()
        };
        let stored = self.header_storage.get(&key);
        if stored.is_some() {
            shardsync_metrics::record_request_served("header", "storage");
        }
        Ok(stored)
    }
}

impl DataResolver for HeaderResolver {
    fn process_message(&self, payload: &[u8], peer: PeerId) -> Result<ServeOutcome, ResolveError> {
        let started = Instant::now();
        self.antiflood.can_process(peer).map_err(|e| {
            warn!(%peer, topic = %self.sender.topic(), "request dropped by peer flood gate");
            shardsync_metrics::record_request_dropped(self.sender.topic(), "flood");
            e
        })?;
        self.antiflood
            .can_process_on_topic(peer, &self.flood_topic)
            .map_err(|e| {
                warn!(%peer, topic = %self.flood_topic, "request dropped by topic flood gate");
                shardsync_metrics::record_request_dropped(&self.flood_topic, "flood");
                e
            })?;

        let request = decode_request(payload)?;
        shardsync_metrics::record_request_received("header");

        let bytes = match request.kind {
            RequestKind::Hash => self.resolve_by_hash(&request.value)?,
            RequestKind::Nonce => self.resolve_by_nonce(&request.value)?,
            RequestKind::Epoch => self.resolve_by_epoch(&request.value)?,
            RequestKind::HashArray => return Err(ResolveError::UnsupportedKind(request.kind)),
        };

        match bytes {
            Some(bytes) => {
                self.sender.send(&bytes, peer)?;
                shardsync_metrics::record_serve_latency("header", started.elapsed().as_secs_f64());
                Ok(ServeOutcome::Sent)
            }
            None => {
                debug!(
                    topic = %self.sender.topic(),
                    kind = request.kind.label(),
                    %peer,
                    "requested header not held"
                );
                shardsync_metrics::record_request_missing("header");
                Ok(ServeOutcome::Missing)
            }
        }
    }

    fn request_by_hash(&self, hash: &[u8]) -> Result<(), ResolveError> {
        self.sender
            .send_on_request_topic(&RequestData::from_hash(hash))
    }

    fn request_by_nonce(&self, nonce: u64) -> Result<(), ResolveError> {
        self.sender
            .send_on_request_topic(&RequestData::from_nonce(nonce))
    }

    fn request_by_epoch(&self, identifier: &[u8]) -> Result<(), ResolveError> {
        self.sender
            .send_on_request_topic(&RequestData::from_epoch(identifier))
    }
}
