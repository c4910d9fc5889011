//! Transaction resolver.
//!
//! Serves the three transaction categories (signed, unsigned, rewards),
//! one instance per category. Transactions are addressable by single hash
//! or by hash batch; batch responses are packed with the configured
//! [`DataPacker`].

use crate::error::ResolveError;
use crate::request::{decode_request, RequestData, RequestKind};
use crate::sender::TopicResolverSender;
use crate::traits::{AntifloodHandler, Cacher, DataPacker, DataResolver, ServeOutcome, Storer};
use sbor::prelude::*;
use shardsync_types::{PeerId, Transaction};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Serves transaction requests by hash or hash batch.
pub struct TransactionResolver {
    sender: TopicResolverSender,
    antiflood: Arc<dyn AntifloodHandler>,
    pool: Arc<dyn Cacher<Transaction>>,
    storage: Arc<dyn Storer>,
    packer: Arc<dyn DataPacker>,
    /// Category label for logs and metrics ("transactions",
    /// "unsigned_transactions", "reward_transactions").
    label: &'static str,
}

impl TransactionResolver {
    pub fn new(
        sender: TopicResolverSender,
        antiflood: Arc<dyn AntifloodHandler>,
        pool: Arc<dyn Cacher<Transaction>>,
        storage: Arc<dyn Storer>,
        packer: Arc<dyn DataPacker>,
        label: &'static str,
    ) -> Self {
        Self {
            sender,
            antiflood,
            pool,
            storage,
            packer,
            label,
        }
    }

    fn resolve_by_hash(&self, hash: &[u8]) -> Result<Option<Vec<u8>>, ResolveError> {
        if let Some(tx) = self.pool.peek(hash) {
            let bytes =
                basic_encode(tx.as_ref()).map_err(|e| ResolveError::Encode(format!("{e:?}")))?;
            shardsync_metrics::record_request_served(self.label, "cache");
            return Ok(Some(bytes));
        }
        let stored = self.storage.get(hash);
        if stored.is_some() {
            shardsync_metrics::record_request_served(self.label, "storage");
        }
        Ok(stored)
    }

    /// Resolve a hash batch: serve whatever subset is held here, packed
    /// into one buffer. An empty intersection is "nothing to send".
    fn resolve_by_hash_array(&self, value: &[u8]) -> Result<Option<Vec<u8>>, ResolveError> {
        let hashes: Vec<Vec<u8>> =
            basic_decode(value).map_err(|e| ResolveError::MalformedRequest(format!("{e:?}")))?;
        let mut found = Vec::new();
        for hash in &hashes {
            if let Some(bytes) = self.resolve_by_hash(hash)? {
                found.push(bytes);
            }
        }
        if found.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.packer.pack(&found)?))
    }
}

impl DataResolver for TransactionResolver {
    fn process_message(&self, payload: &[u8], peer: PeerId) -> Result<ServeOutcome, ResolveError> {
        let started = Instant::now();
        self.antiflood.can_process(peer).map_err(|e| {
            warn!(%peer, topic = %self.sender.topic(), "request dropped by peer flood gate");
            shardsync_metrics::record_request_dropped(self.sender.topic(), "flood");
            e
        })?;
        self.antiflood
            .can_process_on_topic(peer, self.sender.request_topic())
            .map_err(|e| {
                warn!(%peer, topic = %self.sender.request_topic(), "request dropped by topic flood gate");
                shardsync_metrics::record_request_dropped(self.sender.request_topic(), "flood");
                e
            })?;

        let request = decode_request(payload)?;
        shardsync_metrics::record_request_received(self.label);

        let bytes = match request.kind {
            RequestKind::Hash => self.resolve_by_hash(&request.value)?,
            RequestKind::HashArray => self.resolve_by_hash_array(&request.value)?,
            RequestKind::Nonce | RequestKind::Epoch => {
                return Err(ResolveError::UnsupportedKind(request.kind))
            }
        };

        match bytes {
            Some(bytes) => {
                self.sender.send(&bytes, peer)?;
                shardsync_metrics::record_serve_latency(
                    self.label,
                    started.elapsed().as_secs_f64(),
                );
                Ok(ServeOutcome::Sent)
            }
            None => {
                debug!(
                    topic = %self.sender.topic(),
                    kind = request.kind.label(),
                    %peer,
                    "requested transactions not held"
                );
                shardsync_metrics::record_request_missing(self.label);
                Ok(ServeOutcome::Missing)
            }
        }
    }

    fn request_by_hash(&self, hash: &[u8]) -> Result<(), ResolveError> {
        self.sender
            .send_on_request_topic(&RequestData::from_hash(hash))
    }

    fn request_by_hash_array(&self, hashes: &[Vec<u8>]) -> Result<(), ResolveError> {
        let value = basic_encode(&hashes.to_vec())
            .map_err(|e| ResolveError::Encode(format!("{e:?}")))?;
        self.sender.send_on_request_topic(&RequestData {
            kind: RequestKind::HashArray,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antiflood::NoopAntiflood;
    use crate::packer::SliceDataPacker;
    use crate::peer_list::DiffPeerListCreator;
    use crate::request::encode_request;
    use crate::test_helpers::{make_transaction, CountingCache, CountingStorer, MockMessenger};
    use shardsync_types::ShardId;

    struct Fixture {
        resolver: TransactionResolver,
        messenger: Arc<MockMessenger>,
        pool: Arc<CountingCache<Transaction>>,
        storage: Arc<CountingStorer>,
    }

    fn fixture() -> Fixture {
        let messenger = Arc::new(MockMessenger::new());
        messenger.set_peers("transactions_0", &[PeerId(1)]);
        let peer_lists = Arc::new(DiffPeerListCreator::new(messenger.clone(), None));
        let sender =
            TopicResolverSender::new(messenger.clone(), peer_lists, "transactions_0", ShardId(0));

        let pool = Arc::new(CountingCache::new(64));
        let storage = Arc::new(CountingStorer::new());
        let resolver = TransactionResolver::new(
            sender,
            Arc::new(NoopAntiflood),
            pool.clone(),
            storage.clone(),
            Arc::new(SliceDataPacker),
            "transactions",
        );
        Fixture {
            resolver,
            messenger,
            pool,
            storage,
        }
    }

    #[test]
    fn test_pool_hit_serves_fresh_serialization() {
        let fx = fixture();
        let tx = make_transaction(1);
        let hash = tx.hash();
        fx.pool.insert(hash.as_bytes().to_vec(), Arc::new(tx.clone()));

        let payload = encode_request(&RequestData::from_hash(hash.as_bytes())).unwrap();
        fx.resolver.process_message(&payload, PeerId(3)).unwrap();
        assert_eq!(fx.messenger.sent()[0].payload, basic_encode(&tx).unwrap());
    }

    #[test]
    fn test_hash_array_serves_held_subset_packed() {
        let fx = fixture();
        fx.storage.put(b"a".to_vec(), b"tx-a".to_vec());
        fx.storage.put(b"c".to_vec(), b"tx-c".to_vec());

        let hashes = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        let value = basic_encode(&hashes).unwrap();
        let payload = encode_request(&RequestData {
            kind: RequestKind::HashArray,
            value,
        })
        .unwrap();

        let outcome = fx.resolver.process_message(&payload, PeerId(3)).unwrap();
        assert_eq!(outcome, ServeOutcome::Sent);

        let sent = fx.messenger.sent();
        let chunks = SliceDataPacker.unpack(&sent[0].payload).unwrap();
        assert_eq!(chunks, vec![b"tx-a".to_vec(), b"tx-c".to_vec()]);
    }

    #[test]
    fn test_hash_array_with_nothing_held_sends_nothing() {
        let fx = fixture();
        let value = basic_encode(&vec![b"x".to_vec()]).unwrap();
        let payload = encode_request(&RequestData {
            kind: RequestKind::HashArray,
            value,
        })
        .unwrap();
        assert_eq!(
            fx.resolver.process_message(&payload, PeerId(3)).unwrap(),
            ServeOutcome::Missing
        );
        assert!(fx.messenger.sent().is_empty());
    }

    #[test]
    fn test_nonce_requests_are_rejected() {
        let fx = fixture();
        let payload = encode_request(&RequestData::from_nonce(1)).unwrap();
        assert!(matches!(
            fx.resolver.process_message(&payload, PeerId(3)),
            Err(ResolveError::UnsupportedKind(RequestKind::Nonce))
        ));
    }

    #[test]
    fn test_request_by_hash_array_encodes_batch() {
        let fx = fixture();
        let hashes = vec![b"a".to_vec(), b"b".to_vec()];
        fx.resolver.request_by_hash_array(&hashes).unwrap();

        let sent = fx.messenger.sent();
        let request = crate::request::decode_request(&sent[0].payload).unwrap();
        assert_eq!(request.kind, RequestKind::HashArray);
        let decoded: Vec<Vec<u8>> = basic_decode(&request.value).unwrap();
        assert_eq!(decoded, hashes);
    }
}
