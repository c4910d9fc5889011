//! Trie-node resolver.
//!
//! Serves serialized trie nodes straight from trie storage. No cache tier
//! and no nonce or epoch addressing; trie nodes are content-addressed by
//! hash only.

use crate::error::ResolveError;
use crate::request::{decode_request, RequestData, RequestKind};
use crate::sender::TopicResolverSender;
use crate::traits::{AntifloodHandler, DataResolver, ServeOutcome, Trie};
use shardsync_types::PeerId;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Serves trie-node requests by node hash.
pub struct TrieNodeResolver {
    sender: TopicResolverSender,
    antiflood: Arc<dyn AntifloodHandler>,
    trie: Arc<dyn Trie>,
    /// Category label for logs and metrics ("account_trie",
    /// "validator_trie").
    label: &'static str,
}

impl TrieNodeResolver {
    pub fn new(
        sender: TopicResolverSender,
        antiflood: Arc<dyn AntifloodHandler>,
        trie: Arc<dyn Trie>,
        label: &'static str,
    ) -> Self {
        Self {
            sender,
            antiflood,
            trie,
            label,
        }
    }
}

impl DataResolver for TrieNodeResolver {
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

        if request.kind != RequestKind::Hash {
            return Err(ResolveError::UnsupportedKind(request.kind));
        }

        match self.trie.serialized_node(&request.value) {
            Some(bytes) => {
                shardsync_metrics::record_request_served(self.label, "storage");
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
                    %peer,
                    "requested trie node not held"
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
}
