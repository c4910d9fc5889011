//! Block-body resolver.
//!
//! Serves miniblocks and peer-change block bodies, one instance per
//! category. Bodies are addressable by hash only.

use crate::error::ResolveError;
use crate::request::{decode_request, RequestData, RequestKind};
use crate::sender::TopicResolverSender;
use crate::traits::{AntifloodHandler, Cacher, DataResolver, ServeOutcome, Storer};
use sbor::prelude::*;
use shardsync_types::{MiniBlock, PeerId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Serves block-body requests by hash.
pub struct BlockBodyResolver {
    sender: TopicResolverSender,
    antiflood: Arc<dyn AntifloodHandler>,
    pool: Arc<dyn Cacher<MiniBlock>>,
    storage: Arc<dyn Storer>,
    /// Category label for logs and metrics ("miniblocks",
    /// "peer_change_bodies").
    label: &'static str,
}

impl BlockBodyResolver {
    pub fn new(
        sender: TopicResolverSender,
        antiflood: Arc<dyn AntifloodHandler>,
        pool: Arc<dyn Cacher<MiniBlock>>,
        storage: Arc<dyn Storer>,
        label: &'static str,
    ) -> Self {
        Self {
            sender,
            antiflood,
            pool,
            storage,
            label,
        }
    }

    fn resolve_by_hash(&self, hash: &[u8]) -> Result<Option<Vec<u8>>, ResolveError> {
        if let Some(body) = self.pool.peek(hash) {
            let bytes =
                basic_encode(body.as_ref()).map_err(|e| ResolveError::Encode(format!("{e:?}")))?;
            shardsync_metrics::record_request_served(self.label, "cache");
            return Ok(Some(bytes));
        }
        let stored = self.storage.get(hash);
        if stored.is_some() {
            shardsync_metrics::record_request_served(self.label, "storage");
        }
        Ok(stored)
    }
}

impl DataResolver for BlockBodyResolver {
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

        match self.resolve_by_hash(&request.value)? {
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
                    %peer,
                    "requested block body not held"
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
