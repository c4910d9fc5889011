//! Topic-bound send policy.

use crate::error::ResolveError;
use crate::request::{encode_request, RequestData};
use crate::topic::request_topic;
use crate::traits::{Messenger, PeerListCreator};
use rand::seq::SliceRandom;
use shardsync_types::{PeerId, ShardId};
use std::sync::Arc;
use tracing::trace;

/// Send capability bound to one data topic.
///
/// Publishes pull requests on the topic's `_REQUEST` channel to one randomly
/// chosen eligible peer per call, and sends responses point-to-point on the
/// data topic. Stateless beyond its bound topic, peer selection, and target
/// shard.
pub struct TopicResolverSender {
    messenger: Arc<dyn Messenger>,
    peer_lists: Arc<dyn PeerListCreator>,
    topic: String,
    request_topic: String,
    target_shard: ShardId,
}

impl TopicResolverSender {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        peer_lists: Arc<dyn PeerListCreator>,
        topic: impl Into<String>,
        target_shard: ShardId,
    ) -> Self {
        let topic = topic.into();
        let request_topic = request_topic(&topic);
        Self {
            messenger,
            peer_lists,
            topic,
            request_topic,
            target_shard,
        }
    }

    /// The bound data topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The bound request topic (data topic + request suffix).
    pub fn request_topic(&self) -> &str {
        &self.request_topic
    }

    /// Shard whose data this sender's resolver serves and requests.
    pub fn target_shard(&self) -> ShardId {
        self.target_shard
    }

    /// Serialize a request and publish it to one random eligible peer on
    /// the request topic.
    ///
    /// Candidates are peers connected on the data topic: a peer that can
    /// answer subscribes there, while the request channel also carries
    /// requesters with nothing to serve. One peer per call keeps redundant
    /// network load down; callers retry for coverage when a peer fails to
    /// answer.
    pub fn send_on_request_topic(&self, request: &RequestData) -> Result<(), ResolveError> {
        let payload = encode_request(request)?;

        let candidates = self.peer_lists.peer_list(&self.topic);
        shardsync_metrics::set_request_topic_peers(&self.request_topic, candidates.len());
        let Some(peer) = candidates.choose(&mut rand::thread_rng()).copied() else {
            shardsync_metrics::record_request_no_peers(&self.request_topic);
            return Err(ResolveError::NoPeers(self.request_topic.clone()));
        };

        trace!(
            topic = %self.request_topic,
            kind = request.kind.label(),
            %peer,
            "sending data request"
        );
        self.messenger
            .send_to_connected_peer(&self.request_topic, &payload, peer)?;
        shardsync_metrics::record_request_sent(request.kind.label());
        Ok(())
    }

    /// Send a response payload point-to-point on the data topic.
    pub fn send(&self, payload: &[u8], peer: PeerId) -> Result<(), ResolveError> {
        trace!(topic = %self.topic, %peer, bytes = payload.len(), "sending response");
        self.messenger
            .send_to_connected_peer(&self.topic, payload, peer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer_list::DiffPeerListCreator;
    use crate::request::RequestKind;
    use crate::test_helpers::MockMessenger;

    fn sender_with_peers(peers: &[PeerId]) -> (TopicResolverSender, Arc<MockMessenger>) {
        let messenger = Arc::new(MockMessenger::new());
        messenger.set_peers("shardBlocks_0_META", peers);
        let peer_lists = Arc::new(DiffPeerListCreator::new(messenger.clone(), None));
        let sender = TopicResolverSender::new(
            messenger.clone(),
            peer_lists,
            "shardBlocks_0_META",
            ShardId(0),
        );
        (sender, messenger)
    }

    #[test]
    fn test_request_goes_to_exactly_one_listed_peer() {
        let peers = [PeerId(1), PeerId(2), PeerId(3)];
        let (sender, messenger) = sender_with_peers(&peers);

        sender
            .send_on_request_topic(&RequestData::from_nonce(42))
            .unwrap();

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "shardBlocks_0_META_REQUEST");
        assert!(peers.contains(&sent[0].peer));

        let decoded = crate::request::decode_request(&sent[0].payload).unwrap();
        assert_eq!(decoded.kind, RequestKind::Nonce);
        assert_eq!(decoded.value, shardsync_types::nonce_to_bytes(42));
    }

    #[test]
    fn test_candidates_come_from_the_data_topic() {
        let messenger = Arc::new(MockMessenger::new());
        // Peers subscribed only to the request channel are requesters, not
        // serving candidates.
        messenger.set_peers("shardBlocks_0_META_REQUEST", &[PeerId(7)]);
        let peer_lists = Arc::new(DiffPeerListCreator::new(messenger.clone(), None));
        let sender = TopicResolverSender::new(
            messenger.clone(),
            peer_lists,
            "shardBlocks_0_META",
            ShardId(0),
        );

        let result = sender.send_on_request_topic(&RequestData::from_hash(b"h"));
        assert!(matches!(result, Err(ResolveError::NoPeers(_))));

        messenger.set_peers("shardBlocks_0_META", &[PeerId(8)]);
        sender
            .send_on_request_topic(&RequestData::from_hash(b"h"))
            .unwrap();
        let sent = messenger.sent();
        assert_eq!(sent[0].topic, "shardBlocks_0_META_REQUEST");
        assert_eq!(sent[0].peer, PeerId(8));
    }

    #[test]
    fn test_no_peers_is_an_error() {
        let (sender, messenger) = sender_with_peers(&[]);
        let result = sender.send_on_request_topic(&RequestData::from_hash(b"h"));
        assert!(matches!(result, Err(ResolveError::NoPeers(_))));
        assert!(messenger.sent().is_empty());
    }

    #[test]
    fn test_response_uses_data_topic() {
        let (sender, messenger) = sender_with_peers(&[PeerId(1)]);
        sender.send(b"payload", PeerId(9)).unwrap();

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "shardBlocks_0_META");
        assert_eq!(sent[0].peer, PeerId(9));
        assert_eq!(sent[0].payload, b"payload");
    }
}
