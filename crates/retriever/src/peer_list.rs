//! Candidate peer selection for outbound requests.

use crate::traits::{Messenger, PeerListCreator};
use shardsync_types::PeerId;
use std::collections::HashSet;
use std::sync::Arc;

/// Peer-list creator with best-effort sibling-topic exclusion.
///
/// Peers that are also candidates on the excluded sibling topic are filtered
/// out so the same peer is not asked twice across related topics. Exclusion
/// is de-duplication, not a hard constraint: if filtering would leave no
/// candidates, the unfiltered list is returned.
pub struct DiffPeerListCreator {
    messenger: Arc<dyn Messenger>,
    excluded_topic: Option<String>,
}

impl DiffPeerListCreator {
    pub fn new(messenger: Arc<dyn Messenger>, excluded_topic: Option<String>) -> Self {
        Self {
            messenger,
            excluded_topic,
        }
    }
}

impl PeerListCreator for DiffPeerListCreator {
    fn peer_list(&self, topic: &str) -> Vec<PeerId> {
        let peers = self.messenger.connected_peers_on_topic(topic);
        let Some(excluded_topic) = &self.excluded_topic else {
            return peers;
        };

        let excluded: HashSet<PeerId> = self
            .messenger
            .connected_peers_on_topic(excluded_topic)
            .into_iter()
            .collect();
        let filtered: Vec<PeerId> = peers
            .iter()
            .copied()
            .filter(|peer| !excluded.contains(peer))
            .collect();

        if filtered.is_empty() {
            peers
        } else {
            filtered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockMessenger;

    #[test]
    fn test_no_exclusion_returns_topic_peers() {
        let messenger = Arc::new(MockMessenger::new());
        messenger.set_peers("headers", &[PeerId(1), PeerId(2)]);
        let creator = DiffPeerListCreator::new(messenger, None);
        assert_eq!(creator.peer_list("headers"), vec![PeerId(1), PeerId(2)]);
    }

    #[test]
    fn test_excludes_sibling_topic_peers() {
        let messenger = Arc::new(MockMessenger::new());
        messenger.set_peers("headers", &[PeerId(1), PeerId(2), PeerId(3)]);
        messenger.set_peers("transactions", &[PeerId(2)]);
        let creator = DiffPeerListCreator::new(messenger, Some("transactions".to_string()));
        assert_eq!(creator.peer_list("headers"), vec![PeerId(1), PeerId(3)]);
    }

    #[test]
    fn test_exclusion_never_starves_the_requester() {
        let messenger = Arc::new(MockMessenger::new());
        messenger.set_peers("headers", &[PeerId(1), PeerId(2)]);
        messenger.set_peers("transactions", &[PeerId(1), PeerId(2)]);
        let creator = DiffPeerListCreator::new(messenger, Some("transactions".to_string()));
        // Every candidate is also on the sibling topic; fall back to the full list.
        assert_eq!(creator.peer_list("headers"), vec![PeerId(1), PeerId(2)]);
    }
}
