//! Flood-control gating for inbound requests.
//!
//! Uses a token bucket per peer plus a finer bucket per (peer, topic) pair.
//! Both must have a token available for a message to pass. Buckets refill
//! continuously based on elapsed time.

use crate::error::FloodError;
use crate::traits::AntifloodHandler;
use dashmap::DashMap;
use shardsync_types::PeerId;
use std::time::Instant;

/// Configuration for flood control.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Messages per second allowed per peer across all topics.
    pub peer_messages_per_sec: u32,
    /// Maximum burst size (bucket capacity) per peer.
    pub peer_burst: u32,
    /// Messages per second allowed per peer on one topic.
    pub topic_messages_per_sec: u32,
    /// Maximum burst size per (peer, topic) pair.
    pub topic_burst: u32,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            // Global budget sized for a peer syncing several categories at once
            peer_messages_per_sec: 400,
            peer_burst: 100,
            // One category alone gets a quarter of the global budget
            topic_messages_per_sec: 100,
            topic_burst: 25,
        }
    }
}

/// Token bucket state for one peer or one (peer, topic) pair.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: u32) -> Self {
        Self {
            tokens: capacity as f64,
            capacity: capacity as f64,
            refill_rate: refill_rate as f64,
            last_update: Instant::now(),
        }
    }

    /// Try to consume one token. Returns true if allowed, false if rate limited.
    fn try_consume(&mut self) -> bool {
        let now = Instant::now();

        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token-bucket flood gate over concurrent maps.
///
/// Lock-free from the caller's perspective; each check touches only the
/// entry for the calling peer.
pub struct TokenBucketAntiflood {
    config: FloodConfig,
    peers: DashMap<PeerId, TokenBucket>,
    topics: DashMap<(PeerId, String), TokenBucket>,
}

impl TokenBucketAntiflood {
    pub fn new(config: FloodConfig) -> Self {
        Self {
            config,
            peers: DashMap::new(),
            topics: DashMap::new(),
        }
    }
}

impl AntifloodHandler for TokenBucketAntiflood {
    fn can_process(&self, peer: PeerId) -> Result<(), FloodError> {
        let mut bucket = self.peers.entry(peer).or_insert_with(|| {
            TokenBucket::new(self.config.peer_burst, self.config.peer_messages_per_sec)
        });
        if bucket.try_consume() {
            Ok(())
        } else {
            Err(FloodError::PeerLimitExceeded(peer))
        }
    }

    fn can_process_on_topic(&self, peer: PeerId, topic: &str) -> Result<(), FloodError> {
        let mut bucket = self
            .topics
            .entry((peer, topic.to_string()))
            .or_insert_with(|| {
                TokenBucket::new(self.config.topic_burst, self.config.topic_messages_per_sec)
            });
        if bucket.try_consume() {
            Ok(())
        } else {
            Err(FloodError::TopicLimitExceeded(peer, topic.to_string()))
        }
    }
}

/// Flood gate that admits everything. For tests and closed deployments.
pub struct NoopAntiflood;

impl AntifloodHandler for NoopAntiflood {
    fn can_process(&self, _peer: PeerId) -> Result<(), FloodError> {
        Ok(())
    }

    fn can_process_on_topic(&self, _peer: PeerId, _topic: &str) -> Result<(), FloodError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_config() -> FloodConfig {
        FloodConfig {
            peer_messages_per_sec: 1,
            peer_burst: 3,
            topic_messages_per_sec: 1,
            topic_burst: 2,
        }
    }

    #[test]
    fn test_burst_then_rejection() {
        let gate = TokenBucketAntiflood::new(tight_config());
        let peer = PeerId(1);

        for _ in 0..3 {
            assert!(gate.can_process(peer).is_ok());
        }
        assert_eq!(gate.can_process(peer), Err(FloodError::PeerLimitExceeded(peer)));
    }

    #[test]
    fn test_topic_budget_is_independent_per_topic() {
        let gate = TokenBucketAntiflood::new(tight_config());
        let peer = PeerId(1);

        for _ in 0..2 {
            assert!(gate.can_process_on_topic(peer, "shardBlocks_0_REQUEST").is_ok());
        }
        assert_eq!(
            gate.can_process_on_topic(peer, "shardBlocks_0_REQUEST"),
            Err(FloodError::TopicLimitExceeded(
                peer,
                "shardBlocks_0_REQUEST".to_string()
            ))
        );
        // A different topic has its own bucket.
        assert!(gate.can_process_on_topic(peer, "transactions_0_REQUEST").is_ok());
    }

    #[test]
    fn test_peers_do_not_share_budgets() {
        let gate = TokenBucketAntiflood::new(tight_config());

        for _ in 0..3 {
            assert!(gate.can_process(PeerId(1)).is_ok());
        }
        assert!(gate.can_process(PeerId(1)).is_err());
        assert!(gate.can_process(PeerId(2)).is_ok());
    }

    #[test]
    fn test_noop_admits_everything() {
        let gate = NoopAntiflood;
        for _ in 0..1_000 {
            assert!(gate.can_process(PeerId(9)).is_ok());
            assert!(gate.can_process_on_topic(PeerId(9), "t").is_ok());
        }
    }
}
