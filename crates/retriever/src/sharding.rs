//! Shard topology and communication identifiers.

use crate::error::ConfigError;
use shardsync_types::ShardId;

/// This node's position in the shard layout.
///
/// Produces the deterministic topic suffixes that separate intra-shard from
/// cross-shard traffic. Consumers treat the output as an opaque stable
/// string and rely only on equality and suffix concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardTopology {
    self_shard: ShardId,
    num_shards: u32,
}

impl ShardTopology {
    /// Build a topology for `self_shard` in a network of `num_shards` shards
    /// plus the metachain.
    pub fn new(self_shard: ShardId, num_shards: u32) -> Result<Self, ConfigError> {
        if num_shards == 0 {
            return Err(ConfigError::NoShards);
        }
        if !self_shard.is_metachain() && self_shard.0 >= num_shards {
            return Err(ConfigError::SelfShardOutOfRange {
                self_shard: self_shard.0,
                num_shards,
            });
        }
        Ok(Self {
            self_shard,
            num_shards,
        })
    }

    /// The shard this node belongs to.
    pub fn self_shard(&self) -> ShardId {
        self.self_shard
    }

    /// Number of regular shards, excluding the metachain.
    pub fn num_shards(&self) -> u32 {
        self.num_shards
    }

    /// Topic suffix for traffic between this node's shard and `dest`.
    ///
    /// Intra-shard traffic uses a single-shard suffix (`_0`); cross-shard
    /// traffic orders the pair numerically with the metachain last
    /// (`_0_META`), so both sides derive the same topic name.
    pub fn communication_identifier(&self, dest: ShardId) -> String {
        if dest == self.self_shard {
            return format!("_{}", self.self_shard);
        }
        let (low, high) = if self.self_shard.is_metachain() {
            (dest, self.self_shard)
        } else if dest.is_metachain() || self.self_shard.0 <= dest.0 {
            (self.self_shard, dest)
        } else {
            (dest, self.self_shard)
        };
        format!("_{low}_{high}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intra_shard_identifier() {
        let topology = ShardTopology::new(ShardId(0), 2).unwrap();
        assert_eq!(topology.communication_identifier(ShardId(0)), "_0");
    }

    #[test]
    fn test_cross_shard_identifier_is_ordered() {
        let from_zero = ShardTopology::new(ShardId(0), 3).unwrap();
        let from_two = ShardTopology::new(ShardId(2), 3).unwrap();
        assert_eq!(from_zero.communication_identifier(ShardId(2)), "_0_2");
        assert_eq!(from_two.communication_identifier(ShardId(0)), "_0_2");
    }

    #[test]
    fn test_metachain_renders_last() {
        let topology = ShardTopology::new(ShardId(1), 2).unwrap();
        assert_eq!(
            topology.communication_identifier(ShardId::METACHAIN),
            "_1_META"
        );
        let meta = ShardTopology::new(ShardId::METACHAIN, 2).unwrap();
        assert_eq!(meta.communication_identifier(ShardId(1)), "_1_META");
    }

    #[test]
    fn test_rejects_bad_topologies() {
        assert_eq!(
            ShardTopology::new(ShardId(0), 0),
            Err(ConfigError::NoShards)
        );
        assert_eq!(
            ShardTopology::new(ShardId(5), 2),
            Err(ConfigError::SelfShardOutOfRange {
                self_shard: 5,
                num_shards: 2
            })
        );
    }
}
