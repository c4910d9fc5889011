//! Shard and peer identifiers.

use sbor::prelude::*;
use std::fmt;

/// Identifies a shard in the network.
///
/// The metachain is represented by the reserved value [`ShardId::METACHAIN`];
/// regular shards are numbered from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
#[sbor(transparent)]
pub struct ShardId(pub u32);

impl ShardId {
    /// Reserved identifier for the metachain.
    pub const METACHAIN: Self = Self(u32::MAX);

    /// Check whether this identifier names the metachain.
    pub fn is_metachain(&self) -> bool {
        *self == Self::METACHAIN
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_metachain() {
            write!(f, "META")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Identifies a peer on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
#[sbor(transparent)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metachain_sentinel() {
        assert!(ShardId::METACHAIN.is_metachain());
        assert!(!ShardId(0).is_metachain());
        assert!(!ShardId(2).is_metachain());
    }

    #[test]
    fn test_display() {
        assert_eq!(ShardId(3).to_string(), "3");
        assert_eq!(ShardId::METACHAIN.to_string(), "META");
        assert_eq!(PeerId(7).to_string(), "peer-7");
    }
}
