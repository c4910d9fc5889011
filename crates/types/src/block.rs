//! Block header and miniblock types served by resolvers.

use crate::{Hash, ShardId};
use sbor::prelude::*;

/// Block header as held in header pools and header storage.
///
/// Resolvers serve headers looked up by hash, by nonce, or by epoch-start
/// identifier. Only the fields the retrieval layer itself reads are modeled
/// here; consumers decode the full payload downstream.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct BlockHeader {
    /// Shard this header belongs to.
    pub shard: ShardId,

    /// Sequential block number within the shard.
    pub nonce: u64,

    /// Epoch the block was produced in.
    pub epoch: u32,

    /// Hash of the previous block header.
    pub prev_hash: Hash,

    /// Root hash of the state after applying this block.
    pub state_root: Hash,

    /// Unix timestamp (milliseconds) when the block was proposed.
    pub timestamp: u64,
}

impl BlockHeader {
    /// Compute hash of this header.
    pub fn hash(&self) -> Hash {
        let bytes = basic_encode(self).expect("BlockHeader serialization should never fail");
        Hash::from_bytes(&bytes)
    }
}

/// A miniblock groups transaction hashes routed between a sender and a
/// receiver shard.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct MiniBlock {
    /// Shard that produced the transactions.
    pub sender_shard: ShardId,

    /// Shard that executes the transactions.
    pub receiver_shard: ShardId,

    /// Hashes of the transactions in this miniblock.
    pub tx_hashes: Vec<Hash>,
}

impl MiniBlock {
    /// Compute hash of this miniblock.
    pub fn hash(&self) -> Hash {
        let bytes = basic_encode(self).expect("MiniBlock serialization should never fail");
        Hash::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            shard: ShardId(0),
            nonce: 10,
            epoch: 1,
            prev_hash: Hash::from_bytes(b"prev"),
            state_root: Hash::from_bytes(b"root"),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_header_hash_deterministic() {
        assert_eq!(sample_header().hash(), sample_header().hash());
    }

    #[test]
    fn test_header_hash_changes_with_nonce() {
        let a = sample_header();
        let mut b = sample_header();
        b.nonce += 1;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_miniblock_encode_roundtrip() {
        let mb = MiniBlock {
            sender_shard: ShardId(0),
            receiver_shard: ShardId(1),
            tx_hashes: vec![Hash::from_bytes(b"tx1"), Hash::from_bytes(b"tx2")],
        };
        let bytes = basic_encode(&mb).unwrap();
        let decoded: MiniBlock = basic_decode(&bytes).unwrap();
        assert_eq!(decoded, mb);
    }
}
