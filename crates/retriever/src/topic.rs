//! Topic name composition.
//!
//! Each data category owns two address spaces: the data topic, where peers
//! exchange payloads, and the request topic (data topic + `_REQUEST`) used
//! for pull requests. The shard-communication suffix is appended by
//! [`crate::sharding::ShardTopology`].

/// Shard block headers.
pub const SHARD_BLOCKS: &str = "shardBlocks";

/// Metachain block headers.
pub const METACHAIN_BLOCKS: &str = "metachainBlocks";

/// Signed user transactions.
pub const TRANSACTIONS: &str = "transactions";

/// Smart-contract result transactions.
pub const UNSIGNED_TRANSACTIONS: &str = "unsignedTransactions";

/// Protocol reward transactions.
pub const REWARD_TRANSACTIONS: &str = "rewardsTransactions";

/// Transaction block bodies (miniblocks).
pub const MINI_BLOCKS: &str = "txBlockBodies";

/// Peer-change block bodies.
pub const PEER_CHANGE_BLOCKS: &str = "peerChangeBlockBodies";

/// User-account trie nodes.
pub const ACCOUNT_TRIE_NODES: &str = "accountTrieNodes";

/// Validator-account trie nodes.
pub const VALIDATOR_TRIE_NODES: &str = "validatorTrieNodes";

/// Suffix distinguishing the request channel from the data channel.
pub const REQUEST_SUFFIX: &str = "_REQUEST";

/// Request topic for a data topic.
pub fn request_topic(topic: &str) -> String {
    format!("{topic}{REQUEST_SUFFIX}")
}
