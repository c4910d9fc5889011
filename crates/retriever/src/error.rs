//! Error types for the resolver subsystem.
//!
//! Construction-time failures ([`ConfigError`]) abort startup; per-message
//! failures ([`ResolveError`]) are returned to the transport's dispatch
//! callback and never take the node down.

use crate::request::RequestKind;
use crate::traits::{TrieKind, UnitType};
use shardsync_types::{NonceError, PeerId};
use thiserror::Error;

/// Antiflood gate rejection. The offending message is dropped without a
/// response and without touching cache or storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FloodError {
    #[error("peer {0} exceeded the global message budget")]
    PeerLimitExceeded(PeerId),

    #[error("peer {0} exceeded the message budget for topic {1}")]
    TopicLimitExceeded(PeerId, String),
}

/// Transport-level send failure. Surfaced to the caller; retry policy lives
/// in the requesting subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("peer {0} is not connected on topic {1}")]
    PeerNotConnected(PeerId, String),

    #[error("send failed on topic {topic}: {reason}")]
    SendFailed { topic: String, reason: String },
}

/// Per-message resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    FloodRejected(#[from] FloodError),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("request value is empty")]
    EmptyValue,

    #[error("request kind {0:?} is not served on this topic")]
    UnsupportedKind(RequestKind),

    #[error(transparent)]
    InvalidNonce(#[from] NonceError),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("no eligible peers for topic {0}")]
    NoPeers(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("operation not supported by this resolver: {0}")]
    Unsupported(&'static str),
}

/// Container registration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("topic {0} is already registered")]
    DuplicateTopic(String),

    #[error("topic {0} is not registered")]
    TopicNotFound(String),

    #[error("keys/resolvers length mismatch: {keys} keys, {resolvers} resolvers")]
    LengthMismatch { keys: usize, resolvers: usize },
}

/// Factory construction failure. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("storage provider has no unit for {0:?}")]
    MissingStorageUnit(UnitType),

    #[error("trie holder has no trie for {0:?}")]
    MissingTrie(TrieKind),

    #[error("shard topology must have at least one shard")]
    NoShards,

    #[error("self shard {self_shard} is outside the {num_shards}-shard topology")]
    SelfShardOutOfRange { self_shard: u32, num_shards: u32 },

    #[error(transparent)]
    Container(#[from] ContainerError),
}
