//! Resolver subsystem for the shardsync data-retrieval layer.
//!
//! A node that is missing blocks, transactions, or trie fragments pulls
//! them from peers over per-category request topics. This crate provides:
//!
//! - **Resolvers**: one per data category, answering inbound requests from
//!   cache/storage and issuing outbound requests
//! - **Container**: concurrent topic → resolver registry used by the
//!   transport's dispatch path
//! - **Factory**: shard-aware wiring of the full resolver set, including
//!   topic naming and peer-selection policy
//!
//! The transport, storage engine, data pools, and flood-control policy are
//! external collaborators consumed through the traits in [`traits`].

pub mod antiflood;
pub mod cache;
pub mod container;
pub mod error;
pub mod factory;
pub mod nonce_index;
pub mod packer;
pub mod peer_list;
pub mod request;
pub mod resolvers;
pub mod sender;
pub mod sharding;
pub mod test_helpers;
pub mod topic;
pub mod traits;

pub use antiflood::{FloodConfig, NoopAntiflood, TokenBucketAntiflood};
pub use cache::DataCache;
pub use container::ResolverContainer;
pub use error::{ConfigError, ContainerError, FloodError, ResolveError, TransportError};
pub use factory::{DataPools, FactoryConfig, ShardResolverFactory};
pub use nonce_index::NonceHashIndex;
pub use packer::SliceDataPacker;
pub use peer_list::DiffPeerListCreator;
pub use request::{decode_request, encode_request, RequestData, RequestKind};
pub use resolvers::{
    BlockBodyResolver, HeaderResolver, HeaderResolverConfig, TransactionResolver, TrieNodeResolver,
};
pub use sender::TopicResolverSender;
pub use sharding::ShardTopology;
pub use traits::{
    AntifloodHandler, Cacher, DataPacker, DataResolver, EpochProvider, Messenger, PeerListCreator,
    ServeOutcome, StorageProvider, Storer, Trie, TrieKind, TriesHolder, UnitType,
};
