//! Core types for the shardsync data-retrieval layer.
//!
//! This crate provides the foundational types used by the resolver subsystem:
//!
//! - **Primitives**: Hash, shard and peer identifiers
//! - **Key encoding**: nonce byte-slice conversion, epoch-start identifiers
//! - **Domain objects**: the decoded objects resolvers serve from cache
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not depend
//! on any other workspace crates, making it the foundation layer.

mod block;
mod epoch;
mod hash;
mod identifiers;
mod nonce;
mod transaction;

pub use block::{BlockHeader, MiniBlock};
pub use epoch::{
    epoch_start_identifier, is_unknown_epoch_identifier, UNKNOWN_EPOCH_IDENTIFIER,
};
pub use hash::{Hash, HexError};
pub use identifiers::{PeerId, ShardId};
pub use nonce::{nonce_from_bytes, nonce_to_bytes, NonceError, NONCE_BYTES};
pub use transaction::Transaction;
