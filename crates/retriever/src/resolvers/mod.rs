//! Per-category resolver implementations.
//!
//! All resolvers share the gate → parse → dispatch → resolve → respond
//! pipeline; they differ in lookup policy. Headers additionally answer
//! nonce and epoch requests, transactions answer hash batches, trie nodes
//! are storage-only.

mod body;
mod header;
mod transaction;
mod trie;

pub use body::BlockBodyResolver;
pub use header::{HeaderResolver, HeaderResolverConfig};
pub use transaction::TransactionResolver;
pub use trie::TrieNodeResolver;
