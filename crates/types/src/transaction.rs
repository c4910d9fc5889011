//! Transaction type served by transaction resolvers.

use crate::Hash;
use sbor::prelude::*;

/// A transaction as held in transaction pools and storage.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct Transaction {
    /// Account nonce of the sender.
    pub nonce: u64,

    /// Sender account address hash.
    pub sender: Hash,

    /// Receiver account address hash.
    pub receiver: Hash,

    /// Transferred amount, smallest denomination.
    pub value: u128,

    /// Opaque call data.
    pub data: Vec<u8>,
}

impl Transaction {
    /// Compute hash of this transaction.
    pub fn hash(&self) -> Hash {
        let bytes = basic_encode(self).expect("Transaction serialization should never fail");
        Hash::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_distinguishes_transactions() {
        let tx = Transaction {
            nonce: 1,
            sender: Hash::from_bytes(b"alice"),
            receiver: Hash::from_bytes(b"bob"),
            value: 100,
            data: vec![],
        };
        let mut other = tx.clone();
        other.value = 101;
        assert_ne!(tx.hash(), other.hash());
    }
}
