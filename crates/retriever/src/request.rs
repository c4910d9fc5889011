//! Request wire message.
//!
//! Every pull request carried on a `_REQUEST` topic is one SBOR-encoded
//! [`RequestData`]. The `value` bytes are interpreted per [`RequestKind`]:
//! a raw object hash, a fixed-width big-endian nonce, an epoch identifier
//! (possibly the unknown-epoch marker), or an SBOR-encoded hash batch.

use crate::error::ResolveError;
use sbor::prelude::*;

/// How the `value` bytes of a [`RequestData`] should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BasicSbor)]
pub enum RequestKind {
    /// `value` is a raw object hash.
    Hash,
    /// `value` is a big-endian 8-byte sequence number.
    Nonce,
    /// `value` is an epoch identifier string.
    Epoch,
    /// `value` is an SBOR-encoded `Vec<Vec<u8>>` of object hashes.
    HashArray,
}

impl RequestKind {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Nonce => "nonce",
            Self::Epoch => "epoch",
            Self::HashArray => "hash_array",
        }
    }
}

/// Wire-level request descriptor.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct RequestData {
    /// Interpretation of `value`.
    pub kind: RequestKind,
    /// Lookup key bytes. Never empty in a well-formed request.
    pub value: Vec<u8>,
}

impl RequestData {
    /// Build a hash-keyed request.
    pub fn from_hash(hash: &[u8]) -> Self {
        Self {
            kind: RequestKind::Hash,
            value: hash.to_vec(),
        }
    }

    /// Build a nonce-keyed request.
    pub fn from_nonce(nonce: u64) -> Self {
        Self {
            kind: RequestKind::Nonce,
            value: shardsync_types::nonce_to_bytes(nonce),
        }
    }

    /// Build an epoch-keyed request.
    pub fn from_epoch(identifier: &[u8]) -> Self {
        Self {
            kind: RequestKind::Epoch,
            value: identifier.to_vec(),
        }
    }
}

/// Encode a request for the wire.
pub fn encode_request(request: &RequestData) -> Result<Vec<u8>, ResolveError> {
    basic_encode(request).map_err(|e| ResolveError::Encode(format!("{e:?}")))
}

/// Decode an inbound request payload.
///
/// Rejects undecodable payloads and empty values before any lookup work.
pub fn decode_request(bytes: &[u8]) -> Result<RequestData, ResolveError> {
    let request: RequestData =
        basic_decode(bytes).map_err(|e| ResolveError::MalformedRequest(format!("{e:?}")))?;
    if request.value.is_empty() {
        return Err(ResolveError::EmptyValue);
    }
    Ok(request)
}
