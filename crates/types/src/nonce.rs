//! Nonce byte-slice conversion.
//!
//! Header nonces travel over the wire and are used as storage keys as
//! fixed-width big-endian byte slices. Big-endian keeps lexicographic key
//! order equal to numeric nonce order.

use thiserror::Error;

/// Width of an encoded nonce in bytes.
pub const NONCE_BYTES: usize = 8;

/// Errors converting byte slices back into nonces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    /// Encoded nonce had the wrong width.
    #[error("invalid nonce length: expected {NONCE_BYTES}, got {0}")]
    InvalidLength(usize),
}

/// Encode a nonce as a fixed-width big-endian byte vector.
pub fn nonce_to_bytes(nonce: u64) -> Vec<u8> {
    nonce.to_be_bytes().to_vec()
}

/// Decode a nonce from a fixed-width big-endian byte slice.
pub fn nonce_from_bytes(bytes: &[u8]) -> Result<u64, NonceError> {
    let arr: [u8; NONCE_BYTES] = bytes
        .try_into()
        .map_err(|_| NonceError::InvalidLength(bytes.len()))?;
    Ok(u64::from_be_bytes(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for nonce in [0u64, 1, 42, u64::MAX] {
            let bytes = nonce_to_bytes(nonce);
            assert_eq!(bytes.len(), NONCE_BYTES);
            assert_eq!(nonce_from_bytes(&bytes).unwrap(), nonce);
        }
    }

    #[test]
    fn test_big_endian_orders_keys() {
        assert!(nonce_to_bytes(1) < nonce_to_bytes(2));
        assert!(nonce_to_bytes(255) < nonce_to_bytes(256));
    }

    #[test]
    fn test_rejects_wrong_width() {
        assert_eq!(nonce_from_bytes(&[1, 2, 3]), Err(NonceError::InvalidLength(3)));
        assert_eq!(nonce_from_bytes(&[0; 9]), Err(NonceError::InvalidLength(9)));
    }
}
