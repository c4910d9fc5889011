//! Epoch-start block identifiers.
//!
//! Epoch-start headers are stored under a string key derived from the epoch
//! number. A request for the current epoch's start block uses the
//! unknown-epoch marker; the resolver substitutes its provider's epoch.

/// Marker value requesting the epoch-start block of the current epoch.
pub const UNKNOWN_EPOCH_IDENTIFIER: &[u8] = b"epochUnknown";

/// Storage key for the epoch-start block of the given epoch.
pub fn epoch_start_identifier(epoch: u32) -> Vec<u8> {
    format!("epochStartBlock_{epoch}").into_bytes()
}

/// Check whether a request value is the unknown-epoch marker.
pub fn is_unknown_epoch_identifier(value: &[u8]) -> bool {
    value == UNKNOWN_EPOCH_IDENTIFIER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_format() {
        assert_eq!(epoch_start_identifier(0), b"epochStartBlock_0".to_vec());
        assert_eq!(epoch_start_identifier(42), b"epochStartBlock_42".to_vec());
    }

    #[test]
    fn test_unknown_marker() {
        assert!(is_unknown_epoch_identifier(UNKNOWN_EPOCH_IDENTIFIER));
        assert!(!is_unknown_epoch_identifier(b"epochStartBlock_0"));
        assert!(!is_unknown_epoch_identifier(b""));
    }
}
