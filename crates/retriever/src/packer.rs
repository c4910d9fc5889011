//! Length-prefixed payload packing for batch responses.

use crate::error::ResolveError;
use crate::traits::DataPacker;

/// Packs payload slices with a little-endian u32 length prefix per chunk.
pub struct SliceDataPacker;

impl DataPacker for SliceDataPacker {
    fn pack(&self, payloads: &[Vec<u8>]) -> Result<Vec<u8>, ResolveError> {
        if payloads.is_empty() {
            return Err(ResolveError::Encode("nothing to pack".to_string()));
        }
        let total: usize = payloads.iter().map(|p| p.len() + 4).sum();
        let mut buffer = Vec::with_capacity(total);
        for payload in payloads {
            let len = u32::try_from(payload.len())
                .map_err(|_| ResolveError::Encode("chunk exceeds u32 length".to_string()))?;
            buffer.extend_from_slice(&len.to_le_bytes());
            buffer.extend_from_slice(payload);
        }
        Ok(buffer)
    }

    fn unpack(&self, buffer: &[u8]) -> Result<Vec<Vec<u8>>, ResolveError> {
        let mut payloads = Vec::new();
        let mut rest = buffer;
        while !rest.is_empty() {
            if rest.len() < 4 {
                return Err(ResolveError::MalformedRequest(
                    "truncated chunk length".to_string(),
                ));
            }
            let (prefix, tail) = rest.split_at(4);
            let len = u32::from_le_bytes(prefix.try_into().expect("split_at(4) yields 4 bytes"))
                as usize;
            if tail.len() < len {
                return Err(ResolveError::MalformedRequest(
                    "truncated chunk payload".to_string(),
                ));
            }
            let (chunk, remaining) = tail.split_at(len);
            payloads.push(chunk.to_vec());
            rest = remaining;
        }
        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_roundtrip() {
        let packer = SliceDataPacker;
        let payloads = vec![b"one".to_vec(), vec![], b"three".to_vec()];
        let packed = packer.pack(&payloads).unwrap();
        assert_eq!(packer.unpack(&packed).unwrap(), payloads);
    }

    #[test]
    fn test_pack_nothing_fails() {
        assert!(SliceDataPacker.pack(&[]).is_err());
    }

    #[test]
    fn test_unpack_rejects_truncated_buffers() {
        let packer = SliceDataPacker;
        let packed = packer.pack(&[b"payload".to_vec()]).unwrap();
        assert!(packer.unpack(&packed[..3]).is_err());
        assert!(packer.unpack(&packed[..packed.len() - 1]).is_err());
    }
}
