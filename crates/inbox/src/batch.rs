//! Sequencer batch framing.
//!
//! On chain a batch is hashed as a 40-byte header (time bounds and the
//! delayed-message count, big-endian `u64`s) followed by the posted data.
//! The first data byte tells how the payload is encoded.

use crate::error::InboxError;
use alloy_primitives::{keccak256, Keccak256, B256, U256};
use binding::bridge::TimeBounds;

/// Payload is brotli compressed.
pub const BROTLI_MESSAGE_HEADER_BYTE: u8 = 0x00;
/// Payload is a data availability certificate.
pub const DAS_MESSAGE_HEADER_FLAG: u8 = 0x80;
/// DAS certificate uses tree merkelization; only meaningful with the DAS flag.
pub const TREE_DAS_MESSAGE_HEADER_FLAG: u8 = 0x08;
/// Set by the sequencer inbox for data it authenticated itself.
pub const L1_AUTHENTICATED_MESSAGE_HEADER_FLAG: u8 = 0x40;
pub const ZEROHEAVY_MESSAGE_HEADER_FLAG: u8 = 0x20;
/// Payload lists EIP-4844 blob versioned hashes.
pub const BLOB_HASHES_HEADER_FLAG: u8 = L1_AUTHENTICATED_MESSAGE_HEADER_FLAG | 0x10;

pub const KNOWN_HEADER_BITS: u8 = DAS_MESSAGE_HEADER_FLAG
    | TREE_DAS_MESSAGE_HEADER_FLAG
    | L1_AUTHENTICATED_MESSAGE_HEADER_FLAG
    | ZEROHEAVY_MESSAGE_HEADER_FLAG
    | BLOB_HASHES_HEADER_FLAG
    | BROTLI_MESSAGE_HEADER_BYTE;

const fn has_bits(checking: u8, bits: u8) -> bool {
    checking & bits == bits
}

pub const fn is_das_header_byte(header: u8) -> bool {
    has_bits(header, DAS_MESSAGE_HEADER_FLAG)
}

pub const fn is_tree_das_header_byte(header: u8) -> bool {
    has_bits(header, TREE_DAS_MESSAGE_HEADER_FLAG)
}

pub const fn is_l1_authenticated_header_byte(header: u8) -> bool {
    has_bits(header, L1_AUTHENTICATED_MESSAGE_HEADER_FLAG)
}

pub const fn is_zeroheavy_header_byte(header: u8) -> bool {
    has_bits(header, ZEROHEAVY_MESSAGE_HEADER_FLAG)
}

pub const fn is_blob_hashes_header_byte(header: u8) -> bool {
    has_bits(header, BLOB_HASHES_HEADER_FLAG)
}

pub const fn is_brotli_header_byte(header: u8) -> bool {
    header == BROTLI_MESSAGE_HEADER_BYTE
}

pub const fn is_known_header_byte(header: u8) -> bool {
    header & !KNOWN_HEADER_BITS == 0
}

/// Encoding of a batch payload, from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// No data (force-included batches)
    Empty,
    Brotli,
    Das { tree: bool },
    BlobHashes,
    Zeroheavy,
    Unknown(u8),
}

impl PayloadKind {
    pub fn of(data: &[u8]) -> Self {
        let Some(&header) = data.first() else {
            return Self::Empty;
        };
        if !is_known_header_byte(header) {
            Self::Unknown(header)
        } else if is_das_header_byte(header) {
            Self::Das { tree: is_tree_das_header_byte(header) }
        } else if is_blob_hashes_header_byte(header) {
            Self::BlobHashes
        } else if is_brotli_header_byte(header) {
            Self::Brotli
        } else if is_zeroheavy_header_byte(header) {
            Self::Zeroheavy
        } else {
            Self::Unknown(header)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchHeader {
    pub min_timestamp: u64,
    pub max_timestamp: u64,
    pub min_block_number: u64,
    pub max_block_number: u64,
    pub after_delayed_messages_read: u64,
}

impl BatchHeader {
    pub const LENGTH: usize = 40;

    pub const fn new(bounds: &TimeBounds, after_delayed_messages_read: u64) -> Self {
        Self {
            min_timestamp: bounds.minTimestamp,
            max_timestamp: bounds.maxTimestamp,
            min_block_number: bounds.minBlockNumber,
            max_block_number: bounds.maxBlockNumber,
            after_delayed_messages_read,
        }
    }

    pub const fn time_bounds(&self) -> TimeBounds {
        TimeBounds {
            minTimestamp: self.min_timestamp,
            maxTimestamp: self.max_timestamp,
            minBlockNumber: self.min_block_number,
            maxBlockNumber: self.max_block_number,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        let mut out = [0u8; Self::LENGTH];
        let fields = [
            self.min_timestamp,
            self.max_timestamp,
            self.min_block_number,
            self.max_block_number,
            self.after_delayed_messages_read,
        ];
        for (chunk, field) in out.chunks_exact_mut(8).zip(fields) {
            chunk.copy_from_slice(&field.to_be_bytes());
        }
        out
    }

    /// Split a serialized batch into its header and data.
    pub fn parse(serialized: &[u8]) -> Result<(Self, &[u8]), InboxError> {
        if serialized.len() < Self::LENGTH {
            return Err(InboxError::ShortBatch(serialized.len()));
        }
        let (header, data) = serialized.split_at(Self::LENGTH);

        let mut fields = header.chunks_exact(8).map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_be_bytes(word)
        });
        let mut next = || fields.next().unwrap_or_default();

        let parsed = Self {
            min_timestamp: next(),
            max_timestamp: next(),
            min_block_number: next(),
            max_block_number: next(),
            after_delayed_messages_read: next(),
        };
        Ok((parsed, data))
    }
}

/// `keccak256(header ‖ data)`, the data hash folded into the sequencer accumulator.
pub fn batch_data_hash(header: &BatchHeader, data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(header.to_bytes());
    hasher.update(data);
    hasher.finalize()
}

/// Hash under which the sequencer inbox registers a DAS keyset.
pub fn keyset_hash(keyset_bytes: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update([0xfe]);
    hasher.update(keccak256(keyset_bytes));
    let word = U256::from_be_bytes(hasher.finalize().0) ^ (U256::from(1) << 255);
    B256::from(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    fn header() -> BatchHeader {
        BatchHeader {
            min_timestamp: 1,
            max_timestamp: 2,
            min_block_number: 3,
            max_block_number: 4,
            after_delayed_messages_read: 5,
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = header().to_bytes();
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            assert_eq!(chunk, &(i as u64 + 1).to_be_bytes());
        }
    }

    #[test]
    fn test_parse_splits_data() {
        let mut serialized = header().to_bytes().to_vec();
        serialized.extend_from_slice(&[0x00, 0xaa]);

        let (parsed, data) = BatchHeader::parse(&serialized).unwrap();
        assert_eq!(parsed, header());
        assert_eq!(data, &[0x00, 0xaa]);

        let bytes = header().to_bytes();
        let (parsed, data) = BatchHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.after_delayed_messages_read, 5);
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_short_batch() {
        assert!(matches!(
            BatchHeader::parse(&[0u8; 39]),
            Err(InboxError::ShortBatch(39))
        ));
    }

    #[test]
    fn test_time_bounds_round_trip() {
        let bounds = header().time_bounds();
        assert_eq!(BatchHeader::new(&bounds, 5), header());
    }

    #[test]
    fn test_batch_data_hash_known_value() {
        assert_eq!(
            batch_data_hash(&header(), &[0x00, 0xaa]),
            b256!("b26964b1ffee18540f4f81021fb6600beddb6a0e249b4e404dad043dfdec87ad")
        );
        // force-included batches hash the bare header
        assert_eq!(
            batch_data_hash(&header(), &[]),
            b256!("7f98e7b359d7f46576ae26512a6f46829f9ed59d98635f860619008a337934df")
        );
    }

    #[test]
    fn test_keyset_hash_known_value() {
        let hash = keyset_hash(&[0x01, 0x02]);
        assert_eq!(
            hash,
            b256!("9393063e498120336b2bf00bc87d92c18c24f97320062b23f15f75989fc985d9")
        );
        // top bit flipped relative to the raw hash
        assert_ne!(hash[0] & 0x80, {
            let mut hasher = Keccak256::new();
            hasher.update([0xfe]);
            hasher.update(keccak256([0x01, 0x02]));
            hasher.finalize()[0] & 0x80
        });
    }

    #[test]
    fn test_payload_kinds() {
        assert_eq!(PayloadKind::of(&[]), PayloadKind::Empty);
        assert_eq!(PayloadKind::of(&[0x00, 0x1b]), PayloadKind::Brotli);
        assert_eq!(PayloadKind::of(&[0x80]), PayloadKind::Das { tree: false });
        assert_eq!(PayloadKind::of(&[0x88]), PayloadKind::Das { tree: true });
        assert_eq!(PayloadKind::of(&[0x50]), PayloadKind::BlobHashes);
        assert_eq!(PayloadKind::of(&[0x20]), PayloadKind::Zeroheavy);
        assert_eq!(PayloadKind::of(&[0x01]), PayloadKind::Unknown(0x01));
        // authenticated bit alone is not a blob header
        assert_eq!(PayloadKind::of(&[0x40]), PayloadKind::Unknown(0x40));
    }

    #[test]
    fn test_header_flag_helpers() {
        assert!(is_l1_authenticated_header_byte(BLOB_HASHES_HEADER_FLAG));
        assert!(!is_blob_hashes_header_byte(0x10));
        assert!(is_known_header_byte(0x88));
        assert!(!is_known_header_byte(0x04));
        assert!(is_brotli_header_byte(0));
    }
}
