use crate::{
    accumulator::{accumulate, message_data_hash, message_hash, sequencer_batch_acc},
    batch::{batch_data_hash, BatchHeader},
    error::InboxError,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use binding::bridge::{BatchDataLocation, TimeBounds};

/// Kinds of messages the bridge enqueues in the delayed inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum L1MessageKind {
    L2Message = 3,
    EndOfBlock = 6,
    L2FundedByL1 = 7,
    RollupEvent = 8,
    SubmitRetryable = 9,
    BatchForGasEstimation = 10,
    Initialize = 11,
    EthDeposit = 12,
    BatchPostingReport = 13,
    Invalid = 0xFF,
}

impl TryFrom<u8> for L1MessageKind {
    type Error = u8;

    fn try_from(kind: u8) -> Result<Self, Self::Error> {
        Ok(match kind {
            3 => Self::L2Message,
            6 => Self::EndOfBlock,
            7 => Self::L2FundedByL1,
            8 => Self::RollupEvent,
            9 => Self::SubmitRetryable,
            10 => Self::BatchForGasEstimation,
            11 => Self::Initialize,
            12 => Self::EthDeposit,
            13 => Self::BatchPostingReport,
            0xFF => Self::Invalid,
            other => return Err(other),
        })
    }
}

impl From<L1MessageKind> for u8 {
    fn from(kind: L1MessageKind) -> Self {
        kind as Self
    }
}

/// Fields of a delayed message that enter its hash, besides the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedMessageHeader {
    pub kind: u8,
    /// Sender as recorded by the inbox (L1 contract senders are aliased)
    pub sender: Address,
    /// Parent chain block the message was enqueued in
    pub block_number: u64,
    pub timestamp: u64,
    /// Position in the delayed inbox
    pub request_id: U256,
    pub base_fee_l1: U256,
}

impl DelayedMessageHeader {
    pub fn message_kind(&self) -> Option<L1MessageKind> {
        L1MessageKind::try_from(self.kind).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedInboxMessage {
    pub header: DelayedMessageHeader,
    pub data: Bytes,
    pub before_inbox_acc: B256,
    pub block_hash: B256,
    pub tx_hash: B256,
}

impl DelayedInboxMessage {
    pub fn seq_num(&self) -> u64 {
        self.header.request_id.saturating_to()
    }

    pub fn message_hash(&self) -> B256 {
        message_hash(&self.header, message_data_hash(&self.data))
    }

    /// Delayed accumulator once this message is appended.
    pub fn after_inbox_acc(&self) -> B256 {
        accumulate(self.before_inbox_acc, self.message_hash())
    }
}

/// A batch delivered to the sequencer inbox, as reported by
/// `SequencerBatchDelivered`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerInboxBatch {
    pub sequence_number: u64,
    pub before_inbox_acc: B256,
    pub after_inbox_acc: B256,
    /// Delayed accumulator folded into this batch's accumulator
    pub after_delayed_acc: B256,
    pub after_delayed_count: u64,
    pub time_bounds: TimeBounds,
    pub data_location: BatchDataLocation,
    pub sequencer_inbox: Address,
    pub parent_chain_block_number: u64,
    pub block_hash: B256,
    pub tx_hash: B256,
}

impl SequencerInboxBatch {
    pub fn header(&self) -> BatchHeader {
        BatchHeader::new(&self.time_bounds, self.after_delayed_count)
    }

    /// Header followed by the batch data, as hashed on chain.
    pub fn serialize(&self, data: &[u8]) -> Bytes {
        let mut serialized = Vec::with_capacity(BatchHeader::LENGTH + data.len());
        serialized.extend_from_slice(&self.header().to_bytes());
        serialized.extend_from_slice(data);
        serialized.into()
    }

    /// Check that `data` reproduces this batch's accumulator.
    pub fn verify_data(&self, data: &[u8]) -> Result<(), InboxError> {
        let data_hash = batch_data_hash(&self.header(), data);
        let computed = sequencer_batch_acc(self.before_inbox_acc, data_hash, self.after_delayed_acc);
        if computed != self.after_inbox_acc {
            return Err(InboxError::AccumulatorMismatch {
                index: self.sequence_number,
                expected: self.after_inbox_acc,
                computed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::accumulator::tests::{deposit_header, l2_message_header};
    use alloy_primitives::{b256, bytes};

    pub(crate) fn delayed_message(header: DelayedMessageHeader, data: Bytes, before: B256) -> DelayedInboxMessage {
        DelayedInboxMessage {
            header,
            data,
            before_inbox_acc: before,
            block_hash: B256::repeat_byte(0xbb),
            tx_hash: B256::repeat_byte(0xcc),
        }
    }

    pub(crate) fn batch_fixture() -> SequencerInboxBatch {
        SequencerInboxBatch {
            sequence_number: 0,
            before_inbox_acc: B256::ZERO,
            after_inbox_acc: b256!(
                "2c435a86e482821fce81fc9d4497a2ac87120af03a048fe7aa5040f2ad46281a"
            ),
            after_delayed_acc: b256!(
                "3556e4df0cf0d22522e0d6f88e3859991421fc22478cfdbde2feba8e47814e88"
            ),
            after_delayed_count: 5,
            time_bounds: TimeBounds {
                minTimestamp: 1,
                maxTimestamp: 2,
                minBlockNumber: 3,
                maxBlockNumber: 4,
            },
            data_location: BatchDataLocation::TxInput,
            sequencer_inbox: Address::repeat_byte(0x5e),
            parent_chain_block_number: 200,
            block_hash: B256::repeat_byte(0xbb),
            tx_hash: B256::repeat_byte(0xcc),
        }
    }

    #[test]
    fn test_message_kind_conversion() {
        assert_eq!(L1MessageKind::try_from(12), Ok(L1MessageKind::EthDeposit));
        assert_eq!(L1MessageKind::try_from(0xFF), Ok(L1MessageKind::Invalid));
        assert_eq!(L1MessageKind::try_from(4), Err(4));
        assert_eq!(u8::from(L1MessageKind::SubmitRetryable), 9);
        assert_eq!(deposit_header().message_kind(), Some(L1MessageKind::EthDeposit));
    }

    #[test]
    fn test_after_inbox_acc() {
        let first = delayed_message(deposit_header(), Bytes::new(), B256::ZERO);
        assert_eq!(first.seq_num(), 0);
        let second = delayed_message(l2_message_header(), bytes!("010203"), first.after_inbox_acc());
        assert_eq!(second.seq_num(), 1);

        assert_eq!(
            second.after_inbox_acc(),
            b256!("3556e4df0cf0d22522e0d6f88e3859991421fc22478cfdbde2feba8e47814e88")
        );
    }

    #[test]
    fn test_batch_serialize_and_verify() {
        let batch = batch_fixture();
        let data = [0x00, 0xaa];

        let serialized = batch.serialize(&data);
        assert_eq!(serialized.len(), 42);
        assert_eq!(&serialized[..8], &1u64.to_be_bytes());
        assert_eq!(&serialized[32..40], &5u64.to_be_bytes());
        assert_eq!(&serialized[40..], &data);

        batch.verify_data(&data).unwrap();
    }

    #[test]
    fn test_batch_verify_rejects_other_data() {
        let err = batch_fixture().verify_data(&[0x00, 0xab]).unwrap_err();
        assert!(matches!(err, InboxError::AccumulatorMismatch { index: 0, .. }));
    }
}
