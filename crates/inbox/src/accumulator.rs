//! Hash chains kept by the bridge.
//!
//! The delayed inbox appends `keccak256(prev ‖ messageHash)` for every
//! enqueued message, the sequencer inbox appends
//! `keccak256(prev ‖ dataHash ‖ delayedAcc)` for every batch. Both chains
//! start from the zero hash.

use crate::types::DelayedMessageHeader;
use alloy_primitives::{keccak256, Keccak256, B256};
use alloy_sol_types::{sol_data, SolType};

pub fn message_data_hash(data: &[u8]) -> B256 {
    keccak256(data)
}

/// Hash of a delayed message as the bridge computes it when enqueueing:
/// `keccak256(abi.encodePacked(kind, sender, blockNumber, timestamp,
/// inboxSeqNum, baseFeeL1, messageDataHash))`.
pub fn message_hash(header: &DelayedMessageHeader, message_data_hash: B256) -> B256 {
    type Packed = (
        sol_data::Uint<8>,
        sol_data::Address,
        sol_data::Uint<64>,
        sol_data::Uint<64>,
        sol_data::Uint<256>,
        sol_data::Uint<256>,
        sol_data::FixedBytes<32>,
    );
    let packed = Packed::abi_encode_packed(&(
        header.kind,
        header.sender,
        header.block_number,
        header.timestamp,
        header.request_id,
        header.base_fee_l1,
        message_data_hash,
    ));

    keccak256(packed)
}

/// Next delayed-inbox accumulator.
pub fn accumulate(prev_acc: B256, message_hash: B256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(prev_acc);
    hasher.update(message_hash);
    hasher.finalize()
}

/// Next sequencer-inbox accumulator.
///
/// `delayed_acc` is the delayed accumulator of the last delayed message the
/// batch reads, or zero when the batch has read none.
pub fn sequencer_batch_acc(before_acc: B256, data_hash: B256, delayed_acc: B256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(before_acc);
    hasher.update(data_hash);
    hasher.update(delayed_acc);
    hasher.finalize()
}
