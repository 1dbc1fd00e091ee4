use crate::error::{to_u64, OutboxError};
use alloy_primitives::{Address, Bytes, B256, U256};
use binding::outbox::IOutbox;

/// An L2→L1 message as committed to by the L2 send Merkle tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2ToL1Message {
    pub l2_sender: Address,
    pub to: Address,
    pub l2_block: u64,
    /// Parent chain block number seen by L2 when the message was sent
    pub l1_block: u64,
    pub l2_timestamp: u64,
    pub value: U256,
    pub data: Bytes,
}

/// Merkle proof of a message's leaf under a send root.
///
/// Bit `i` of `index` selects whether the running hash is the left (0) or
/// right (1) child at level `i`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboxProof {
    pub proof: Vec<B256>,
    pub index: u64,
}

/// Whether an outbox message can be executed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// The proof leads to a root the outbox has not seen (not yet confirmed)
    UnknownRoot,
    Spent,
    Executable,
}

/// A confirmed send root, from `SendRootUpdated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendRoot {
    pub root: B256,
    pub l2_block_hash: B256,
    pub block_number: u64,
}

/// An executed message, from `OutBoxTransactionExecuted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutedMessage {
    pub index: u64,
    pub to: Address,
    pub l2_sender: Address,
    pub block_number: u64,
    pub tx_hash: B256,
}

impl L2ToL1Message {
    /// Calldata for `Outbox.executeTransaction`.
    pub fn execute_call(&self, proof: &OutboxProof) -> IOutbox::executeTransactionCall {
        IOutbox::executeTransactionCall {
            proof: proof.proof.clone(),
            index: U256::from(proof.index),
            l2Sender: self.l2_sender,
            to: self.to,
            l2Block: U256::from(self.l2_block),
            l1Block: U256::from(self.l1_block),
            l2Timestamp: U256::from(self.l2_timestamp),
            value: self.value,
            data: self.data.clone(),
        }
    }
}

impl TryFrom<IOutbox::executeTransactionCall> for (L2ToL1Message, OutboxProof) {
    type Error = OutboxError;

    fn try_from(call: IOutbox::executeTransactionCall) -> Result<Self, Self::Error> {
        let message = L2ToL1Message {
            l2_sender: call.l2Sender,
            to: call.to,
            l2_block: to_u64(call.l2Block, "l2Block")?,
            l1_block: to_u64(call.l1Block, "l1Block")?,
            l2_timestamp: to_u64(call.l2Timestamp, "l2Timestamp")?,
            value: call.value,
            data: call.data,
        };
        let proof = OutboxProof {
            proof: call.proof,
            index: to_u64(call.index, "index")?,
        };
        Ok((message, proof))
    }
}
