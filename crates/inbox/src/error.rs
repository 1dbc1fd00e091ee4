use alloy_primitives::{Selector, B256, U256};
use alloy_transport::TransportError;
use binding::bridge::BatchDataLocation;
use client::BindingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InboxError {
    /// Contract call, log query or decode failure
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// A `MessageDelivered` log had no matching data event
    #[error("message {index} not found")]
    MessageNotFound { index: U256 },

    #[error("found message data with mismatched hash for message {index}: expected {expected}, got {actual}")]
    DataHashMismatch {
        index: U256,
        expected: B256,
        actual: B256,
    },

    #[error("transaction {0} not found")]
    TransactionNotFound(B256),

    /// Log returned by the node lacks a field only mined logs carry
    #[error("log is missing its {0}")]
    IncompleteLog(&'static str),

    #[error("accumulator mismatch at {index}: expected {expected}, computed {computed}")]
    AccumulatorMismatch {
        index: u64,
        expected: B256,
        computed: B256,
    },

    #[error("messages out of order: after {after} got {got}")]
    MessagesOutOfOrder { after: u64, got: u64 },

    #[error("batches out of order: after {after} got {got}")]
    BatchesOutOfOrder { after: u64, got: u64 },

    #[error("no block up to {head} contains delayed message {index}")]
    BlockNotFound { index: u64, head: u64 },

    #[error("data of batch {sequence_number} is not retrievable from {location:?}")]
    UnsupportedDataLocation {
        sequence_number: u64,
        location: BatchDataLocation,
    },

    #[error("batch {sequence_number} was posted through unknown call {selector}")]
    UnknownBatchCall { sequence_number: u64, selector: Selector },

    #[error("data of batch {0} not found")]
    BatchDataNotFound(u64),

    #[error("keyset hash mismatch: event says {expected}, bytes hash to {computed}")]
    KeysetHashMismatch { expected: B256, computed: B256 },

    #[error("{what} does not fit in 64 bits: {value}")]
    Overflow { what: &'static str, value: U256 },

    #[error("serialized batch shorter than its header: {0} bytes")]
    ShortBatch(usize),
}

impl InboxError {
    /// Whether repeating the failed request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Binding(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl From<TransportError> for InboxError {
    fn from(err: TransportError) -> Self {
        Self::Binding(err.into())
    }
}

impl From<alloy_sol_types::Error> for InboxError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::Binding(err.into())
    }
}

/// Narrow an on-chain `uint256` counter or bound to `u64`.
pub(crate) fn to_u64(value: U256, what: &'static str) -> Result<u64, InboxError> {
    u64::try_from(value).map_err(|_| InboxError::Overflow { what, value })
}
