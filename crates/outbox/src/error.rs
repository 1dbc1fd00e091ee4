use alloy_primitives::{B256, U256};
use alloy_transport::TransportError;
use binding::outbox::IOutbox::IOutboxErrors;
use client::BindingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutboxError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Proof has as many levels as the outbox refuses (256 or more)
    #[error("proof too long: {0} levels")]
    ProofTooLong(usize),

    /// Path has bits set above the proof height
    #[error("path {index} not minimal, must be below {max_index}")]
    PathNotMinimal { index: u64, max_index: U256 },

    #[error("unknown send root {0}")]
    UnknownRoot(B256),

    #[error("message {0} already spent")]
    AlreadySpent(u64),

    #[error("{what} does not fit in 64 bits: {value}")]
    Overflow { what: &'static str, value: U256 },
}

impl OutboxError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Binding(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Custom outbox error carried by a revert, if any.
    pub fn outbox_revert(&self) -> Option<IOutboxErrors> {
        match self {
            Self::Binding(err) => err.decode_revert::<IOutboxErrors>(),
            _ => None,
        }
    }
}

impl From<TransportError> for OutboxError {
    fn from(err: TransportError) -> Self {
        Self::Binding(err.into())
    }
}

pub(crate) fn to_u64(value: U256, what: &'static str) -> Result<u64, OutboxError> {
    u64::try_from(value).map_err(|_| OutboxError::Overflow { what, value })
}
