//! L2→L1 messages: item hashing, send-tree proofs and outbox state.

pub mod error;
pub mod hash;
pub mod proof;
pub mod state;
pub mod types;

pub use error::OutboxError;
pub use hash::calculate_item_hash;
pub use proof::{calculate_merkle_root, MAX_PROOF_LENGTH};
pub use state::OutboxStateProvider;
pub use types::{ExecutedMessage, L2ToL1Message, MessageStatus, OutboxProof, SendRoot};
