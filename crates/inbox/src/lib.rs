//! Readers and verification for the two inbox accumulator chains.
//!
//! - [`DelayedBridge`] reads the bridge's delayed inbox and rebuilds each
//!   message from the inbox that delivered it.
//! - [`SequencerInboxReader`] reads delivered batches, their data and DAS keysets.
//!
//! Hashing lives in [`accumulator`] and [`batch`], so a caller can re-derive
//! every accumulator value without trusting the node.

pub mod accumulator;
pub mod batch;
pub mod bounds;
pub mod delayed;
pub mod error;
pub mod sequencer;
pub mod types;

pub use batch::{batch_data_hash, keyset_hash, BatchHeader, PayloadKind};
pub use bounds::{force_inclusion_status, ForceInclusionStatus, MaxTimeVariation};
pub use delayed::{verify_chain, DelayedBridge};
pub use error::InboxError;
pub use sequencer::{Keyset, SequencerInboxReader};
pub use types::{DelayedInboxMessage, DelayedMessageHeader, L1MessageKind, SequencerInboxBatch};
