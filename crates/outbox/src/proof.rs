//! Merkle proofs over the L2 send tree.

use crate::{error::OutboxError, hash::calculate_item_hash, types::L2ToL1Message, OutboxProof};
use alloy_primitives::{keccak256, Keccak256, B256, U256};

/// Proofs of this many levels or more are rejected by the outbox.
pub const MAX_PROOF_LENGTH: usize = 256;

fn hash_pair(left: B256, right: B256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize()
}

/// Root reached from `item` by walking `proof`, as `Outbox.calculateMerkleRoot` does.
///
/// The item is hashed once more to form the leaf.
pub fn calculate_merkle_root(proof: &[B256], path: u64, item: B256) -> B256 {
    proof.iter().enumerate().fold(keccak256(item), |node, (level, sibling)| {
        let right = level < 64 && (path >> level) & 1 == 1;
        if right {
            hash_pair(*sibling, node)
        } else {
            hash_pair(node, *sibling)
        }
    })
}

impl OutboxProof {
    pub fn validate(&self) -> Result<(), OutboxError> {
        let levels = self.proof.len();
        if levels >= MAX_PROOF_LENGTH {
            return Err(OutboxError::ProofTooLong(levels));
        }
        if levels < 64 && self.index >> levels != 0 {
            return Err(OutboxError::PathNotMinimal {
                index: self.index,
                max_index: U256::from(1) << levels,
            });
        }
        Ok(())
    }

    /// Send root this proof commits `message` to.
    pub fn root_for(&self, message: &L2ToL1Message) -> Result<B256, OutboxError> {
        self.validate()?;
        Ok(calculate_merkle_root(&self.proof, self.index, calculate_item_hash(message)))
    }
}
