//! On-chain outbox state: known send roots and spent message indexes.

use crate::{
    error::{to_u64, OutboxError},
    types::{ExecutedMessage, L2ToL1Message, MessageStatus, OutboxProof, SendRoot},
};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, B256, U256};
use binding::outbox::IOutbox;
use client::{scan_in_chunks, BoundContract, CallOpts, ContractCaller, ContractFilterer, FilterOpts};
use tracing::debug;

pub struct OutboxStateProvider<P> {
    outbox: BoundContract<P>,
}

impl<P> OutboxStateProvider<P>
where
    P: Provider + Clone + 'static,
{
    pub const fn new(provider: P, outbox: Address) -> Self {
        Self { outbox: BoundContract::new(outbox, provider) }
    }

    pub const fn address(&self) -> Address {
        self.outbox.address()
    }

    pub async fn is_spent(&self, index: u64) -> Result<bool, OutboxError> {
        let call = IOutbox::isSpentCall { index: U256::from(index) };
        Ok(self.outbox.call(&call, CallOpts::default()).await?)
    }

    /// L2 block hash recorded for `root`, or `None` if the outbox does not know it.
    pub async fn block_hash_for_root(&self, root: B256) -> Result<Option<B256>, OutboxError> {
        let block_hash = self.outbox.call(&IOutbox::rootsCall(root), CallOpts::default()).await?;
        Ok((!block_hash.is_zero()).then_some(block_hash))
    }

    /// Check `message` and `proof` the way `executeTransaction` would, without sending anything.
    ///
    /// Malformed proofs are errors; an unknown root or a spent index is a status.
    pub async fn message_status(
        &self,
        message: &L2ToL1Message,
        proof: &OutboxProof,
    ) -> Result<MessageStatus, OutboxError> {
        let root = proof.root_for(message)?;
        if self.block_hash_for_root(root).await?.is_none() {
            debug!(%root, index = proof.index, "Send root not known to the outbox");
            return Ok(MessageStatus::UnknownRoot);
        }
        if self.is_spent(proof.index).await? {
            return Ok(MessageStatus::Spent);
        }
        Ok(MessageStatus::Executable)
    }

    /// Like [`Self::message_status`], but anything other than `Executable` is an error.
    pub async fn ensure_executable(&self, message: &L2ToL1Message, proof: &OutboxProof) -> Result<(), OutboxError> {
        match self.message_status(message, proof).await? {
            MessageStatus::Executable => Ok(()),
            MessageStatus::Spent => Err(OutboxError::AlreadySpent(proof.index)),
            MessageStatus::UnknownRoot => Err(OutboxError::UnknownRoot(proof.root_for(message)?)),
        }
    }

    pub async fn executed_in_range(&self, from_block: u64, to_block: u64) -> Result<Vec<ExecutedMessage>, OutboxError> {
        scan_in_chunks(from_block, to_block, OutboxError::is_retryable, |from, to| async move {
            let logs = self
                .outbox
                .filter_logs::<IOutbox::OutBoxTransactionExecuted>(&FilterOpts::range(from, to))
                .await?
                .collect()
                .await?;

            logs.into_iter()
                .map(|log| {
                    Ok(ExecutedMessage {
                        index: to_u64(log.event.transactionIndex, "transactionIndex")?,
                        to: log.event.to,
                        l2_sender: log.event.l2Sender,
                        block_number: log.block_number().unwrap_or_default(),
                        tx_hash: log.transaction_hash().unwrap_or_default(),
                    })
                })
                .collect()
        })
        .await
    }

    pub async fn send_roots_in_range(&self, from_block: u64, to_block: u64) -> Result<Vec<SendRoot>, OutboxError> {
        scan_in_chunks(from_block, to_block, OutboxError::is_retryable, |from, to| async move {
            let logs = self
                .outbox
                .filter_logs::<IOutbox::SendRootUpdated>(&FilterOpts::range(from, to))
                .await?
                .collect()
                .await?;

            Ok(logs
                .into_iter()
                .map(|log| SendRoot {
                    root: log.event.outputRoot,
                    l2_block_hash: log.event.l2BlockHash,
                    block_number: log.block_number().unwrap_or_default(),
                })
                .collect())
        })
        .await
    }
}
