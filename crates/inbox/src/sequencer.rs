//! Reader for the sequencer inbox: batches, their data, time bounds and DAS keysets.

use crate::{
    batch::keyset_hash,
    bounds::MaxTimeVariation,
    delayed::call_opts,
    error::{to_u64, InboxError},
    types::SequencerInboxBatch,
};
use alloy_consensus::Transaction as _;
use alloy_contract::private::Provider;
use alloy_primitives::{Address, Bytes, Selector, B256, U256};
use alloy_sol_types::SolCall;
use binding::bridge::{BatchDataLocation, ISequencerInbox, ISequencerInboxLegacy};
use client::{scan_in_chunks, BoundContract, ContractCaller, ContractFilterer, FilterOpts};
use tracing::debug;

/// A keyset registered with `SetValidKeyset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyset {
    pub hash: B256,
    pub bytes: Bytes,
    pub block_number: u64,
}

pub struct SequencerInboxReader<P> {
    inbox: BoundContract<P>,
    provider: P,
}

impl<P> SequencerInboxReader<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P, sequencer_inbox: Address) -> Self {
        Self {
            inbox: BoundContract::new(sequencer_inbox, provider.clone()),
            provider,
        }
    }

    pub const fn address(&self) -> Address {
        self.inbox.address()
    }

    pub async fn batch_count(&self, block: Option<u64>) -> Result<u64, InboxError> {
        let count = self.inbox.call(&ISequencerInbox::batchCountCall, call_opts(block)).await?;
        to_u64(count, "batchCount")
    }

    /// Sequencer accumulator after batch `seq_num`.
    pub async fn inbox_acc(&self, seq_num: u64, block: Option<u64>) -> Result<B256, InboxError> {
        let call = ISequencerInbox::inboxAccsCall { index: U256::from(seq_num) };
        Ok(self.inbox.call(&call, call_opts(block)).await?)
    }

    pub async fn total_delayed_messages_read(&self, block: Option<u64>) -> Result<u64, InboxError> {
        let read = self
            .inbox
            .call(&ISequencerInbox::totalDelayedMessagesReadCall, call_opts(block))
            .await?;
        to_u64(read, "totalDelayedMessagesRead")
    }

    pub async fn max_time_variation(&self, block: Option<u64>) -> Result<MaxTimeVariation, InboxError> {
        let mtv = self
            .inbox
            .call(&ISequencerInbox::maxTimeVariationCall, call_opts(block))
            .await?;
        mtv.try_into()
    }

    pub async fn is_valid_keyset(&self, keyset_hash: B256) -> Result<bool, InboxError> {
        let call = ISequencerInbox::isValidKeysetHashCall { ksHash: keyset_hash };
        Ok(self.inbox.call(&call, call_opts(None)).await?)
    }

    pub async fn keyset_creation_block(&self, keyset_hash: B256) -> Result<u64, InboxError> {
        let call = ISequencerInbox::getKeysetCreationBlockCall { ksHash: keyset_hash };
        let block = self.inbox.call(&call, call_opts(None)).await?;
        to_u64(block, "keysetCreationBlock")
    }

    /// Batches delivered in `from..=to`, in sequence order.
    ///
    /// Fails when sequence numbers are not consecutive or a batch does not
    /// continue the accumulator of the one before it.
    pub async fn lookup_batches_in_range(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<SequencerInboxBatch>, InboxError> {
        let batches = scan_in_chunks(from_block, to_block, InboxError::is_retryable, |from, to| {
            self.scan_batches(from, to)
        })
        .await?;

        for pair in batches.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.sequence_number != prev.sequence_number + 1 {
                return Err(InboxError::BatchesOutOfOrder {
                    after: prev.sequence_number,
                    got: next.sequence_number,
                });
            }
            if next.before_inbox_acc != prev.after_inbox_acc {
                return Err(InboxError::AccumulatorMismatch {
                    index: next.sequence_number,
                    expected: next.before_inbox_acc,
                    computed: prev.after_inbox_acc,
                });
            }
        }

        debug!(from = from_block, to = to_block, count = batches.len(), "Looked up batches");
        Ok(batches)
    }

    async fn scan_batches(&self, from_block: u64, to_block: u64) -> Result<Vec<SequencerInboxBatch>, InboxError> {
        let logs = self
            .inbox
            .filter_logs::<ISequencerInbox::SequencerBatchDelivered>(&FilterOpts::range(from_block, to_block))
            .await?
            .collect()
            .await?;

        logs.into_iter()
            .map(|log| {
                let event = log.event;
                Ok(SequencerInboxBatch {
                    sequence_number: to_u64(event.batchSequenceNumber, "batchSequenceNumber")?,
                    before_inbox_acc: event.beforeAcc,
                    after_inbox_acc: event.afterAcc,
                    after_delayed_acc: event.delayedAcc,
                    after_delayed_count: to_u64(
                        event.afterDelayedMessagesRead,
                        "afterDelayedMessagesRead",
                    )?,
                    time_bounds: event.timeBounds,
                    data_location: event.dataLocation,
                    sequencer_inbox: log.log.inner.address,
                    parent_chain_block_number: log
                        .log
                        .block_number
                        .ok_or(InboxError::IncompleteLog("block number"))?,
                    block_hash: log.log.block_hash.unwrap_or_default(),
                    tx_hash: log
                        .log
                        .transaction_hash
                        .ok_or(InboxError::IncompleteLog("transaction hash"))?,
                })
            })
            .collect()
    }

    /// Data posted with `batch`, without the 40-byte header.
    pub async fn batch_data(&self, batch: &SequencerInboxBatch) -> Result<Bytes, InboxError> {
        match batch.data_location {
            BatchDataLocation::TxInput => {
                let tx = self
                    .provider
                    .get_transaction_by_hash(batch.tx_hash)
                    .await?
                    .ok_or(InboxError::TransactionNotFound(batch.tx_hash))?;
                batch_data_from_input(batch.sequence_number, tx.input())
            }
            BatchDataLocation::SeparateBatchEvent => {
                let opts = FilterOpts::range(batch.parent_chain_block_number, batch.parent_chain_block_number)
                    .topic1([B256::from(U256::from(batch.sequence_number))]);
                let logs = self
                    .inbox
                    .filter_logs::<ISequencerInbox::SequencerBatchData>(&opts)
                    .await?
                    .collect()
                    .await?;
                logs.into_iter()
                    .next()
                    .map(|log| log.event.data)
                    .ok_or(InboxError::BatchDataNotFound(batch.sequence_number))
            }
            BatchDataLocation::NoData => Ok(Bytes::new()),
            location => Err(InboxError::UnsupportedDataLocation {
                sequence_number: batch.sequence_number,
                location,
            }),
        }
    }

    /// Fetch the data of `batch` and check it against the batch accumulator.
    pub async fn verified_batch_data(&self, batch: &SequencerInboxBatch) -> Result<Bytes, InboxError> {
        let data = self.batch_data(batch).await?;
        batch.verify_data(&data)?;
        Ok(data)
    }

    /// Keysets registered in `from..=to`; each hash is recomputed from its bytes.
    pub async fn keysets_in_range(&self, from_block: u64, to_block: u64) -> Result<Vec<Keyset>, InboxError> {
        scan_in_chunks(from_block, to_block, InboxError::is_retryable, |from, to| async move {
            let logs = self
                .inbox
                .filter_logs::<ISequencerInbox::SetValidKeyset>(&FilterOpts::range(from, to))
                .await?
                .collect()
                .await?;

            logs.into_iter()
                .map(|log| {
                    let computed = keyset_hash(&log.event.keysetBytes);
                    if computed != log.event.keysetHash {
                        return Err(InboxError::KeysetHashMismatch {
                            expected: log.event.keysetHash,
                            computed,
                        });
                    }
                    Ok(Keyset {
                        hash: log.event.keysetHash,
                        bytes: log.event.keysetBytes,
                        block_number: log.log.block_number.unwrap_or_default(),
                    })
                })
                .collect()
        })
        .await
    }
}

/// Batch data argument of a batch posting transaction's calldata.
///
/// Every `addSequencerL2BatchFromOrigin*` entry point the inbox has exposed
/// carries `(sequenceNumber, data, ...)`.
fn batch_data_from_input(sequence_number: u64, input: &[u8]) -> Result<Bytes, InboxError> {
    let selector = input.get(..4).map(Selector::from_slice).unwrap_or_default();

    let data = if selector == ISequencerInbox::addSequencerL2BatchFromOriginCall::SELECTOR {
        ISequencerInbox::addSequencerL2BatchFromOriginCall::abi_decode(input)?.data
    } else if selector == ISequencerInboxLegacy::addSequencerL2BatchFromOriginCall::SELECTOR {
        ISequencerInboxLegacy::addSequencerL2BatchFromOriginCall::abi_decode(input)?.data
    } else if selector == ISequencerInbox::addSequencerL2BatchFromOriginDelayProofCall::SELECTOR {
        ISequencerInbox::addSequencerL2BatchFromOriginDelayProofCall::abi_decode(input)?.data
    } else {
        return Err(InboxError::UnknownBatchCall { sequence_number, selector });
    };

    Ok(data)
}
