//! Reader for the bridge's delayed inbox.
//!
//! `MessageDelivered` on the bridge carries the message header and data
//! hash; the data itself comes from the delivering inbox, either as an
//! `InboxMessageDelivered` log or, for `sendL2MessageFromOrigin`, as the
//! calldata of the transaction that emitted `InboxMessageDeliveredFromOrigin`.

use crate::{
    accumulator::message_data_hash,
    error::{to_u64, InboxError},
    types::{DelayedInboxMessage, DelayedMessageHeader},
};
use alloy_consensus::Transaction as _;
use alloy_contract::private::Provider;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use binding::{
    bridge::IBridge,
    inbox::{IDelayedMessageProvider, IInbox},
};
use client::{
    scan_in_chunks, BoundContract, CallOpts, ContractCaller, ContractFilterer, DecodedLog,
    FilterOpts,
};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

pub(crate) fn call_opts(block: Option<u64>) -> CallOpts {
    block.map(CallOpts::at_block).unwrap_or_default()
}

pub struct DelayedBridge<P> {
    bridge: BoundContract<P>,
    provider: P,
    first_block: u64,
}

impl<P> DelayedBridge<P>
where
    P: Provider + Clone + 'static,
{
    /// `first_block` is the parent chain block the bridge was deployed at.
    pub fn new(provider: P, bridge: Address, first_block: u64) -> Self {
        Self {
            bridge: BoundContract::new(bridge, provider.clone()),
            provider,
            first_block,
        }
    }

    pub const fn first_block(&self) -> u64 {
        self.first_block
    }

    pub const fn address(&self) -> Address {
        self.bridge.address()
    }

    /// Number of delayed messages at `block` (latest when `None`); zero before deployment.
    pub async fn message_count(&self, block: Option<u64>) -> Result<u64, InboxError> {
        if block.is_some_and(|b| b < self.first_block) {
            return Ok(0);
        }
        let count = self
            .bridge
            .call(&IBridge::delayedMessageCountCall, call_opts(block))
            .await?;
        to_u64(count, "delayedMessageCount")
    }

    /// Delayed accumulator after message `seq_num`.
    pub async fn accumulator(&self, seq_num: u64, block: Option<u64>) -> Result<B256, InboxError> {
        let acc = self
            .bridge
            .call(&IBridge::delayedInboxAccsCall(U256::from(seq_num)), call_opts(block))
            .await?;
        Ok(acc)
    }

    /// Parent chain block in which delayed message `index` was delivered.
    ///
    /// Probes exponentially from `hint` (the deployment block by default)
    /// until the message count crosses `index + 1`, then bisects.
    pub async fn find_block_for_message(&self, index: u64, hint: Option<u64>) -> Result<u64, InboxError> {
        let target = index.saturating_add(1);
        let head = self.provider.get_block_number().await?;
        let first = self.first_block;
        let start = hint.unwrap_or(first).clamp(first, head.max(first));

        // Invariant once set: count(low) < target <= count(high)
        let (mut low, mut high);
        if self.message_count(Some(start)).await? >= target {
            high = start;
            let mut step = 1u64;
            loop {
                if high == first {
                    return Ok(first);
                }
                let probe = high.saturating_sub(step).max(first);
                if self.message_count(Some(probe)).await? < target {
                    low = probe;
                    break;
                }
                high = probe;
                step = step.saturating_mul(2);
            }
        } else {
            low = start;
            let mut step = 1u64;
            loop {
                if low >= head {
                    return Err(InboxError::BlockNotFound { index, head });
                }
                let probe = low.saturating_add(step).min(head);
                if self.message_count(Some(probe)).await? >= target {
                    high = probe;
                    break;
                }
                low = probe;
                step = step.saturating_mul(2);
            }
        }

        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if self.message_count(Some(mid)).await? < target {
                low = mid;
            } else {
                high = mid;
            }
        }

        debug!(index, block = high, "Found block for delayed message");
        Ok(high)
    }

    /// Every delayed message delivered in `from..=to`, with its data, sorted by index.
    pub async fn lookup_messages_in_range(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<DelayedInboxMessage>, InboxError> {
        let delivered = scan_in_chunks(from_block, to_block, InboxError::is_retryable, |from, to| {
            self.scan_delivered(from, to)
        })
        .await?;

        if delivered.is_empty() {
            debug!(from = from_block, to = to_block, "No delayed messages in range");
            return Ok(vec![]);
        }

        let mut min_block = u64::MAX;
        let mut max_block = 0;
        let mut inboxes = BTreeSet::new();
        let mut message_ids = Vec::with_capacity(delivered.len());
        for log in &delivered {
            let block = log.block_number().ok_or(InboxError::IncompleteLog("block number"))?;
            min_block = min_block.min(block);
            max_block = max_block.max(block);
            inboxes.insert(log.event.inbox);
            message_ids.push(B256::from(log.event.messageIndex));
        }

        let mut message_data = HashMap::with_capacity(delivered.len());
        for inbox in inboxes {
            self.fill_message_data(inbox, &message_ids, min_block, max_block, &mut message_data)
                .await?;
        }

        let mut messages = Vec::with_capacity(delivered.len());
        for DecodedLog { event, log } in delivered {
            let index = event.messageIndex;
            let data = message_data
                .remove(&index)
                .ok_or(InboxError::MessageNotFound { index })?;

            let actual = message_data_hash(&data);
            if actual != event.messageDataHash {
                return Err(InboxError::DataHashMismatch {
                    index,
                    expected: event.messageDataHash,
                    actual,
                });
            }

            messages.push(DelayedInboxMessage {
                header: DelayedMessageHeader {
                    kind: event.kind,
                    sender: event.sender,
                    block_number: log.block_number.unwrap_or_default(),
                    timestamp: event.timestamp,
                    request_id: index,
                    base_fee_l1: event.baseFeeL1,
                },
                data,
                before_inbox_acc: event.beforeInboxAcc,
                block_hash: log.block_hash.unwrap_or_default(),
                tx_hash: log.transaction_hash.unwrap_or_default(),
            });
        }
        messages.sort_by_key(|m| m.header.request_id);

        debug!(
            from = from_block,
            to = to_block,
            count = messages.len(),
            "Looked up delayed messages"
        );
        Ok(messages)
    }

    async fn scan_delivered(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<DecodedLog<IBridge::MessageDelivered>>, InboxError> {
        let logs = self
            .bridge
            .filter_logs::<IBridge::MessageDelivered>(&FilterOpts::range(from_block, to_block))
            .await?
            .collect()
            .await?;
        Ok(logs)
    }

    /// Collect the data of `message_ids` delivered through `inbox`.
    async fn fill_message_data(
        &self,
        inbox: Address,
        message_ids: &[B256],
        min_block: u64,
        max_block: u64,
        message_data: &mut HashMap<U256, Bytes>,
    ) -> Result<(), InboxError> {
        let inbox = BoundContract::new(inbox, self.provider.clone());
        let opts = FilterOpts::range(min_block, max_block).topic1(message_ids.iter().copied());

        let delivered = inbox
            .filter_logs::<IDelayedMessageProvider::InboxMessageDelivered>(&opts)
            .await?
            .collect()
            .await?;
        for log in delivered {
            message_data.insert(log.event.messageNum, log.event.data);
        }

        let from_origin = inbox
            .filter_logs::<IDelayedMessageProvider::InboxMessageDeliveredFromOrigin>(&opts)
            .await?
            .collect()
            .await?;
        for log in from_origin {
            let tx_hash = log
                .transaction_hash()
                .ok_or(InboxError::IncompleteLog("transaction hash"))?;
            let data = self.origin_message_data(tx_hash).await?;
            message_data.insert(log.event.messageNum, data);
        }

        Ok(())
    }

    /// Message data of a `sendL2MessageFromOrigin` transaction.
    async fn origin_message_data(&self, tx_hash: B256) -> Result<Bytes, InboxError> {
        let tx = self
            .provider
            .get_transaction_by_hash(tx_hash)
            .await?
            .ok_or(InboxError::TransactionNotFound(tx_hash))?;
        let call = IInbox::sendL2MessageFromOriginCall::abi_decode(tx.input())?;
        Ok(call.messageData)
    }
}

/// Check that `messages` extend the delayed chain ending in `prev_acc`.
///
/// Messages must be consecutive and each `before_inbox_acc` must equal the
/// accumulator the previous message produced. Returns the final accumulator.
pub fn verify_chain(messages: &[DelayedInboxMessage], prev_acc: B256) -> Result<B256, InboxError> {
    let mut acc = prev_acc;
    let mut prev_seq: Option<u64> = None;

    for message in messages {
        let seq = message.seq_num();
        if let Some(prev) = prev_seq {
            if prev.checked_add(1) != Some(seq) {
                return Err(InboxError::MessagesOutOfOrder { after: prev, got: seq });
            }
        }
        if message.before_inbox_acc != acc {
            return Err(InboxError::AccumulatorMismatch {
                index: seq,
                expected: message.before_inbox_acc,
                computed: acc,
            });
        }
        acc = message.after_inbox_acc();
        prev_seq = Some(seq);
    }

    Ok(acc)
}
