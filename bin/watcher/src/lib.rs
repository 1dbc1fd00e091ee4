pub mod config;
pub mod metrics;

use crate::metrics::Metrics;
use action::Action;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use binding::{
    bridge::{IBridge, ISequencerInbox},
    ownable::IOwnable,
};
use client::{BoundContract, CallOpts, ContractCaller, ContractFilterer, DecodedLog, FilterOpts};
use ::config::NetworkConfig;
use inbox::{
    verify_chain, DelayedBridge, DelayedInboxMessage, InboxError, MaxTimeVariation, PayloadKind,
    SequencerInboxReader,
};
use outbox::{L2ToL1Message, OutboxProof};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, time::Duration};
use tracing::{debug, info, warn};

/// Snapshot of both inbox chains at one parent chain block.
#[derive(Debug, Clone)]
pub struct Status {
    pub block: u64,
    /// Rollup contract registered on the bridge, and its owner
    pub rollup: Address,
    pub rollup_owner: Address,
    pub delayed_messages: u64,
    pub delayed_acc: Option<B256>,
    pub batches: u64,
    pub batch_acc: Option<B256>,
    /// Delayed messages already consumed by the sequencer inbox
    pub delayed_messages_read: u64,
    pub max_time_variation: MaxTimeVariation,
}

impl Status {
    /// Delayed messages the sequencer has not included yet.
    pub const fn pending_delayed(&self) -> u64 {
        self.delayed_messages.saturating_sub(self.delayed_messages_read)
    }
}

pub async fn status<P>(provider: P, network: &NetworkConfig) -> eyre::Result<Status>
where
    P: Provider + Clone + 'static,
{
    let block = provider.get_block_number().await?;
    let bridge = DelayedBridge::new(provider.clone(), network.contracts.bridge, network.deployed_at_block);
    let sequencer_inbox = SequencerInboxReader::new(provider.clone(), network.contracts.sequencer_inbox);
    let at = Some(block);

    let rollup = BoundContract::new(network.contracts.bridge, provider.clone())
        .call(&IBridge::rollupCall, CallOpts::at_block(block))
        .await?;
    let rollup_owner = BoundContract::new(rollup, provider)
        .call(&IOwnable::ownerCall, CallOpts::at_block(block))
        .await?;

    let delayed_messages = bridge.message_count(at).await?;
    let delayed_acc = match delayed_messages.checked_sub(1) {
        Some(last) => Some(bridge.accumulator(last, at).await?),
        None => None,
    };
    let batches = sequencer_inbox.batch_count(at).await?;
    let batch_acc = match batches.checked_sub(1) {
        Some(last) => Some(sequencer_inbox.inbox_acc(last, at).await?),
        None => None,
    };

    Ok(Status {
        block,
        rollup,
        rollup_owner,
        delayed_messages,
        delayed_acc,
        batches,
        batch_acc,
        delayed_messages_read: sequencer_inbox.total_delayed_messages_read(at).await?,
        max_time_variation: sequencer_inbox.max_time_variation(at).await?,
    })
}

/// Result of re-deriving the delayed accumulator over a block range.
#[derive(Debug, Clone, Default)]
pub struct DelayedReport {
    pub messages: usize,
    pub first: Option<u64>,
    pub last: Option<u64>,
    /// Accumulator after the last message
    pub acc: Option<B256>,
}

/// Rebuild every delayed message delivered in `from..=to` and check that
/// hashing them reproduces the bridge's accumulator.
pub async fn verify_delayed<P>(
    provider: P,
    network: &NetworkConfig,
    from_block: u64,
    to_block: u64,
) -> eyre::Result<DelayedReport>
where
    P: Provider + Clone + 'static,
{
    let bridge = DelayedBridge::new(provider, network.contracts.bridge, network.deployed_at_block);
    let messages = bridge.lookup_messages_in_range(from_block, to_block).await?;
    let (Some(first), Some(last)) = (messages.first(), messages.last()) else {
        return Ok(DelayedReport::default());
    };

    let prev_acc = match first.seq_num().checked_sub(1) {
        Some(prev) => bridge.accumulator(prev, Some(to_block)).await?,
        None => B256::ZERO,
    };
    let acc = verify_chain(&messages, prev_acc)?;

    let on_chain = bridge.accumulator(last.seq_num(), Some(to_block)).await?;
    if on_chain != acc {
        return Err(InboxError::AccumulatorMismatch {
            index: last.seq_num(),
            expected: on_chain,
            computed: acc,
        }
        .into());
    }

    Ok(DelayedReport {
        messages: messages.len(),
        first: Some(first.seq_num()),
        last: Some(last.seq_num()),
        acc: Some(acc),
    })
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub batches: usize,
    /// Batches whose data was fetched and matched their accumulator
    pub verified: usize,
    /// Batches whose data is not retrievable here (blobs)
    pub skipped: usize,
    pub payloads: BTreeMap<String, usize>,
}

/// Check the sequencer batches delivered in `from..=to`.
///
/// The first batch must continue the on-chain accumulator, and the last
/// batch's delayed accumulator must match the bridge. With `with_data`, each
/// batch's data is fetched and hashed against its accumulator.
pub async fn verify_batches<P>(
    provider: P,
    network: &NetworkConfig,
    from_block: u64,
    to_block: u64,
    with_data: bool,
) -> eyre::Result<BatchReport>
where
    P: Provider + Clone + 'static,
{
    let reader = SequencerInboxReader::new(provider.clone(), network.contracts.sequencer_inbox);
    let bridge = DelayedBridge::new(provider, network.contracts.bridge, network.deployed_at_block);

    let batches = reader.lookup_batches_in_range(from_block, to_block).await?;
    let (Some(first), Some(last)) = (batches.first(), batches.last()) else {
        return Ok(BatchReport::default());
    };

    if let Some(prev) = first.sequence_number.checked_sub(1) {
        let expected = reader.inbox_acc(prev, Some(to_block)).await?;
        if expected != first.before_inbox_acc {
            return Err(InboxError::AccumulatorMismatch {
                index: first.sequence_number,
                expected,
                computed: first.before_inbox_acc,
            }
            .into());
        }
    }
    if let Some(last_read) = last.after_delayed_count.checked_sub(1) {
        let expected = bridge.accumulator(last_read, Some(to_block)).await?;
        if expected != last.after_delayed_acc {
            return Err(InboxError::AccumulatorMismatch {
                index: last_read,
                expected,
                computed: last.after_delayed_acc,
            }
            .into());
        }
    }

    let mut report = BatchReport { batches: batches.len(), ..Default::default() };
    if !with_data {
        return Ok(report);
    }

    for batch in &batches {
        match reader.verified_batch_data(batch).await {
            Ok(data) => {
                report.verified += 1;
                let kind = format!("{:?}", PayloadKind::of(&data));
                *report.payloads.entry(kind).or_default() += 1;
            }
            Err(InboxError::UnsupportedDataLocation { sequence_number, location }) => {
                debug!(batch = sequence_number, ?location, "Skipping batch data");
                report.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(report)
}

/// Locate delayed message `index` and rebuild it with its data.
pub async fn find_delayed_message<P>(
    provider: P,
    network: &NetworkConfig,
    index: u64,
) -> eyre::Result<DelayedInboxMessage>
where
    P: Provider + Clone + 'static,
{
    let bridge = DelayedBridge::new(provider, network.contracts.bridge, network.deployed_at_block);
    let block = bridge.find_block_for_message(index, None).await?;
    let messages = bridge.lookup_messages_in_range(block, block).await?;

    messages
        .into_iter()
        .find(|message| message.seq_num() == index)
        .ok_or_else(|| eyre::eyre!("Delayed message {index} not found in block {block}"))
}

enum Next {
    Delayed(Option<DecodedLog<IBridge::MessageDelivered>>),
    Batch(Option<DecodedLog<ISequencerInbox::SequencerBatchDelivered>>),
    Shutdown,
}

/// Follow new delayed messages and sequencer batches until ctrl-c or a
/// subscription fails.
pub async fn watch<P>(
    provider: P,
    network: &NetworkConfig,
    poll_interval: Duration,
    metrics: &Metrics,
) -> eyre::Result<()>
where
    P: Provider + Clone + 'static,
{
    let head = provider.get_block_number().await?;
    let opts = FilterOpts::from_block(head);

    let bridge = BoundContract::new(network.contracts.bridge, provider.clone()).with_poll_interval(poll_interval);
    let sequencer_inbox =
        BoundContract::new(network.contracts.sequencer_inbox, provider).with_poll_interval(poll_interval);

    let mut delayed = bridge.watch_logs::<IBridge::MessageDelivered>(&opts).await?;
    let mut batches = sequencer_inbox
        .watch_logs::<ISequencerInbox::SequencerBatchDelivered>(&opts)
        .await?;

    info!(from = head, "Watching delayed messages and sequencer batches");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let next = tokio::select! {
            event = delayed.next() => Next::Delayed(event),
            event = batches.next() => Next::Batch(event),
            _ = &mut shutdown => Next::Shutdown,
        };

        match next {
            Next::Delayed(Some(DecodedLog { event, log })) => {
                let index = event.messageIndex.saturating_to::<u64>();
                let block = log.block_number.unwrap_or_default();
                info!(
                    index,
                    kind = event.kind,
                    sender = %event.sender,
                    inbox = %event.inbox,
                    block,
                    "Delayed message delivered"
                );
                metrics.record_delayed_message(index, block);
            }
            Next::Batch(Some(DecodedLog { event, log })) => {
                let sequence_number = event.batchSequenceNumber.saturating_to::<u64>();
                let block = log.block_number.unwrap_or_default();
                let location = format!("{:?}", event.dataLocation);
                info!(
                    sequence_number,
                    delayed_read = %event.afterDelayedMessagesRead,
                    location = %location,
                    block,
                    "Sequencer batch delivered"
                );
                metrics.record_batch(sequence_number, block, &location);
            }
            Next::Delayed(None) | Next::Batch(None) => break,
            Next::Shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    delayed.close();
    batches.close();

    if let Some(err) = delayed.error() {
        metrics.record_iterator_failure("MessageDelivered");
        eyre::bail!("MessageDelivered subscription failed: {err}");
    }
    if let Some(err) = batches.error() {
        metrics.record_iterator_failure("SequencerBatchDelivered");
        eyre::bail!("SequencerBatchDelivered subscription failed: {err}");
    }
    Ok(())
}

/// Check readiness, then execute `action` unless it is already done.
///
/// In dry-run mode nothing is sent.
pub async fn run_action<A: Action>(action: &mut A, dry_run: bool) -> eyre::Result<Option<action::Result>> {
    info!(action = %action.description(), "Running action");

    if action.is_completed().await? {
        info!("Action already completed");
        return Ok(None);
    }
    if !action.is_ready().await? {
        warn!("Action not ready");
        return Ok(None);
    }
    if dry_run {
        info!("Dry-run: not sending transaction");
        return Ok(None);
    }

    let result = action.execute().await?;
    info!(
        tx_hash = %result.tx_hash,
        block_number = ?result.block_number,
        gas_used = ?result.gas_used,
        "Action executed"
    );
    Ok(Some(result))
}

/// An L2→L1 message with its proof, as read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxMessageFile {
    pub l2_sender: Address,
    pub to: Address,
    pub l2_block: u64,
    pub l1_block: u64,
    pub l2_timestamp: u64,
    pub value: U256,
    pub data: Bytes,
    pub proof: Vec<B256>,
    pub index: u64,
}

impl OutboxMessageFile {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn into_parts(self) -> (L2ToL1Message, OutboxProof) {
        let message = L2ToL1Message {
            l2_sender: self.l2_sender,
            to: self.to,
            l2_block: self.l2_block,
            l1_block: self.l1_block,
            l2_timestamp: self.l2_timestamp,
            value: self.value,
            data: self.data,
        };
        (message, OutboxProof { proof: self.proof, index: self.index })
    }
}
