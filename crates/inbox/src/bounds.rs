//! Time bounds of sequencer batches and force-inclusion eligibility.

use crate::{
    error::{to_u64, InboxError},
    types::DelayedMessageHeader,
};
use binding::bridge::{self, ISequencerInbox, TimeBounds};

/// How far a batch may lag behind or run ahead of the parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaxTimeVariation {
    pub delay_blocks: u64,
    pub future_blocks: u64,
    pub delay_seconds: u64,
    pub future_seconds: u64,
}

impl MaxTimeVariation {
    /// Window a batch posted at (`block_number`, `timestamp`) must fall in.
    pub const fn time_bounds(&self, block_number: u64, timestamp: u64) -> TimeBounds {
        TimeBounds {
            minTimestamp: timestamp.saturating_sub(self.delay_seconds),
            maxTimestamp: timestamp.saturating_add(self.future_seconds),
            minBlockNumber: block_number.saturating_sub(self.delay_blocks),
            maxBlockNumber: block_number.saturating_add(self.future_blocks),
        }
    }
}

impl TryFrom<bridge::MaxTimeVariation> for MaxTimeVariation {
    type Error = InboxError;

    fn try_from(value: bridge::MaxTimeVariation) -> Result<Self, Self::Error> {
        Ok(Self {
            delay_blocks: to_u64(value.delayBlocks, "delayBlocks")?,
            future_blocks: to_u64(value.futureBlocks, "futureBlocks")?,
            delay_seconds: to_u64(value.delaySeconds, "delaySeconds")?,
            future_seconds: to_u64(value.futureSeconds, "futureSeconds")?,
        })
    }
}

impl TryFrom<ISequencerInbox::maxTimeVariationReturn> for MaxTimeVariation {
    type Error = InboxError;

    fn try_from(value: ISequencerInbox::maxTimeVariationReturn) -> Result<Self, Self::Error> {
        bridge::MaxTimeVariation {
            delayBlocks: value.delayBlocks,
            futureBlocks: value.futureBlocks,
            delaySeconds: value.delaySeconds,
            futureSeconds: value.futureSeconds,
        }
        .try_into()
    }
}

/// Whether a delayed message may be force-included by anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceInclusionStatus {
    Eligible,
    /// Not enough parent chain blocks have passed
    BlockTooSoon { eligible_at_block: u64 },
    /// Not enough time has passed
    TimeTooSoon { eligible_after_timestamp: u64 },
}

impl ForceInclusionStatus {
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Force inclusion needs `blockNumber + delayBlocks < current_block` and
/// `timestamp + delaySeconds < current_timestamp`; the block condition is
/// checked first.
pub const fn force_inclusion_status(
    header: &DelayedMessageHeader,
    mtv: &MaxTimeVariation,
    current_block: u64,
    current_timestamp: u64,
) -> ForceInclusionStatus {
    let last_blocked = header.block_number.saturating_add(mtv.delay_blocks);
    if last_blocked >= current_block {
        return ForceInclusionStatus::BlockTooSoon {
            eligible_at_block: last_blocked.saturating_add(1),
        };
    }
    let last_blocked_time = header.timestamp.saturating_add(mtv.delay_seconds);
    if last_blocked_time >= current_timestamp {
        return ForceInclusionStatus::TimeTooSoon {
            eligible_after_timestamp: last_blocked_time,
        };
    }
    ForceInclusionStatus::Eligible
}
