//! Force inclusion of a delayed message the sequencer has not picked up.
//!
//! Once a delayed message is older than the sequencer inbox's delay window
//! (both in blocks and in seconds), anyone may move it and every message
//! before it into the sequencer inbox.

use crate::{wait_for_receipt, Action, SignerFn};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::bridge::ISequencerInbox;
use client::{BoundContract, ContractTransactor, TransactOpts};
use inbox::{
    accumulator::message_data_hash, force_inclusion_status, DelayedInboxMessage,
    ForceInclusionStatus, SequencerInboxReader,
};
use tracing::info;

/// Input for a force inclusion action.
#[derive(Debug, Clone)]
pub struct ForceInclude {
    pub sequencer_inbox: Address,
    /// Newest message to include; all earlier ones are included with it
    pub message: DelayedInboxMessage,
    pub from: Address,
}

impl ForceInclude {
    /// `SequencerInbox.forceInclusion` arguments for this message.
    pub fn call(&self) -> ISequencerInbox::forceInclusionCall {
        let header = &self.message.header;
        ISequencerInbox::forceInclusionCall {
            _totalDelayedMessagesRead: U256::from(self.message.seq_num() + 1),
            kind: header.kind,
            l1BlockAndTime: [header.block_number, header.timestamp],
            baseFeeL1: header.base_fee_l1,
            sender: header.sender,
            messageDataHash: message_data_hash(&self.message.data),
        }
    }
}

pub struct ForceIncludeAction<P> {
    provider: P,
    signer: Option<SignerFn>,
    reader: SequencerInboxReader<P>,
    action: ForceInclude,
}

impl<P> ForceIncludeAction<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P, signer: Option<SignerFn>, action: ForceInclude) -> Self {
        let reader = SequencerInboxReader::new(provider.clone(), action.sequencer_inbox);
        Self { provider, signer, reader, action }
    }

    /// Eligibility against the latest parent chain block.
    pub async fn status(&self) -> eyre::Result<ForceInclusionStatus> {
        let mtv = self.reader.max_time_variation(None).await?;
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| eyre::eyre!("Failed to get latest block"))?;

        Ok(force_inclusion_status(
            &self.action.message.header,
            &mtv,
            block.header.number,
            block.header.timestamp,
        ))
    }
}

impl<P> Action for ForceIncludeAction<P>
where
    P: Provider + Clone + 'static,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.is_completed().await? {
            return Ok(false);
        }
        Ok(self.status().await?.is_eligible())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let read = self.reader.total_delayed_messages_read(None).await?;
        Ok(read > self.action.message.seq_num())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        if self.is_completed().await? {
            eyre::bail!("Delayed message {} already read", self.action.message.seq_num())
        }
        match self.status().await? {
            ForceInclusionStatus::Eligible => {}
            ForceInclusionStatus::BlockTooSoon { eligible_at_block } => {
                eyre::bail!("Force inclusion not possible before block {eligible_at_block}")
            }
            ForceInclusionStatus::TimeTooSoon { eligible_after_timestamp } => {
                eyre::bail!("Force inclusion not possible until after timestamp {eligible_after_timestamp}")
            }
        }

        let mut sequencer_inbox = BoundContract::new(self.action.sequencer_inbox, self.provider.clone());
        if let Some(signer) = &self.signer {
            sequencer_inbox = sequencer_inbox.with_signer(signer.clone());
        }
        let opts = TransactOpts { from: Some(self.action.from), ..Default::default() };

        info!(index = self.action.message.seq_num(), "Force including delayed messages");
        let tx_hash: TxHash = sequencer_inbox.transact(&self.action.call(), &opts).await?;

        wait_for_receipt(&self.provider, tx_hash).await
    }

    fn description(&self) -> String {
        format!(
            "Force include delayed messages up to {} into {}",
            self.action.message.seq_num(),
            self.action.sequencer_inbox
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, mocked_provider};
    use alloy_primitives::{bytes, keccak256, Bytes, B256};
    use alloy_sol_types::SolCall;
    use inbox::DelayedMessageHeader;

    fn force_include() -> ForceInclude {
        ForceInclude {
            sequencer_inbox: Address::from([5u8; 20]),
            message: DelayedInboxMessage {
                header: DelayedMessageHeader {
                    kind: 3,
                    sender: Address::from([2u8; 20]),
                    block_number: 101,
                    timestamp: 1_700_000_012,
                    request_id: U256::from(41),
                    base_fee_l1: U256::from(25_000_000_000u64),
                },
                data: bytes!("010203"),
                before_inbox_acc: B256::ZERO,
                block_hash: B256::ZERO,
                tx_hash: B256::ZERO,
            },
            from: Address::from([2u8; 20]),
        }
    }

    #[test]
    fn test_call_arguments() {
        let call = force_include().call();
        assert_eq!(call._totalDelayedMessagesRead, U256::from(42));
        assert_eq!(call.kind, 3);
        assert_eq!(call.l1BlockAndTime, [101, 1_700_000_012]);
        assert_eq!(call.messageDataHash, keccak256([1u8, 2, 3]));

        let decoded = ISequencerInbox::forceInclusionCall::abi_decode(&call.abi_encode()).unwrap();
        assert_eq!(decoded.sender, Address::from([2u8; 20]));
    }

    #[tokio::test]
    async fn test_is_completed_once_read() {
        let (provider, asserter) = mocked_provider();
        let action = ForceIncludeAction::new(provider, Some(mock_signer()), force_include());

        asserter.push_success(&Bytes::from(U256::from(41).to_be_bytes::<32>()));
        assert!(!action.is_completed().await.unwrap());

        asserter.push_success(&Bytes::from(U256::from(42).to_be_bytes::<32>()));
        assert!(action.is_completed().await.unwrap());
    }

    #[tokio::test]
    async fn test_completed_action_is_not_ready() {
        let (provider, asserter) = mocked_provider();
        let mut action = ForceIncludeAction::new(provider, Some(mock_signer()), force_include());

        asserter.push_success(&Bytes::from(U256::from(100).to_be_bytes::<32>()));
        assert!(!action.is_ready().await.unwrap());

        asserter.push_success(&Bytes::from(U256::from(100).to_be_bytes::<32>()));
        let err = action.execute().await.unwrap_err();
        assert!(err.to_string().contains("already read"));
    }

    #[tokio::test]
    async fn test_description() {
        let (provider, _) = mocked_provider();
        let action = ForceIncludeAction::new(provider, None, force_include());
        assert!(action.description().contains("up to 41"));
    }
}
