//! Outbox execution of a proven L2→L1 message.

use crate::{wait_for_receipt, Action, SignerFn};
use alloy_primitives::Address;
use alloy_provider::Provider;
use client::{BoundContract, ContractTransactor, TransactOpts};
use outbox::{L2ToL1Message, MessageStatus, OutboxProof, OutboxStateProvider};
use tracing::info;

/// Input for executing an L2→L1 message.
#[derive(Debug, Clone)]
pub struct Execute {
    pub outbox: Address,
    pub message: L2ToL1Message,
    pub proof: OutboxProof,
    /// Address that will submit the transaction
    pub from: Address,
}

/// Action calling `Outbox.executeTransaction` once the message's send root is confirmed.
pub struct ExecuteAction<P> {
    provider: P,
    signer: Option<SignerFn>,
    state: OutboxStateProvider<P>,
    action: Execute,
}

impl<P> ExecuteAction<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P, signer: Option<SignerFn>, action: Execute) -> Self {
        let state = OutboxStateProvider::new(provider.clone(), action.outbox);
        Self { provider, signer, state, action }
    }

    pub async fn status(&self) -> eyre::Result<MessageStatus> {
        Ok(self.state.message_status(&self.action.message, &self.action.proof).await?)
    }
}

impl<P> Action for ExecuteAction<P>
where
    P: Provider + Clone + 'static,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.status().await? == MessageStatus::Executable)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        Ok(self.state.is_spent(self.action.proof.index).await?)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.state
            .ensure_executable(&self.action.message, &self.action.proof)
            .await?;

        let mut outbox = BoundContract::new(self.action.outbox, self.provider.clone());
        if let Some(signer) = &self.signer {
            outbox = outbox.with_signer(signer.clone());
        }
        let opts = TransactOpts { from: Some(self.action.from), ..Default::default() };
        let call = self.action.message.execute_call(&self.action.proof);

        info!(
            index = self.action.proof.index,
            to = %self.action.message.to,
            l2_sender = %self.action.message.l2_sender,
            "Executing outbox message"
        );
        let tx_hash = outbox.transact(&call, &opts).await?;

        wait_for_receipt(&self.provider, tx_hash).await
    }

    fn description(&self) -> String {
        format!(
            "Execute outbox message {} from {} to {}",
            self.action.proof.index, self.action.message.l2_sender, self.action.message.to
        )
    }
}
