//! ETH deposit into the delayed inbox.

use crate::{wait_for_receipt, Action, SignerFn};
use alloy_primitives::{utils::format_ether, Address, TxHash, U256};
use alloy_provider::Provider;
use binding::inbox::IInbox;
use client::{BoundContract, ContractTransactor, TransactOpts};
use tracing::info;

/// Input for a deposit action.
#[derive(Debug, Clone)]
pub struct Deposit {
    /// Inbox contract address on the parent chain
    pub inbox: Address,
    /// Depositor; credited (aliased if a contract) on L2
    pub from: Address,
    /// Amount to deposit (in wei)
    pub amount: U256,
}

/// Deposit action sending ETH through `Inbox.depositEth`.
pub struct DepositAction<P> {
    provider: P,
    signer: Option<SignerFn>,
    deposit: Deposit,
    tx_hash: Option<TxHash>,
}

impl<P> DepositAction<P>
where
    P: Provider + Clone + 'static,
{
    /// Without a signer the provider's wallet signs.
    pub const fn new(provider: P, signer: Option<SignerFn>, deposit: Deposit) -> Self {
        Self { provider, signer, deposit, tx_hash: None }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.deposit.inbox == Address::ZERO {
            eyre::bail!("Inbox address is zero");
        }
        if self.deposit.amount.is_zero() {
            eyre::bail!("Deposit amount is zero");
        }
        Ok(())
    }
}

impl<P> Action for DepositAction<P>
where
    P: Provider + Clone + 'static,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.validate().is_ok())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        // Deposits are not idempotent; completion only tracks this instance.
        Ok(self.tx_hash.is_some())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;
        if let Some(tx_hash) = self.tx_hash {
            eyre::bail!("Deposit already sent in {tx_hash}");
        }

        let mut inbox = BoundContract::new(self.deposit.inbox, self.provider.clone());
        if let Some(signer) = &self.signer {
            inbox = inbox.with_signer(signer.clone());
        }
        let opts = TransactOpts {
            from: Some(self.deposit.from),
            value: Some(self.deposit.amount),
            ..Default::default()
        };

        info!(inbox = %self.deposit.inbox, amount = %format_ether(self.deposit.amount), "Depositing ETH");
        let tx_hash = inbox.transact(&IInbox::depositEthCall, &opts).await?;
        self.tx_hash = Some(tx_hash);

        wait_for_receipt(&self.provider, tx_hash).await
    }

    fn description(&self) -> String {
        format!(
            "Deposit {} ETH from {} into inbox {}",
            format_ether(self.deposit.amount),
            self.deposit.from,
            self.deposit.inbox
        )
    }
}
