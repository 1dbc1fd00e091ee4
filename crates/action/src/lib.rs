pub mod deposit;
pub mod execute;
pub mod force_include;

use alloy_primitives::{TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
pub use client::SignerFn;
use std::future::Future;
use tracing::info;

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    ///
    /// Returns true if all preconditions are met.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Check if the action has already been completed.
    fn is_completed(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Execute the action and wait for its receipt.
    fn execute(&mut self) -> impl Future<Output = eyre::Result<Result>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Result of an action.
#[derive(Debug, Clone)]
pub struct Result {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<U256>,
}

/// Wait until `tx_hash` is mined; a reverted transaction is an error.
pub(crate) async fn wait_for_receipt<P: Provider>(provider: &P, tx_hash: TxHash) -> eyre::Result<Result> {
    let receipt = PendingTransactionBuilder::new(provider.root().clone(), tx_hash)
        .get_receipt()
        .await?;

    if !receipt.status() {
        eyre::bail!("Transaction {tx_hash} reverted");
    }

    info!(
        tx_hash = %receipt.transaction_hash,
        block_number = receipt.block_number,
        gas_used = receipt.gas_used,
        "Transaction confirmed"
    );

    Ok(Result {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: Some(U256::from(receipt.gas_used)),
    })
}
