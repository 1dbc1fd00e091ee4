//! RPC client layer for the rollup contracts.
//!
//! Provider construction and transaction signing live here, together with
//! the generic contract adapter ([`contract::BoundContract`]), the typed
//! event iterator ([`events::EventIterator`]) and the error model shared
//! by every contract call ([`error::BindingError`]).

pub mod contract;
pub mod error;
pub mod events;
pub mod scan;

pub use contract::{
    BoundContract, CallOpts, ContractCaller, ContractFilterer, ContractTransactor, FilterOpts,
    TransactOpts,
};
pub use error::{BindingError, ErrorKind};
pub use events::{CloseHandle, DecodedLog, EventIterator, IteratorState};
pub use scan::scan_in_chunks;

use alloy_consensus::TxEnvelope;
use alloy_network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use std::{future::Future, pin::Pin, sync::Arc};
use thiserror::Error;

/// A function that signs a transaction request and returns signed bytes.
///
/// Used by [`BoundContract`] and the actions when the key is not held by a
/// wallet provider.
pub type SignerFn = Arc<
    dyn Fn(TransactionRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send>>
        + Send
        + Sync,
>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// General error with context
    #[error("Client error: {0}")]
    Other(String),
}

/// Convenience function to create an ethereum rpc provider from url.
///
/// The provider is type-erased so it can be moved into spawned tasks.
pub async fn create_provider(rpc_url: &str) -> Result<DynProvider, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url).erased();

    Ok(provider)
}

/// Create a provider with wallet signing capability from a private key.
pub fn create_wallet_provider(
    rpc_url: &str,
    private_key: &str,
) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;

    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(provider)
}

/// Check that the provider is connected to the expected chain.
pub async fn ensure_chain_id<P: Provider>(provider: &P, expected: u64) -> Result<(), ClientError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    if chain_id != expected {
        return Err(ClientError::Other(format!(
            "RPC serves chain {chain_id}, expected {expected}"
        )));
    }
    Ok(())
}

/// Create a SignerFn from a local private key and provider.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// signing locally with the private key.
pub fn local_signer_fn<P>(
    private_key: &str,
    chain_id: u64,
    provider: P,
) -> Result<SignerFn, ClientError>
where
    P: Provider + Clone + 'static,
{
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;
    let from_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    Ok(Arc::new(move |tx: TransactionRequest| {
        let wallet = wallet.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, chain_id).await?;

            // Build and sign the typed transaction
            let tx_envelope: TxEnvelope = filled_tx
                .build(&wallet)
                .await
                .map_err(|e| eyre::eyre!("{}", e))?;

            // Encode to EIP-2718 bytes
            let mut encoded = Vec::new();
            tx_envelope.encode_2718(&mut encoded);
            Ok(Bytes::from(encoded))
        })
    }))
}

/// Fill missing transaction fields using the provider.
///
/// Sets sender, chain id, nonce and EIP-1559 fees, then estimates gas with a
/// 20% margin.
pub async fn fill_transaction<P>(
    mut tx: TransactionRequest,
    provider: &P,
    from: Address,
    chain_id: u64,
) -> eyre::Result<TransactionRequest>
where
    P: Provider,
{
    // Set from address
    if tx.from.is_none() {
        tx.from = Some(from);
    }

    // Set chain_id
    if tx.chain_id.is_none() {
        tx.chain_id = Some(chain_id);
    }

    // Get nonce if not set
    if tx.nonce.is_none() {
        let nonce = provider.get_transaction_count(from).await?;
        tx.nonce = Some(nonce);
    }

    // Get fee parameters if not set (EIP-1559) - do this before gas estimation
    // since gas estimation may need fee info
    if tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none() {
        let fee_estimate = provider.estimate_eip1559_fees().await?;
        if tx.max_fee_per_gas.is_none() {
            tx.max_fee_per_gas = Some(fee_estimate.max_fee_per_gas);
        }
        if tx.max_priority_fee_per_gas.is_none() {
            tx.max_priority_fee_per_gas = Some(fee_estimate.max_priority_fee_per_gas);
        }
    }

    // Estimate gas if not set
    if tx.gas.is_none() {
        let gas_estimate = provider.estimate_gas(tx.clone()).await?;
        // Add 20% buffer for safety
        tx.gas = Some(gas_estimate + gas_estimate / 5);
    }

    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloy_transport::mock::Asserter;

    // anvil's first dev account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = create_wallet_provider("http://localhost:8545", "0x1234");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));

        let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse().unwrap());
        let result = local_signer_fn("not a key", 1, provider);
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_wallet_provider_accepts_key() {
        assert!(create_wallet_provider("http://localhost:8545", DEV_KEY).is_ok());
    }

    #[tokio::test]
    async fn test_ensure_chain_id() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());

        asserter.push_success(&"0xa4b1");
        assert!(ensure_chain_id(&provider, 42161).await.is_ok());

        asserter.push_success(&"0x1");
        assert!(matches!(
            ensure_chain_id(&provider, 42161).await,
            Err(ClientError::Other(_))
        ));

        asserter.push_failure_msg("connection reset");
        assert!(matches!(
            ensure_chain_id(&provider, 42161).await,
            Err(ClientError::Connection(_))
        ));
    }
}
