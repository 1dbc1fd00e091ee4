//! Generic contract-call adapter.
//!
//! Every typed contract surface is driven through three capabilities:
//! [`ContractCaller`] (read-only `eth_call`), [`ContractTransactor`]
//! (signed, broadcast transactions) and [`ContractFilterer`] (historical and
//! live event logs). [`BoundContract`] implements all three over a single
//! provider handle bound to one contract address.

use crate::{
    error::BindingError,
    events::EventIterator,
    SignerFn,
};
use alloy_primitives::{Address, Bytes, TxHash, TxKind, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{BlockId, BlockNumberOrTag, Filter, TransactionRequest};
use alloy_sol_types::{SolCall, SolEvent};
use binding::ContractArtifact;
use std::{future::Future, time::Duration};
use tracing::{debug, info};

/// Options of a read-only call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOpts {
    /// Block to execute against (defaults to latest)
    pub block: BlockId,
    pub from: Option<Address>,
}

impl CallOpts {
    pub fn at_block(block: u64) -> Self {
        Self { block: BlockId::number(block), from: None }
    }
}

/// Options of a state-changing transaction.
///
/// Unset fields are left to the signer (or the node) to fill.
#[derive(Debug, Clone, Default)]
pub struct TransactOpts {
    pub from: Option<Address>,
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl TransactOpts {
    pub fn with_value(value: U256) -> Self {
        Self { value: Some(value), ..Default::default() }
    }

    fn apply(&self, mut tx: TransactionRequest) -> TransactionRequest {
        if self.from.is_some() {
            tx.from = self.from;
        }
        if self.value.is_some() {
            tx.value = self.value;
        }
        if self.gas_limit.is_some() {
            tx.gas = self.gas_limit;
        }
        if self.nonce.is_some() {
            tx.nonce = self.nonce;
        }
        if self.max_fee_per_gas.is_some() {
            tx.max_fee_per_gas = self.max_fee_per_gas;
        }
        if self.max_priority_fee_per_gas.is_some() {
            tx.max_priority_fee_per_gas = self.max_priority_fee_per_gas;
        }
        tx
    }
}

/// Log query bounds and indexed-argument filters.
///
/// `topics[i]` restricts indexed argument `i` (topic `i + 1`) to any of the
/// listed values; an empty list matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterOpts {
    pub from_block: u64,
    /// Inclusive; `None` means latest
    pub to_block: Option<u64>,
    pub topics: [Vec<B256>; 3],
}

impl FilterOpts {
    pub fn range(from_block: u64, to_block: u64) -> Self {
        Self { from_block, to_block: Some(to_block), ..Default::default() }
    }

    pub fn from_block(from_block: u64) -> Self {
        Self { from_block, ..Default::default() }
    }

    /// Restrict the first indexed argument.
    pub fn topic1(mut self, values: impl IntoIterator<Item = B256>) -> Self {
        self.topics[0] = values.into_iter().collect();
        self
    }

    pub fn topic2(mut self, values: impl IntoIterator<Item = B256>) -> Self {
        self.topics[1] = values.into_iter().collect();
        self
    }

    pub fn topic3(mut self, values: impl IntoIterator<Item = B256>) -> Self {
        self.topics[2] = values.into_iter().collect();
        self
    }

    fn to_filter<E: SolEvent>(&self, address: Address) -> Filter {
        let mut filter = Filter::new()
            .address(address)
            .event_signature(E::SIGNATURE_HASH)
            .from_block(self.from_block);
        filter = match self.to_block {
            Some(to) => filter.to_block(to),
            None => filter.to_block(BlockNumberOrTag::Latest),
        };
        if !self.topics[0].is_empty() {
            filter = filter.topic1(self.topics[0].clone());
        }
        if !self.topics[1].is_empty() {
            filter = filter.topic2(self.topics[1].clone());
        }
        if !self.topics[2].is_empty() {
            filter = filter.topic3(self.topics[2].clone());
        }
        filter
    }
}

/// Read-only contract calls.
pub trait ContractCaller {
    /// Execute `call` with `eth_call` and decode the typed return value.
    fn call<C>(
        &self,
        call: &C,
        opts: CallOpts,
    ) -> impl Future<Output = Result<C::Return, BindingError>> + Send
    where
        C: SolCall + Sync;
}

/// State-changing contract calls.
pub trait ContractTransactor {
    /// Sign and broadcast `call`, returning the transaction hash as soon as
    /// the node accepted it. Inclusion is not awaited.
    fn transact<C>(
        &self,
        call: &C,
        opts: &TransactOpts,
    ) -> impl Future<Output = Result<TxHash, BindingError>> + Send
    where
        C: SolCall + Sync;
}

/// Event log queries.
pub trait ContractFilterer {
    /// Finite iterator over logs already on chain.
    fn filter_logs<E>(
        &self,
        opts: &FilterOpts,
    ) -> impl Future<Output = Result<EventIterator<E>, BindingError>> + Send
    where
        E: SolEvent + Send + 'static;

    /// Unbounded iterator over new logs; stops only when closed or failed.
    fn watch_logs<E>(
        &self,
        opts: &FilterOpts,
    ) -> impl Future<Output = Result<EventIterator<E>, BindingError>> + Send
    where
        E: SolEvent + Send + 'static;
}

/// A contract address bound to a provider, optionally with an external signer.
///
/// Without a signer, transactions go through `eth_sendTransaction` (or the
/// wallet filler of a wallet provider). With one, the request is signed by
/// the [`SignerFn`] and sent raw.
#[derive(Clone)]
pub struct BoundContract<P> {
    address: Address,
    provider: P,
    signer: Option<SignerFn>,
    poll_interval: Option<Duration>,
}

impl<P> std::fmt::Debug for BoundContract<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundContract")
            .field("address", &self.address)
            .field("signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<P> BoundContract<P>
where
    P: Provider + Clone + 'static,
{
    pub const fn new(address: Address, provider: P) -> Self {
        Self { address, provider, signer: None, poll_interval: None }
    }

    pub fn with_signer(mut self, signer: SignerFn) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Poll interval of live log filters (provider default otherwise).
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Broadcast the creation transaction of `artifact` with the encoded
    /// constructor arguments appended. Returns the transaction hash.
    pub async fn deploy(
        provider: &P,
        signer: Option<&SignerFn>,
        artifact: &ContractArtifact,
        constructor_args: &[u8],
        opts: &TransactOpts,
    ) -> Result<TxHash, BindingError> {
        let code = artifact.deploy_code(constructor_args)?;
        let mut tx = opts.apply(TransactionRequest::default().input(code.into()));
        tx.to = Some(TxKind::Create);

        debug!(contract = %artifact.name, "Deploying contract");
        let tx_hash = send(provider, signer, tx).await?;
        info!(contract = %artifact.name, tx_hash = %tx_hash, "Deployment transaction sent");
        Ok(tx_hash)
    }

    fn request(&self, input: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default().to(self.address).input(Bytes::from(input).into())
    }
}

impl<P> ContractCaller for BoundContract<P>
where
    P: Provider + Clone + 'static,
{
    async fn call<C>(&self, call: &C, opts: CallOpts) -> Result<C::Return, BindingError>
    where
        C: SolCall + Sync,
    {
        let mut tx = self.request(call.abi_encode());
        tx.from = opts.from;

        let data = self.provider.call(tx).block(opts.block).await?;
        Ok(C::abi_decode_returns(&data)?)
    }
}

impl<P> ContractTransactor for BoundContract<P>
where
    P: Provider + Clone + 'static,
{
    async fn transact<C>(&self, call: &C, opts: &TransactOpts) -> Result<TxHash, BindingError>
    where
        C: SolCall + Sync,
    {
        let tx = opts.apply(self.request(call.abi_encode()));

        debug!(to = %self.address, method = C::SIGNATURE, "Sending transaction");
        let tx_hash = send(&self.provider, self.signer.as_ref(), tx).await?;
        info!(to = %self.address, method = C::SIGNATURE, tx_hash = %tx_hash, "Transaction sent");
        Ok(tx_hash)
    }
}

impl<P> ContractFilterer for BoundContract<P>
where
    P: Provider + Clone + 'static,
{
    async fn filter_logs<E>(&self, opts: &FilterOpts) -> Result<EventIterator<E>, BindingError>
    where
        E: SolEvent + Send + 'static,
    {
        let filter = opts.to_filter::<E>(self.address);
        let logs = self.provider.get_logs(&filter).await?;

        debug!(
            event = E::SIGNATURE,
            from = opts.from_block,
            to = ?opts.to_block,
            count = logs.len(),
            "Fetched logs"
        );
        Ok(EventIterator::from_logs(logs))
    }

    async fn watch_logs<E>(&self, opts: &FilterOpts) -> Result<EventIterator<E>, BindingError>
    where
        E: SolEvent + Send + 'static,
    {
        let filter = opts.to_filter::<E>(self.address);
        let mut poller = self.provider.watch_logs(&filter).await?;
        if let Some(interval) = self.poll_interval {
            poller = poller.with_poll_interval(interval);
        }

        debug!(event = E::SIGNATURE, address = %self.address, "Watching logs");
        Ok(EventIterator::subscribe(poller.into_stream()))
    }
}

async fn send<P: Provider>(
    provider: &P,
    signer: Option<&SignerFn>,
    tx: TransactionRequest,
) -> Result<TxHash, BindingError> {
    let pending = match signer {
        Some(sign) => {
            let raw = sign(tx).await?;
            provider.send_raw_transaction(&raw).await?
        }
        None => provider.send_transaction(tx).await?,
    };
    Ok(*pending.tx_hash())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use alloy_json_rpc::ErrorPayload;
    use alloy_primitives::{address, b256, LogData};
    use alloy_provider::ProviderBuilder;
    use alloy_rpc_types::Log;
    use alloy_sol_types::{sol, SolError};
    use alloy_transport::mock::Asserter;
    use std::sync::Arc;

    sol! {
        #[sol(all_derives)]
        interface ITestBridge {
            error NotDelayedInbox(address sender);

            event MessageDelivered(uint256 indexed messageIndex, bytes32 indexed beforeInboxAcc, uint8 kind);

            function sequencerInboxAccs(uint256) external view returns (bytes32);
            function maxTimeVariation() external view returns (uint256 delayBlocks, uint256 futureBlocks, uint256 delaySeconds, uint256 futureSeconds);
            function enqueueDelayedMessage(uint8 kind, address sender, bytes32 messageDataHash) external payable returns (uint256);
        }
    }

    const BRIDGE: Address = address!("8315177ab297ba92a06054ce80a67ed4dbd7ed3a");

    fn mocked() -> (BoundContract<impl Provider + Clone>, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        (BoundContract::new(BRIDGE, provider), asserter)
    }

    fn word(value: u64) -> [u8; 32] {
        U256::from(value).to_be_bytes()
    }

    #[tokio::test]
    async fn test_call_decodes_bytes32() {
        let (bridge, asserter) = mocked();
        asserter.push_success(&Bytes::from(word(1)));

        let acc = bridge
            .call(&ITestBridge::sequencerInboxAccsCall(U256::from(3)), CallOpts::default())
            .await
            .unwrap();
        assert_eq!(U256::from_be_bytes(acc.0), U256::from(1));
    }

    #[tokio::test]
    async fn test_call_decodes_tuple() {
        let (bridge, asserter) = mocked();
        let mut data = Vec::new();
        for value in [5760u64, 64, 86_400, 768] {
            data.extend_from_slice(&word(value));
        }
        asserter.push_success(&Bytes::from(data));

        let mtv = bridge
            .call(&ITestBridge::maxTimeVariationCall {}, CallOpts::at_block(19_000_000))
            .await
            .unwrap();
        assert_eq!(mtv.delayBlocks, U256::from(5760));
        assert_eq!(mtv.futureSeconds, U256::from(768));
    }

    #[tokio::test]
    async fn test_call_shape_mismatch_is_decode_error() {
        let (bridge, asserter) = mocked();
        asserter.push_success(&Bytes::new());

        let err = bridge
            .call(&ITestBridge::sequencerInboxAccsCall(U256::from(3)), CallOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_call_revert_carries_data() {
        let (bridge, asserter) = mocked();
        let revert = ITestBridge::NotDelayedInbox { sender: Address::ZERO }.abi_encode();
        asserter.push_failure(ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: Some(
                serde_json::value::to_raw_value(&alloy_primitives::hex::encode_prefixed(&revert))
                    .unwrap(),
            ),
        });

        let err = bridge
            .call(&ITestBridge::sequencerInboxAccsCall(U256::ZERO), CallOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Revert);
        assert!(matches!(
            err.decode_revert::<ITestBridge::ITestBridgeErrors>(),
            Some(ITestBridge::ITestBridgeErrors::NotDelayedInbox(_))
        ));
    }

    #[tokio::test]
    async fn test_call_rpc_failure_is_transport_error() {
        let (bridge, asserter) = mocked();
        asserter.push_failure_msg("header not found");

        let err = bridge
            .call(&ITestBridge::sequencerInboxAccsCall(U256::ZERO), CallOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_transact_returns_hash_immediately() {
        let (bridge, asserter) = mocked();
        let hash = b256!("1111111111111111111111111111111111111111111111111111111111111111");
        asserter.push_success(&hash);

        let call = ITestBridge::enqueueDelayedMessageCall {
            kind: 12,
            sender: Address::ZERO,
            messageDataHash: B256::ZERO,
        };
        let opts = TransactOpts {
            from: Some(address!("2222222222222222222222222222222222222222")),
            ..TransactOpts::with_value(U256::from(1))
        };
        assert_eq!(bridge.transact(&call, &opts).await.unwrap(), hash);
    }

    #[tokio::test]
    async fn test_transact_with_signer_sends_raw() {
        let (bridge, asserter) = mocked();
        let hash = b256!("2222222222222222222222222222222222222222222222222222222222222222");
        asserter.push_success(&hash);

        let signer: SignerFn = Arc::new(|tx: TransactionRequest| {
            Box::pin(async move {
                assert_eq!(tx.value, Some(U256::from(7)));
                Ok(Bytes::from_static(&[0x02, 0xf8]))
            })
        });
        let bridge = bridge.with_signer(signer);

        let call = ITestBridge::enqueueDelayedMessageCall {
            kind: 3,
            sender: Address::ZERO,
            messageDataHash: B256::ZERO,
        };
        let tx_hash = bridge.transact(&call, &TransactOpts::with_value(U256::from(7))).await;
        assert_eq!(tx_hash.unwrap(), hash);
    }

    #[tokio::test]
    async fn test_signer_failure_is_reported() {
        let (bridge, _asserter) = mocked();
        let signer: SignerFn =
            Arc::new(|_tx| Box::pin(async move { Err(eyre::eyre!("hardware wallet locked")) }));
        let bridge = bridge.with_signer(signer);

        let call = ITestBridge::enqueueDelayedMessageCall {
            kind: 3,
            sender: Address::ZERO,
            messageDataHash: B256::ZERO,
        };
        let err = bridge.transact(&call, &TransactOpts::default()).await.unwrap_err();
        assert!(err.to_string().contains("hardware wallet locked"));
        assert_eq!(err.kind(), ErrorKind::Signer);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_deploy_without_bytecode_is_abi_error() {
        let (bridge, _asserter) = mocked();
        let artifact =
            ContractArtifact::from_json_str(r#"{ "contractName": "IBridge", "abi": [] }"#).unwrap();

        let err = BoundContract::deploy(bridge.provider(), None, &artifact, &[], &TransactOpts::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Abi);
    }

    #[tokio::test]
    async fn test_deploy_sends_creation_tx() {
        let (bridge, asserter) = mocked();
        let hash = b256!("3333333333333333333333333333333333333333333333333333333333333333");
        asserter.push_success(&hash);

        let artifact = ContractArtifact::from_json_str(
            r#"{ "contractName": "Bridge", "abi": [], "bytecode": "0x6080" }"#,
        )
        .unwrap();
        let tx_hash = BoundContract::deploy(bridge.provider(), None, &artifact, &[], &TransactOpts::default())
            .await
            .unwrap();
        assert_eq!(tx_hash, hash);
    }

    #[tokio::test]
    async fn test_filter_logs_decodes_events() {
        let (bridge, asserter) = mocked();
        let event = ITestBridge::MessageDelivered {
            messageIndex: U256::from(5),
            beforeInboxAcc: B256::repeat_byte(9),
            kind: 12,
        };
        let log = Log {
            inner: alloy_primitives::Log { address: BRIDGE, data: event.encode_log_data() },
            block_number: Some(42),
            ..Default::default()
        };
        asserter.push_success(&vec![log]);

        let mut iter = bridge
            .filter_logs::<ITestBridge::MessageDelivered>(
                &FilterOpts::range(0, 100).topic1([B256::from(U256::from(5))]),
            )
            .await
            .unwrap();
        let decoded = iter.next().await.unwrap();
        assert_eq!(decoded.event, event);
        assert_eq!(decoded.block_number(), Some(42));
        assert!(iter.next().await.is_none());
    }

    #[tokio::test]
    async fn test_filter_logs_fails_fast_on_foreign_log() {
        let (bridge, asserter) = mocked();
        let foreign = Log {
            inner: alloy_primitives::Log {
                address: BRIDGE,
                data: LogData::new_unchecked(vec![B256::repeat_byte(1)], Bytes::new()),
            },
            ..Default::default()
        };
        asserter.push_success(&vec![foreign]);

        let mut iter = bridge
            .filter_logs::<ITestBridge::MessageDelivered>(&FilterOpts::from_block(0))
            .await
            .unwrap();
        assert!(iter.next().await.is_none());
        assert_eq!(iter.error().unwrap().kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_filter_opts_topics() {
        let filter = FilterOpts::range(10, 20)
            .topic2([B256::repeat_byte(1), B256::repeat_byte(2)])
            .to_filter::<ITestBridge::MessageDelivered>(BRIDGE);

        assert_eq!(filter.get_from_block(), Some(10));
        assert_eq!(filter.get_to_block(), Some(20));
        assert!(filter.topics[0].matches(&ITestBridge::MessageDelivered::SIGNATURE_HASH));
        assert!(filter.topics[1].is_empty());
        assert_eq!(filter.topics[2].len(), 2);
    }
}
