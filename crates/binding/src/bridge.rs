//! Bridge and SequencerInbox contract bindings.
//!
//! Includes the L1 contracts that own the two accumulator chains:
//! - Bridge (delayed inbox accumulator, sequencer inbox accumulator, outbox gate)
//! - SequencerInbox (batch posting, force inclusion, DAS keysets)
//!
//! Both live in one `sol!` block because the sequencer events reuse the
//! bridge's `TimeBounds` and `BatchDataLocation` types.

use alloy_sol_types::sol;

sol! {
    /// Acceptance window attached to every delivered sequencer batch.
    #[sol(all_derives)]
    #[derive(Default, Debug, PartialEq, Eq, Hash)]
    struct TimeBounds {
        uint64 minTimestamp;
        uint64 maxTimestamp;
        uint64 minBlockNumber;
        uint64 maxBlockNumber;
    }

    /// Where the data of a sequencer batch can be found.
    #[sol(all_derives)]
    #[derive(Debug, PartialEq, Eq, Hash)]
    enum BatchDataLocation {
        /// Data is the calldata of the posting transaction
        TxInput,
        /// Data was emitted in a separate `SequencerBatchData` event
        SeparateBatchEvent,
        /// Batch carries no data (force inclusion)
        NoData,
        /// Data lives in EIP-4844 blobs
        Blob
    }

    /// Bounds a sequencer-reported batch must respect relative to the posting block.
    #[sol(all_derives)]
    #[derive(Default, Debug, PartialEq, Eq, Hash)]
    struct MaxTimeVariation {
        uint256 delayBlocks;
        uint256 futureBlocks;
        uint256 delaySeconds;
        uint256 futureSeconds;
    }

    /// Bridge - ledger of both accumulator chains and gatekeeper for inboxes/outboxes
    #[sol(rpc, all_derives)]
    interface IBridge {
        error NotDelayedInbox(address sender);
        error NotSequencerInbox(address sender);
        error NotOutbox(address sender);
        error InvalidOutboxSet(address outbox);
        error NotRollupOrOwner(address sender);
        error BadSequencerMessageNumber(uint256 stored, uint256 received);
        error NotContract(address addr);
        error NotRollup(address sender, address rollup);
        error NotOwner(address sender, address owner);
        error HadZeroInit();
        error AlreadyInit();

        /// Emitted for every message appended to the delayed inbox
        event MessageDelivered(
            uint256 indexed messageIndex,
            bytes32 indexed beforeInboxAcc,
            address inbox,
            uint8 kind,
            address sender,
            bytes32 messageDataHash,
            uint256 baseFeeL1,
            uint64 timestamp
        );

        /// Emitted when an outbox makes the bridge execute an L1 call
        event BridgeCallTriggered(
            address indexed outbox,
            address indexed to,
            uint256 value,
            bytes data
        );

        event InboxToggle(address indexed inbox, bool enabled);

        event OutboxToggle(address indexed outbox, bool enabled);

        event SequencerInboxUpdated(address newSequencerInbox);

        event RollupUpdated(address rollup);

        function allowedDelayedInboxList(uint256) external view returns (address);

        function allowedOutboxList(uint256) external view returns (address);

        /// Delayed inbox accumulator at the given message index
        function delayedInboxAccs(uint256) external view returns (bytes32);

        /// Sequencer inbox accumulator at the given batch index
        function sequencerInboxAccs(uint256) external view returns (bytes32);

        function rollup() external view returns (address);

        function sequencerInbox() external view returns (address);

        /// Outbox currently executing a call, or the default sentinel
        function activeOutbox() external view returns (address);

        function allowedDelayedInboxes(address inbox) external view returns (bool);

        function allowedOutboxes(address outbox) external view returns (bool);

        function sequencerReportedSubMessageCount() external view returns (uint256);

        function delayedMessageCount() external view returns (uint256);

        function sequencerMessageCount() external view returns (uint256);

        /// Append a message to the delayed inbox (allowed inboxes only)
        function enqueueDelayedMessage(
            uint8 kind,
            address sender,
            bytes32 messageDataHash
        ) external payable returns (uint256);

        /// Append a batch to the sequencer inbox (sequencer inbox only)
        function enqueueSequencerMessage(
            bytes32 dataHash,
            uint256 afterDelayedMessagesRead,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external returns (uint256 seqMessageIndex, bytes32 beforeAcc, bytes32 delayedAcc, bytes32 acc);

        function submitBatchSpendingReport(
            address batchPoster,
            bytes32 dataHash
        ) external returns (uint256 msgNum);

        /// Execute an L1 call on behalf of the active outbox
        function executeCall(
            address to,
            uint256 value,
            bytes calldata data
        ) external returns (bool success, bytes memory returnData);

        function setSequencerInbox(address _sequencerInbox) external;

        function setDelayedInbox(address inbox, bool enabled) external;

        function setOutbox(address inbox, bool enabled) external;

        function updateRollupAddress(address _rollup) external;

        function initialize(address rollup_) external;
    }

    /// SequencerInbox - accepts sequencer batches and force-included delayed messages
    #[sol(rpc, all_derives)]
    interface ISequencerInbox {
        error BadSequencerNumber(uint256 stored, uint256 received);
        error DelayedBackwards();
        error DelayedTooFar();
        error ForceIncludeBlockTooSoon();
        error ForceIncludeTimeTooSoon();
        error IncorrectMessagePreimage();
        error NotBatchPoster();
        error NotBatchPosterManager(address sender);
        error NotOrigin();
        error DataTooLarge(uint256 dataLength, uint256 maxDataLength);
        error NoSuchKeyset(bytes32 keysetHash);
        error AlreadyValidDASKeyset(bytes32 keysetHash);
        error BadMaxTimeVariation();
        error DataNotAuthenticated();
        error InvalidHeaderFlag(bytes1 flag);

        /// Emitted for every batch appended to the sequencer inbox
        event SequencerBatchDelivered(
            uint256 indexed batchSequenceNumber,
            bytes32 indexed beforeAcc,
            bytes32 indexed afterAcc,
            bytes32 delayedAcc,
            uint256 afterDelayedMessagesRead,
            TimeBounds timeBounds,
            BatchDataLocation dataLocation
        );

        event OwnerFunctionCalled(uint256 indexed id);

        /// Batch data for batches posted with `SeparateBatchEvent` location
        event SequencerBatchData(uint256 indexed batchSequenceNumber, bytes data);

        event SetValidKeyset(bytes32 indexed keysetHash, bytes keysetBytes);

        event InvalidateKeyset(bytes32 indexed keysetHash);

        function totalDelayedMessagesRead() external view returns (uint256);

        function bridge() external view returns (address);

        function HEADER_LENGTH() external view returns (uint256);

        function DATA_AUTHENTICATED_FLAG() external view returns (bytes1);

        function maxTimeVariation() external view returns (
            uint256 delayBlocks,
            uint256 futureBlocks,
            uint256 delaySeconds,
            uint256 futureSeconds
        );

        function dasKeySetInfo(bytes32) external view returns (bool isValidKeyset, uint64 creationBlock);

        function isBatchPoster(address) external view returns (bool);

        function isSequencer(address) external view returns (bool);

        function batchCount() external view returns (uint256);

        function inboxAccs(uint256 index) external view returns (bytes32);

        function isValidKeysetHash(bytes32 ksHash) external view returns (bool);

        function getKeysetCreationBlock(bytes32 ksHash) external view returns (uint256);

        /// Force the inclusion of delayed messages older than the delay window
        function forceInclusion(
            uint256 _totalDelayedMessagesRead,
            uint8 kind,
            uint64[2] calldata l1BlockAndTime,
            uint256 baseFeeL1,
            address sender,
            bytes32 messageDataHash
        ) external;

        function addSequencerL2BatchFromOrigin(
            uint256 sequenceNumber,
            bytes calldata data,
            uint256 afterDelayedMessagesRead,
            address gasRefunder,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external;

        /// Delayed message preimage checked by the delay buffer
        struct Message {
            uint8 kind;
            address sender;
            uint64 blockNumber;
            uint64 timestamp;
            uint256 inboxSeqNum;
            uint256 baseFeeL1;
            bytes32 messageDataHash;
        }

        struct DelayProof {
            bytes32 beforeDelayedAcc;
            Message delayedMessage;
        }

        function addSequencerL2BatchFromOriginDelayProof(
            uint256 sequenceNumber,
            bytes calldata data,
            uint256 afterDelayedMessagesRead,
            address gasRefunder,
            uint256 prevMessageCount,
            uint256 newMessageCount,
            DelayProof calldata delayProof
        ) external;

        function addSequencerL2Batch(
            uint256 sequenceNumber,
            bytes calldata data,
            uint256 afterDelayedMessagesRead,
            address gasRefunder,
            uint256 prevMessageCount,
            uint256 newMessageCount
        ) external;

        function setMaxTimeVariation(MaxTimeVariation memory maxTimeVariation_) external;

        function setIsBatchPoster(address addr, bool isBatchPoster_) external;

        function setValidKeyset(bytes calldata keysetBytes) external;

        function invalidateKeysetHash(bytes32 ksHash) external;

        function setIsSequencer(address addr, bool isSequencer_) external;
    }
}

sol! {
    /// Batch posting entry point of SequencerInbox deployments before the
    /// message-count arguments were added
    #[sol(all_derives)]
    interface ISequencerInboxLegacy {
        function addSequencerL2BatchFromOrigin(
            uint256 sequenceNumber,
            bytes calldata data,
            uint256 afterDelayedMessagesRead,
            address gasRefunder
        ) external;
    }
}
