//! Outbox contract bindings.
//!
//! The Outbox tracks L2 send roots and executes L2→L1 messages against a
//! Merkle proof, marking each leaf index as spent exactly once.

use alloy_sol_types::sol;

sol! {
    /// Outbox - redeems L2→L1 messages proven against a confirmed send root
    #[sol(rpc, all_derives)]
    #[allow(clippy::too_many_arguments)]
    interface IOutbox {
        error ProofTooLong(uint256 proofLength);
        error PathNotMinimal(uint256 index, uint256 maxIndex);
        error UnknownRoot(bytes32 root);
        error AlreadySpent(uint256 index);
        error BridgeCallFailed();
        error NotRollup(address sender, address rollup);
        error SimulationOnlyEntrypoint();

        /// Emitted when the rollup confirms a new send root
        event SendRootUpdated(bytes32 indexed outputRoot, bytes32 indexed l2BlockHash);

        /// Emitted when an L2→L1 message is executed
        event OutBoxTransactionExecuted(
            address indexed to,
            address indexed l2Sender,
            uint256 indexed zero,
            uint256 transactionIndex
        );

        function rollup() external view returns (address);

        function bridge() external view returns (address);

        /// Bitmap word storing the spent flags of 256 consecutive indexes
        function spent(uint256) external view returns (bytes32);

        /// L2 block hash recorded for a send root (zero if unknown)
        function roots(bytes32) external view returns (bytes32);

        function OUTBOX_VERSION() external view returns (uint128);

        function l2ToL1Sender() external view returns (address);

        function l2ToL1Block() external view returns (uint256);

        function l2ToL1EthBlock() external view returns (uint256);

        function l2ToL1Timestamp() external view returns (uint256);

        function l2ToL1OutputId() external view returns (bytes32);

        function updateSendRoot(bytes32 sendRoot, bytes32 l2BlockHash) external;

        function updateRollupAddress() external;

        function initialize(address _bridge) external;

        /// Execute an L2→L1 message proven against a known send root
        function executeTransaction(
            bytes32[] calldata proof,
            uint256 index,
            address l2Sender,
            address to,
            uint256 l2Block,
            uint256 l1Block,
            uint256 l2Timestamp,
            uint256 value,
            bytes calldata data
        ) external;

        function executeTransactionSimulation(
            uint256 index,
            address l2Sender,
            address to,
            uint256 l2Block,
            uint256 l1Block,
            uint256 l2Timestamp,
            uint256 value,
            bytes calldata data
        ) external;

        function isSpent(uint256 index) external view returns (bool);

        function calculateItemHash(
            address l2Sender,
            address to,
            uint256 l2Block,
            uint256 l1Block,
            uint256 l2Timestamp,
            uint256 value,
            bytes calldata data
        ) external pure returns (bytes32);

        function calculateMerkleRoot(
            bytes32[] memory proof,
            uint256 path,
            bytes32 item
        ) external pure returns (bytes32);
    }
}
