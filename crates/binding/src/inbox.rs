//! Inbox contract bindings.
//!
//! Includes the user-facing entry points into the delayed inbox:
//! - Inbox (ETH deposits, retryable tickets, signed/unsigned L2 messages)
//! - IDelayedMessageProvider (data events that pair with `MessageDelivered`)

use alloy_sol_types::sol;

sol! {
    /// IDelayedMessageProvider - emits the full message data for each delayed message
    #[sol(rpc, all_derives)]
    interface IDelayedMessageProvider {
        /// Emitted with the message data when it was passed in calldata of a regular call
        event InboxMessageDelivered(uint256 indexed messageNum, bytes data);

        /// Emitted when the message data is the calldata of the origin transaction
        event InboxMessageDeliveredFromOrigin(uint256 indexed messageNum);
    }

    /// Inbox - user entry point that enqueues messages on the bridge
    #[sol(rpc, all_derives)]
    #[allow(clippy::too_many_arguments)]
    interface IInbox {
        error L1Forked();
        error NotForked();
        error NotAllowedOrigin(address origin);
        error NotOrigin();
        error DataTooLarge(uint256 dataLength, uint256 maxDataLength);
        error InsufficientValue(uint256 expected, uint256 actual);
        error InsufficientSubmissionCost(uint256 expected, uint256 actual);
        error GasLimitTooLarge();
        error RetryableData(
            address from,
            address to,
            uint256 l2CallValue,
            uint256 deposit,
            uint256 maxSubmissionCost,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            uint256 gasLimit,
            uint256 maxFeePerGas,
            bytes data
        );

        function bridge() external view returns (address);

        function sequencerInbox() external view returns (address);

        function maxDataSize() external view returns (uint256);

        function allowListEnabled() external view returns (bool);

        function isAllowed(address user) external view returns (bool);

        /// Send a signed L2 message; data is read from the origin transaction calldata
        function sendL2MessageFromOrigin(bytes calldata messageData) external returns (uint256);

        /// Send a signed L2 message carried in calldata
        function sendL2Message(bytes calldata messageData) external returns (uint256);

        function sendUnsignedTransaction(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            uint256 nonce,
            address to,
            uint256 value,
            bytes calldata data
        ) external returns (uint256);

        function sendContractTransaction(
            uint256 gasLimit,
            uint256 maxFeePerGas,
            address to,
            uint256 value,
            bytes calldata data
        ) external returns (uint256);

        function calculateRetryableSubmissionFee(
            uint256 dataLength,
            uint256 baseFee
        ) external view returns (uint256);

        /// Deposit ETH to the sender's (aliased) address on L2
        function depositEth() external payable returns (uint256);

        /// Create a retryable ticket executed on L2
        function createRetryableTicket(
            address to,
            uint256 l2CallValue,
            uint256 maxSubmissionCost,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            uint256 gasLimit,
            uint256 maxFeePerGas,
            bytes calldata data
        ) external payable returns (uint256);

        function unsafeCreateRetryableTicket(
            address to,
            uint256 l2CallValue,
            uint256 maxSubmissionCost,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            uint256 gasLimit,
            uint256 maxFeePerGas,
            bytes calldata data
        ) external payable returns (uint256);

        function pause() external;

        function unpause() external;

        function setAllowList(address[] memory user, bool[] memory val) external;

        function setAllowListEnabled(bool _allowListEnabled) external;

        function initialize(address _bridge, address _sequencerInbox) external;
    }
}
