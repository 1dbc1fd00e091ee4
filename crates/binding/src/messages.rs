//! Message hashing tester contract.
//!
//! Exposes the on-chain `Messages` library so client-side hashes can be
//! checked against a deployed instance.

use alloy_sol_types::sol;

sol! {
    /// MessageTester - pure wrappers around the Messages library
    #[sol(rpc, all_derives)]
    #[allow(clippy::too_many_arguments)]
    interface IMessageTester {
        function messageHash(
            uint8 messageType,
            address sender,
            uint64 blockNumber,
            uint64 timestamp,
            uint256 inboxSeqNum,
            uint256 gasPriceL1,
            bytes32 messageDataHash
        ) external pure returns (bytes32);

        function accumulateInboxMessage(
            bytes32 inbox,
            bytes32 message
        ) external pure returns (bytes32);
    }
}
