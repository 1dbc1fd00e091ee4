//! Ownership surface shared by the rollup contracts.

use alloy_sol_types::sol;

sol! {
    /// IOwnable - returned by `Bridge.rollup()`; owner gates admin calls
    #[sol(rpc, all_derives)]
    interface IOwnable {
        function owner() external view returns (address);
    }
}
