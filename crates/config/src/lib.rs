//! Configuration types for the rollup bridge client.
//!
//! This crate provides:
//! - Network configurations (mainnet, testnet)
//! - Bridge contract addresses per rollup
//! - A builder for custom deployments

pub mod network;

pub use network::{NetworkConfig, NetworkConfigBuilder, NetworkType, RollupContracts};
