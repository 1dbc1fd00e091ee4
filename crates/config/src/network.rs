//! Network configuration for the rollup bridge contracts.
//!
//! Provides the L1 addresses of the bridge contracts and chain parameters
//! for each supported network (mainnet, testnet).

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Rollup contracts deployed on the parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupContracts {
    /// Bridge: holds both accumulator chains and executes outbox calls
    pub bridge: Address,
    /// Delayed inbox (user entry point)
    pub inbox: Address,
    /// SequencerInbox: batch posting and force inclusion
    pub sequencer_inbox: Address,
    /// Outbox: L2→L1 message execution
    pub outbox: Address,
    /// Rollup core (owner of the bridge)
    pub rollup: Address,
}

impl RollupContracts {
    /// Arbitrum One contracts on Ethereum mainnet.
    pub const fn arbitrum_one() -> Self {
        Self {
            // https://etherscan.io/address/0x8315177aB297bA92A06054cE80a67Ed4DBd7ed3a
            bridge: address!("0x8315177aB297bA92A06054cE80a67Ed4DBd7ed3a"),
            inbox: address!("0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"),
            sequencer_inbox: address!("0x1c479675ad559DC151F6Ec7ed3FbF8ceE79582B6"),
            outbox: address!("0x0B9857ae2D4A3DBe74ffE1d7DF045bb7F96E4840"),
            rollup: address!("0x5eF0D09d1E6204141B4d37530808eD19f60FBa35"),
        }
    }

    /// Arbitrum Sepolia contracts on Ethereum Sepolia.
    pub const fn arbitrum_sepolia() -> Self {
        Self {
            // https://sepolia.etherscan.io/address/0x38f918D0E9F1b721EDaA41302E399fa1B79333a9
            bridge: address!("0x38f918D0E9F1b721EDaA41302E399fa1B79333a9"),
            inbox: address!("0xaAe29B0366299461418F5324a79Afc425BE5ae21"),
            sequencer_inbox: address!("0x6c97864CE4bEf387dE0b3310A44230f7E3F1be0D"),
            outbox: address!("0x65f07C7D521164a4d5DaC6eB8Fac8DA067A3B78F"),
            rollup: address!("0xd80810638dbDF9081b72C1B33c65375e20833c02"),
        }
    }
}

/// Complete network configuration for one rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Chain ID of the parent chain (where the contracts live)
    pub parent_chain_id: u64,
    /// Chain ID of the rollup
    pub chain_id: u64,
    /// Parent chain block time in seconds (12 for Ethereum)
    pub parent_block_time_secs: u64,
    /// Parent chain block the bridge was deployed at; log scans start here
    pub deployed_at_block: u64,
    pub contracts: RollupContracts,
}

impl NetworkConfig {
    /// Arbitrum One on Ethereum mainnet.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            parent_chain_id: 1,
            chain_id: 42161,
            parent_block_time_secs: 12,
            deployed_at_block: 15_411_056,
            contracts: RollupContracts::arbitrum_one(),
        }
    }

    /// Arbitrum Sepolia on Ethereum Sepolia.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            parent_chain_id: 11155111,
            chain_id: 421614,
            parent_block_time_secs: 12,
            deployed_at_block: 4_139_226,
            contracts: RollupContracts::arbitrum_sepolia(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }
}

/// Builder for custom network configurations (forks, devnets, redeployments).
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self { config: NetworkConfig::mainnet() }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self { config: NetworkConfig::sepolia() }
    }

    pub const fn from_network_type(network_type: NetworkType) -> Self {
        Self { config: NetworkConfig::from_network_type(network_type) }
    }

    pub const fn bridge(mut self, address: Address) -> Self {
        self.config.contracts.bridge = address;
        self
    }

    pub const fn inbox(mut self, address: Address) -> Self {
        self.config.contracts.inbox = address;
        self
    }

    pub const fn sequencer_inbox(mut self, address: Address) -> Self {
        self.config.contracts.sequencer_inbox = address;
        self
    }

    pub const fn outbox(mut self, address: Address) -> Self {
        self.config.contracts.outbox = address;
        self
    }

    pub const fn rollup(mut self, address: Address) -> Self {
        self.config.contracts.rollup = address;
        self
    }

    /// Override the chain IDs (parent, rollup).
    pub const fn chain_ids(mut self, parent_chain_id: u64, chain_id: u64) -> Self {
        self.config.parent_chain_id = parent_chain_id;
        self.config.chain_id = chain_id;
        self
    }

    pub const fn deployed_at_block(mut self, block: u64) -> Self {
        self.config.deployed_at_block = block;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        self.config
    }
}
