use config::{NetworkConfig, NetworkConfigBuilder, NetworkType, RollupContracts};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

const fn default_poll_interval_secs() -> u64 {
    12
}

/// Top-level watcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network preset the contract addresses are taken from
    pub network: NetworkType,

    /// Parent chain RPC endpoint url
    pub l1_rpc_url: String,

    /// Contract addresses replacing the preset ones (devnets, forks)
    #[serde(default)]
    pub contracts: Option<RollupContracts>,

    /// First block to scan instead of the preset deployment block
    #[serde(default)]
    pub deployed_at_block: Option<u64>,

    /// Log filter poll interval for `watch`
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Port of the Prometheus exporter; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Log actions without sending transactions
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Network preset with the configured overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder = NetworkConfigBuilder::from_network_type(self.network);
        if let Some(contracts) = self.contracts {
            builder = builder
                .bridge(contracts.bridge)
                .inbox(contracts.inbox)
                .sequencer_inbox(contracts.sequencer_inbox)
                .outbox(contracts.outbox)
                .rollup(contracts.rollup);
        }
        if let Some(block) = self.deployed_at_block {
            builder = builder.deployed_at_block(block);
        }
        builder.build()
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
