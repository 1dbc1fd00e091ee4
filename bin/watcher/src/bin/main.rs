//! Rollup bridge watcher.
//!
//! - `status`: counters and accumulators of both inbox chains
//! - `watch`: follow delayed messages and sequencer batches as they land
//! - `verify-delayed` / `batches`: re-derive accumulators over a block range
//! - `outbox-status`: check whether an L2→L1 message can be executed
//! - `force-include`, `deposit`, `execute`: send transactions

use action::{
    deposit::{Deposit, DepositAction},
    execute::{Execute, ExecuteAction},
    force_include::{ForceInclude, ForceIncludeAction},
};
use alloy_primitives::utils::parse_ether;
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use config::NetworkConfig;
use outbox::OutboxStateProvider;
use std::path::PathBuf;
use tracing::info;
use watcher::{
    config::Config,
    find_delayed_message,
    metrics::{install_prometheus_exporter, Metrics},
    run_action, status, verify_batches, verify_delayed, watch, OutboxMessageFile,
};

#[derive(Parser)]
#[command(name = "watcher")]
#[command(about = "Inspect and verify a rollup's bridge contracts")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Dry-run mode: log actions without executing transactions
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print counters and accumulators of both inbox chains
    Status,

    /// Follow new delayed messages and sequencer batches
    Watch,

    /// Rebuild delayed messages in a block range and check the accumulator
    VerifyDelayed {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
    },

    /// Check sequencer batches in a block range
    Batches {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
        /// Also fetch and hash each batch's data
        #[arg(long)]
        data: bool,
    },

    /// Check whether an L2→L1 message can be executed
    OutboxStatus {
        /// JSON file with the message and its proof
        #[arg(long)]
        message: PathBuf,
    },

    /// Force include delayed messages up to `index`
    ForceInclude {
        #[arg(long)]
        index: u64,
        /// Private key for signing transactions (hex string, with or without 0x prefix)
        #[arg(short = 'k', long, env = "PRIVATE_KEY")]
        private_key: String,
    },

    /// Deposit ETH into the rollup
    Deposit {
        /// Amount in ETH
        #[arg(long)]
        amount: String,
        #[arg(short = 'k', long, env = "PRIVATE_KEY")]
        private_key: String,
    },

    /// Execute an L2→L1 message on the outbox
    Execute {
        #[arg(long)]
        message: PathBuf,
        #[arg(short = 'k', long, env = "PRIVATE_KEY")]
        private_key: String,
    },
}

fn signer_address(private_key: &str) -> eyre::Result<alloy_primitives::Address> {
    let signer: PrivateKeySigner = private_key.parse()?;
    Ok(signer.address())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_file(&cli.config)?;
    if cli.dry_run {
        config.dry_run = true;
    }

    let network: NetworkConfig = config.network_config();

    info!("Loaded config:");
    info!("  Network: {:?}", config.network);
    info!("  Bridge: {}", network.contracts.bridge);
    info!("  SequencerInbox: {}", network.contracts.sequencer_inbox);
    info!("  Outbox: {}", network.contracts.outbox);
    if config.dry_run {
        info!("  Mode: DRY-RUN (no transactions will be executed)");
    }

    let metrics = Metrics::new();
    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Prometheus exporter listening");
    }

    let provider = client::create_provider(&config.l1_rpc_url).await?;
    client::ensure_chain_id(&provider, network.parent_chain_id).await?;

    match cli.command {
        Command::Status => {
            let status = status(provider, &network).await?;
            metrics.set_counts(status.delayed_messages, status.batches);

            info!(block = status.block, "Bridge status");
            info!("  Rollup: {} (owner {})", status.rollup, status.rollup_owner);
            info!("  Delayed messages: {}", status.delayed_messages);
            info!("  Delayed accumulator: {:?}", status.delayed_acc);
            info!("  Batches: {}", status.batches);
            info!("  Batch accumulator: {:?}", status.batch_acc);
            info!("  Delayed messages read: {}", status.delayed_messages_read);
            info!("  Pending delayed messages: {}", status.pending_delayed());
            info!("  Max time variation: {:?}", status.max_time_variation);
        }
        Command::Watch => {
            watch(provider, &network, config.poll_interval(), &metrics).await?;
        }
        Command::VerifyDelayed { from, to } => {
            let result = verify_delayed(provider, &network, from, to).await;
            metrics.record_verification("delayed", result.is_ok());
            let report = result?;
            info!(
                messages = report.messages,
                first = ?report.first,
                last = ?report.last,
                acc = ?report.acc,
                "Delayed accumulator verified"
            );
        }
        Command::Batches { from, to, data } => {
            let result = verify_batches(provider, &network, from, to, data).await;
            metrics.record_verification("batches", result.is_ok());
            let report = result?;
            info!(
                batches = report.batches,
                verified = report.verified,
                skipped = report.skipped,
                payloads = ?report.payloads,
                "Sequencer batches verified"
            );
        }
        Command::OutboxStatus { message } => {
            let (message, proof) = OutboxMessageFile::from_file(message)?.into_parts();
            let state = OutboxStateProvider::new(provider, network.contracts.outbox);
            let root = proof.root_for(&message)?;
            let status = state.message_status(&message, &proof).await?;
            info!(index = proof.index, %root, ?status, "Outbox message status");
        }
        Command::ForceInclude { index, private_key } => {
            let from = signer_address(&private_key)?;
            let message = find_delayed_message(provider.clone(), &network, index).await?;

            let signer = client::local_signer_fn(&private_key, network.parent_chain_id, provider.clone())?;
            let mut action = ForceIncludeAction::new(
                provider,
                Some(signer),
                ForceInclude {
                    sequencer_inbox: network.contracts.sequencer_inbox,
                    message,
                    from,
                },
            );
            let eligibility = action.status().await?;
            info!(?eligibility, "Force inclusion eligibility");
            run_action(&mut action, config.dry_run).await?;
        }
        Command::Deposit { amount, private_key } => {
            let from = signer_address(&private_key)?;
            let amount = parse_ether(&amount)?;

            let signer = client::local_signer_fn(&private_key, network.parent_chain_id, provider.clone())?;
            let mut action = DepositAction::new(
                provider,
                Some(signer),
                Deposit { inbox: network.contracts.inbox, from, amount },
            );
            run_action(&mut action, config.dry_run).await?;
        }
        Command::Execute { message, private_key } => {
            let from = signer_address(&private_key)?;
            let (message, proof) = OutboxMessageFile::from_file(message)?.into_parts();

            let signer = client::local_signer_fn(&private_key, network.parent_chain_id, provider.clone())?;
            let mut action = ExecuteAction::new(
                provider,
                Some(signer),
                Execute { outbox: network.contracts.outbox, message, proof, from },
            );
            run_action(&mut action, config.dry_run).await?;
        }
    }

    Ok(())
}
