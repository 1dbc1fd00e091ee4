//! Live outbox queries against Sepolia.

use alloy_provider::Provider;
use outbox::OutboxStateProvider;
use setup::{load_test_config, setup_provider};

#[tokio::test]
#[ignore = "requires Sepolia RPC access - scans a block range"]
async fn test_recent_send_roots_are_confirmed() -> eyre::Result<()> {
    let config = load_test_config();
    let network = config.network_config();
    let provider = setup_provider(&config.l1_rpc_url).await;

    let head = provider.get_block_number().await?;
    let state = OutboxStateProvider::new(provider, network.contracts.outbox);
    let roots = state.send_roots_in_range(head - 20_000, head).await?;
    println!("Found {} send roots", roots.len());

    for root in roots.iter().rev().take(3) {
        println!("  {} -> {} (block {})", root.root, root.l2_block_hash, root.block_number);
        assert_eq!(state.block_hash_for_root(root.root).await?, Some(root.l2_block_hash));
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires Sepolia RPC access - scans a block range"]
async fn test_executed_messages_are_spent() -> eyre::Result<()> {
    let config = load_test_config();
    let network = config.network_config();
    let provider = setup_provider(&config.l1_rpc_url).await;

    let head = provider.get_block_number().await?;
    let state = OutboxStateProvider::new(provider, network.contracts.outbox);
    let executed = state.executed_in_range(head - 20_000, head).await?;
    println!("Found {} executed messages", executed.len());

    for message in executed.iter().take(3) {
        println!("  #{} {} -> {}", message.index, message.l2_sender, message.to);
        assert!(state.is_spent(message.index).await?);
    }
    Ok(())
}
