//! Chain reads and time travel for test bodies.

use alloy_primitives::TxHash;
use alloy_provider::Provider;
use protokit_common::{Blockchain, ChainError, ProtocolUtils};

/// Returns the timestamp of the latest block.
pub async fn get_last_block_timestamp<P: Provider + Clone>(
    provider: &P,
) -> Result<u64, ChainError> {
    Blockchain::new(provider.clone()).current_timestamp().await
}

/// Returns the timestamp of the block that included `tx_hash`.
pub async fn get_transaction_timestamp<P: Provider + Clone>(
    provider: &P,
    tx_hash: TxHash,
) -> Result<u64, ChainError> {
    ProtocolUtils::new(provider.clone()).get_transaction_timestamp(tx_hash).await
}

/// Moves time forward by `seconds` and mines a block so it takes effect.
pub async fn increase_time<P: Provider + Clone>(
    provider: &P,
    seconds: u64,
) -> Result<(), ChainError> {
    let chain = Blockchain::new(provider.clone());
    chain.increase_time(seconds).await?;
    chain.mine_block().await
}

/// Mines one block.
pub async fn mine_block<P: Provider + Clone>(provider: &P) -> Result<(), ChainError> {
    Blockchain::new(provider.clone()).mine_block().await
}

/// Mines `count` blocks.
pub async fn wait_blocks<P: Provider + Clone>(provider: &P, count: u64) -> Result<(), ChainError> {
    Blockchain::new(provider.clone()).wait_blocks(count).await
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use protokit_common::test_utils::{MockRpcNode, block_json, receipt_json};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_increase_time_mines_a_block() {
        let node = MockRpcNode::start().await;
        node.respond("evm_increaseTime", json!(86_400)).await;
        node.respond("evm_mine", json!("0x0")).await;

        increase_time(&node.provider(), 86_400).await.unwrap();
        assert_eq!(node.calls("evm_increaseTime").await, vec![json!([86_400])]);
        assert_eq!(node.calls("evm_mine").await.len(), 1);
    }

    #[tokio::test]
    async fn test_increase_time_advances_last_block_timestamp() {
        let node = MockRpcNode::start().await;
        node.respond_once("eth_getBlockByNumber", block_json(5, 1_700_000_000)).await;
        node.respond("eth_getBlockByNumber", block_json(6, 1_700_086_400)).await;
        node.respond("evm_increaseTime", json!(86_400)).await;
        node.respond("evm_mine", json!("0x0")).await;

        let provider = node.provider();
        let before = get_last_block_timestamp(&provider).await.unwrap();
        increase_time(&provider, 86_400).await.unwrap();
        let after = get_last_block_timestamp(&provider).await.unwrap();
        assert!(after - before >= 86_400);
    }

    #[tokio::test]
    async fn test_timestamps() {
        let tx_hash = B256::with_last_byte(7);
        let node = MockRpcNode::start().await;
        node.respond("eth_getBlockByNumber", block_json(5, 1_700_000_123)).await;
        node.respond("eth_getTransactionReceipt", receipt_json(tx_hash, 5, true, None, vec![]))
            .await;

        let provider = node.provider();
        assert_eq!(get_last_block_timestamp(&provider).await.unwrap(), 1_700_000_123);
        assert_eq!(get_transaction_timestamp(&provider, tx_hash).await.unwrap(), 1_700_000_123);
    }

    #[tokio::test]
    async fn test_mining() {
        let node = MockRpcNode::start().await;
        node.respond("evm_mine", json!("0x0")).await;

        let provider = node.provider();
        mine_block(&provider).await.unwrap();
        wait_blocks(&provider, 2).await.unwrap();
        assert_eq!(node.calls("evm_mine").await.len(), 3);
    }
}
