//! Chain control for development nodes.
//!
//! [`Blockchain`] drives the `evm_*` test namespace implemented by Hardhat
//! Network and Anvil: snapshots, time travel and on-demand mining.

use alloy_primitives::U256;
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::ChainError;

/// Id of the first snapshot taken on a fresh development node.
///
/// Nodes number snapshots from 1, so this snapshot only exists once the
/// suite has taken its first one before changing any state.
pub const INITIAL_SNAPSHOT_ID: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Snapshot, time and mining controls over a provider.
///
/// Holds at most one saved snapshot. [`Blockchain::revert`] consumes it, so a
/// save must precede every revert.
#[derive(Debug, Clone)]
pub struct Blockchain<P> {
    provider: P,
    snapshot_id: Option<U256>,
}

impl<P: Provider> Blockchain<P> {
    /// Wraps `provider`.
    pub const fn new(provider: P) -> Self {
        Self { provider, snapshot_id: None }
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the id of the saved snapshot, if any.
    pub const fn snapshot_id(&self) -> Option<U256> {
        self.snapshot_id
    }

    /// Captures the full chain state and remembers the snapshot id.
    pub async fn save_snapshot(&mut self) -> Result<U256, ChainError> {
        let id = self.provider.raw_request::<_, U256>("evm_snapshot".into(), ()).await?;
        debug!(target: "protokit::blockchain", %id, "saved snapshot");
        self.snapshot_id = Some(id);
        Ok(id)
    }

    /// Restores the snapshot taken by [`Blockchain::save_snapshot`].
    pub async fn revert(&mut self) -> Result<(), ChainError> {
        let id = self.snapshot_id.take().ok_or(ChainError::NoSnapshot)?;
        self.revert_by_id(id).await
    }

    /// Restores an arbitrary snapshot.
    ///
    /// Nodes discard a snapshot once reverted to, along with every snapshot
    /// taken after it.
    pub async fn revert_by_id(&self, id: U256) -> Result<(), ChainError> {
        let reverted = self.provider.raw_request::<_, bool>("evm_revert".into(), (id,)).await?;
        if !reverted {
            return Err(ChainError::RevertRejected(id));
        }
        debug!(target: "protokit::blockchain", %id, "reverted to snapshot");
        Ok(())
    }

    /// Rewinds the chain to [`INITIAL_SNAPSHOT_ID`], the first snapshot taken on the node.
    pub async fn reset(&mut self) -> Result<(), ChainError> {
        self.snapshot_id = None;
        self.revert_by_id(INITIAL_SNAPSHOT_ID).await
    }

    /// Moves the clock of the next block forward by `seconds`.
    pub async fn increase_time(&self, seconds: u64) -> Result<(), ChainError> {
        self.provider.raw_request::<_, IgnoredAny>("evm_increaseTime".into(), (seconds,)).await?;
        debug!(target: "protokit::blockchain", seconds, "increased time");
        Ok(())
    }

    /// Fixes the timestamp of the next block.
    ///
    /// The timestamp must be later than the latest block's.
    pub async fn set_next_block_timestamp(&self, timestamp: u64) -> Result<(), ChainError> {
        let latest = self.current_timestamp().await?;
        if timestamp <= latest {
            return Err(ChainError::TimeWouldRewind { latest, requested: timestamp });
        }
        self.provider
            .raw_request::<_, IgnoredAny>("evm_setNextBlockTimestamp".into(), (timestamp,))
            .await?;
        Ok(())
    }

    /// Mines one empty block.
    pub async fn mine_block(&self) -> Result<(), ChainError> {
        self.provider.raw_request::<_, IgnoredAny>("evm_mine".into(), ()).await?;
        Ok(())
    }

    /// Mines `count` empty blocks, one request each.
    pub async fn wait_blocks(&self, count: u64) -> Result<(), ChainError> {
        for _ in 0..count {
            self.mine_block().await?;
        }
        Ok(())
    }

    /// Returns the number of the latest block.
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Returns the timestamp of the latest block.
    pub async fn current_timestamp(&self) -> Result<u64, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| ChainError::BlockNotFound(BlockNumberOrTag::Latest.to_string()))?;
        Ok(block.header.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use alloy_provider::RootProvider;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{MockRpcNode, block_json};

    #[tokio::test]
    async fn test_snapshot_then_revert() {
        let node = MockRpcNode::start().await;
        node.respond("evm_snapshot", json!("0x4")).await;
        node.respond("evm_revert", json!(true)).await;

        let mut chain = Blockchain::new(node.provider());
        let id = chain.save_snapshot().await.unwrap();
        assert_eq!(id, U256::from(4));
        assert_eq!(chain.snapshot_id(), Some(id));

        chain.revert().await.unwrap();
        assert_eq!(chain.snapshot_id(), None);
        assert_eq!(node.calls("evm_revert").await, vec![json!(["0x4"])]);
    }

    #[tokio::test]
    async fn test_revert_requires_snapshot() {
        let node = MockRpcNode::start().await;
        let mut chain = Blockchain::new(node.provider());

        assert!(matches!(chain.revert().await, Err(ChainError::NoSnapshot)));
        assert!(node.calls("evm_revert").await.is_empty());
    }

    #[tokio::test]
    async fn test_revert_rejected_by_node() {
        let node = MockRpcNode::start().await;
        node.respond("evm_revert", json!(false)).await;

        let chain = Blockchain::new(node.provider());
        let err = chain.revert_by_id(U256::from(9)).await.unwrap_err();
        assert!(matches!(err, ChainError::RevertRejected(id) if id == U256::from(9)));
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_keeps_timestamp() {
        let node = MockRpcNode::start().await;
        node.respond("evm_snapshot", json!("0x1")).await;
        node.respond("evm_revert", json!(true)).await;
        node.respond("eth_getBlockByNumber", block_json(7, 1_700_000_000)).await;

        let mut chain = Blockchain::new(node.provider());
        let before = chain.current_timestamp().await.unwrap();
        chain.save_snapshot().await.unwrap();
        chain.revert().await.unwrap();
        assert_eq!(chain.current_timestamp().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_reset_reverts_to_initial_snapshot() {
        let node = MockRpcNode::start().await;
        node.respond("evm_snapshot", json!("0x3")).await;
        node.respond("evm_revert", json!(true)).await;

        let mut chain = Blockchain::new(node.provider());
        chain.save_snapshot().await.unwrap();
        chain.reset().await.unwrap();

        assert_eq!(chain.snapshot_id(), None);
        assert_eq!(node.calls("evm_revert").await, vec![json!(["0x1"])]);
    }

    #[tokio::test]
    async fn test_increase_time_and_mine() {
        let node = MockRpcNode::start().await;
        node.respond("evm_increaseTime", json!(3600)).await;
        node.respond("evm_mine", json!("0x0")).await;

        let chain = Blockchain::new(node.provider());
        chain.increase_time(3600).await.unwrap();
        chain.wait_blocks(3).await.unwrap();

        assert_eq!(node.calls("evm_increaseTime").await, vec![json!([3600])]);
        assert_eq!(node.calls("evm_mine").await.len(), 3);
    }

    #[tokio::test]
    async fn test_increase_time_moves_latest_timestamp() {
        let node = MockRpcNode::start().await;
        node.respond_once("eth_getBlockByNumber", block_json(7, 1_000)).await;
        node.respond("eth_getBlockByNumber", block_json(8, 4_601)).await;
        node.respond("evm_increaseTime", json!(3600)).await;
        node.respond("evm_mine", json!("0x0")).await;

        let chain = Blockchain::new(node.provider());
        let before = chain.current_timestamp().await.unwrap();
        chain.increase_time(3600).await.unwrap();
        chain.mine_block().await.unwrap();
        let after = chain.current_timestamp().await.unwrap();

        assert!(after - before >= 3600);
        assert_eq!(node.calls("eth_getBlockByNumber").await.len(), 2);
    }

    #[tokio::test]
    async fn test_next_block_timestamp_only_moves_forward() {
        let node = MockRpcNode::start().await;
        node.respond("eth_getBlockByNumber", block_json(7, 1_000)).await;
        node.respond("evm_setNextBlockTimestamp", json!(null)).await;

        let chain = Blockchain::new(node.provider());
        let err = chain.set_next_block_timestamp(1_000).await.unwrap_err();
        assert!(matches!(err, ChainError::TimeWouldRewind { latest: 1_000, requested: 1_000 }));
        assert!(node.calls("evm_setNextBlockTimestamp").await.is_empty());

        chain.set_next_block_timestamp(1_001).await.unwrap();
        assert_eq!(node.calls("evm_setNextBlockTimestamp").await, vec![json!([1_001])]);
    }

    #[tokio::test]
    async fn test_current_timestamp_and_block_number() {
        let node = MockRpcNode::start().await;
        node.respond("eth_getBlockByNumber", block_json(12, 1_234)).await;
        node.respond("eth_blockNumber", json!("0xc")).await;

        let chain = Blockchain::new(node.provider());
        assert_eq!(chain.current_timestamp().await.unwrap(), 1_234);
        assert_eq!(chain.block_number().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_missing_latest_block() {
        let node = MockRpcNode::start().await;
        node.respond("eth_getBlockByNumber", json!(null)).await;

        let chain = Blockchain::new(node.provider());
        assert!(matches!(chain.current_timestamp().await, Err(ChainError::BlockNotFound(_))));
    }

    #[tokio::test]
    async fn test_node_errors_propagate() {
        let node = MockRpcNode::start().await;
        node.fail("evm_snapshot", -32601, "method not found").await;

        let mut chain = Blockchain::new(node.provider());
        let err = chain.save_snapshot().await.unwrap_err();
        assert!(matches!(err, ChainError::Transport(_)));
        assert!(err.to_string().contains("method not found"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_a_transport_error() {
        let provider = RootProvider::new_http("http://127.0.0.1:1".parse().unwrap());
        let chain = Blockchain::new(provider);
        assert!(matches!(chain.block_number().await, Err(ChainError::Transport(_))));
    }
}
