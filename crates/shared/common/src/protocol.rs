//! Inspection of protocol transactions: created contracts, emitted events, inclusion times.

use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, TxHash, keccak256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockNumberOrTag, TransactionReceipt};
use tracing::debug;

use crate::ChainError;

/// Reads what protocol transactions did on chain.
#[derive(Debug, Clone)]
pub struct ProtocolUtils<P> {
    provider: P,
}

impl<P: Provider> ProtocolUtils<P> {
    /// Wraps `provider`.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the address of the contract created by a deployment transaction.
    pub async fn get_created_contract_address(
        &self,
        tx_hash: TxHash,
    ) -> Result<Address, ChainError> {
        let receipt = self.receipt(tx_hash).await?;
        receipt.contract_address().ok_or(ChainError::NoContractCreated(tx_hash))
    }

    /// Returns the first indexed address of the last `event_signature` log in a transaction.
    ///
    /// Factories announce the contracts they create through such events, e.g.
    /// `TokenCreated(address indexed token, address manager, string name)`.
    pub async fn get_event_address(
        &self,
        tx_hash: TxHash,
        event_signature: &str,
    ) -> Result<Address, ChainError> {
        let topic = keccak256(event_signature.as_bytes());
        let receipt = self.receipt(tx_hash).await?;

        let address = receipt
            .inner
            .logs()
            .iter()
            .rev()
            .find(|log| log.topics().first() == Some(&topic))
            .and_then(|log| log.topics().get(1))
            .map(|word| Address::from_word(*word))
            .ok_or_else(|| ChainError::EventNotFound {
                event: event_signature.to_string(),
                tx_hash,
            })?;

        debug!(
            target: "protokit::protocol",
            %tx_hash, event = event_signature, %address, "found event address"
        );
        Ok(address)
    }

    /// Returns the timestamp of the block that included the transaction.
    pub async fn get_transaction_timestamp(&self, tx_hash: TxHash) -> Result<u64, ChainError> {
        let receipt = self.receipt(tx_hash).await?;
        let number = receipt.block_number().ok_or(ChainError::Pending(tx_hash))?;
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await?
            .ok_or_else(|| ChainError::BlockNotFound(number.to_string()))?;
        Ok(block.header.timestamp)
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, ChainError> {
        self.provider
            .get_transaction_receipt(tx_hash)
            .await?
            .ok_or(ChainError::ReceiptNotFound(tx_hash))
    }
}
