//! Error types for the shared utilities.

use alloy_primitives::{B256, U256};
use alloy_transport::TransportError;
use thiserror::Error;

/// Errors raised when converting a human readable amount into its scaled integer form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    /// The amount was empty or not a decimal number.
    #[error("malformed amount: {0:?}")]
    Malformed(String),
    /// The amount was below zero.
    #[error("negative amount: {0}")]
    Negative(String),
    /// The amount carries more fractional digits than the denomination allows.
    #[error("amount {amount} has more than {decimals} fractional digits")]
    TooPrecise {
        /// The offending amount.
        amount: String,
        /// Decimal places of the denomination.
        decimals: u8,
    },
    /// The scaled amount does not fit in 256 bits.
    #[error("amount {0} overflows 256 bits")]
    Overflow(String),
}

/// Errors raised while deriving library link ids or linking bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Link ids are derived from `path/File.sol:Library` names only.
    #[error("library name must be fully qualified (path/File.sol:Library): {0}")]
    NotFullyQualified(String),
    /// The bytecode still references a library after linking.
    #[error("bytecode references unlinked library placeholder {0}")]
    Unlinked(String),
    /// The bytecode is not valid hex once linked.
    #[error("invalid bytecode hex: {0}")]
    InvalidHex(String),
}

/// Errors raised by the provider bound utilities.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The node could not be reached or answered with an error.
    #[error("provider error: {0}")]
    Transport(#[from] TransportError),
    /// `revert` was called without a saved snapshot.
    #[error("no snapshot has been saved")]
    NoSnapshot,
    /// The node refused to revert to the snapshot.
    #[error("node refused to revert to snapshot {0}")]
    RevertRejected(U256),
    /// The requested block does not exist.
    #[error("block not found: {0}")]
    BlockNotFound(String),
    /// No receipt exists for the transaction.
    #[error("receipt not found for transaction {0}")]
    ReceiptNotFound(B256),
    /// The receipt has not been included in a block.
    #[error("transaction {0} is still pending")]
    Pending(B256),
    /// The receipt carries no contract address.
    #[error("transaction {0} did not create a contract")]
    NoContractCreated(B256),
    /// No log in the receipt matches the event.
    #[error("event {event} not found in transaction {tx_hash}")]
    EventNotFound {
        /// Event signature that was searched for.
        event: String,
        /// Transaction whose logs were searched.
        tx_hash: B256,
    },
    /// Time on the chain only moves forward.
    #[error("timestamp {requested} is not after the latest block timestamp {latest}")]
    TimeWouldRewind {
        /// Latest block timestamp.
        latest: u64,
        /// Requested next block timestamp.
        requested: u64,
    },
}
