//! Local names for the values exchanged with the chain library.

use alloy_network::Ethereum;
use alloy_provider::PendingTransactionBuilder;

/// A 20-byte account or contract address.
pub type Address = alloy_primitives::Address;

/// Arbitrary byte data such as calldata or bytecode.
pub type Bytes = alloy_primitives::Bytes;

/// A submitted transaction awaiting confirmation.
pub type ContractTransaction = PendingTransactionBuilder<Ethereum>;

/// A local private key signer.
pub type Wallet = alloy_signer_local::PrivateKeySigner;
