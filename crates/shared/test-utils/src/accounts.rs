//! Test accounts.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_signer_local::{LocalSignerError, PrivateKeySigner};
use protokit_common::{ChainError, derive_signer, types::Wallet};

/// A test account and the key that controls it.
#[derive(Debug, Clone)]
pub struct Account {
    /// Account address.
    pub address: Address,
    /// Signer holding the account key.
    pub wallet: Wallet,
}

impl From<PrivateKeySigner> for Account {
    fn from(wallet: PrivateKeySigner) -> Self {
        Self { address: wallet.address(), wallet }
    }
}

/// Derives the first `count` accounts of `mnemonic`, in node order.
pub fn get_accounts(mnemonic: &str, count: u32) -> Result<Vec<Account>, LocalSignerError> {
    (0..count).map(|index| derive_signer(mnemonic, index).map(Account::from)).collect()
}

/// Returns an account with a freshly generated key and no balance.
pub fn get_random_account() -> Account {
    PrivateKeySigner::random().into()
}

/// Returns the wei balance of `address` at the latest block.
pub async fn get_eth_balance<P: Provider>(
    provider: &P,
    address: Address,
) -> Result<U256, ChainError> {
    Ok(provider.get_balance(address).await?)
}
