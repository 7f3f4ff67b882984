//! Deterministic signers derived from a BIP-39 mnemonic.

use alloy_signer_local::{
    LocalSignerError, MnemonicBuilder, PrivateKeySigner, coins_bip39::English,
};

/// Mnemonic shared by Hardhat and Anvil for their pre-funded development accounts.
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Derives the signer at `m/44'/60'/0'/0/{index}` of `mnemonic`.
pub fn derive_signer(mnemonic: &str, index: u32) -> Result<PrivateKeySigner, LocalSignerError> {
    let path = format!("m/44'/60'/0'/0/{index}");
    MnemonicBuilder::<English>::default().phrase(mnemonic).derivation_path(&path)?.build()
}
