//! Network connection settings.

use std::{path::Path, time::Duration};

use protokit_common::TEST_MNEMONIC;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ConfigError, load_file};

/// Endpoint of a Hardhat or Anvil node started with default options.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

const DEFAULT_ACCOUNTS: u32 = 10;
const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 60;

/// Where the node lives and which accounts to use on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Mnemonic the development accounts derive from.
    pub mnemonic: String,
    /// Number of accounts to derive.
    pub accounts: u32,
    /// How long to wait for a transaction receipt.
    pub receipt_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: Url::parse(DEFAULT_RPC_URL).expect("default rpc url is valid"),
            mnemonic: TEST_MNEMONIC.to_string(),
            accounts: DEFAULT_ACCOUNTS,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
        }
    }
}

impl NetworkConfig {
    /// Loads the configuration from a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_file(path)
    }

    /// Returns a copy pointed at `rpc_url`.
    pub fn with_rpc_url(mut self, rpc_url: Url) -> Self {
        self.rpc_url = rpc_url;
        self
    }

    /// Returns the receipt timeout as a [`Duration`].
    pub const fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}
