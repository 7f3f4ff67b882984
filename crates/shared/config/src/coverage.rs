//! Options consumed by the coverage tool.

use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, load_file};

/// Ether granted to every account of the instrumented node.
const DEFAULT_BALANCE_ETHER: u64 = 100_000_000;

/// Block gas ceiling of the instrumented node.
const DEFAULT_GAS_LIMIT: u64 = 30_000_000;

/// Coverage tool configuration.
///
/// Field names on disk match the tool's own configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverageConfig {
    /// Contract paths, relative to the sources root, excluded from instrumentation.
    pub skip_files: BTreeSet<String>,
    /// Settings of the simulated node the instrumented tests run on.
    pub provider_options: ProviderOptions,
}

/// Simulated node settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Initial balance, in ether, of every test account.
    pub default_balance_ether: u64,
    /// Block gas ceiling.
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self { default_balance_ether: DEFAULT_BALANCE_ETHER, gas_limit: DEFAULT_GAS_LIMIT }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            skip_files: ["mocks", "interfaces"].into_iter().map(String::from).collect(),
            provider_options: ProviderOptions::default(),
        }
    }
}

impl CoverageConfig {
    /// Loads the configuration from a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_file(path)
    }

    /// Returns true if `path` is, or lives under, a skipped entry.
    pub fn is_skipped(&self, path: &str) -> bool {
        let path = path.trim_start_matches("./");
        self.skip_files.iter().any(|skip| {
            let skip = skip.trim_end_matches('/');
            path == skip || path.strip_prefix(skip).is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Returns the command line that starts an Anvil node with these provider options.
    pub fn node_args(&self) -> Vec<String> {
        vec![
            "--balance".to_string(),
            self.provider_options.default_balance_ether.to_string(),
            "--gas-limit".to_string(),
            self.provider_options.gas_limit.to_string(),
        ]
    }
}
