//! One provider, shared by every utility a test uses.

use std::path::PathBuf;

use alloy_provider::RootProvider;
use protokit_common::{Blockchain, ProtocolUtils};
use protokit_config::NetworkConfig;
use protokit_deploys::{ContractDeployer, DeployHelper, DeployerSigner};

use crate::{Account, TestEnvError, get_accounts};

/// The test environment: a node connection and the accounts on it.
///
/// Every utility handed out shares the provider built by
/// [`TestEnv::connect`]; nothing holds a global connection.
#[derive(Debug, Clone)]
pub struct TestEnv {
    provider: RootProvider,
    config: NetworkConfig,
    accounts: Vec<Account>,
}

impl TestEnv {
    /// Connects to the node in `config` and derives its accounts.
    ///
    /// No request is sent until a utility is used.
    pub fn connect(config: &NetworkConfig) -> Result<Self, TestEnvError> {
        let accounts = get_accounts(&config.mnemonic, config.accounts)?;
        Ok(Self {
            provider: RootProvider::new_http(config.rpc_url.clone()),
            config: config.clone(),
            accounts,
        })
    }

    /// Returns the shared provider.
    pub const fn provider(&self) -> &RootProvider {
        &self.provider
    }

    /// Returns the network configuration the environment was built from.
    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Returns snapshot and time controls over the shared provider.
    pub fn blockchain_utils(&self) -> Blockchain<RootProvider> {
        Blockchain::new(self.provider.clone())
    }

    /// Returns transaction inspection over the shared provider.
    pub fn protocol_utils(&self) -> ProtocolUtils<RootProvider> {
        ProtocolUtils::new(self.provider.clone())
    }

    /// Returns the derived accounts, in node order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Returns a deploy helper sending from account `index`.
    ///
    /// Transactions go through `eth_sendTransaction`, so the node must hold
    /// the account unlocked, as Hardhat and Anvil do for their dev accounts.
    pub fn deploy_helper(
        &self,
        index: usize,
        core_artifacts: impl Into<PathBuf>,
        external_artifacts: impl Into<PathBuf>,
    ) -> Result<DeployHelper<RootProvider>, TestEnvError> {
        let account = self
            .accounts
            .get(index)
            .ok_or(TestEnvError::NoSuchAccount { index, count: self.accounts.len() })?;
        let deployer = ContractDeployer::new(DeployerSigner::new(
            self.provider.clone(),
            account.address,
        ))
        .with_receipt_timeout(self.config.receipt_timeout());
        Ok(DeployHelper::from_deployer(deployer, core_artifacts, external_artifacts))
    }
}
