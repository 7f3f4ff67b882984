//! Deployment of third-party contracts the protocol integrates with.

use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;

use crate::{ArtifactStore, ContractDeployer, DeployError, DeployedContract};

/// Deploys dependency contracts from vendored artifacts or raw bytecode.
///
/// External artifacts are taken as published, so they are never linked here.
#[derive(Debug, Clone)]
pub struct DeployExternalContracts<P> {
    deployer: ContractDeployer<P>,
    artifacts: ArtifactStore,
}

impl<P: Provider> DeployExternalContracts<P> {
    /// Deploys from `artifacts` through `deployer`.
    pub const fn new(deployer: ContractDeployer<P>, artifacts: ArtifactStore) -> Self {
        Self { deployer, artifacts }
    }

    /// Returns the artifact directory.
    pub const fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Returns the account deployments are sent from.
    pub const fn deployer(&self) -> Address {
        self.deployer.signer().address()
    }

    /// Deploys a vendored contract by artifact name.
    pub async fn deploy(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<DeployedContract, DeployError> {
        let artifact = self.artifacts.load(name)?;
        self.deployer.deploy_artifact(&artifact, &BTreeMap::new(), args).await
    }

    /// Deploys ready-made creation code, constructor arguments included.
    pub async fn deploy_bytecode(
        &self,
        name: &str,
        bytecode: Bytes,
    ) -> Result<DeployedContract, DeployError> {
        self.deployer.deploy(name, bytecode).await
    }
}
