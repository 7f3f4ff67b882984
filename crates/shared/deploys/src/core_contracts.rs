//! Deployment of the project's own contracts.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use alloy_provider::Provider;

use crate::{ArtifactStore, ContractDeployer, DeployError, DeployedContract, DeployerSigner};

/// Deploys contracts compiled from the project's sources.
#[derive(Debug, Clone)]
pub struct DeployCoreContracts<P> {
    deployer: ContractDeployer<P>,
    artifacts: ArtifactStore,
}

impl<P: Provider> DeployCoreContracts<P> {
    /// Deploys from `artifacts` through `deployer`.
    pub const fn new(deployer: ContractDeployer<P>, artifacts: ArtifactStore) -> Self {
        Self { deployer, artifacts }
    }

    /// Returns the artifact directory.
    pub const fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Returns the signer deployments are sent from.
    pub const fn signer(&self) -> &DeployerSigner<P> {
        self.deployer.signer()
    }

    /// Returns the account deployments are sent from.
    pub const fn deployer(&self) -> Address {
        self.deployer.signer().address()
    }

    /// Deploys a contract that needs no libraries.
    pub async fn deploy(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<DeployedContract, DeployError> {
        self.deploy_linked(name, args, &BTreeMap::new()).await
    }

    /// Deploys a library; libraries take no constructor arguments.
    pub async fn deploy_library(&self, name: &str) -> Result<DeployedContract, DeployError> {
        self.deploy(name, &[]).await
    }

    /// Deploys a contract after linking it against already deployed libraries.
    ///
    /// Library keys may be fully qualified or bare library names.
    pub async fn deploy_linked(
        &self,
        name: &str,
        args: &[String],
        libraries: &BTreeMap<String, Address>,
    ) -> Result<DeployedContract, DeployError> {
        let artifact = self.artifacts.load(name)?;
        self.deployer.deploy_artifact(&artifact, libraries, args).await
    }
}
