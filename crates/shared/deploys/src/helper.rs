//! The deployment façade handed to deploy scripts and fixtures.

use std::path::PathBuf;

use alloy_primitives::Address;
use alloy_provider::Provider;

use crate::{
    ArtifactStore, ContractDeployer, DeployCoreContracts, DeployExternalContracts, DeployerSigner,
};

/// Both deployment families, sharing one deployer account.
#[derive(Debug, Clone)]
pub struct DeployHelper<P> {
    /// The project's own contracts.
    pub core: DeployCoreContracts<P>,
    /// Third-party contracts.
    pub external: DeployExternalContracts<P>,
}

impl<P: Provider + Clone> DeployHelper<P> {
    /// Builds both families from `signer`. Nothing is read or sent until a
    /// deployment is requested.
    pub fn new(
        signer: DeployerSigner<P>,
        core_artifacts: impl Into<PathBuf>,
        external_artifacts: impl Into<PathBuf>,
    ) -> Self {
        Self::from_deployer(ContractDeployer::new(signer), core_artifacts, external_artifacts)
    }

    /// Builds both families from a configured deployer.
    pub fn from_deployer(
        deployer: ContractDeployer<P>,
        core_artifacts: impl Into<PathBuf>,
        external_artifacts: impl Into<PathBuf>,
    ) -> Self {
        Self {
            core: DeployCoreContracts::new(deployer.clone(), ArtifactStore::new(core_artifacts)),
            external: DeployExternalContracts::new(
                deployer,
                ArtifactStore::new(external_artifacts),
            ),
        }
    }

    /// Returns the account deployments are sent from.
    pub const fn deployer(&self) -> Address {
        self.core.deployer()
    }

    /// Returns the provider deployments go through.
    pub const fn provider(&self) -> &P {
        self.core.signer().provider()
    }
}
