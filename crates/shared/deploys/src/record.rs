//! Persisted outcome of a deployment run.

use std::{fmt, path::Path};

use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::{DeployError, DeployedContract};

/// One deployed contract, as recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedContract {
    /// Label the plan refers to the deployment by.
    pub label: String,
    /// Contract or artifact name.
    pub contract: String,
    /// Deployed address.
    pub address: Address,
    /// Creation transaction.
    pub transaction_hash: TxHash,
    /// Block the contract was created in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Every contract a deployment run created, in deployment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Chain the contracts live on.
    pub chain_id: u64,
    /// Account that sent every deployment.
    pub deployer: Address,
    /// Deployed contracts.
    pub contracts: Vec<RecordedContract>,
}

impl DeploymentRecord {
    /// Creates an empty record.
    pub const fn new(chain_id: u64, deployer: Address) -> Self {
        Self { chain_id, deployer, contracts: Vec::new() }
    }

    /// Appends a deployment under `label`.
    pub fn push(&mut self, label: impl Into<String>, deployed: &DeployedContract) {
        self.contracts.push(RecordedContract {
            label: label.into(),
            contract: deployed.name.clone(),
            address: deployed.address,
            transaction_hash: deployed.transaction_hash,
            block_number: deployed.block_number,
        });
    }

    /// Returns the deployment recorded under `label`.
    pub fn get(&self, label: &str) -> Option<&RecordedContract> {
        self.contracts.iter().find(|contract| contract.label == label)
    }

    /// Returns the address recorded under `label`.
    pub fn address(&self, label: &str) -> Option<Address> {
        self.get(label).map(|contract| contract.address)
    }

    /// Reads a record written by [`Self::write_to_file`].
    pub fn read_from_file(path: &Path) -> Result<Self, DeployError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| DeployError::Record { path: path.to_path_buf(), source })?;
        serde_json::from_str(&content)
            .map_err(|source| DeployError::RecordJson { path: path.to_path_buf(), source })
    }

    /// Writes the record as pretty-printed JSON.
    pub fn write_to_file(&self, path: &Path) -> Result<(), DeployError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|source| DeployError::RecordJson { path: path.to_path_buf(), source })?;
        std::fs::write(path, content)
            .map_err(|source| DeployError::Record { path: path.to_path_buf(), source })
    }
}

impl fmt::Display for DeploymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "chain {} deployer {}", self.chain_id, self.deployer)?;
        for contract in &self.contracts {
            writeln!(f, "  {:<24} {}", contract.label, contract.address)?;
        }
        Ok(())
    }
}
