//! Sending creation transactions and waiting for them to land.

use std::{collections::BTreeMap, time::Duration};

use alloy_json_abi::JsonAbi;
use alloy_network::{ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{TransactionReceipt, TransactionRequest};
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use crate::{ContractArtifact, DeployError};

/// How long to wait for a deployment receipt by default.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between two receipt lookups.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The account deployments are sent from, and the provider that reaches it.
///
/// The provider must be able to sign for `address`: either a wallet provider
/// holding its key, or a development node with the account unlocked.
#[derive(Debug, Clone)]
pub struct DeployerSigner<P> {
    provider: P,
    address: Address,
}

impl<P: Provider> DeployerSigner<P> {
    /// Pairs a provider with the deploying account.
    pub const fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    /// Returns the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the deploying account.
    pub const fn address(&self) -> Address {
        self.address
    }
}

/// A contract that has been deployed and mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// Contract name.
    pub name: String,
    /// Address the contract lives at.
    pub address: Address,
    /// Creation transaction.
    pub transaction_hash: TxHash,
    /// Block the creation transaction was included in.
    pub block_number: Option<u64>,
    /// ABI, when deployed from an artifact.
    pub abi: Option<JsonAbi>,
}

/// Deploys creation code from a [`DeployerSigner`].
#[derive(Debug, Clone)]
pub struct ContractDeployer<P> {
    signer: DeployerSigner<P>,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl<P: Provider> ContractDeployer<P> {
    /// Creates a deployer with the default timeout and poll interval.
    pub const fn new(signer: DeployerSigner<P>) -> Self {
        Self {
            signer,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets how long to wait for each receipt.
    pub const fn with_receipt_timeout(mut self, receipt_timeout: Duration) -> Self {
        self.receipt_timeout = receipt_timeout;
        self
    }

    /// Sets the delay between receipt lookups.
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns the signer deployments are sent from.
    pub const fn signer(&self) -> &DeployerSigner<P> {
        &self.signer
    }

    /// Sends `init_code` as a creation transaction and waits for the contract.
    pub async fn deploy(
        &self,
        name: &str,
        init_code: Bytes,
    ) -> Result<DeployedContract, DeployError> {
        let request =
            TransactionRequest::default().from(self.signer.address).with_deploy_code(init_code);
        let pending = self.signer.provider.send_transaction(request).await?;
        let tx_hash = *pending.tx_hash();
        debug!(target: "protokit::deploy", contract = name, %tx_hash, "sent deployment");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if !receipt.status() {
            return Err(DeployError::Reverted { contract: name.to_string(), tx_hash });
        }
        let address =
            receipt.contract_address().ok_or(DeployError::MissingContractAddress(tx_hash))?;

        info!(target: "protokit::deploy", contract = name, %address, %tx_hash, "deployed");
        Ok(DeployedContract {
            name: name.to_string(),
            address,
            transaction_hash: tx_hash,
            block_number: receipt.block_number(),
            abi: None,
        })
    }

    /// Links and deploys an artifact with string constructor arguments.
    pub async fn deploy_artifact(
        &self,
        artifact: &ContractArtifact,
        libraries: &BTreeMap<String, Address>,
        args: &[String],
    ) -> Result<DeployedContract, DeployError> {
        let init_code = artifact.init_code(libraries, args)?;
        let mut deployed = self.deploy(&artifact.contract_name, init_code).await?;
        deployed.abi = Some(artifact.abi.clone());
        Ok(deployed)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, DeployError> {
        let provider = &self.signer.provider;
        timeout(self.receipt_timeout, async {
            loop {
                if let Some(receipt) = provider.get_transaction_receipt(tx_hash).await? {
                    return Ok::<_, DeployError>(receipt);
                }
                sleep(self.poll_interval).await;
            }
        })
        .await
        .map_err(|_| DeployError::Timeout { tx_hash, timeout: self.receipt_timeout })?
    }
}
