//! Subcommand implementations.

use std::path::Path;

use alloy_network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use eyre::WrapErr;
use protokit_common::{ETHER_DECIMALS, derive_signer, format_amount};
use protokit_config::{CoverageConfig, NetworkConfig};
use protokit_deploys::{ContractDeployer, DeployHelper, DeployPlan, DeployerSigner};
use tracing::info;

use crate::cli::DeployArgs;

const DEPLOYMENT_START: &str = "-------------- Deployment Start --------------";
const DEPLOYMENT_COMPLETED: &str = "------------- Deployment Completed ------------";

/// Executes a deployment plan from the configured deployer account.
pub(crate) async fn deploy(
    network: NetworkConfig,
    account_index: u32,
    args: DeployArgs,
) -> eyre::Result<()> {
    println!("{DEPLOYMENT_START}");

    let signer = derive_signer(&network.mnemonic, account_index)
        .wrap_err_with(|| format!("Failed to derive deployer account {account_index}"))?;
    let deployer = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(network.rpc_url.clone());

    let chain_id = provider.get_chain_id().await.wrap_err("Failed to read chain id")?;
    let balance = provider.get_balance(deployer).await.wrap_err("Failed to read balance")?;
    let balance = format_amount(balance, ETHER_DECIMALS)?;
    info!(target: "protokit::deploy", chain_id, %deployer, %balance, "deployer ready");

    let plan = DeployPlan::from_path(&args.plan)
        .wrap_err_with(|| format!("Failed to load plan {}", args.plan.display()))?;
    let deployer = ContractDeployer::new(DeployerSigner::new(provider, deployer))
        .with_receipt_timeout(network.receipt_timeout());
    let helper =
        DeployHelper::from_deployer(deployer, &args.core_artifacts, &args.external_artifacts);

    let record = plan.execute(&helper).await.wrap_err("Deployment failed")?;
    record.write_to_file(&args.out)?;

    print!("{record}");
    println!("Deployment record written to {}", args.out.display());
    println!("{DEPLOYMENT_COMPLETED}");
    Ok(())
}

/// Prints every derived account with its balance.
pub(crate) async fn accounts(network: NetworkConfig) -> eyre::Result<()> {
    let provider: RootProvider = RootProvider::new_http(network.rpc_url.clone());

    println!("{:<4} {:<42} {}", "#", "Address", "Balance (ETH)");
    for index in 0..network.accounts {
        let address = derive_signer(&network.mnemonic, index)
            .wrap_err_with(|| format!("Failed to derive account {index}"))?
            .address();
        let balance = provider
            .get_balance(address)
            .await
            .wrap_err_with(|| format!("Failed to read balance of {address}"))?;
        println!("{index:<4} {address:<42} {}", format_amount(balance, ETHER_DECIMALS)?);
    }
    Ok(())
}

/// Prints the node flags matching the coverage configuration at `path`.
pub(crate) fn node_args(path: Option<&Path>) -> eyre::Result<()> {
    println!("{}", coverage_node_args(path)?.join(" "));
    Ok(())
}

fn coverage_node_args(path: Option<&Path>) -> eyre::Result<Vec<String>> {
    let config = match path {
        Some(path) => CoverageConfig::from_path(path)
            .wrap_err_with(|| format!("Failed to load {}", path.display()))?,
        None => CoverageConfig::default(),
    };
    Ok(config.node_args())
}
