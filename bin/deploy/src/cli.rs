//! Command line of the deploy binary.

use std::{future::Future, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use eyre::WrapErr;
use protokit_cli_utils::{LogArgs, LogConfig, build_runtime, run_until_ctrl_c};
use protokit_config::NetworkConfig;
use url::Url;

use crate::commands;

/// Deploys protocol contracts and inspects the target node.
#[derive(Debug, Clone, Parser)]
#[command(name = "protokit-deploy", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Node and deployer account.
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Logging configuration arguments.
    #[command(flatten)]
    pub logging: LogArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Node and deployer account options.
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Network")]
pub(crate) struct NetworkArgs {
    /// Network configuration file (.toml or .json); flags override its values.
    #[arg(long = "network-config", env = "PROTOKIT_NETWORK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the node.
    #[arg(long = "rpc-url", env = "PROTOKIT_RPC_URL", global = true)]
    pub rpc_url: Option<Url>,

    /// Mnemonic the deployer key derives from.
    #[arg(long = "mnemonic", env = "PROTOKIT_MNEMONIC", hide_env_values = true, global = true)]
    pub mnemonic: Option<String>,

    /// Index of the deployer account under the mnemonic.
    #[arg(
        long = "account-index",
        env = "PROTOKIT_ACCOUNT_INDEX",
        default_value_t = 0,
        global = true
    )]
    pub account_index: u32,
}

impl NetworkArgs {
    /// Loads the configuration file, if any, and applies the flags over it.
    pub(crate) fn resolve(&self) -> eyre::Result<NetworkConfig> {
        let mut config = match &self.config {
            Some(path) => NetworkConfig::from_path(path)
                .wrap_err_with(|| format!("Failed to load {}", path.display()))?,
            None => NetworkConfig::default(),
        };
        if let Some(rpc_url) = &self.rpc_url {
            config = config.with_rpc_url(rpc_url.clone());
        }
        if let Some(mnemonic) = &self.mnemonic {
            config.mnemonic.clone_from(mnemonic);
        }
        Ok(config)
    }
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Command {
    /// Deploy the contracts listed in a plan.
    Deploy(DeployArgs),
    /// List the derived accounts and their balances.
    Accounts,
    /// Print the node flags matching a coverage configuration.
    NodeArgs {
        /// Coverage configuration file (.toml or .json); defaults apply without one.
        #[arg(long = "coverage-config")]
        coverage_config: Option<PathBuf>,
    },
}

/// Options of the `deploy` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct DeployArgs {
    /// Deployment plan (.toml or .json).
    #[arg(long = "plan")]
    pub plan: PathBuf,

    /// Artifact directory of the project's own contracts.
    #[arg(long = "core-artifacts", default_value = "artifacts")]
    pub core_artifacts: PathBuf,

    /// Artifact directory of third-party contracts.
    #[arg(long = "external-artifacts", default_value = "external/artifacts")]
    pub external_artifacts: PathBuf,

    /// Where to write the deployed addresses.
    #[arg(long = "out", default_value = "deployments.json")]
    pub out: PathBuf,
}

impl Cli {
    /// Parse the CLI arguments.
    pub(crate) fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Run the CLI.
    pub(crate) fn run(self) -> eyre::Result<()> {
        LogConfig::from(self.logging).init_tracing_subscriber()?;

        match self.command {
            Command::Deploy(args) => {
                let network = self.network.resolve()?;
                block_on(commands::deploy(network, self.network.account_index, args))
            }
            Command::Accounts => {
                let network = self.network.resolve()?;
                block_on(commands::accounts(network))
            }
            Command::NodeArgs { coverage_config } => {
                commands::node_args(coverage_config.as_deref())
            }
        }
    }
}

fn block_on<T>(fut: impl Future<Output = eyre::Result<T>>) -> eyre::Result<T> {
    build_runtime()?.block_on(run_until_ctrl_c(fut))
}
