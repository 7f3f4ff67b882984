#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::DeployError;

mod artifact;
pub use artifact::{ArtifactStore, ContractArtifact, LinkOffset};

mod deployer;
pub use deployer::{
    ContractDeployer, DEFAULT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT, DeployedContract,
    DeployerSigner,
};

mod core_contracts;
pub use core_contracts::DeployCoreContracts;

mod external_contracts;
pub use external_contracts::DeployExternalContracts;

mod helper;
pub use helper::DeployHelper;

mod record;
pub use record::{DeploymentRecord, RecordedContract};

mod plan;
pub use plan::{ContractFamily, DEPLOYER_REFERENCE, DeployPlan, DeployStep};
