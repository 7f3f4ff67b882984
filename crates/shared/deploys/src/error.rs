//! Error types for contract deployment.

use std::{path::PathBuf, time::Duration};

use alloy_primitives::B256;
use alloy_transport::TransportError;
use protokit_common::LinkError;
use protokit_config::ConfigError;
use thiserror::Error;

/// Errors raised while loading artifacts, deploying contracts or running a plan.
#[derive(Debug, Error)]
pub enum DeployError {
    /// No artifact with that name exists under the directory.
    #[error("artifact {name} not found under {}", dir.display())]
    ArtifactNotFound {
        /// Contract name that was searched for.
        name: String,
        /// Artifact directory.
        dir: PathBuf,
    },
    /// More than one artifact carries the name; a fully qualified name is required.
    #[error("artifact name {name} is ambiguous: {}", candidates.join(", "))]
    AmbiguousArtifact {
        /// Contract name that was searched for.
        name: String,
        /// Paths of every matching artifact.
        candidates: Vec<String>,
    },
    /// Reading an artifact file or directory failed.
    #[error("failed to read artifact {}: {source}", path.display())]
    ArtifactIo {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// An artifact file is not valid artifact JSON.
    #[error("failed to parse artifact {}: {source}", path.display())]
    ArtifactJson {
        /// Path being parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// The artifact has no creation code, e.g. an interface or abstract contract.
    #[error("{0} has no creation bytecode")]
    NotDeployable(String),
    /// The bytecode could not be linked.
    #[error(transparent)]
    Link(#[from] LinkError),
    /// The artifact references a library that was not supplied.
    #[error("{contract} needs library {library} to be linked")]
    MissingLibrary {
        /// Contract being linked.
        contract: String,
        /// Fully qualified name of the library.
        library: String,
    },
    /// The number of constructor arguments does not match the ABI.
    #[error("{contract} constructor takes {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Contract being deployed.
        contract: String,
        /// Number of ABI inputs.
        expected: usize,
        /// Number of supplied arguments.
        actual: usize,
    },
    /// A constructor argument could not be coerced to its ABI type.
    #[error("invalid constructor arguments for {contract}: {source}")]
    Encode {
        /// Contract being deployed.
        contract: String,
        /// Underlying error.
        source: alloy_dyn_abi::Error,
    },
    /// The node could not be reached or answered with an error.
    #[error("provider error: {0}")]
    Transport(#[from] TransportError),
    /// No receipt arrived before the timeout.
    #[error("no receipt for transaction {tx_hash} after {timeout:?}")]
    Timeout {
        /// Pending transaction.
        tx_hash: B256,
        /// How long we waited.
        timeout: Duration,
    },
    /// The deployment transaction was mined but reverted.
    #[error("deployment of {contract} reverted in transaction {tx_hash}")]
    Reverted {
        /// Contract being deployed.
        contract: String,
        /// Reverted transaction.
        tx_hash: B256,
    },
    /// The receipt of a deployment carries no contract address.
    #[error("receipt of transaction {0} has no contract address")]
    MissingContractAddress(B256),
    /// A plan value references a label no earlier step defines.
    #[error("step {step} ({contract}) references unknown deployment {reference:?}")]
    UnknownReference {
        /// One-based index of the step.
        step: usize,
        /// Contract of the step.
        contract: String,
        /// The unresolved reference.
        reference: String,
    },
    /// A plan value contains an unterminated or empty `${...}` reference.
    #[error("step {step} has a malformed reference in {value:?}")]
    MalformedReference {
        /// One-based index of the step.
        step: usize,
        /// The offending value.
        value: String,
    },
    /// Two plan steps share a label.
    #[error("label {0} is used by more than one step")]
    DuplicateLabel(String),
    /// A plan step is inconsistent on its own.
    #[error("step {step} ({contract}): {reason}")]
    InvalidStep {
        /// One-based index of the step.
        step: usize,
        /// Contract of the step.
        contract: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The plan file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Reading or writing a deployment record failed.
    #[error("failed to access deployment record {}: {source}", path.display())]
    Record {
        /// Record path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A deployment record is not valid JSON.
    #[error("invalid deployment record {}: {source}", path.display())]
    RecordJson {
        /// Record path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}
