//! Compiled contract artifacts as written by the Hardhat compile task.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes};
use protokit_common::link_bytecode;
use serde::Deserialize;

use crate::DeployError;

const ARTIFACT_EXTENSION: &str = "json";

/// Location of a library placeholder in creation bytecode, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LinkOffset {
    /// Byte offset of the placeholder.
    pub start: usize,
    /// Placeholder length in bytes.
    pub length: usize,
}

/// A single contract artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Contract name.
    pub contract_name: String,
    /// Source file the contract is declared in.
    pub source_name: String,
    /// Contract ABI.
    pub abi: JsonAbi,
    /// Hex creation bytecode, possibly holding library placeholders.
    pub bytecode: String,
    /// Libraries the bytecode must be linked against, by source file then library name.
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>,
}

impl ContractArtifact {
    /// Reads and parses an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DeployError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| DeployError::ArtifactIo { path: path.to_path_buf(), source })?;
        serde_json::from_str(&contents)
            .map_err(|source| DeployError::ArtifactJson { path: path.to_path_buf(), source })
    }

    /// Returns `sourceName:contractName`.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Returns true when the artifact has creation code, i.e. is not an interface
    /// or abstract contract.
    pub fn is_deployable(&self) -> bool {
        !self.bytecode.trim_start_matches("0x").is_empty()
    }

    /// Returns the fully qualified names of the libraries the bytecode needs.
    pub fn libraries(&self) -> Vec<String> {
        self.link_references
            .iter()
            .flat_map(|(source, libs)| libs.keys().map(move |lib| format!("{source}:{lib}")))
            .collect()
    }

    /// Substitutes library addresses into the creation bytecode.
    ///
    /// Keys of `libraries` may be fully qualified or bare library names; the
    /// fully qualified entry wins when both are present.
    pub fn link(&self, libraries: &BTreeMap<String, Address>) -> Result<Bytes, DeployError> {
        let mut resolved = Vec::new();
        for (source, libs) in &self.link_references {
            for lib in libs.keys() {
                let name = format!("{source}:{lib}");
                let address = libraries.get(&name).or_else(|| libraries.get(lib)).ok_or_else(
                    || DeployError::MissingLibrary {
                        contract: self.contract_name.clone(),
                        library: name.clone(),
                    },
                )?;
                resolved.push((name, *address));
            }
        }

        Ok(link_bytecode(
            &self.bytecode,
            resolved.iter().map(|(name, address)| (name.as_str(), *address)),
        )?)
    }

    /// ABI-encodes constructor arguments given as strings.
    ///
    /// Each argument is coerced to the type of the matching constructor input,
    /// so `"1000"` becomes a `uint256` and `"0xabc..."` an `address`.
    pub fn encode_constructor(&self, args: &[String]) -> Result<Vec<u8>, DeployError> {
        let Some(constructor) = &self.abi.constructor else {
            return if args.is_empty() {
                Ok(Vec::new())
            } else {
                Err(self.argument_count(0, args.len()))
            };
        };
        if constructor.inputs.len() != args.len() {
            return Err(self.argument_count(constructor.inputs.len(), args.len()));
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| param.resolve()?.coerce_str(arg))
            .collect::<Result<Vec<DynSolValue>, _>>()
            .map_err(|source| self.encode_error(source))?;

        constructor.abi_encode_input(&values).map_err(|source| self.encode_error(source))
    }

    /// Returns linked creation bytecode followed by the encoded constructor arguments.
    pub fn init_code(
        &self,
        libraries: &BTreeMap<String, Address>,
        args: &[String],
    ) -> Result<Bytes, DeployError> {
        if !self.is_deployable() {
            return Err(DeployError::NotDeployable(self.contract_name.clone()));
        }
        let mut code = self.link(libraries)?.to_vec();
        code.extend(self.encode_constructor(args)?);
        Ok(code.into())
    }

    fn argument_count(&self, expected: usize, actual: usize) -> DeployError {
        DeployError::ArgumentCount { contract: self.contract_name.clone(), expected, actual }
    }

    fn encode_error(&self, source: alloy_dyn_abi::Error) -> DeployError {
        DeployError::Encode { contract: self.contract_name.clone(), source }
    }
}

/// A directory of artifacts.
///
/// Creating a store touches nothing on disk; artifacts are located lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Returns a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the artifact directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locates the artifact of a contract.
    ///
    /// `name` is either a bare contract name, searched for anywhere under the
    /// root, or a fully qualified `path/File.sol:Contract` name resolved to
    /// `<root>/path/File.sol/Contract.json`.
    pub fn find(&self, name: &str) -> Result<PathBuf, DeployError> {
        if let Some((source, contract)) = name.rsplit_once(':') {
            let path = self.root.join(source).join(format!("{contract}.{ARTIFACT_EXTENSION}"));
            return if path.is_file() { Ok(path) } else { Err(self.not_found(name)) };
        }

        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        let mut matches = Vec::new();
        collect_matches(&self.root, &file_name, &mut matches)?;
        matches.sort();

        match matches.len() {
            0 => Err(self.not_found(name)),
            1 => Ok(matches.remove(0)),
            _ => Err(DeployError::AmbiguousArtifact {
                name: name.to_string(),
                candidates: matches.iter().map(|path| path.display().to_string()).collect(),
            }),
        }
    }

    /// Locates and parses the artifact of a contract.
    pub fn load(&self, name: &str) -> Result<ContractArtifact, DeployError> {
        ContractArtifact::from_path(self.find(name)?)
    }

    fn not_found(&self, name: &str) -> DeployError {
        DeployError::ArtifactNotFound { name: name.to_string(), dir: self.root.clone() }
    }
}

fn collect_matches(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), DeployError> {
    let io_error = |source| DeployError::ArtifactIo { path: dir.to_path_buf(), source };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        if entry.file_type().map_err(io_error)?.is_dir() {
            collect_matches(&path, file_name, matches)?;
        } else if entry.file_name().to_str() == Some(file_name) {
            matches.push(path);
        }
    }
    Ok(())
}
