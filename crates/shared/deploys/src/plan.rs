//! Declarative, ordered deployment plans.
//!
//! A plan lists deployments in the order they must happen:
//!
//! ```toml
//! [[steps]]
//! contract = "Math"
//!
//! [[steps]]
//! contract = "Controller"
//! args = ["${deployer}"]
//!
//! [[steps]]
//! contract = "Vault"
//! label = "MainVault"
//! args = ["${Controller}", "1000"]
//! libraries = { Math = "Math" }
//!
//! [[steps]]
//! family = "external"
//! contract = "WETH9"
//! ```
//!
//! `${Label}` stands for the address of an earlier step and `${deployer}` for
//! the deploying account. Order is never inferred: a reference to a step that
//! comes later fails validation before any transaction is sent.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use alloy_primitives::Address;
use alloy_provider::Provider;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{DeployError, DeployHelper, DeploymentRecord};

/// Reference that resolves to the deploying account.
pub const DEPLOYER_REFERENCE: &str = "deployer";

/// Which [`DeployHelper`] family deploys a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractFamily {
    /// The project's own contracts.
    #[default]
    Core,
    /// Third-party contracts.
    External,
}

/// A single deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployStep {
    /// Family whose artifacts hold the contract.
    #[serde(default)]
    pub family: ContractFamily,
    /// Artifact name, bare or fully qualified.
    pub contract: String,
    /// Name later steps refer to this deployment by; defaults to the contract name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Constructor arguments, possibly holding `${...}` references.
    #[serde(default)]
    pub args: Vec<String>,
    /// Library name to address, or to the label of an earlier step.
    #[serde(default)]
    pub libraries: BTreeMap<String, String>,
}

impl DeployStep {
    /// Returns the name later steps refer to this deployment by.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.contract)
    }
}

/// An ordered list of deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployPlan {
    /// Deployments, in order.
    #[serde(default)]
    pub steps: Vec<DeployStep>,
}

impl DeployPlan {
    /// Loads a plan from a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DeployError> {
        Ok(protokit_config::load_file(path)?)
    }

    /// Checks that every reference points at an earlier step and that labels are unique.
    pub fn validate(&self) -> Result<(), DeployError> {
        let mut known = BTreeSet::from([DEPLOYER_REFERENCE.to_string()]);

        for (index, step) in self.steps.iter().enumerate() {
            let resolver = StepResolver::new(index, step);
            if step.contract.trim().is_empty() {
                return Err(resolver.invalid("contract name is empty"));
            }
            if step.family == ContractFamily::External && !step.libraries.is_empty() {
                return Err(resolver.invalid("external contracts are deployed unlinked"));
            }

            let lookup = |name: &str| known.contains(name).then_some(Address::ZERO);
            for arg in &step.args {
                resolver.substitute(arg, lookup)?;
            }
            for value in step.libraries.values() {
                resolver.library(value, lookup)?;
            }

            if !known.insert(step.label().to_string()) {
                return Err(DeployError::DuplicateLabel(step.label().to_string()));
            }
        }
        Ok(())
    }

    /// Runs every step in order and records what was deployed.
    ///
    /// The whole plan is validated first, so a bad reference sends nothing.
    /// A failed step aborts the run; contracts deployed before it stay deployed.
    pub async fn execute<P: Provider + Clone>(
        &self,
        helper: &DeployHelper<P>,
    ) -> Result<DeploymentRecord, DeployError> {
        self.validate()?;

        let chain_id = helper.provider().get_chain_id().await?;
        let mut record = DeploymentRecord::new(chain_id, helper.deployer());
        let mut addresses = BTreeMap::from([(DEPLOYER_REFERENCE.to_string(), helper.deployer())]);
        info!(target: "protokit::deploy", chain_id, steps = self.steps.len(), "executing plan");

        for (index, step) in self.steps.iter().enumerate() {
            let resolver = StepResolver::new(index, step);
            let lookup = |name: &str| addresses.get(name).copied();

            let args = step
                .args
                .iter()
                .map(|arg| resolver.substitute(arg, lookup))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(
                target: "protokit::deploy",
                step = index + 1, label = step.label(), ?args, "deploying step"
            );

            let deployed = match step.family {
                ContractFamily::Core => {
                    let libraries = step
                        .libraries
                        .iter()
                        .map(|(name, value)| Ok((name.clone(), resolver.library(value, lookup)?)))
                        .collect::<Result<BTreeMap<_, _>, DeployError>>()?;
                    helper.core.deploy_linked(&step.contract, &args, &libraries).await?
                }
                ContractFamily::External => helper.external.deploy(&step.contract, &args).await?,
            };

            addresses.insert(step.label().to_string(), deployed.address);
            record.push(step.label(), &deployed);
        }

        Ok(record)
    }
}

/// Resolves the references of one step, attributing failures to it.
struct StepResolver<'a> {
    step: usize,
    contract: &'a str,
}

impl<'a> StepResolver<'a> {
    fn new(index: usize, step: &'a DeployStep) -> Self {
        Self { step: index + 1, contract: &step.contract }
    }

    /// Replaces every `${name}` in `value` with the checksummed address of `name`.
    fn substitute(
        &self,
        value: &str,
        lookup: impl Fn(&str) -> Option<Address>,
    ) -> Result<String, DeployError> {
        let mut resolved = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            resolved.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| self.malformed(value))?;
            let address = self.lookup(after[..end].trim(), value, &lookup)?;
            resolved.push_str(&address.to_string());
            rest = &after[end + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }

    /// Resolves a library entry: a literal address, a label, or a `${label}`.
    fn library(
        &self,
        value: &str,
        lookup: impl Fn(&str) -> Option<Address>,
    ) -> Result<Address, DeployError> {
        if let Ok(address) = value.parse::<Address>() {
            return Ok(address);
        }
        let name = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')).unwrap_or(value);
        self.lookup(name.trim(), value, &lookup)
    }

    fn lookup(
        &self,
        name: &str,
        value: &str,
        lookup: &impl Fn(&str) -> Option<Address>,
    ) -> Result<Address, DeployError> {
        if name.is_empty() {
            return Err(self.malformed(value));
        }
        lookup(name).ok_or_else(|| DeployError::UnknownReference {
            step: self.step,
            contract: self.contract.to_string(),
            reference: name.to_string(),
        })
    }

    fn malformed(&self, value: &str) -> DeployError {
        DeployError::MalformedReference { step: self.step, value: value.to_string() }
    }

    fn invalid(&self, reason: &str) -> DeployError {
        DeployError::InvalidStep {
            step: self.step,
            contract: self.contract.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy_primitives::address;
    use rstest::rstest;

    use super::*;

    fn step(contract: &str, args: &[&str]) -> DeployStep {
        DeployStep {
            family: ContractFamily::Core,
            contract: contract.to_string(),
            label: None,
            args: args.iter().map(|arg| arg.to_string()).collect(),
            libraries: BTreeMap::new(),
        }
    }

    fn plan(steps: Vec<DeployStep>) -> DeployPlan {
        DeployPlan { steps }
    }

    #[test]
    fn test_loads_toml_plan() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[[steps]]
contract = "Math"

[[steps]]
contract = "Vault"
label = "MainVault"
args = ["${{deployer}}", "1000"]
libraries = {{ Math = "Math" }}

[[steps]]
family = "external"
contract = "WETH9"
"#
        )
        .unwrap();

        let plan = DeployPlan::from_path(file.path()).unwrap();
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.steps[0].family, ContractFamily::Core);
        assert_eq!(plan.steps[1].label(), "MainVault");
        assert_eq!(plan.steps[1].libraries["Math"], "Math");
        assert_eq!(plan.steps[2].family, ContractFamily::External);
        assert_eq!(plan.steps[2].label(), "WETH9");
        plan.validate().unwrap();
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let plan = plan(vec![step("Vault", &["${Controller}"]), step("Controller", &[])]);
        let err = plan.validate().unwrap_err();
        assert!(matches!(
            err,
            DeployError::UnknownReference { step: 1, reference, .. } if reference == "Controller"
        ));
    }

    #[test]
    fn test_library_must_be_deployed_first() {
        let mut vault = step("Vault", &[]);
        vault.libraries.insert("Math".to_string(), "Math".to_string());
        let err = plan(vec![vault.clone()]).validate().unwrap_err();
        assert!(matches!(err, DeployError::UnknownReference { .. }));

        plan(vec![step("Math", &[]), vault]).validate().unwrap();
    }

    #[test]
    fn test_literal_library_address() {
        let mut vault = step("Vault", &[]);
        vault.libraries.insert(
            "Math".to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        );
        plan(vec![vault]).validate().unwrap();
    }

    #[test]
    fn test_duplicate_labels() {
        let err = plan(vec![step("Token", &[]), step("Token", &[])]).validate().unwrap_err();
        assert!(matches!(err, DeployError::DuplicateLabel(label) if label == "Token"));

        let mut shadow = step("Token", &[]);
        shadow.label = Some(DEPLOYER_REFERENCE.to_string());
        assert!(matches!(plan(vec![shadow]).validate(), Err(DeployError::DuplicateLabel(_))));
    }

    #[test]
    fn test_external_steps_are_unlinked() {
        let mut weth = step("WETH9", &[]);
        weth.family = ContractFamily::External;
        weth.libraries.insert("Math".to_string(), Address::ZERO.to_string());
        let err = plan(vec![weth]).validate().unwrap_err();
        assert!(matches!(err, DeployError::InvalidStep { step: 1, .. }));
    }

    #[rstest]
    #[case::unterminated("${Token")]
    #[case::empty("${}")]
    #[case::blank("prefix ${ } suffix")]
    fn test_malformed_references(#[case] arg: &str) {
        let err = plan(vec![step("Vault", &[arg])]).validate().unwrap_err();
        assert!(matches!(err, DeployError::MalformedReference { step: 1, .. }));
    }

    #[test]
    fn test_substitution_uses_checksummed_addresses() {
        let token = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let vault = step("Vault", &[]);
        let resolver = StepResolver::new(0, &vault);
        let lookup = |name: &str| (name == "Token").then_some(token);

        assert_eq!(
            resolver.substitute("${Token}", lookup).unwrap(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        assert_eq!(resolver.substitute("[${ Token },1]", lookup).unwrap(), format!("[{token},1]"));
        assert_eq!(resolver.substitute("plain", lookup).unwrap(), "plain");
        assert_eq!(resolver.library("${Token}", lookup).unwrap(), token);
        assert_eq!(resolver.library("Token", lookup).unwrap(), token);
    }

    #[test]
    fn test_empty_plan_is_valid() {
        DeployPlan::default().validate().unwrap();
    }
}
