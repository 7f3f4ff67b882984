//! Runs deployment plans against a scripted node.

use std::{fs, path::Path, time::Duration};

use alloy_primitives::{Address, B256, address, hex};
use alloy_provider::RootProvider;
use protokit_common::{
    convert_library_name_to_link_id,
    test_utils::{MockRpcNode, receipt_json},
};
use protokit_deploys::{
    ContractDeployer, ContractFamily, DeployError, DeployHelper, DeployPlan, DeployStep,
    DeployerSigner,
};
use serde_json::{Value, json};
use tempfile::TempDir;

const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const MATH: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
const VAULT: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
const WETH: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");

struct Workspace {
    _dir: TempDir,
    core: std::path::PathBuf,
    external: std::path::PathBuf,
}

fn write(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, value.to_string()).unwrap();
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let core = dir.path().join("artifacts");
    let external = dir.path().join("external");
    let placeholder = convert_library_name_to_link_id("contracts/lib/Math.sol:Math").unwrap();

    write(
        &core.join("contracts/lib/Math.sol/Math.json"),
        &json!({
            "contractName": "Math",
            "sourceName": "contracts/lib/Math.sol",
            "abi": [],
            "bytecode": "0x6001",
        }),
    );
    write(
        &core.join("contracts/Vault.sol/Vault.json"),
        &json!({
            "contractName": "Vault",
            "sourceName": "contracts/Vault.sol",
            "abi": [{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [{ "name": "owner", "type": "address", "internalType": "address" }]
            }],
            "bytecode": format!("0x60{placeholder}00"),
            "linkReferences": {
                "contracts/lib/Math.sol": { "Math": [{ "start": 1, "length": 20 }] }
            }
        }),
    );
    write(
        &external.join("WETH9.json"),
        &json!({
            "contractName": "WETH9",
            "sourceName": "WETH9.sol",
            "abi": [],
            "bytecode": "0x6002",
        }),
    );

    Workspace { _dir: dir, core, external }
}

fn helper(node: &MockRpcNode, workspace: &Workspace) -> DeployHelper<RootProvider> {
    let deployer = ContractDeployer::new(DeployerSigner::new(node.provider(), DEPLOYER))
        .with_receipt_timeout(Duration::from_millis(500))
        .with_poll_interval(Duration::from_millis(10));
    DeployHelper::from_deployer(deployer, &workspace.core, &workspace.external)
}

async fn expect_deployment(node: &MockRpcNode, nonce: u8, created: Address, success: bool) {
    let tx_hash = B256::with_last_byte(nonce);
    node.respond_once("eth_sendTransaction", json!(tx_hash)).await;
    let receipt = receipt_json(tx_hash, u64::from(nonce), success, Some(created), vec![]);
    node.respond_once("eth_getTransactionReceipt", receipt).await;
}

fn full_plan() -> DeployPlan {
    DeployPlan {
        steps: vec![
            DeployStep {
                family: ContractFamily::Core,
                contract: "Math".to_string(),
                label: None,
                args: vec![],
                libraries: Default::default(),
            },
            DeployStep {
                family: ContractFamily::Core,
                contract: "Vault".to_string(),
                label: Some("MainVault".to_string()),
                args: vec!["${deployer}".to_string()],
                libraries: [("Math".to_string(), "Math".to_string())].into(),
            },
            DeployStep {
                family: ContractFamily::External,
                contract: "WETH9".to_string(),
                label: None,
                args: vec![],
                libraries: Default::default(),
            },
        ],
    }
}

#[tokio::test]
async fn test_plan_deploys_in_order_and_records() {
    let workspace = workspace();
    let node = MockRpcNode::start().await;
    node.respond("eth_chainId", json!("0x7a69")).await;
    expect_deployment(&node, 1, MATH, true).await;
    expect_deployment(&node, 2, VAULT, true).await;
    expect_deployment(&node, 3, WETH, true).await;

    let record = full_plan().execute(&helper(&node, &workspace)).await.unwrap();

    assert_eq!(record.chain_id, 31337);
    assert_eq!(record.deployer, DEPLOYER);
    let labels: Vec<_> = record.contracts.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["Math", "MainVault", "WETH9"]);
    assert_eq!(record.address("MainVault"), Some(VAULT));
    assert_eq!(record.get("MainVault").unwrap().contract, "Vault");
    assert_eq!(record.address("WETH9"), Some(WETH));

    let sent = node.calls("eth_sendTransaction").await;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0][0]["input"], json!("0x6001"));
    let vault_input = sent[1][0]["input"].as_str().unwrap().to_string();
    assert!(vault_input.starts_with(&format!("0x60{}00", hex::encode(MATH))));
    assert!(vault_input.ends_with(&hex::encode(DEPLOYER)));
    assert!(!vault_input.contains("__$"));
    assert_eq!(sent[2][0]["input"], json!("0x6002"));
}

#[tokio::test]
async fn test_unknown_reference_sends_nothing() {
    let workspace = workspace();
    let node = MockRpcNode::start().await;
    node.respond("eth_chainId", json!("0x7a69")).await;

    let mut plan = full_plan();
    plan.steps[1].args = vec!["${WETH9}".to_string()];

    let err = plan.execute(&helper(&node, &workspace)).await.unwrap_err();
    assert!(matches!(
        err,
        DeployError::UnknownReference { step: 2, reference, .. } if reference == "WETH9"
    ));
    assert!(node.calls("eth_chainId").await.is_empty());
    assert!(node.calls("eth_sendTransaction").await.is_empty());
}

#[tokio::test]
async fn test_reverted_step_stops_the_plan() {
    let workspace = workspace();
    let node = MockRpcNode::start().await;
    node.respond("eth_chainId", json!("0x7a69")).await;
    expect_deployment(&node, 1, MATH, true).await;
    expect_deployment(&node, 2, VAULT, false).await;

    let err = full_plan().execute(&helper(&node, &workspace)).await.unwrap_err();
    assert!(matches!(err, DeployError::Reverted { contract, .. } if contract == "Vault"));
    assert_eq!(node.calls("eth_sendTransaction").await.len(), 2);
}

#[tokio::test]
async fn test_missing_artifact_fails_the_step() {
    let workspace = workspace();
    let node = MockRpcNode::start().await;
    node.respond("eth_chainId", json!("0x7a69")).await;

    let mut plan = full_plan();
    plan.steps.truncate(1);
    plan.steps[0].contract = "Oracle".to_string();

    let err = plan.execute(&helper(&node, &workspace)).await.unwrap_err();
    assert!(matches!(err, DeployError::ArtifactNotFound { name, .. } if name == "Oracle"));
    assert!(node.calls("eth_sendTransaction").await.is_empty());
}

#[tokio::test]
async fn test_helper_families_deploy_directly() {
    let workspace = workspace();
    let node = MockRpcNode::start().await;
    expect_deployment(&node, 1, MATH, true).await;
    expect_deployment(&node, 2, WETH, true).await;
    expect_deployment(&node, 3, VAULT, true).await;

    let helper = helper(&node, &workspace);
    let math = helper.core.deploy_library("Math").await.unwrap();
    assert_eq!(math.address, MATH);
    assert!(math.abi.is_some());

    let weth = helper.external.deploy("WETH9", &[]).await.unwrap();
    assert_eq!(weth.address, WETH);

    let raw = helper.external.deploy_bytecode("Raw", vec![0x60, 0x03].into()).await.unwrap();
    assert_eq!(raw.address, VAULT);
    assert!(raw.abi.is_none());

    let err = helper.core.deploy("Vault", &[DEPLOYER.to_string()]).await.unwrap_err();
    assert!(matches!(err, DeployError::MissingLibrary { .. }));
}
