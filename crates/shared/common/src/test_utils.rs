//! A scripted JSON-RPC node and response fixtures for tests.

use alloy_primitives::{Address, B256};
use alloy_provider::RootProvider;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, Request, Respond, ResponseTemplate,
    matchers::{body_partial_json, method},
};

/// Answers a JSON-RPC request with `result`, echoing the request id.
#[derive(Debug, Clone)]
pub struct RpcResult(pub Value);

impl Respond for RpcResult {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(request),
            "result": self.0,
        }))
    }
}

/// Answers a JSON-RPC request with an error object.
#[derive(Debug, Clone)]
pub struct RpcFailure {
    /// JSON-RPC error code.
    pub code: i64,
    /// Error message.
    pub message: String,
}

impl Respond for RpcFailure {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(request),
            "error": { "code": self.code, "message": self.message },
        }))
    }
}

fn request_id(request: &Request) -> Value {
    serde_json::from_slice::<Value>(&request.body)
        .ok()
        .and_then(|body| body.get("id").cloned())
        .unwrap_or(Value::Null)
}

/// An HTTP server that speaks just enough JSON-RPC to script a node.
#[derive(Debug)]
pub struct MockRpcNode {
    server: MockServer,
}

impl MockRpcNode {
    /// Starts a node on a random local port.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Returns the node's HTTP endpoint.
    pub fn url(&self) -> url::Url {
        self.server.uri().parse().expect("mock server uri is a valid url")
    }

    /// Returns a provider connected to the node.
    pub fn provider(&self) -> RootProvider {
        RootProvider::new_http(self.url())
    }

    /// Answers every call to `rpc_method` with `result`.
    pub async fn respond(&self, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(RpcResult(result))
            .mount(&self.server)
            .await;
    }

    /// Answers the next call to `rpc_method` with `result`, once.
    ///
    /// One-shot answers are consulted before the ones from [`Self::respond`].
    pub async fn respond_once(&self, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(RpcResult(result))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Answers every call to `rpc_method` with a JSON-RPC error.
    pub async fn fail(&self, rpc_method: &str, code: i64, message: &str) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(RpcFailure { code, message: message.to_string() })
            .mount(&self.server)
            .await;
    }

    /// Answers the next call to `rpc_method` with a JSON-RPC error, once.
    pub async fn fail_once(&self, rpc_method: &str, code: i64, message: &str) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(RpcFailure { code, message: message.to_string() })
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Returns the `params` of every received call to `rpc_method`, oldest first.
    pub async fn calls(&self, rpc_method: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
            .filter(|body| body.get("method").and_then(Value::as_str) == Some(rpc_method))
            .map(|body| body.get("params").cloned().unwrap_or(Value::Null))
            .collect()
    }
}

/// Renders an integer as a JSON-RPC quantity.
pub fn quantity(value: u64) -> Value {
    Value::String(format!("{value:#x}"))
}

fn empty_bloom() -> String {
    format!("0x{}", "0".repeat(512))
}

/// A minimal but complete `eth_getBlockByNumber` result.
pub fn block_json(number: u64, timestamp: u64) -> Value {
    json!({
        "hash": B256::with_last_byte(number as u8),
        "parentHash": B256::ZERO,
        "sha3Uncles": B256::ZERO,
        "miner": Address::ZERO,
        "stateRoot": B256::ZERO,
        "transactionsRoot": B256::ZERO,
        "receiptsRoot": B256::ZERO,
        "logsBloom": empty_bloom(),
        "difficulty": "0x0",
        "number": quantity(number),
        "gasLimit": quantity(30_000_000),
        "gasUsed": "0x0",
        "timestamp": quantity(timestamp),
        "extraData": "0x",
        "mixHash": B256::ZERO,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x7",
        "size": "0x220",
        "uncles": [],
        "transactions": [],
    })
}

/// A log emitted by `address` with the given topics.
pub fn log_json(address: Address, topics: &[B256], tx_hash: B256, block_number: u64) -> Value {
    json!({
        "address": address,
        "topics": topics,
        "data": "0x",
        "blockHash": B256::with_last_byte(block_number as u8),
        "blockNumber": quantity(block_number),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "logIndex": "0x0",
        "removed": false,
    })
}

/// An EIP-1559 `eth_getTransactionReceipt` result.
pub fn receipt_json(
    tx_hash: B256,
    block_number: u64,
    success: bool,
    contract_address: Option<Address>,
    logs: Vec<Value>,
) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": logs,
        "logsBloom": empty_bloom(),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::with_last_byte(block_number as u8),
        "blockNumber": quantity(block_number),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": Address::ZERO,
        "to": if contract_address.is_some() { Value::Null } else { json!(Address::ZERO) },
        "contractAddress": contract_address,
    })
}
