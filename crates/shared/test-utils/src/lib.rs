#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::TestEnvError;

mod accounts;
pub use accounts::{Account, get_accounts, get_eth_balance, get_random_account};

mod testing;
pub use testing::{
    get_last_block_timestamp, get_transaction_timestamp, increase_time, mine_block, wait_blocks,
};

mod snapshot;
pub use snapshot::{CachedFixture, with_snapshot};

mod env;
pub use env::TestEnv;

pub use protokit_cli_utils::init_test_tracing;
pub use protokit_common::{
    Blockchain, ChainError, ProtocolUtils, bitcoin, ether, get_random_address, gwei,
    test_utils::{MockRpcNode, block_json, log_json, quantity, receipt_json},
    usdc,
};
