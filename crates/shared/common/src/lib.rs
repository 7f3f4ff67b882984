#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::{ChainError, LinkError, UnitsError};

mod units;
pub use units::{
    BITCOIN_DECIMALS, ETHER_DECIMALS, GWEI_DECIMALS, USDC_DECIMALS, bitcoin, ether, format_amount,
    gwei, parse_amount, usdc,
};

mod address;
pub use address::get_random_address;

mod library;
pub use library::{LINK_ID_LEN, convert_library_name_to_link_id, link_bytecode};

mod accounts;
pub use accounts::{TEST_MNEMONIC, derive_signer};

pub mod types;

mod blockchain;
pub use blockchain::{Blockchain, INITIAL_SNAPSHOT_ID};

mod protocol;
pub use protocol::ProtocolUtils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
