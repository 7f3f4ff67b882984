#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::ConfigError;

mod format;
pub use format::load_file;

mod coverage;
pub use coverage::{CoverageConfig, ProviderOptions};

mod network;
pub use network::{DEFAULT_RPC_URL, NetworkConfig};
