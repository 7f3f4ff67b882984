#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod args;
pub use args::LogArgs;

mod logging;
pub use logging::{ConsoleLogConfig, LogConfig, LogFormat, verbosity_to_level_filter};

mod tracing;
pub use tracing::{LogfmtFormatter, init_test_tracing};

mod runtime;
pub use runtime::{build_runtime, run_until_ctrl_c};
