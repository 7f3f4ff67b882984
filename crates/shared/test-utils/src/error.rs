//! Test environment errors.

use alloy_signer_local::LocalSignerError;
use thiserror::Error;

/// Errors raised while setting up a [`TestEnv`](crate::TestEnv).
#[derive(Debug, Error)]
pub enum TestEnvError {
    /// The mnemonic did not yield a signer.
    #[error("failed to derive test account: {0}")]
    Signer(#[from] LocalSignerError),
    /// The requested account index is past the derived accounts.
    #[error("account {index} requested but only {count} accounts are derived")]
    NoSuchAccount {
        /// Requested index.
        index: usize,
        /// Number of derived accounts.
        count: usize,
    },
}
