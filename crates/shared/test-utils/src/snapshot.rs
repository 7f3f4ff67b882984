//! Snapshot scoping: every test starts from the same chain state.

use std::future::Future;

use alloy_primitives::U256;
use alloy_provider::Provider;
use protokit_common::{Blockchain, ChainError};
use tracing::warn;

/// Runs `body` between a snapshot and a revert to it.
///
/// The chain is reverted whether or not `body` succeeds. When both the body
/// and the revert fail, the body's error is returned and the revert failure
/// is logged.
pub async fn with_snapshot<P, F, Fut, T, E>(provider: &P, body: F) -> Result<T, E>
where
    P: Provider + Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<ChainError>,
{
    let mut chain = Blockchain::new(provider.clone());
    chain.save_snapshot().await?;

    let result = body().await;
    let restored = chain.revert().await;

    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), restored) => {
            if let Err(revert_err) = restored {
                warn!(target: "protokit::test", %revert_err, "failed to revert after test failure");
            }
            Err(err)
        }
    }
}

/// A fixture built once and restored before each later use.
///
/// The first [`CachedFixture::get_or_init`] runs the initializer and
/// snapshots the resulting state. Every later call reverts to that snapshot
/// and takes it again, since a snapshot is consumed by reverting to it.
///
/// A failed revert keeps the snapshot id so the next call retries it. A
/// failed snapshot keeps the built value, and the next call snapshots the
/// chain as it stands instead of running the initializer again.
#[derive(Debug)]
pub struct CachedFixture<P, T> {
    chain: Blockchain<P>,
    snapshot: Option<U256>,
    value: Option<T>,
}

impl<P: Provider, T> CachedFixture<P, T> {
    /// Creates an empty fixture over `provider`.
    pub const fn new(provider: P) -> Self {
        Self { chain: Blockchain::new(provider), snapshot: None, value: None }
    }

    /// Returns true once the initializer has run.
    pub const fn is_initialized(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the fixture with the chain rewound to the state right after it was built.
    pub async fn get_or_init<F, Fut, E>(&mut self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ChainError>,
    {
        let value = match self.value.take() {
            Some(value) => value,
            None => init().await?,
        };
        let value = self.value.insert(value);
        rewind(&mut self.chain, &mut self.snapshot).await?;
        Ok(value)
    }
}

/// Reverts to `snapshot` if one is held, then takes a fresh one.
///
/// `snapshot` is only cleared once the node has accepted the revert.
async fn rewind<P: Provider>(
    chain: &mut Blockchain<P>,
    snapshot: &mut Option<U256>,
) -> Result<(), ChainError> {
    if let Some(id) = *snapshot {
        chain.revert_by_id(id).await?;
        *snapshot = None;
    }
    *snapshot = Some(chain.save_snapshot().await?);
    Ok(())
}
