//! Tokio runtime for CLI commands.

use std::future::Future;

use eyre::WrapErr;

/// Builds a multi-threaded Tokio runtime with all drivers enabled.
pub fn build_runtime() -> eyre::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to build tokio runtime")
}

/// Runs `fut` to completion unless Ctrl+C arrives first.
///
/// An interrupted command is a failed command: Ctrl+C yields an error so the
/// process exits non-zero, leaving whatever the future had done in place.
pub async fn run_until_ctrl_c<F, T>(fut: F) -> eyre::Result<T>
where
    F: Future<Output = eyre::Result<T>>,
{
    tokio::select! {
        biased;

        signal = tokio::signal::ctrl_c() => {
            signal.wrap_err("Failed to listen for Ctrl+C")?;
            Err(eyre::eyre!("Interrupted"))
        }
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_future_result_is_returned() {
        let runtime = build_runtime().unwrap();
        let value = runtime.block_on(run_until_ctrl_c(async { Ok(7) })).unwrap();
        assert_eq!(value, 7);

        let err = runtime
            .block_on(run_until_ctrl_c(async { Err::<(), _>(eyre::eyre!("boom")) }))
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
