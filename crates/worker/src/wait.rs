use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Why a [`bounded`] wait gave up before its future finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WaitAborted {
	#[error("timed out after {0:?}")]
	TimedOut(Duration),
	#[error("cancelled")]
	Cancelled,
}

/// Awaits `fut` unless `cancel` fires or `timeout` elapses first.
///
/// Cancellation wins over a future that becomes ready at the same time.
/// With `timeout` set to `None` only cancellation can cut the wait short.
pub async fn bounded<F: Future>(timeout: Option<Duration>, cancel: &CancellationToken, fut: F) -> Result<F::Output, WaitAborted> {
	let deadline = async {
		match timeout {
			Some(limit) => tokio::time::sleep(limit).await,
			None => std::future::pending().await,
		}
	};

	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(WaitAborted::Cancelled),
		out = fut => Ok(out),
		_ = deadline => Err(WaitAborted::TimedOut(timeout.unwrap_or_default())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn finishes_before_deadline() {
		let token = CancellationToken::new();
		let out = bounded(Some(Duration::from_secs(5)), &token, async { 7 }).await;
		assert_eq!(out, Ok(7));
	}

	#[tokio::test]
	async fn times_out() {
		let token = CancellationToken::new();
		let limit = Duration::from_millis(20);
		let out = bounded(Some(limit), &token, std::future::pending::<()>()).await;
		assert_eq!(out, Err(WaitAborted::TimedOut(limit)));
	}

	#[tokio::test]
	async fn cancellation_wins() {
		let token = CancellationToken::new();
		token.cancel();
		let out = bounded(None, &token, async { 1 }).await;
		assert_eq!(out, Err(WaitAborted::Cancelled));
	}
}
