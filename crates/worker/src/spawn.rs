use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Number of threads in the shared worker runtime.
pub const WORKER_THREADS: usize = 2;

fn runtime() -> &'static tokio::runtime::Runtime {
	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(WORKER_THREADS)
			.thread_name("octlink-worker")
			.build()
			.expect("failed to build octlink-worker global tokio runtime")
	})
}

/// Handle of the ambient runtime when called from async code, otherwise of
/// the shared worker runtime.
pub fn handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}
	runtime().handle().clone()
}

/// Spawns an async task with worker classification metadata.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	handle().spawn(fut)
}

/// Runs `fut` to completion on the shared worker runtime, blocking the
/// calling thread.
///
/// # Panics
///
/// Panics when called from inside an async context, like
/// [`tokio::runtime::Runtime::block_on`].
pub fn block_on<F: Future>(fut: F) -> F::Output {
	runtime().block_on(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn block_on_runs_spawned_tasks() {
		let out = block_on(async {
			let task = spawn(TaskClass::PipeDrain, async { 40 + 2 });
			task.await.unwrap()
		});
		assert_eq!(out, 42);
	}

	#[test]
	fn worker_threads_are_named() {
		let name = block_on(async {
			spawn(TaskClass::Teardown, async { std::thread::current().name().map(str::to_owned) })
				.await
				.unwrap()
		});
		assert_eq!(name.as_deref(), Some("octlink-worker"));
	}
}
