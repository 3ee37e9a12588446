use octlink_primitives::{NamedValue, Value};
use octlink_worker::{CancellationToken, block_on};

use crate::{Result, Session, SessionConfig, SessionState};

/// [`Session`] for callers outside an async context.
///
/// Each call blocks the current thread on the shared worker runtime, which
/// also hosts the session's pipe tasks. Do not call it from inside a tokio
/// runtime.
pub struct BlockingSession {
	inner: Session,
}

impl BlockingSession {
	pub fn open(config: SessionConfig) -> Result<Self> {
		let inner = block_on(Session::open(config))?;
		Ok(Self { inner })
	}

	pub fn state(&self) -> SessionState {
		self.inner.state()
	}

	pub fn eval(&self, code: &str) -> Result<()> {
		block_on(self.inner.eval(code))
	}

	/// `cancel` may be fired from another thread.
	pub fn eval_with_cancel(&self, code: &str, cancel: &CancellationToken) -> Result<()> {
		block_on(self.inner.eval_with_cancel(code, cancel))
	}

	pub fn put(&self, name: &str, value: &Value) -> Result<()> {
		block_on(self.inner.put(name, value))
	}

	pub fn put_all(&self, values: &[NamedValue]) -> Result<()> {
		block_on(self.inner.put_all(values))
	}

	pub fn get(&self, name: &str) -> Result<Option<Value>> {
		block_on(self.inner.get(name))
	}

	pub fn close(&self) -> Result<()> {
		block_on(self.inner.close())
	}

	pub fn destroy(&self) {
		block_on(self.inner.destroy());
	}

	/// The async session underneath.
	pub fn as_async(&self) -> &Session {
		&self.inner
	}
}
