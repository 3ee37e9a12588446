//! Async front-end of an engine session.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use octlink_codec::{CodecRegistry, Error as CodecError};
use octlink_primitives::{NamedValue, Value};
use octlink_worker::{CancellationToken, SequenceClock, WaitAborted, bounded};
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

use crate::config::{BusyPolicy, SessionConfig};
use crate::engine::{Engine, Failure};
use crate::sentinel::Sentinel;
use crate::state::SessionState;
use crate::{Error, Result};

#[derive(Debug)]
struct Status {
	state: SessionState,
	/// Why the session broke; kept to re-raise on every later call.
	fault: Option<String>,
}

/// One engine process driven over its standard streams.
///
/// Commands run one at a time. Callers that share a session through an
/// [`Arc`] either queue behind the running command or get
/// [`Error::Busy`], depending on the configured [`BusyPolicy`].
///
/// Any failure that leaves the engine's state unknown breaks the session:
/// from then on every call fails with [`Error::Nonrecoverable`] until
/// [`Self::close`] or [`Self::destroy`] tears the process down.
pub struct Session {
	engine: AsyncMutex<Engine>,
	status: Mutex<Status>,
	/// Cancelled by [`Self::destroy`] to abort a command that holds the engine.
	kill_switch: CancellationToken,
	clock: SequenceClock,
	program: String,
	pid: Option<u32>,
	busy: BusyPolicy,
	eval_timeout: Option<Duration>,
	close_timeout: Duration,
	error_prefix: String,
	registry: Option<Arc<CodecRegistry>>,
}

impl Session {
	/// Spawns the engine and runs the startup commands.
	///
	/// Must be called from within a tokio runtime.
	pub async fn open(mut config: SessionConfig) -> Result<Self> {
		let stdout = config.stdout.take().unwrap_or_else(|| Box::new(io::sink()));
		let stderr = config.stderr.take().unwrap_or_else(|| Box::new(io::sink()));
		let engine = Engine::spawn(&config, stdout, stderr)?;

		let session = Self {
			pid: engine.pid(),
			engine: AsyncMutex::new(engine),
			status: Mutex::new(Status {
				state: SessionState::Created,
				fault: None,
			}),
			kill_switch: CancellationToken::new(),
			clock: SequenceClock::new(),
			program: config.program.display().to_string(),
			busy: config.busy,
			eval_timeout: config.eval_timeout,
			close_timeout: config.close_timeout,
			error_prefix: config.error_prefix,
			registry: config.registry,
		};

		if !config.startup_commands.is_empty() {
			let startup = config.startup_commands.join("\n");
			let mut engine = session.engine.lock().await;
			let started = session.run(&mut engine, &startup, None, &CancellationToken::new()).await;
			if let Err(e) = started {
				engine.terminate().await;
				return Err(Error::Spawn {
					program: session.program.clone(),
					reason: format!("startup commands failed: {e}"),
				});
			}
		}

		session.set_state(SessionState::Running, None);
		tracing::info!(program = %session.program, pid = session.pid, "session.open");
		Ok(session)
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SessionState {
		self.status.lock().state
	}

	/// Process id of the engine, while it runs.
	pub fn pid(&self) -> Option<u32> {
		self.pid
	}

	/// Runs `code` and waits until the engine has finished it.
	///
	/// What the code prints on stdout and stderr is forwarded to the
	/// configured sinks as it arrives.
	pub async fn eval(&self, code: &str) -> Result<()> {
		self.eval_with_cancel(code, &CancellationToken::new()).await
	}

	/// Like [`Self::eval`], but gives up when `cancel` fires.
	///
	/// Giving up leaves the engine mid-command, so the session breaks.
	pub async fn eval_with_cancel(&self, code: &str, cancel: &CancellationToken) -> Result<()> {
		self.ensure_usable()?;
		let mut engine = self.acquire().await?;
		self.run(&mut engine, code, None, cancel).await
	}

	/// Defines variable `name` in the engine's workspace.
	pub async fn put(&self, name: &str, value: &Value) -> Result<()> {
		self.put_values([(name, value)]).await
	}

	/// Defines every value in `values` with one command.
	pub async fn put_all(&self, values: &[NamedValue]) -> Result<()> {
		self.put_values(values.iter().map(|nv| (nv.name.as_str(), &nv.value))).await
	}

	async fn put_values<'v>(&self, values: impl IntoIterator<Item = (&'v str, &'v Value)>) -> Result<()> {
		self.ensure_usable()?;
		let registry = self.registry();
		let mut command = String::from("load(\"-text\", \"-\")\n");
		let mut count = 0usize;
		for (name, value) in values {
			check_name(name)?;
			let encoded = registry.encode(name, value).map_err(|source| Error::Recoverable {
				name: name.to_owned(),
				source,
			})?;
			command.push_str(&encoded);
			count += 1;
		}
		if count == 0 {
			return Ok(());
		}
		// An empty name ends the load.
		command.push_str("# name: ");

		let mut engine = self.acquire().await?;
		self.run(&mut engine, &command, None, &CancellationToken::new()).await?;
		tracing::debug!(count, "session.put");
		Ok(())
	}

	/// Reads variable `name` from the engine's workspace; `None` when it is
	/// not defined.
	///
	/// A value that cannot be decoded is [`Error::Recoverable`]; the session
	/// stays usable. That includes strings holding bytes that are not UTF-8,
	/// which are rejected rather than replaced.
	pub async fn get(&self, name: &str) -> Result<Option<Value>> {
		self.ensure_usable()?;
		check_name(name)?;
		let command = format!("if exist(\"{name}\", \"var\") == 1, save(\"-text\", \"-\", \"{name}\"); end");

		let mut captured = Vec::new();
		{
			let mut engine = self.acquire().await?;
			self.run(&mut engine, &command, Some(&mut captured), &CancellationToken::new())
				.await?;
		}

		let values = decode_utf8(captured)
			.and_then(|text| self.registry().decode_all(&text))
			.map_err(|source| {
				tracing::debug!(name, error = %source, "session.get decode failed");
				Error::Recoverable {
					name: name.to_owned(),
					source,
				}
			})?;
		let value = values.into_iter().find(|nv| nv.name == name).map(|nv| nv.value);
		tracing::debug!(name, found = value.is_some(), "session.get");
		Ok(value)
	}

	/// Asks the engine to exit, killing it if it does not within the close
	/// timeout.
	///
	/// On a broken session the process is killed and the error that broke it
	/// is returned. On a closed session this fails with `destroyed` set.
	pub async fn close(&self) -> Result<()> {
		let mut engine = self.engine.lock().await;
		let (state, fault) = {
			let status = self.status.lock();
			(status.state, status.fault.clone())
		};
		match state {
			SessionState::Closing | SessionState::Closed => Err(closed()),
			SessionState::Broken => {
				engine.terminate().await;
				self.set_state(SessionState::Closed, fault.clone());
				tracing::info!(pid = self.pid, "session.close broken");
				Err(Error::Nonrecoverable {
					destroyed: false,
					reason: fault.unwrap_or_default(),
				})
			}
			SessionState::Created | SessionState::Running | SessionState::Busy => {
				self.set_state(SessionState::Closing, None);
				engine.shutdown(self.close_timeout).await;
				self.set_state(SessionState::Closed, None);
				tracing::info!(pid = self.pid, "session.close");
				Ok(())
			}
		}
	}

	/// Kills the engine unconditionally, aborting a command in flight.
	pub async fn destroy(&self) {
		self.kill_switch.cancel();
		let mut engine = self.engine.lock().await;
		engine.terminate().await;
		self.set_state(SessionState::Closed, None);
		tracing::info!(pid = self.pid, "session.destroy");
	}

	fn registry(&self) -> &CodecRegistry {
		match &self.registry {
			Some(registry) => registry,
			None => CodecRegistry::global(),
		}
	}

	fn set_state(&self, state: SessionState, fault: Option<String>) {
		let mut status = self.status.lock();
		status.state = state;
		status.fault = fault;
	}

	fn ensure_usable(&self) -> Result<()> {
		let status = self.status.lock();
		match status.state {
			SessionState::Created | SessionState::Running | SessionState::Busy => Ok(()),
			SessionState::Broken => Err(Error::Nonrecoverable {
				destroyed: false,
				reason: status.fault.clone().unwrap_or_default(),
			}),
			SessionState::Closing | SessionState::Closed => Err(closed()),
		}
	}

	async fn acquire(&self) -> Result<MutexGuard<'_, Engine>> {
		let engine = match self.busy {
			BusyPolicy::Queue => self.engine.lock().await,
			BusyPolicy::Reject => self.engine.try_lock().map_err(|_| Error::Busy)?,
		};
		self.ensure_usable()?;
		Ok(engine)
	}

	async fn run(
		&self,
		engine: &mut Engine,
		code: &str,
		capture: Option<&mut Vec<u8>>,
		cancel: &CancellationToken,
	) -> Result<()> {
		let sentinel = Sentinel::new(self.clock.next());
		let busy = BusyGuard::enter(&self.status);

		let exchange = async {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => Err(Failure::Cancelled),
				done = engine.exchange(code, &sentinel, capture, &self.error_prefix) => done,
			}
		};
		let outcome = bounded(self.eval_timeout, &self.kill_switch, exchange).await;

		let failure = match outcome {
			Ok(Ok(())) => {
				busy.release();
				return Ok(());
			}
			Ok(Err(failure)) => failure,
			Err(WaitAborted::TimedOut(limit)) => Failure::TimedOut(limit),
			Err(WaitAborted::Cancelled) => Failure::Destroyed,
		};

		engine.start_kill();
		let destroyed = matches!(failure, Failure::Destroyed);
		let reason = failure.to_string();
		tracing::warn!(program = %self.program, pid = self.pid, reason = %reason, "session broken");
		busy.fail(reason.clone());
		Err(Error::Nonrecoverable { destroyed, reason })
	}
}

/// Marks the session busy for the length of one command.
///
/// Dropping it without [`Self::release`] or [`Self::fail`] means the command
/// future was dropped mid-flight, which breaks the session.
struct BusyGuard<'a> {
	status: &'a Mutex<Status>,
	armed: bool,
}

impl<'a> BusyGuard<'a> {
	fn enter(status: &'a Mutex<Status>) -> Self {
		status.lock().state = SessionState::Busy;
		Self { status, armed: true }
	}

	fn release(mut self) {
		self.armed = false;
		self.status.lock().state = SessionState::Running;
	}

	fn fail(mut self, reason: String) {
		self.armed = false;
		let mut status = self.status.lock();
		status.state = SessionState::Broken;
		status.fault = Some(reason);
	}
}

impl Drop for BusyGuard<'_> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		tracing::warn!("command abandoned mid-flight; session broken");
		let mut status = self.status.lock();
		status.state = SessionState::Broken;
		status.fault = Some("command was abandoned before it finished".into());
	}
}

fn closed() -> Error {
	Error::Nonrecoverable {
		destroyed: true,
		reason: "session is closed".into(),
	}
}

/// Saved output as text; invalid UTF-8 is an error, never replaced, since
/// string lengths in the output count bytes.
fn decode_utf8(bytes: Vec<u8>) -> std::result::Result<String, CodecError> {
	String::from_utf8(bytes).map_err(|err| CodecError::InvalidUtf8 {
		offset: err.utf8_error().valid_up_to(),
	})
}

/// Accepts `[A-Za-z][A-Za-z0-9_]*`.
pub(crate) fn check_name(name: &str) -> Result<()> {
	let mut chars = name.chars();
	let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
	if valid {
		Ok(())
	} else {
		Err(Error::InvalidName(name.to_owned()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn variable_names() {
		for name in ["x", "X1", "a_b_", "longer_name_42"] {
			assert!(check_name(name).is_ok(), "{name}");
		}
		for name in ["", "1x", "_x", "a b", "a-b", "x;", "é", "a\"b"] {
			assert!(matches!(check_name(name), Err(Error::InvalidName(_))), "{name}");
		}
	}

	#[test]
	fn saved_output_must_be_utf8() {
		assert_eq!(decode_utf8(b"# name: s\n".to_vec()).unwrap(), "# name: s\n");
		let err = decode_utf8(b"ab\xffcd".to_vec()).unwrap_err();
		assert_eq!(err, CodecError::InvalidUtf8 { offset: 2 });
	}

	#[test]
	fn abandoned_guard_breaks_session() {
		let status = Mutex::new(Status {
			state: SessionState::Running,
			fault: None,
		});
		drop(BusyGuard::enter(&status));
		assert_eq!(status.lock().state, SessionState::Broken);
		assert!(status.lock().fault.is_some());
	}

	#[test]
	fn released_guard_returns_to_running() {
		let status = Mutex::new(Status {
			state: SessionState::Running,
			fault: None,
		});
		let guard = BusyGuard::enter(&status);
		assert_eq!(status.lock().state, SessionState::Busy);
		guard.release();
		assert_eq!(status.lock().state, SessionState::Running);
	}
}
