//! The engine child process and the exchange of one command with it.

use std::io::{self, Write};
use std::process::Stdio;
use std::time::Duration;

use octlink_worker::{TaskClass, spawn};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::config::{SessionConfig, Sink};
use crate::io::{self as pipe, Line, Stream};
use crate::output::LineRelay;
use crate::sentinel::Sentinel;
use crate::{Error, Result};

/// Why a command did not complete. Every variant leaves the engine in an
/// unknown state.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Failure {
	#[error("engine reported `{0}`")]
	Reported(String),
	#[error("engine exited before finishing the command")]
	Exited,
	#[error("writing to the engine failed: {0}")]
	Write(io::Error),
	#[error("command timed out after {0:?}")]
	TimedOut(Duration),
	#[error("command was cancelled")]
	Cancelled,
	#[error("session was destroyed during the command")]
	Destroyed,
}

type WriteTask = JoinHandle<(ChildStdin, io::Result<()>)>;

/// Running engine process with its pipes.
///
/// Stdout and stderr are drained by worker tasks for the whole life of the
/// process, so the child never blocks on a full pipe, even between commands.
pub(crate) struct Engine {
	child: Child,
	pid: Option<u32>,
	/// Taken by the writer task while a command is being sent.
	stdin: Option<ChildStdin>,
	stdout_rx: mpsc::UnboundedReceiver<Line>,
	stderr_rx: mpsc::UnboundedReceiver<Line>,
	stdout_sink: Sink,
	stderr_sink: Sink,
}

impl Engine {
	pub(crate) fn spawn(config: &SessionConfig, stdout_sink: Sink, stderr_sink: Sink) -> Result<Self> {
		let program = config.program.display().to_string();
		let mut cmd = Command::new(&config.program);
		cmd.args(&config.args)
			.envs(&config.env)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);
		if let Some(dir) = &config.cwd {
			cmd.current_dir(dir);
		}

		let mut child = cmd.spawn().map_err(|e| Error::Spawn {
			program: program.clone(),
			reason: e.to_string(),
		})?;
		let pid = child.id();

		let capture_failed = |pipe: &str| Error::Spawn {
			program: program.clone(),
			reason: format!("failed to capture {pipe}"),
		};
		let stdin = child.stdin.take().ok_or_else(|| capture_failed("stdin"))?;
		let stdout = child.stdout.take().ok_or_else(|| capture_failed("stdout"))?;
		let stderr = child.stderr.take().ok_or_else(|| capture_failed("stderr"))?;

		let (stdout_tx, stdout_rx) = mpsc::unbounded_channel();
		let (stderr_tx, stderr_rx) = mpsc::unbounded_channel();
		spawn(TaskClass::PipeDrain, pipe::drain(Stream::Stdout, pid, stdout, stdout_tx));
		spawn(TaskClass::PipeDrain, pipe::drain(Stream::Stderr, pid, stderr, stderr_tx));

		tracing::info!(program = %program, pid, args = ?config.args, "engine started");

		Ok(Self {
			child,
			pid,
			stdin: Some(stdin),
			stdout_rx,
			stderr_rx,
			stdout_sink,
			stderr_sink,
		})
	}

	pub(crate) fn pid(&self) -> Option<u32> {
		self.pid
	}

	/// Sends `code` followed by the sentinel command and waits until both
	/// markers came back and the write finished.
	///
	/// Output the engine printed after the previous marker goes to the sinks
	/// first, never to `capture`. Stdout of this command goes to `capture`
	/// when given, otherwise to the stdout sink.
	/// Returns early when stderr shows a line starting with `error_prefix`,
	/// when the write fails, or when the engine closes its pipes.
	pub(crate) async fn exchange(
		&mut self,
		code: &str,
		sentinel: &Sentinel,
		capture: Option<&mut Vec<u8>>,
		error_prefix: &str,
	) -> Result<(), Failure> {
		let stdin = self.stdin.take().ok_or(Failure::Exited)?;
		self.forward_stale(Stream::Stdout);
		self.forward_stale(Stream::Stderr);
		let text = format!("{code}\n{}\n", sentinel.command());
		tracing::debug!(pid = self.pid, bytes = text.len(), sentinel = sentinel.as_str(), "engine.command");
		let mut write = Some(spawn(TaskClass::PipeWrite, pipe::write_command(stdin, text)));

		let Self {
			stdin: stdin_slot,
			stdout_rx,
			stderr_rx,
			stdout_sink,
			stderr_sink,
			..
		} = self;
		let out: &mut (dyn Write + Send) = match capture {
			Some(buf) => buf,
			None => stdout_sink.as_mut(),
		};
		let err: &mut (dyn Write + Send) = stderr_sink.as_mut();

		let mut out_relay = LineRelay::new();
		let mut err_relay = LineRelay::new();
		let mut out_open = true;
		let mut err_open = true;

		loop {
			if out_relay.is_done() && err_relay.is_done() && write.is_none() {
				return Ok(());
			}

			tokio::select! {
				biased;
				line = stderr_rx.recv(), if err_open && !err_relay.is_done() => match line {
					Some(line) if line.starts_with(error_prefix.as_bytes()) => {
						if let Err(e) = err_relay.flush_pending(err).and_then(|()| err.write_all(&line)) {
							sink_failed(Stream::Stderr, &e);
						}
						let report = String::from_utf8_lossy(&line).trim_end().to_owned();
						return Err(Failure::Reported(report));
					}
					Some(line) => {
						if let Err(e) = err_relay.push(line, sentinel, err) {
							sink_failed(Stream::Stderr, &e);
						}
					}
					None => {
						err_open = false;
						if let Err(e) = err_relay.flush_pending(err) {
							sink_failed(Stream::Stderr, &e);
						}
					}
				},
				line = stdout_rx.recv(), if out_open && !out_relay.is_done() => match line {
					Some(line) => {
						if let Err(e) = out_relay.push(line, sentinel, out) {
							sink_failed(Stream::Stdout, &e);
						}
					}
					None => {
						out_open = false;
						if let Err(e) = out_relay.flush_pending(out) {
							sink_failed(Stream::Stdout, &e);
						}
					}
				},
				joined = wait_writer(&mut write), if write.is_some() => {
					write = None;
					match joined {
						Ok((stdin, Ok(()))) => *stdin_slot = Some(stdin),
						Ok((_, Err(e))) => return Err(Failure::Write(e)),
						Err(e) => return Err(Failure::Write(io::Error::other(e))),
					}
				}
				else => return Err(Failure::Exited),
			}
		}
	}

	/// Sends the kill signal without waiting for the process to go away.
	pub(crate) fn start_kill(&mut self) {
		if let Err(e) = self.child.start_kill() {
			tracing::debug!(pid = self.pid, error = %e, "engine kill failed");
		}
	}

	/// Kills the process and reaps it. Output still queued is dropped.
	pub(crate) async fn terminate(&mut self) {
		self.stdin = None;
		match self.child.kill().await {
			Ok(()) => tracing::info!(pid = self.pid, "engine killed"),
			Err(e) => tracing::debug!(pid = self.pid, error = %e, "engine kill failed"),
		}
	}

	/// Asks the engine to exit and waits up to `grace` before killing it.
	/// Output printed while exiting is forwarded to the sinks.
	pub(crate) async fn shutdown(&mut self, grace: Duration) {
		let pid = self.pid;
		let exit = async {
			if let Some(mut stdin) = self.stdin.take() {
				if let Err(e) = stdin.write_all(b"exit\n").await {
					tracing::debug!(pid, error = %e, "engine exit command not delivered");
				}
				drop(stdin);
			}
			self.child.wait().await
		};
		let exited = tokio::time::timeout(grace, exit).await;
		match exited {
			Ok(Ok(status)) => tracing::info!(pid, %status, "engine exited"),
			Ok(Err(e)) => tracing::warn!(pid, error = %e, "engine wait failed"),
			Err(_) => {
				tracing::warn!(pid, ?grace, "engine did not exit in time");
				self.terminate().await;
				return;
			}
		}
		self.forward_remaining(grace).await;
	}

	/// Hands lines already queued on `stream` to its sink without waiting.
	fn forward_stale(&mut self, stream: Stream) {
		let (rx, sink) = match stream {
			Stream::Stdout => (&mut self.stdout_rx, &mut self.stdout_sink),
			Stream::Stderr => (&mut self.stderr_rx, &mut self.stderr_sink),
		};
		while let Ok(line) = rx.try_recv() {
			tracing::debug!(stream = stream.as_str(), pid = self.pid, bytes = line.len(), "engine.stale_output");
			if let Err(e) = sink.write_all(&line) {
				sink_failed(stream, &e);
			}
		}
	}

	async fn forward_remaining(&mut self, limit: Duration) {
		let pid = self.pid;
		let Self {
			stdout_rx,
			stderr_rx,
			stdout_sink,
			stderr_sink,
			..
		} = self;
		let drained = tokio::time::timeout(limit, async {
			tokio::join!(forward(stdout_rx, stdout_sink), forward(stderr_rx, stderr_sink));
		})
		.await;
		if drained.is_err() {
			tracing::debug!(pid, "engine pipes still open after exit");
		}
	}
}

async fn wait_writer(write: &mut Option<WriteTask>) -> Result<(ChildStdin, io::Result<()>), JoinError> {
	match write {
		Some(handle) => handle.await,
		None => std::future::pending().await,
	}
}

async fn forward(rx: &mut mpsc::UnboundedReceiver<Line>, sink: &mut Sink) {
	while let Some(line) = rx.recv().await {
		if sink.write_all(&line).is_err() {
			break;
		}
	}
	let _ = sink.flush();
}

fn sink_failed(stream: Stream, error: &io::Error) {
	tracing::warn!(stream = stream.as_str(), error = %error, "output sink write failed");
}
