//! Pipe tasks running on the worker runtime.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::ChildStdin;
use tokio::sync::mpsc;

/// Raw line read from a pipe, terminator included. The last line before
/// end of stream may lack one.
pub(crate) type Line = Vec<u8>;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Stream {
	Stdout,
	Stderr,
}

impl Stream {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Stdout => "stdout",
			Self::Stderr => "stderr",
		}
	}
}

/// Forwards every line of `pipe` until end of stream or until the receiver
/// is gone. Dropping the sender is how the session learns the pipe closed.
pub(crate) async fn drain<R>(stream: Stream, pid: Option<u32>, pipe: R, tx: mpsc::UnboundedSender<Line>)
where
	R: AsyncRead + Unpin,
{
	let mut reader = BufReader::new(pipe);
	loop {
		let mut line = Vec::new();
		match reader.read_until(b'\n', &mut line).await {
			Ok(0) => break,
			Ok(n) => {
				tracing::trace!(stream = stream.as_str(), pid, bytes = n, "engine.line");
				if tx.send(line).is_err() {
					break;
				}
			}
			Err(e) => {
				tracing::warn!(stream = stream.as_str(), pid, error = %e, "engine pipe read failed");
				break;
			}
		}
	}
	tracing::debug!(stream = stream.as_str(), pid, "engine pipe closed");
}

/// Writes `text` and hands the pipe back so the next command can reuse it.
pub(crate) async fn write_command(mut stdin: ChildStdin, text: String) -> (ChildStdin, std::io::Result<()>) {
	let result = async {
		stdin.write_all(text.as_bytes()).await?;
		stdin.flush().await
	}
	.await;
	(stdin, result)
}
