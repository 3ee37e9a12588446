use std::io;

use octlink_codec::Error as CodecError;

/// Errors raised by a [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The engine process could not be started or did not finish its startup
	/// commands.
	#[error("failed to start `{program}`: {reason}")]
	Spawn { program: String, reason: String },
	/// The engine's execution state is unknown. The session stays unusable
	/// until it is closed or destroyed; `destroyed` is set once it has been.
	#[error("{} session: {reason}", lifecycle(.destroyed))]
	Nonrecoverable { destroyed: bool, reason: String },
	/// One value could not be encoded or decoded. The engine is unaffected.
	#[error("cannot transfer `{name}`: {source}")]
	Recoverable {
		name: String,
		#[source]
		source: CodecError,
	},
	/// Another evaluation is in flight and the session rejects waiters.
	#[error("session is busy")]
	Busy,
	/// Variable names must match `[A-Za-z][A-Za-z0-9_]*`.
	#[error("invalid variable name `{0}`")]
	InvalidName(String),
	#[error("invalid session config: {0}")]
	Config(#[from] toml::de::Error),
	#[error("{0}")]
	Io(#[from] io::Error),
}

impl Error {
	/// Whether the session that raised this error is now unusable.
	pub fn is_nonrecoverable(&self) -> bool {
		matches!(self, Self::Nonrecoverable { .. })
	}

	/// Whether the session that raised this error had already been closed or
	/// destroyed.
	pub fn is_destroyed(&self) -> bool {
		matches!(self, Self::Nonrecoverable { destroyed: true, .. })
	}
}

fn lifecycle(destroyed: &bool) -> &'static str {
	if *destroyed { "destroyed" } else { "broken" }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
