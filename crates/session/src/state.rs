use std::fmt;

/// Lifecycle of a [`Session`](crate::Session).
///
/// ```text
/// Created ──► Running ◄──► Busy
///                │          │
///                ▼          ▼
///             Closing    Broken
///                │          │
///                └─► Closed ◄┘
/// ```
///
/// `destroy` moves any state straight to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
	/// The child is spawned and its startup commands are running.
	Created,
	/// Idle and ready for the next command.
	Running,
	/// One command is in flight.
	Busy,
	/// `close` is waiting for the child to exit.
	Closing,
	/// Terminal. The child has been reaped.
	Closed,
	/// The child's state is unknown; only `close` and `destroy` do anything.
	Broken,
}

impl SessionState {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Created => "created",
			Self::Running => "running",
			Self::Busy => "busy",
			Self::Closing => "closing",
			Self::Closed => "closed",
			Self::Broken => "broken",
		}
	}
}

impl fmt::Display for SessionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
