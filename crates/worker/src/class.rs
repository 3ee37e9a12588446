/// Execution classes used to tag worker tasks in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Writes command text into a child's stdin.
	PipeWrite,
	/// Drains a child's stdout or stderr.
	PipeDrain,
	/// Waits for a child to exit and reaps it.
	Teardown,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::PipeWrite => "pipe_write",
			Self::PipeDrain => "pipe_drain",
			Self::Teardown => "teardown",
		}
	}
}
