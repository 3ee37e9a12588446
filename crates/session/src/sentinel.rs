//! Completion markers appended to every command.

use uuid::Uuid;

/// Marker line the engine prints once everything before it has run.
///
/// The sequence number keeps markers of one session distinct even if two
/// random parts ever matched; the random part keeps them distinct from
/// anything the user's code prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sentinel(String);

impl Sentinel {
	pub(crate) fn new(seq: u64) -> Self {
		Self(format!("octlink-{seq}-{}", Uuid::new_v4().simple()))
	}

	pub(crate) fn as_str(&self) -> &str {
		&self.0
	}

	/// Command printing the marker on its own line to stdout and then stderr.
	///
	/// Each marker is preceded by a newline so it always starts a line, even
	/// after output that did not end with one.
	pub(crate) fn command(&self) -> String {
		let marker = &self.0;
		format!(
			"printf(\"\\n%s\\n\", \"{marker}\"); fflush(stdout); fprintf(stderr, \"\\n%s\\n\", \"{marker}\"); fflush(stderr);"
		)
	}

	/// Whether `line` (with or without its line terminator) is the marker.
	pub(crate) fn matches(&self, line: &[u8]) -> bool {
		let line = line.strip_suffix(b"\n").unwrap_or(line);
		let line = line.strip_suffix(b"\r").unwrap_or(line);
		line == self.0.as_bytes()
	}
}
