//! Rebuilds a command's output from the lines read off a pipe.

use std::io::{self, Write};

use crate::sentinel::Sentinel;

/// Forwards lines to a sink until the sentinel line arrives.
///
/// The newline printed ahead of the sentinel is not part of the command's
/// output, so the most recent line is held back until the next one shows
/// whether it was the last. What reaches the sink is byte-for-byte what the
/// command printed.
#[derive(Debug, Default)]
pub(crate) struct LineRelay {
	pending: Option<Vec<u8>>,
	done: bool,
}

impl LineRelay {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn is_done(&self) -> bool {
		self.done
	}

	/// Accepts one raw line including its terminator. Returns `true` once the
	/// sentinel has been seen.
	pub(crate) fn push(&mut self, line: Vec<u8>, sentinel: &Sentinel, sink: &mut dyn Write) -> io::Result<bool> {
		if self.done {
			return Ok(true);
		}
		if sentinel.matches(&line) {
			self.done = true;
			if let Some(last) = self.pending.take() {
				sink.write_all(last.strip_suffix(b"\n").unwrap_or(&last))?;
			}
			sink.flush()?;
			return Ok(true);
		}
		if let Some(previous) = self.pending.replace(line) {
			sink.write_all(&previous)?;
		}
		Ok(false)
	}

	/// Releases a held-back line when no sentinel will follow.
	pub(crate) fn flush_pending(&mut self, sink: &mut dyn Write) -> io::Result<()> {
		if let Some(last) = self.pending.take() {
			sink.write_all(&last)?;
		}
		sink.flush()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn relay(lines: &[&str], sentinel: &Sentinel) -> (String, bool) {
		let mut relay = LineRelay::new();
		let mut out = Vec::new();
		let mut done = false;
		for line in lines {
			done = relay.push(line.as_bytes().to_vec(), sentinel, &mut out).unwrap();
		}
		(String::from_utf8(out).unwrap(), done)
	}

	#[test]
	fn output_ending_in_newline_is_kept() {
		let s = Sentinel::new(1);
		let marker = format!("{}\n", s.as_str());
		assert_eq!(relay(&["a\n", "b\n", "\n", &marker], &s), ("a\nb\n".into(), true));
	}

	#[test]
	fn output_without_final_newline_is_kept() {
		let s = Sentinel::new(1);
		let marker = format!("{}\n", s.as_str());
		assert_eq!(relay(&["a\n", "b\n", &marker], &s), ("a\nb".into(), true));
	}

	#[test]
	fn silent_command_prints_nothing() {
		let s = Sentinel::new(1);
		let marker = format!("{}\n", s.as_str());
		assert_eq!(relay(&["\n", &marker], &s), (String::new(), true));
	}

	#[test]
	fn blank_lines_inside_output_survive() {
		let s = Sentinel::new(1);
		let marker = format!("{}\n", s.as_str());
		assert_eq!(relay(&["\n", "\n", "x\n", "\n", &marker], &s), ("\n\nx\n".into(), true));
	}

	#[test]
	fn lines_are_held_back_until_the_next_arrives() {
		let s = Sentinel::new(1);
		let (out, done) = relay(&["a\n", "b\n"], &s);
		assert_eq!(out, "a\n");
		assert!(!done);
	}

	#[test]
	fn other_sentinels_are_plain_output() {
		let s = Sentinel::new(1);
		let other = format!("{}\n", Sentinel::new(1).as_str());
		let marker = format!("{}\n", s.as_str());
		let (out, _) = relay(&[&other, "\n", &marker], &s);
		assert_eq!(out, other);
	}

	#[test]
	fn pending_line_is_released_on_eof() {
		let s = Sentinel::new(1);
		let mut relay = LineRelay::new();
		let mut out = Vec::new();
		relay.push(b"partial".to_vec(), &s, &mut out).unwrap();
		relay.flush_pending(&mut out).unwrap();
		assert_eq!(out, b"partial");
	}
}
