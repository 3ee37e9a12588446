//! Line reader over the text format.

use std::str::FromStr;

use octlink_primitives::NamedValue;

use crate::error::{Error, Result};
use crate::registry::CodecRegistry;

/// Cursor over text produced by the engine's text save format.
///
/// Decoders pull lines from the reader and must stop at the end of their own
/// body; whatever follows belongs to the next value.
pub struct Reader<'a> {
	text: &'a str,
	pos: usize,
	line_no: usize,
	registry: &'a CodecRegistry,
}

impl<'a> Reader<'a> {
	pub fn new(text: &'a str, registry: &'a CodecRegistry) -> Self {
		Self {
			text,
			pos: 0,
			line_no: 1,
			registry,
		}
	}

	/// 1-based number of the next line to be read.
	pub fn line_no(&self) -> usize {
		self.line_no
	}

	/// Bytes not yet consumed.
	pub fn remaining(&self) -> usize {
		self.text.len() - self.pos
	}

	/// Whether only blank lines (or nothing) remain.
	pub fn at_end(&self) -> bool {
		self.text[self.pos..].trim().is_empty()
	}

	/// Returns the next line without its terminator and advances past it.
	pub fn next_line(&mut self) -> Option<&'a str> {
		let (line, consumed) = self.split_next()?;
		self.pos += consumed;
		self.line_no += 1;
		Some(line)
	}

	/// Returns the next line without consuming it.
	pub fn peek_line(&self) -> Option<&'a str> {
		self.split_next().map(|(line, _)| line)
	}

	fn split_next(&self) -> Option<(&'a str, usize)> {
		let rest = &self.text[self.pos..];
		if rest.is_empty() {
			return None;
		}
		match rest.find('\n') {
			Some(end) => Some((&rest[..end], end + 1)),
			None => Some((rest, rest.len())),
		}
	}

	/// Next line, or [`Error::UnexpectedEof`] naming what was expected.
	pub fn require_line(&mut self, expected: &str) -> Result<&'a str> {
		self.next_line().ok_or_else(|| Error::UnexpectedEof {
			expected: expected.to_owned(),
		})
	}

	/// Skips lines containing only whitespace.
	pub fn skip_blank_lines(&mut self) {
		while self.peek_line().is_some_and(|line| line.trim().is_empty()) {
			self.next_line();
		}
	}

	/// Whether the next line is a `# key:` header.
	pub fn peek_header(&self, key: &str) -> bool {
		self.peek_line().and_then(|line| header_value(line, key)).is_some()
	}

	/// Reads a `# key: value` header line and returns the trimmed value.
	pub fn header(&mut self, key: &str) -> Result<&'a str> {
		let line_no = self.line_no;
		let line = self.require_line(&format!("`# {key}:` header"))?;
		header_value(line, key).ok_or_else(|| Error::Malformed {
			line_no,
			line: line.to_owned(),
			expected: format!("`# {key}:` header"),
		})
	}

	/// Reads a header whose value parses as `T`.
	pub fn parsed_header<T: FromStr>(&mut self, key: &str) -> Result<T> {
		let line_no = self.line_no;
		let value = self.header(key)?;
		value.parse().map_err(|_| Error::Malformed {
			line_no,
			line: format!("# {key}: {value}"),
			expected: format!("a number in `# {key}:`"),
		})
	}

	/// Reads exactly `len` bytes, which may span lines, then the newline
	/// that terminates them.
	pub fn read_raw(&mut self, len: usize) -> Result<&'a str> {
		let start = self.pos;
		let end = match start.checked_add(len) {
			Some(end) if end <= self.text.len() => end,
			_ => {
				return Err(Error::UnexpectedEof {
					expected: format!("{len} bytes of text"),
				});
			}
		};
		if !self.text.is_char_boundary(end) {
			return Err(self.malformed(&self.text[start..], "text ending on a character boundary"));
		}
		let raw = &self.text[start..end];
		self.pos = end;
		self.line_no += raw.matches('\n').count();
		match self.text[end..].chars().next() {
			None => Ok(raw),
			Some('\n') => {
				self.pos += 1;
				self.line_no += 1;
				Ok(raw)
			}
			Some(_) => {
				let rest = self.peek_line().unwrap_or_default();
				Err(self.malformed(rest, "end of line after text"))
			}
		}
	}

	/// Reads one `# name:` / `# type:` pair and the body that follows,
	/// dispatching on the type tag.
	pub fn read_named(&mut self) -> Result<NamedValue> {
		self.skip_blank_lines();
		let name = self.header("name")?.to_owned();
		let line_no = self.line_no;
		let tag = self.header("type")?;
		let decoder = self.registry.reader(tag).ok_or_else(|| Error::UnknownType {
			tag: tag.to_owned(),
			line_no,
		})?;
		tracing::trace!(name = %name, tag, "codec.read");
		let value = decoder(self, tag)?;
		Ok(NamedValue { name, value })
	}

	/// Builds a [`Error::Malformed`] for a line just read.
	pub fn malformed(&self, line: &str, expected: &str) -> Error {
		Error::Malformed {
			line_no: self.line_no.saturating_sub(1).max(1),
			line: line.to_owned(),
			expected: expected.to_owned(),
		}
	}

	/// Registry used to decode nested values.
	pub fn registry(&self) -> &'a CodecRegistry {
		self.registry
	}
}

/// Value of a `# key: value` line, or `None` for any other line.
pub(crate) fn header_value<'l>(line: &'l str, key: &str) -> Option<&'l str> {
	let rest = line.strip_prefix("# ")?.strip_prefix(key)?.strip_prefix(':')?;
	Some(rest.trim())
}
