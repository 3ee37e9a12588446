//! Canonical writer for the text format.

use std::fmt::{self, Write as _};

use octlink_primitives::Value;

use crate::error::{Error, Result};
use crate::registry::CodecRegistry;

/// Appends values to a string in the engine's text save layout.
pub struct Writer<'a> {
	out: &'a mut String,
	registry: &'a CodecRegistry,
}

impl<'a> Writer<'a> {
	pub fn new(out: &'a mut String, registry: &'a CodecRegistry) -> Self {
		Self { out, registry }
	}

	/// Writes `# name:`, the typed body, and the blank-line pair the engine
	/// puts after every saved value.
	pub fn write_named(&mut self, name: &str, value: &Value) -> Result<()> {
		self.begin_named(name)?;
		self.write_value(value)?;
		self.end_named();
		Ok(())
	}

	/// Writes the `# name:` header of a value whose body the caller writes.
	pub fn begin_named(&mut self, name: &str) -> Result<()> {
		if name.is_empty() || name.contains(['\n', '\r']) {
			return Err(Error::InvalidName(name.to_owned()));
		}
		self.header("name", name);
		Ok(())
	}

	/// Closes a value opened with [`Self::begin_named`].
	pub fn end_named(&mut self) {
		self.out.push_str("\n\n");
	}

	/// Writes the `# type:` line and body of `value` through its registered
	/// writer.
	pub fn write_value(&mut self, value: &Value) -> Result<()> {
		let kind = value.kind();
		let encoder = self.registry.writer(kind).ok_or(Error::NoWriter(kind))?;
		encoder(self, value)
	}

	/// Writes a `# key: value` header line.
	pub fn header(&mut self, key: &str, value: impl fmt::Display) {
		let _ = writeln!(self.out, "# {key}: {value}");
	}

	/// Writes `text` followed by a newline.
	pub fn line(&mut self, text: impl fmt::Display) {
		let _ = writeln!(self.out, "{text}");
	}

	/// Appends raw text.
	pub fn push_str(&mut self, text: &str) {
		self.out.push_str(text);
	}
}
