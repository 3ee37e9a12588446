//! Type-tag and value-kind dispatch tables.
//!
//! Readers are keyed by the `# type:` tag found on the wire; writers by the
//! [`ValueKind`] of the value being saved. A registry is built once, checked
//! for duplicates, and read concurrently afterwards without locking.

use std::sync::OnceLock;

use octlink_primitives::{NamedValue, Value, ValueKind};
use rustc_hash::FxHashMap;

use crate::error::{Error, RegistryError, Result};
use crate::reader::{Reader, header_value};
use crate::writer::Writer;

/// Decodes the body that follows a `# type:` line. The tag is passed so one
/// function can serve a family of tags.
pub type Decoder = fn(&mut Reader<'_>, &str) -> Result<Value>;

/// Encodes the `# type:` line and body of a value.
pub type Encoder = fn(&mut Writer<'_>, &Value) -> Result<()>;

/// Immutable dispatch tables for decoding and encoding values.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
	readers: FxHashMap<String, Decoder>,
	writers: FxHashMap<ValueKind, Encoder>,
}

impl CodecRegistry {
	/// Starts an empty registry.
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::default()
	}

	/// Shared registry holding the built-in kinds, built on first use.
	pub fn global() -> &'static CodecRegistry {
		static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();
		GLOBAL.get_or_init(|| {
			Self::builder()
				.with_builtins()
				.build()
				.expect("built-in codec tables must not overlap")
		})
	}

	pub fn reader(&self, tag: &str) -> Option<Decoder> {
		self.readers.get(tag).copied()
	}

	pub fn writer(&self, kind: ValueKind) -> Option<Encoder> {
		self.writers.get(&kind).copied()
	}

	/// Registered type tags, sorted.
	pub fn tags(&self) -> Vec<&str> {
		let mut tags: Vec<_> = self.readers.keys().map(String::as_str).collect();
		tags.sort_unstable();
		tags
	}

	/// Encodes one named value.
	pub fn encode(&self, name: &str, value: &Value) -> Result<String> {
		let mut out = String::new();
		Writer::new(&mut out, self).write_named(name, value)?;
		Ok(out)
	}

	/// Encodes several named values back to back.
	pub fn encode_all<'v>(&self, values: impl IntoIterator<Item = &'v NamedValue>) -> Result<String> {
		let mut out = String::new();
		let mut writer = Writer::new(&mut out, self);
		for nv in values {
			writer.write_named(&nv.name, &nv.value)?;
		}
		Ok(out)
	}

	/// Decodes exactly one value. Any non-blank line left after it is
	/// [`Error::Trailing`].
	pub fn decode_one(&self, text: &str) -> Result<NamedValue> {
		let mut reader = Reader::new(text, self);
		skip_preamble(&mut reader);
		let value = reader.read_named()?;
		reader.skip_blank_lines();
		let line_no = reader.line_no();
		if let Some(line) = reader.next_line() {
			return Err(Error::Trailing {
				line_no,
				line: line.to_owned(),
			});
		}
		Ok(value)
	}

	/// Decodes every value in `text`, in order.
	pub fn decode_all(&self, text: &str) -> Result<Vec<NamedValue>> {
		let mut reader = Reader::new(text, self);
		skip_preamble(&mut reader);
		let mut values = Vec::new();
		while !reader.at_end() {
			values.push(reader.read_named()?);
		}
		Ok(values)
	}
}

/// Skips the comment lines the engine writes before the first value, such
/// as `# Created by ...`.
fn skip_preamble(reader: &mut Reader<'_>) {
	while let Some(line) = reader.peek_line() {
		let comment = line.starts_with('#') && header_value(line, "name").is_none();
		if !comment && !line.trim().is_empty() {
			break;
		}
		reader.next_line();
	}
}

/// Collects readers and writers, rejecting duplicates at [`Self::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	readers: FxHashMap<String, Decoder>,
	writers: FxHashMap<ValueKind, Encoder>,
	duplicate: Option<RegistryError>,
}

impl RegistryBuilder {
	/// Registers a reader for a `# type:` tag.
	pub fn reader(mut self, tag: impl Into<String>, decoder: Decoder) -> Self {
		let tag = tag.into();
		if self.readers.contains_key(&tag) {
			self.duplicate.get_or_insert(RegistryError::DuplicateReader(tag));
		} else {
			self.readers.insert(tag, decoder);
		}
		self
	}

	/// Registers the writer for a value kind.
	pub fn writer(mut self, kind: ValueKind, encoder: Encoder) -> Self {
		if self.writers.contains_key(&kind) {
			self.duplicate.get_or_insert(RegistryError::DuplicateWriter(kind));
		} else {
			self.writers.insert(kind, encoder);
		}
		self
	}

	/// Registers every built-in reader and writer.
	pub fn with_builtins(self) -> Self {
		crate::kinds::register_builtins(self)
	}

	/// Finishes the registry, failing on the first duplicate registration.
	pub fn build(self) -> Result<CodecRegistry, RegistryError> {
		if let Some(err) = self.duplicate {
			return Err(err);
		}
		tracing::debug!(readers = self.readers.len(), writers = self.writers.len(), "codec.registry.build");
		Ok(CodecRegistry {
			readers: self.readers,
			writers: self.writers,
		})
	}
}
