use octlink_primitives::ValueKind;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures while reading or writing the text format.
///
/// Every variant is local to one value: the engine never sees a value the
/// host failed to decode, so none of these affect a running session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// No reader is registered for the `# type:` tag.
	#[error("line {line_no}: no reader for type `{tag}`")]
	UnknownType { tag: String, line_no: usize },
	/// A line does not have the expected shape.
	#[error("line {line_no}: expected {expected}, found `{line}`")]
	Malformed {
		line_no: usize,
		line: String,
		expected: String,
	},
	/// The input ended inside a value.
	#[error("unexpected end of input, expected {expected}")]
	UnexpectedEof { expected: String },
	/// The engine's output is not UTF-8 from byte `offset` on.
	#[error("output is not UTF-8 at byte {offset}")]
	InvalidUtf8 { offset: usize },
	/// Input continues after the value that was asked for.
	#[error("line {line_no}: unexpected trailing line `{line}`")]
	Trailing { line_no: usize, line: String },
	/// No writer is registered for the value's kind.
	#[error("no writer for {0} values")]
	NoWriter(ValueKind),
	/// A name that cannot appear in a `# name:` header.
	#[error("invalid variable name `{0}`")]
	InvalidName(String),
	/// Decoded dimensions do not describe a valid array.
	#[error(transparent)]
	Shape(#[from] octlink_primitives::Error),
}

/// Configuration errors detected while building a [`crate::CodecRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// Two readers claim the same type tag.
	#[error("duplicate reader for type tag `{0}`")]
	DuplicateReader(String),
	/// Two writers claim the same value kind.
	#[error("duplicate writer for {0} values")]
	DuplicateWriter(ValueKind),
}
