//! Text wire format for values exchanged with the engine.
//!
//! The format is the engine's own text save/load layout. Every value starts
//! with a `# name:` and a `# type:` header, followed by a body whose shape
//! depends on the type tag, followed by two newlines:
//!
//! ```text
//! # name: x
//! # type: matrix
//! # rows: 2
//! # columns: 2
//!  1 3
//!  2 4
//!
//!
//! ```
//!
//! Dispatch goes through a [`CodecRegistry`]: readers by type tag, writers by
//! [`ValueKind`](octlink_primitives::ValueKind). [`CodecRegistry::global`]
//! holds the built-in kinds; callers that need extra tags build their own
//! registry with [`CodecRegistry::builder`].

mod error;
mod kinds;
mod number;
pub mod reader;
pub mod registry;
pub mod writer;

#[cfg(test)]
mod tests;

use octlink_primitives::{NamedValue, Value};

pub use error::{Error, RegistryError, Result};
pub use reader::Reader;
pub use registry::{CodecRegistry, Decoder, Encoder, RegistryBuilder};
pub use writer::Writer;

/// Encodes one named value with the global registry.
pub fn encode(name: &str, value: &Value) -> Result<String> {
	CodecRegistry::global().encode(name, value)
}

/// Decodes exactly one named value with the global registry.
pub fn decode_one(text: &str) -> Result<NamedValue> {
	CodecRegistry::global().decode_one(text)
}

/// Decodes every named value in `text` with the global registry.
pub fn decode_all(text: &str) -> Result<Vec<NamedValue>> {
	CodecRegistry::global().decode_all(text)
}
