use octlink_primitives::Value;

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// Reads a character row. The length header counts bytes, so the text may
/// contain newlines and is read verbatim.
pub(super) fn read(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let line_no = reader.line_no();
	let elements: usize = reader.parsed_header("elements")?;
	match elements {
		0 => Ok(Value::String(String::new())),
		1 => {
			let len: usize = reader.parsed_header("length")?;
			Ok(Value::String(reader.read_raw(len)?.to_owned()))
		}
		n => Err(Error::Malformed {
			line_no,
			line: format!("# elements: {n}"),
			expected: "a single-row string".into(),
		}),
	}
}

pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::String(text) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	writer.header("type", "string");
	writer.header("elements", 1);
	writer.header("length", text.len());
	writer.line(text);
	Ok(())
}
