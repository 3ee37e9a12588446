use octlink_primitives::{Struct, Value};

use super::cell::write_wrapped;
use super::read_dims;
use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// Reads the `struct` layout, where every field value sits inside a 1×1
/// cell. The wrapping is dropped; fields hold plain values in memory.
pub(super) fn read_wrapped(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	read_fields(reader, |name, value, line_no| match value {
		Value::Cell(cell) if cell.size().iter().all(|&d| d == 1) => {
			Ok(cell.into_array().into_vec().pop().unwrap_or_default())
		}
		_ => Err(Error::Malformed {
			line_no,
			line: format!("# name: {name}"),
			expected: "a struct field wrapped in a 1×1 cell".into(),
		}),
	})
}

/// Reads the `scalar struct` layout, whose fields are stored unwrapped.
pub(super) fn read_scalar_struct(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	read_fields(reader, |_, value, _| Ok(value))
}

fn read_fields(reader: &mut Reader<'_>, unwrap: impl Fn(&str, Value, usize) -> Result<Value>) -> Result<Value> {
	if reader.peek_header("ndims") {
		let line_no = reader.line_no();
		let dims = read_dims(reader)?;
		if dims.iter().any(|&d| d != 1) {
			return Err(Error::Malformed {
				line_no,
				line: format!("# ndims: {}", dims.len()),
				expected: "a 1×1 struct".into(),
			});
		}
	}
	let len: usize = reader.parsed_header("length")?;
	let mut fields = Struct::new();
	for _ in 0..len {
		reader.skip_blank_lines();
		let line_no = reader.line_no();
		let field = reader.read_named()?;
		let value = unwrap(&field.name, field.value, line_no)?;
		fields.set(field.name, value);
	}
	Ok(Value::Struct(fields))
}

pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::Struct(fields) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	writer.header("type", "struct");
	writer.header("length", fields.len());
	for (name, value) in fields.iter() {
		write_wrapped(writer, name, value)?;
	}
	Ok(())
}
