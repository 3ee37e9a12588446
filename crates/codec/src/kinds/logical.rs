use octlink_primitives::{DenseArray, Value};

use super::{read_array, write_array};
use crate::error::{Error, Result};
use crate::number::parse_bool;
use crate::reader::Reader;
use crate::writer::Writer;

pub(super) fn read_scalar(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let line = reader.require_line("0 or 1")?;
	let value = parse_bool(line.trim()).ok_or_else(|| reader.malformed(line, "0 or 1"))?;
	Ok(Value::Bool(DenseArray::scalar(value)))
}

pub(super) fn read_matrix(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	Ok(Value::Bool(read_array(reader, "0 or 1", parse_bool)?))
}

pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::Bool(array) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	if array.size() == [1, 1] {
		writer.header("type", "bool");
		writer.line(u8::from(array.as_slice()[0]));
	} else {
		writer.header("type", "bool matrix");
		write_array(writer, array, |v| u8::from(*v).to_string());
	}
	Ok(())
}
