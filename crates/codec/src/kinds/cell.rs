use octlink_primitives::{Cell, DenseArray, Value};

use super::{CELL_ELEMENT, element_count, read_dims, write_dims};
use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::writer::Writer;

/// Reads the dimensions, then one named `<cell-element>` per slot in
/// column-major order.
pub(super) fn read(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let size = if reader.peek_header("ndims") {
		read_dims(reader)?
	} else {
		vec![reader.parsed_header("rows")?, reader.parsed_header("columns")?]
	};
	let count = element_count(reader, &size)?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(reader.read_named()?.value);
	}
	Ok(Value::Cell(Cell::from_array(DenseArray::from_vec(items, &size)?)))
}

pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::Cell(cell) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	writer.header("type", "cell");
	write_elements(writer, cell.as_array())
}

/// Empty slots hold [`Value::empty`] and are written like any other element,
/// never skipped.
fn write_elements(writer: &mut Writer<'_>, items: &DenseArray<Value>) -> Result<()> {
	let data = items.as_slice();
	if let [rows, columns] = *items.size() {
		writer.header("rows", rows);
		writer.header("columns", columns);
		for column in 0..columns {
			for row in 0..rows {
				writer.write_named(CELL_ELEMENT, &data[column * rows + row])?;
			}
			writer.push_str("\n");
		}
	} else {
		write_dims(writer, items.size());
		for item in data {
			writer.write_named(CELL_ELEMENT, item)?;
		}
	}
	Ok(())
}

/// Writes `value` under `name` wrapped in a 1×1 cell, the layout the engine
/// uses for struct fields.
pub(super) fn write_wrapped(writer: &mut Writer<'_>, name: &str, value: &Value) -> Result<()> {
	writer.begin_named(name)?;
	writer.header("type", "cell");
	writer.header("rows", 1);
	writer.header("columns", 1);
	writer.write_named(CELL_ELEMENT, value)?;
	writer.push_str("\n");
	writer.end_named();
	Ok(())
}
