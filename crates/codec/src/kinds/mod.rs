//! Built-in readers and writers, plus the array layout they share.

mod cell;
mod complex;
mod handle;
mod logical;
mod numeric;
mod string;
mod structure;

use octlink_primitives::{DenseArray, ValueKind};

use crate::error::Result;
use crate::reader::Reader;
use crate::registry::RegistryBuilder;
use crate::writer::Writer;

/// Integer classes the engine saves; all of them load as doubles.
const INTEGER_CLASSES: [&str; 8] = ["int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64"];

/// Name the engine gives to the elements of a saved cell array.
pub(crate) const CELL_ELEMENT: &str = "<cell-element>";

pub(crate) fn register_builtins(builder: RegistryBuilder) -> RegistryBuilder {
	let builder = builder
		.reader("scalar", numeric::read_scalar)
		.reader("matrix", numeric::read_matrix)
		.reader("range", numeric::read_range)
		.writer(ValueKind::Double, numeric::write)
		.reader("bool", logical::read_scalar)
		.reader("bool matrix", logical::read_matrix)
		.writer(ValueKind::Bool, logical::write)
		.reader("complex scalar", complex::read_scalar)
		.reader("complex matrix", complex::read_matrix)
		.writer(ValueKind::Complex, complex::write)
		.reader("string", string::read)
		.reader("sq_string", string::read)
		.writer(ValueKind::String, string::write)
		.reader("struct", structure::read_wrapped)
		.reader("scalar struct", structure::read_scalar_struct)
		.writer(ValueKind::Struct, structure::write)
		.reader("cell", cell::read)
		.writer(ValueKind::Cell, cell::write)
		.reader("function handle", handle::read)
		.writer(ValueKind::FunctionHandle, handle::write);

	INTEGER_CLASSES.iter().fold(builder, |builder, class| {
		builder
			.reader(format!("{class} scalar"), numeric::read_integer)
			.reader(format!("{class} matrix"), numeric::read_integer)
	})
}

/// Reads an array body in either layout: `# rows:`/`# columns:` followed by
/// one line per row, or `# ndims:` with a dimension list followed by the
/// elements in column-major order.
pub(crate) fn read_array<T: Clone + Default>(
	reader: &mut Reader<'_>,
	what: &str,
	parse: fn(&str) -> Option<T>,
) -> Result<DenseArray<T>> {
	if reader.peek_header("ndims") {
		let size = read_dims(reader)?;
		let count = element_count(reader, &size)?;
		let data = read_tokens(reader, count, what, parse)?;
		return Ok(DenseArray::from_vec(data, &size)?);
	}

	let rows: usize = reader.parsed_header("rows")?;
	let columns: usize = reader.parsed_header("columns")?;
	element_count(reader, &[rows, columns])?;
	let mut data = vec![T::default(); rows * columns];
	for row in 0..rows {
		let line = reader.require_line("a matrix row")?;
		let tokens: Vec<&str> = line.split_whitespace().collect();
		if tokens.len() != columns {
			return Err(reader.malformed(line, &format!("{columns} values per row")));
		}
		for (column, token) in tokens.into_iter().enumerate() {
			data[column * rows + row] = parse(token).ok_or_else(|| reader.malformed(line, what))?;
		}
	}
	Ok(DenseArray::from_vec(data, &[rows, columns])?)
}

/// Reads `# ndims: N` and the line of `N` dimensions after it.
pub(crate) fn read_dims(reader: &mut Reader<'_>) -> Result<Vec<usize>> {
	let ndims: usize = reader.parsed_header("ndims")?;
	let line = reader.require_line("a dimension list")?;
	let dims: Option<Vec<usize>> = line.split_whitespace().map(|t| t.parse().ok()).collect();
	match dims {
		Some(dims) if dims.len() == ndims && ndims >= 2 => Ok(dims),
		_ => Err(reader.malformed(line, &format!("{ndims} dimensions"))),
	}
}

/// Number of elements in `size`, checked against the input left to read.
///
/// Every element takes at least one byte of text, so a count larger than
/// the remaining input is malformed and nothing is allocated for it.
pub(crate) fn element_count(reader: &Reader<'_>, size: &[usize]) -> Result<usize> {
	match size.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d)) {
		Some(count) if count <= reader.remaining() => Ok(count),
		_ => Err(reader.malformed(&format!("{size:?}"), "dimensions that fit the input")),
	}
}

/// Reads whitespace-separated tokens across lines until `count` are read.
fn read_tokens<T>(reader: &mut Reader<'_>, count: usize, what: &str, parse: fn(&str) -> Option<T>) -> Result<Vec<T>> {
	let mut out = Vec::with_capacity(count);
	while out.len() < count {
		let line = reader.require_line(what)?;
		for token in line.split_whitespace() {
			if out.len() == count {
				return Err(reader.malformed(line, &format!("{count} elements")));
			}
			out.push(parse(token).ok_or_else(|| reader.malformed(line, what))?);
		}
	}
	Ok(out)
}

/// Writes the dimension headers and elements of `array`.
///
/// Rank-2 arrays use the rows/columns layout with each element preceded by
/// a space; higher ranks use the `# ndims:` layout, one element per line.
pub(crate) fn write_array<T>(writer: &mut Writer<'_>, array: &DenseArray<T>, format: impl Fn(&T) -> String) {
	let data = array.as_slice();
	if let [rows, columns] = *array.size() {
		writer.header("rows", rows);
		writer.header("columns", columns);
		for row in 0..rows {
			let line: String = (0..columns).map(|column| format!(" {}", format(&data[column * rows + row]))).collect();
			writer.line(line);
		}
	} else {
		write_dims(writer, array.size());
		for value in data {
			writer.line(format!(" {}", format(value)));
		}
	}
}

/// Writes `# ndims: N` and the dimension list.
pub(crate) fn write_dims(writer: &mut Writer<'_>, size: &[usize]) {
	writer.header("ndims", size.len());
	let dims: String = size.iter().map(|d| format!(" {d}")).collect();
	writer.line(dims);
}
