use octlink_primitives::{DenseArray, Value};

use super::{read_array, write_array};
use crate::error::{Error, Result};
use crate::number::{format_double, parse_double};
use crate::reader::Reader;
use crate::writer::Writer;

pub(super) fn read_scalar(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let line = reader.require_line("a number")?;
	let value = parse_double(line.trim()).ok_or_else(|| reader.malformed(line, "a number"))?;
	Ok(Value::scalar(value))
}

pub(super) fn read_matrix(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	Ok(Value::Double(read_array(reader, "numbers", parse_double)?))
}

/// Integer classes load as doubles; the class itself is not kept.
pub(super) fn read_integer(reader: &mut Reader<'_>, tag: &str) -> Result<Value> {
	if tag.ends_with(" scalar") {
		read_scalar(reader, tag)
	} else {
		read_matrix(reader, tag)
	}
}

/// Ranges are saved as `base limit increment` and materialized as a row
/// vector.
pub(super) fn read_range(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	if reader.peek_line().is_some_and(|line| line.starts_with('#')) {
		reader.next_line();
	}
	let line = reader.require_line("range base, limit and increment")?;
	let parts: Option<Vec<f64>> = line.split_whitespace().take(3).map(parse_double).collect();
	let Some([base, limit, increment]) = parts.as_deref().and_then(|p| <[f64; 3]>::try_from(p).ok()) else {
		return Err(reader.malformed(line, "range base, limit and increment"));
	};
	let Some(count) = range_len(base, limit, increment) else {
		return Err(reader.malformed(line, &format!("a range of at most {MAX_RANGE_LEN} elements")));
	};
	let values = (0..count).map(|i| base + i as f64 * increment).collect();
	Ok(Value::Double(DenseArray::row(values)))
}

/// Largest range materialized on load.
const MAX_RANGE_LEN: usize = 1 << 26;

/// Element count of `base:increment:limit`; `None` when it is not finite or
/// exceeds [`MAX_RANGE_LEN`].
fn range_len(base: f64, limit: f64, increment: f64) -> Option<usize> {
	if increment == 0.0 || (limit - base) / increment < 0.0 {
		return Some(0);
	}
	let steps = ((limit - base) / increment * (1.0 + f64::EPSILON)).floor();
	if !steps.is_finite() || steps >= MAX_RANGE_LEN as f64 {
		return None;
	}
	Some(steps as usize + 1)
}

/// 1×1 arrays are written as `scalar`, everything else as `matrix`.
pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::Double(array) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	if array.size() == [1, 1] {
		writer.header("type", "scalar");
		writer.line(format_double(array.as_slice()[0]));
	} else {
		writer.header("type", "matrix");
		write_array(writer, array, |v| format_double(*v));
	}
	Ok(())
}
