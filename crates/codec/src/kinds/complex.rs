use octlink_primitives::{ComplexArray, DenseArray, Value};

use super::{read_array, write_array};
use crate::error::{Error, Result};
use crate::number::{format_complex, parse_complex};
use crate::reader::Reader;
use crate::writer::Writer;

pub(super) fn read_scalar(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let line = reader.require_line("a complex number")?;
	let (re, im) = parse_complex(line.trim()).ok_or_else(|| reader.malformed(line, "a complex number `(re,im)`"))?;
	Ok(Value::Complex(ComplexArray::scalar(re, im)))
}

pub(super) fn read_matrix(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let pairs = read_array(reader, "complex numbers `(re,im)`", parse_complex)?;
	let (re, im): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
	let complex = ComplexArray::from_parts(DenseArray::from_vec(re, pairs.size())?, DenseArray::from_vec(im, pairs.size())?)?;
	Ok(Value::Complex(complex))
}

pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::Complex(complex) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	let (re, im) = (complex.real().as_slice(), complex.imag().as_slice());
	if complex.size() == [1, 1] {
		writer.header("type", "complex scalar");
		writer.line(format_complex(re[0], im[0]));
		return Ok(());
	}

	writer.header("type", "complex matrix");
	let pairs: Vec<(f64, f64)> = re.iter().copied().zip(im.iter().copied()).collect();
	let pairs = DenseArray::from_vec(pairs, complex.size())?;
	write_array(writer, &pairs, |(re, im)| format_complex(*re, *im));
	Ok(())
}
