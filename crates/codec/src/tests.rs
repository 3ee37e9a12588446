use octlink_primitives::{Cell, ComplexArray, DenseArray, FunctionHandle, NamedValue, Struct, Value};
use pretty_assertions::assert_eq;

use crate::{CodecRegistry, Error, Reader, RegistryError, Result, decode_all, decode_one, encode};

/// Decodes `text`, checks the value, and checks it encodes back to `text`.
fn assert_canonical(text: &str, expected: &NamedValue) {
	let decoded = decode_one(text).unwrap();
	assert_eq!(&decoded, expected);
	assert_eq!(encode(&decoded.name, &decoded.value).unwrap(), text);
}

#[test]
fn scalar_header_decodes() {
	let nv = decode_one("# name: x\n# type: scalar\n42\n").unwrap();
	assert_eq!(nv, NamedValue::new("x", 42.0));
}

#[test]
fn leftover_line_is_reported() {
	let err = decode_one("# name: x\n# type: scalar\n42\nleftover\n").unwrap_err();
	assert_eq!(
		err,
		Error::Trailing {
			line_no: 4,
			line: "leftover".into()
		}
	);
}

#[test]
fn scalar_is_canonical() {
	assert_canonical("# name: x\n# type: scalar\n42\n\n\n", &NamedValue::new("x", 42.0));
}

#[test]
fn matrix_rows_are_written_in_row_order() {
	let m = DenseArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
	assert_canonical(
		"# name: m\n# type: matrix\n# rows: 2\n# columns: 3\n 1 3 5\n 2 4 6\n\n\n",
		&NamedValue::new("m", m),
	);
}

#[test]
fn three_dimensional_matrix() {
	let data: Vec<f64> = (1..=8).map(f64::from).collect();
	let m = DenseArray::from_vec(data, &[2, 2, 2]).unwrap();
	assert_canonical(
		"# name: m\n# type: matrix\n# ndims: 3\n 2 2 2\n 1\n 2\n 3\n 4\n 5\n 6\n 7\n 8\n\n\n",
		&NamedValue::new("m", m),
	);
}

#[test]
fn four_dimensional_matrix_round_trips() {
	let m = DenseArray::from_vec(vec![0.5, -1.0, f64::INFINITY, 1e-9], &[1, 2, 1, 2]).unwrap();
	let text = encode("m", &Value::Double(m.clone())).unwrap();
	assert!(text.starts_with("# name: m\n# type: matrix\n# ndims: 4\n 1 2 1 2\n"));
	assert_eq!(decode_one(&text).unwrap().value, Value::Double(m));
}

#[test]
fn empty_matrix() {
	assert_canonical("# name: e\n# type: matrix\n# rows: 0\n# columns: 0\n\n\n", &NamedValue::new("e", Value::empty()));
}

#[test]
fn string_with_control_characters() {
	let text = "a\"b\\c\nd\te";
	assert_canonical(
		"# name: s\n# type: string\n# elements: 1\n# length: 9\na\"b\\c\nd\te\n\n\n",
		&NamedValue::new("s", text),
	);
}

#[test]
fn single_quoted_and_empty_strings_read() {
	let nv = decode_one("# name: q\n# type: sq_string\n# elements: 1\n# length: 3\nabc\n\n\n").unwrap();
	assert_eq!(nv.value, Value::from("abc"));
	let nv = decode_one("# name: q\n# type: string\n# elements: 0\n\n\n").unwrap();
	assert_eq!(nv.value, Value::from(""));
}

#[test]
fn string_shorter_than_length_fails() {
	let err = decode_one("# name: s\n# type: string\n# elements: 1\n# length: 10\nabc\n").unwrap_err();
	assert!(matches!(err, Error::UnexpectedEof { .. }));
}

#[test]
fn struct_fields_are_wrapped_in_cells() {
	let mut s = Struct::new();
	s.set("a", 1.0);
	s.set("b", "hi");
	let text = concat!(
		"# name: st\n",
		"# type: struct\n",
		"# length: 2\n",
		"# name: a\n",
		"# type: cell\n",
		"# rows: 1\n",
		"# columns: 1\n",
		"# name: <cell-element>\n",
		"# type: scalar\n",
		"1\n",
		"\n\n\n\n\n",
		"# name: b\n",
		"# type: cell\n",
		"# rows: 1\n",
		"# columns: 1\n",
		"# name: <cell-element>\n",
		"# type: string\n",
		"# elements: 1\n",
		"# length: 2\n",
		"hi\n",
		"\n\n\n\n\n",
		"\n\n",
	);
	assert_canonical(text, &NamedValue::new("st", s));
}

#[test]
fn nested_struct_round_trips() {
	let mut inner = Struct::new();
	inner.set("z", ComplexArray::scalar(1.0, -2.0));
	let mut outer = Struct::new();
	outer.set("inner", inner);
	outer.set("list", Cell::row(vec![Value::from(true), Value::from("x")]));
	outer.set("m", DenseArray::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap());

	let value = Value::Struct(outer);
	let text = encode("s", &value).unwrap();
	let decoded = decode_one(&text).unwrap();
	assert_eq!(decoded.value, value);
	assert_eq!(encode("s", &decoded.value).unwrap(), text);
}

#[test]
fn newer_scalar_struct_layout_reads_unwrapped_fields() {
	let text = "# name: s\n# type: scalar struct\n# ndims: 2\n 1 1\n# length: 1\n# name: a\n# type: scalar\n1\n\n\n\n\n";
	let nv = decode_one(text).unwrap();
	let s = nv.value.as_struct().unwrap();
	assert_eq!(s.get("a"), Some(&Value::scalar(1.0)));
}

#[test]
fn unwrapped_field_in_old_struct_layout_fails() {
	let text = "# name: s\n# type: struct\n# length: 1\n# name: a\n# type: scalar\n1\n";
	assert!(matches!(decode_one(text), Err(Error::Malformed { .. })));
}

#[test]
fn cell_with_unset_slot() {
	let mut cell = Cell::new(&[1, 2]).unwrap();
	cell.set(5.0, &[1, 2]).unwrap();
	let text = concat!(
		"# name: c\n",
		"# type: cell\n",
		"# rows: 1\n",
		"# columns: 2\n",
		"# name: <cell-element>\n",
		"# type: matrix\n",
		"# rows: 0\n",
		"# columns: 0\n",
		"\n\n\n",
		"# name: <cell-element>\n",
		"# type: scalar\n",
		"5\n",
		"\n\n\n",
		"\n\n",
	);
	assert_canonical(text, &NamedValue::new("c", cell.clone()));

	let decoded = decode_one(text).unwrap();
	assert!(decoded.value.as_cell().unwrap().get(&[1, 1]).unwrap().is_empty_value());
}

#[test]
fn three_dimensional_cell_round_trips() {
	let mut cell = Cell::new(&[1, 1, 2]).unwrap();
	cell.set("a", &[1, 1, 2]).unwrap();
	let value = Value::Cell(cell);
	let text = encode("c", &value).unwrap();
	assert!(text.contains("# ndims: 3\n 1 1 2\n"));
	assert_eq!(decode_one(&text).unwrap().value, value);
}

#[test]
fn bool_and_complex_matrices() {
	let b = DenseArray::from_vec(vec![true, false, false, true], &[2, 2]).unwrap();
	assert_canonical(
		"# name: b\n# type: bool matrix\n# rows: 2\n# columns: 2\n 1 0\n 0 1\n\n\n",
		&NamedValue::new("b", b),
	);
	assert_canonical("# name: t\n# type: bool\n1\n\n\n", &NamedValue::new("t", true));

	let z = ComplexArray::from_parts(DenseArray::row(vec![1.0, 3.0]), DenseArray::row(vec![2.0, -4.0])).unwrap();
	assert_canonical(
		"# name: z\n# type: complex matrix\n# rows: 1\n# columns: 2\n (1,2) (3,-4)\n\n\n",
		&NamedValue::new("z", z),
	);
	assert_canonical(
		"# name: z\n# type: complex scalar\n(0.5,-1)\n\n\n",
		&NamedValue::new("z", ComplexArray::scalar(0.5, -1.0)),
	);
}

#[test]
fn function_handles() {
	let anonymous = FunctionHandle::Anonymous {
		source: "@(x) x + a".into(),
		captured: vec![NamedValue::new("a", 2.0)],
	};
	assert_canonical(
		"# name: f\n# type: function handle\n@<anonymous>\n@(x) x + a\n# length: 1\n# name: a\n# type: scalar\n2\n\n\n\n\n",
		&NamedValue::new("f", anonymous),
	);

	let text = "# name: g\n# type: function handle\n# octaveroot: /usr\n# subtype: simple\nsin\n\n\n";
	assert_eq!(decode_one(text).unwrap().value, Value::from(FunctionHandle::named("sin")));
}

#[test]
fn integer_classes_and_ranges_load_as_doubles() {
	let nv = decode_one("# name: i\n# type: int32 matrix\n# ndims: 2\n 1 3\n 1\n 2\n 3\n\n\n").unwrap();
	assert_eq!(nv.value, Value::Double(DenseArray::row(vec![1.0, 2.0, 3.0])));

	let nv = decode_one("# name: i\n# type: uint8 scalar\n7\n\n\n").unwrap();
	assert_eq!(nv.value, Value::scalar(7.0));

	let nv = decode_one("# name: r\n# type: range\n# base, limit, increment\n1 3 1\n\n\n").unwrap();
	assert_eq!(nv.value, Value::Double(DenseArray::row(vec![1.0, 2.0, 3.0])));
}

#[test]
fn unknown_type_is_reported_with_tag() {
	let err = decode_one("# name: z\n# type: sparse matrix\n# nnz: 0\n").unwrap_err();
	assert_eq!(
		err,
		Error::UnknownType {
			tag: "sparse matrix".into(),
			line_no: 2
		}
	);
}

#[test]
fn short_matrix_row_is_malformed() {
	let err = decode_one("# name: m\n# type: matrix\n# rows: 1\n# columns: 2\n 1\n").unwrap_err();
	assert!(matches!(err, Error::Malformed { line_no: 5, .. }));
}

#[test]
fn oversized_string_length_is_eof() {
	let err = decode_one("# name: s\n# type: string\n# elements: 1\n# length: 18446744073709551615\nabc\n").unwrap_err();
	assert!(matches!(err, Error::UnexpectedEof { .. }));
}

#[test]
fn dimensions_larger_than_input_are_malformed() {
	let cases = [
		"# name: m\n# type: matrix\n# rows: 4294967296\n# columns: 4294967297\n 1\n",
		"# name: m\n# type: matrix\n# rows: 1000000\n# columns: 1000000\n 1\n",
		"# name: m\n# type: matrix\n# ndims: 3\n 4294967296 4294967296 2\n 1\n",
		"# name: b\n# type: bool matrix\n# ndims: 2\n 65536 65536\n 1\n",
		"# name: c\n# type: cell\n# rows: 100000\n# columns: 100000\n",
		"# name: s\n# type: struct\n# ndims: 2\n 4294967296 4294967296\n# length: 0\n",
	];
	for text in cases {
		let err = decode_one(text).unwrap_err();
		assert!(matches!(err, Error::Malformed { .. }), "{text:?} gave {err:?}");
	}
}

#[test]
fn empty_matrix_with_huge_dimension_reads() {
	let nv = decode_one("# name: e\n# type: matrix\n# ndims: 2\n 0 4294967296\n\n\n").unwrap();
	let Value::Double(array) = nv.value else {
		panic!("expected a double array");
	};
	assert_eq!(array.size(), &[0, 4294967296]);
}

#[test]
fn unbounded_range_is_malformed() {
	for limits in ["1 1e300 1", "0 Inf 1", "0 NaN 1"] {
		let text = format!("# name: r\n# type: range\n# base, limit, increment\n{limits}\n\n\n");
		let err = decode_one(&text).unwrap_err();
		assert!(matches!(err, Error::Malformed { .. }), "{limits} gave {err:?}");
	}
}

#[test]
fn decode_all_skips_created_by_preamble() {
	let text = concat!(
		"# Created by Octave 9.2.0, Mon Oct 19 10:00:00 2026 UTC <user@host>\n",
		"# name: x\n# type: scalar\n1\n\n\n",
		"# name: y\n# type: string\n# elements: 1\n# length: 2\nhi\n\n\n",
	);
	let values = decode_all(text).unwrap();
	assert_eq!(values, vec![NamedValue::new("x", 1.0), NamedValue::new("y", "hi")]);
	assert!(decode_all("").unwrap().is_empty());
}

#[test]
fn invalid_names_are_rejected() {
	assert_eq!(encode("", &Value::scalar(1.0)), Err(Error::InvalidName(String::new())));
	assert!(matches!(encode("a\nb", &Value::scalar(1.0)), Err(Error::InvalidName(_))));
}

fn read_answer(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	reader.require_line("anything")?;
	Ok(Value::scalar(42.0))
}

#[test]
fn duplicate_registration_fails_at_build() {
	let err = CodecRegistry::builder().with_builtins().reader("scalar", read_answer).build().unwrap_err();
	assert_eq!(err, RegistryError::DuplicateReader("scalar".into()));
}

#[test]
fn custom_registry_extends_builtins() {
	let registry = CodecRegistry::builder().with_builtins().reader("answer", read_answer).build().unwrap();
	let nv = registry.decode_one("# name: a\n# type: answer\nwhatever\n").unwrap();
	assert_eq!(nv.value, Value::scalar(42.0));
	assert!(registry.tags().contains(&"answer"));
	assert!(CodecRegistry::global().reader("answer").is_none());
}

#[test]
fn empty_registry_has_no_writers() {
	let registry = CodecRegistry::builder().build().unwrap();
	assert_eq!(
		registry.encode("x", &Value::scalar(1.0)),
		Err(Error::NoWriter(octlink_primitives::ValueKind::Double))
	);
}
