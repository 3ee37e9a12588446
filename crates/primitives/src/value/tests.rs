use super::*;
use crate::Error;

#[test]
fn unset_and_explicit_empty_cells_read_alike() {
	let mut cell = Cell::new(&[1, 1]).unwrap();
	cell.set(Value::scalar(1.0), &[1, 3]).unwrap();
	cell.set(Value::empty(), &[1, 1]).unwrap();

	assert_eq!(cell.size(), &[1, 3]);
	assert_eq!(cell.get(&[1, 1]).unwrap(), cell.get(&[1, 2]).unwrap());
	assert!(cell.get(&[1, 2]).unwrap().is_empty_value());
	assert_eq!(cell.get(&[1, 3]).unwrap().as_scalar(), Some(1.0));
}

#[test]
fn struct_missing_field_is_absent() {
	let mut s = Struct::new();
	s.set("b", 2.0);
	s.set("a", "text");
	assert!(s.get("missing").is_none());
	assert_eq!(s.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["b", "a"]);
	assert_eq!(s.set("b", 3.0), Some(Value::scalar(2.0)));
	assert_eq!(s.len(), 2);
}

#[test]
fn complex_parts_grow_together() {
	let mut z = ComplexArray::scalar(1.0, 2.0);
	z.set_real(5.0, &[1, 3]).unwrap();
	assert_eq!(z.size(), &[1, 3]);
	assert_eq!(z.imag().size(), &[1, 3]);
	assert_eq!(z.get(&[1, 3]).unwrap(), (5.0, 0.0));
	assert_eq!(z.get(&[1, 1]).unwrap(), (1.0, 2.0));

	z.set_imag(-1.0, &[2, 1]).unwrap();
	assert_eq!(z.real().size(), &[2, 3]);
}

#[test]
fn complex_parts_must_agree() {
	let err = ComplexArray::from_parts(DenseArray::scalar(1.0), DenseArray::row(vec![1.0, 2.0])).unwrap_err();
	assert!(matches!(err, Error::PartMismatch { .. }));
}

#[test]
fn clone_does_not_share_buffers() {
	let original = Value::Double(DenseArray::row(vec![1.0, 2.0]));
	let mut copy = original.clone();
	if let Value::Double(a) = &mut copy {
		a.set(9.0, &[1, 1]).unwrap();
	}
	assert_eq!(original.as_double().unwrap().as_slice(), &[1.0, 2.0]);
}

#[test]
fn kinds_and_conversions() {
	assert_eq!(Value::from(true).kind(), ValueKind::Bool);
	assert_eq!(Value::from("x").as_str(), Some("x"));
	assert_eq!(Value::from(FunctionHandle::named("sin")).kind(), ValueKind::FunctionHandle);
	assert_eq!(Value::default(), Value::empty());
	assert_eq!(ValueKind::FunctionHandle.to_string(), "function handle");
}
