//! The closed set of value kinds the engine exchanges with the host.

mod cell;
mod complex;
mod handle;
mod structure;

use std::fmt;

pub use cell::Cell;
pub use complex::ComplexArray;
pub use handle::FunctionHandle;
pub use structure::Struct;

use crate::array::DenseArray;

#[cfg(test)]
mod tests;

/// Discriminant of a [`Value`], used to pick a writer for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
	/// Real double-precision array.
	Double,
	/// Logical array.
	Bool,
	/// Complex double-precision array.
	Complex,
	/// Character row vector.
	String,
	/// Scalar struct.
	Struct,
	/// Cell array.
	Cell,
	/// Function handle.
	FunctionHandle,
}

impl ValueKind {
	/// Stable lowercase name used in diagnostics.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Double => "double",
			Self::Bool => "bool",
			Self::Complex => "complex",
			Self::String => "string",
			Self::Struct => "struct",
			Self::Cell => "cell",
			Self::FunctionHandle => "function handle",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A value as stored by the engine.
///
/// `Clone` is a full copy: a value handed across a session boundary never
/// shares its buffer with the caller's copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Real double-precision array. A 1×1 array is the engine's scalar.
	Double(DenseArray<f64>),
	/// Logical array.
	Bool(DenseArray<bool>),
	/// Complex double-precision array.
	Complex(ComplexArray),
	/// Character row vector.
	String(String),
	/// Scalar struct with ordered fields.
	Struct(Struct),
	/// Cell array of independent values.
	Cell(Cell),
	/// Function handle.
	FunctionHandle(FunctionHandle),
}

impl Value {
	/// The canonical empty value: a 0×0 double array.
	///
	/// Cell slots that were never written read back as this value, and
	/// writing it into a slot is indistinguishable from leaving it unset.
	pub fn empty() -> Self {
		Self::Double(DenseArray::empty())
	}

	/// A 1×1 double.
	pub fn scalar(value: f64) -> Self {
		Self::Double(DenseArray::scalar(value))
	}

	/// Returns the kind of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Double(_) => ValueKind::Double,
			Self::Bool(_) => ValueKind::Bool,
			Self::Complex(_) => ValueKind::Complex,
			Self::String(_) => ValueKind::String,
			Self::Struct(_) => ValueKind::Struct,
			Self::Cell(_) => ValueKind::Cell,
			Self::FunctionHandle(_) => ValueKind::FunctionHandle,
		}
	}

	/// Whether this is the canonical empty value.
	pub fn is_empty_value(&self) -> bool {
		matches!(self, Self::Double(a) if a.size() == [0, 0])
	}

	/// The number when this is a 1×1 double.
	pub fn as_scalar(&self) -> Option<f64> {
		match self {
			Self::Double(a) if a.size() == [1, 1] => a.as_slice().first().copied(),
			_ => None,
		}
	}

	/// Borrows the double array, if any.
	pub fn as_double(&self) -> Option<&DenseArray<f64>> {
		match self {
			Self::Double(a) => Some(a),
			_ => None,
		}
	}

	/// Borrows the string, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Borrows the struct, if any.
	pub fn as_struct(&self) -> Option<&Struct> {
		match self {
			Self::Struct(s) => Some(s),
			_ => None,
		}
	}

	/// Borrows the cell array, if any.
	pub fn as_cell(&self) -> Option<&Cell> {
		match self {
			Self::Cell(c) => Some(c),
			_ => None,
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Self::empty()
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::scalar(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(DenseArray::scalar(value))
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<DenseArray<f64>> for Value {
	fn from(value: DenseArray<f64>) -> Self {
		Self::Double(value)
	}
}

impl From<DenseArray<bool>> for Value {
	fn from(value: DenseArray<bool>) -> Self {
		Self::Bool(value)
	}
}

impl From<ComplexArray> for Value {
	fn from(value: ComplexArray) -> Self {
		Self::Complex(value)
	}
}

impl From<Struct> for Value {
	fn from(value: Struct) -> Self {
		Self::Struct(value)
	}
}

impl From<Cell> for Value {
	fn from(value: Cell) -> Self {
		Self::Cell(value)
	}
}

impl From<FunctionHandle> for Value {
	fn from(value: FunctionHandle) -> Self {
		Self::FunctionHandle(value)
	}
}

/// A value together with the variable name it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
	pub name: String,
	pub value: Value,
}

impl NamedValue {
	pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}
