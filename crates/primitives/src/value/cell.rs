use super::Value;
use crate::array::DenseArray;
use crate::error::Result;

/// Cell array: a [`DenseArray`] of independent values.
///
/// Slots never written hold [`Value::empty`], the same value a caller gets
/// by writing an empty value explicitly. There is no separate "unset" state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
	items: DenseArray<Value>,
}

impl Cell {
	/// Creates a cell array with every slot empty.
	pub fn new(size: &[usize]) -> Result<Self> {
		Ok(Self {
			items: DenseArray::new(size)?,
		})
	}

	pub fn from_array(items: DenseArray<Value>) -> Self {
		Self { items }
	}

	/// A 1×n cell row.
	pub fn row(values: Vec<Value>) -> Self {
		Self {
			items: DenseArray::row(values),
		}
	}

	pub fn get(&self, pos: &[usize]) -> Result<&Value> {
		self.items.get(pos)
	}

	/// Stores `value` at `pos`, growing the cell as needed.
	pub fn set(&mut self, value: impl Into<Value>, pos: &[usize]) -> Result<()> {
		self.items.set(value.into(), pos)
	}

	pub fn size(&self) -> &[usize] {
		self.items.size()
	}

	pub fn as_array(&self) -> &DenseArray<Value> {
		&self.items
	}

	pub fn into_array(self) -> DenseArray<Value> {
		self.items
	}
}
