//! Fixed-rank, column-major arrays with write-triggered growth.
//!
//! Positions are 1-based, one coordinate per dimension. Dimension 1 is rows,
//! dimension 2 is columns, and the linear index of `(p1, .., pn)` is
//! `sum((p_i - 1) * prod(size[..i]))`.
//!
//! Reads past the logical size fail. Writes past it grow the array first, so
//! the logical size after any sequence of writes is the elementwise maximum of
//! the original size and every position written.

use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};


/// Column-major N-dimensional array that never shrinks.
///
/// The backing buffer may be longer than the logical size; the spare tail
/// lets later growth shift blocks in place instead of reallocating. Equality
/// and hashing only look at the logical prefix.
#[derive(Debug, Clone)]
pub struct DenseArray<T> {
	size: Vec<usize>,
	data: Vec<T>,
}

impl<T: Clone + Default> DenseArray<T> {
	/// Creates a default-filled array of the given size.
	pub fn new(size: &[usize]) -> Result<Self> {
		check_rank(size)?;
		Ok(Self {
			size: size.to_vec(),
			data: vec![T::default(); numel(size)],
		})
	}

	/// Adopts `data` as the backing buffer of an array of the given size.
	///
	/// The buffer must hold at least `prod(size)` elements. Elements past
	/// that are kept as spare capacity.
	pub fn from_vec(data: Vec<T>, size: &[usize]) -> Result<Self> {
		check_rank(size)?;
		if data.len() < numel(size) {
			return Err(Error::InvalidShape {
				size: size.to_vec(),
				reason: "buffer is shorter than the product of the size",
			});
		}
		Ok(Self { size: size.to_vec(), data })
	}

	/// A 0×0 array.
	pub fn empty() -> Self {
		Self {
			size: vec![0, 0],
			data: Vec::new(),
		}
	}

	/// A 1×1 array holding `value`.
	pub fn scalar(value: T) -> Self {
		Self {
			size: vec![1, 1],
			data: vec![value],
		}
	}

	/// A 1×n row vector.
	pub fn row(values: Vec<T>) -> Self {
		Self {
			size: vec![1, values.len()],
			data: values,
		}
	}

	/// Writes `value` at `pos`, growing the array first when `pos` lies
	/// outside the current size.
	pub fn set(&mut self, value: T, pos: &[usize]) -> Result<()> {
		self.check_position(pos)?;
		self.grow(pos);
		let index = self.offset(pos);
		self.data[index] = value;
		Ok(())
	}

	/// Grows the logical size to cover `pos` without writing anything.
	///
	/// Used to keep sibling arrays (the parts of a complex array) the same
	/// size when only one of them is written.
	pub fn resize_up(&mut self, pos: &[usize]) -> Result<()> {
		self.check_position(pos)?;
		self.grow(pos);
		Ok(())
	}

	fn grow(&mut self, pos: &[usize]) {
		// Any reallocation is sized for the final shape, so dimensions grown
		// after it shift in place.
		let final_len: usize = self.size.iter().zip(pos).map(|(s, p)| (*s).max(*p)).product();
		for dim in 0..self.size.len() {
			let target = pos[dim];
			if target <= self.size[dim] {
				continue;
			}

			let inner: usize = self.size[..dim].iter().product();
			let blocksize = inner * self.size[dim];
			let stride = inner * target;
			let blocks: usize = self.size[dim + 1..].iter().product();
			let required = stride * blocks;

			if required > self.data.len() {
				self.relocate_into_new(blocksize, stride, blocks, final_len);
			} else {
				self.relocate_in_place(blocksize, stride, blocks);
			}
			self.size[dim] = target;
		}
	}

	/// Moves every block into a fresh buffer twice `final_len`, the logical
	/// length once every dimension has grown.
	fn relocate_into_new(&mut self, blocksize: usize, stride: usize, blocks: usize, final_len: usize) {
		let mut data = vec![T::default(); final_len * 2];
		let mut old = std::mem::take(&mut self.data).into_iter();
		for block in 0..blocks {
			let dst = block * stride;
			for (slot, value) in data[dst..dst + blocksize].iter_mut().zip(old.by_ref().take(blocksize)) {
				*slot = value;
			}
		}
		self.data = data;
	}

	/// Shifts blocks towards higher offsets inside the current buffer.
	///
	/// Blocks are moved from the last one down so a block never lands on a
	/// source that has not moved yet. The gaps left between relocated blocks
	/// are reset to the default value afterwards.
	fn relocate_in_place(&mut self, blocksize: usize, stride: usize, blocks: usize) {
		for block in (1..blocks).rev() {
			let src = block * blocksize;
			let dst = block * stride;
			for i in (0..blocksize).rev() {
				self.data.swap(src + i, dst + i);
			}
		}
		for block in 0..blocks {
			let start = block * stride + blocksize;
			let end = (block + 1) * stride;
			self.data[start..end].fill(T::default());
		}
	}
}

impl<T> DenseArray<T> {
	/// Returns the element at `pos`.
	///
	/// Reading never grows the array; any coordinate past the logical size
	/// is [`Error::OutOfBounds`].
	pub fn get(&self, pos: &[usize]) -> Result<&T> {
		let index = self.linear_index(pos)?;
		Ok(&self.data[index])
	}

	/// Returns a mutable reference to the element at `pos` without growing.
	pub fn get_mut(&mut self, pos: &[usize]) -> Result<&mut T> {
		let index = self.linear_index(pos)?;
		Ok(&mut self.data[index])
	}

	/// Column-major linear index of an in-bounds position.
	pub fn linear_index(&self, pos: &[usize]) -> Result<usize> {
		self.check_position(pos)?;
		if pos.iter().zip(&self.size).any(|(p, s)| p > s) {
			return Err(Error::OutOfBounds {
				pos: pos.to_vec(),
				size: self.size.clone(),
			});
		}
		Ok(self.offset(pos))
	}

	/// Logical size, one entry per dimension.
	pub fn size(&self) -> &[usize] {
		&self.size
	}

	/// Number of dimensions.
	pub fn rank(&self) -> usize {
		self.size.len()
	}

	/// Number of logical elements.
	pub fn numel(&self) -> usize {
		numel(&self.size)
	}

	/// Whether any dimension is zero.
	pub fn is_empty(&self) -> bool {
		self.numel() == 0
	}

	/// Length of the backing buffer.
	pub fn capacity(&self) -> usize {
		self.data.len()
	}

	/// Logical elements in column-major order.
	pub fn as_slice(&self) -> &[T] {
		&self.data[..self.numel()]
	}

	/// Consumes the array, returning its logical elements in column-major
	/// order.
	pub fn into_vec(mut self) -> Vec<T> {
		let len = self.numel();
		self.data.truncate(len);
		self.data
	}

	/// Iterates the logical elements in column-major order.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.as_slice().iter()
	}

	fn check_position(&self, pos: &[usize]) -> Result<()> {
		if pos.len() != self.size.len() {
			return Err(Error::RankMismatch {
				pos: pos.to_vec(),
				rank: self.size.len(),
			});
		}
		if pos.contains(&0) {
			return Err(Error::OutOfBounds {
				pos: pos.to_vec(),
				size: self.size.clone(),
			});
		}
		Ok(())
	}

	fn offset(&self, pos: &[usize]) -> usize {
		let mut index = 0;
		let mut step = 1;
		for (p, s) in pos.iter().zip(&self.size) {
			index += (p - 1) * step;
			step *= s;
		}
		index
	}
}

impl<T: PartialEq> PartialEq for DenseArray<T> {
	fn eq(&self, other: &Self) -> bool {
		self.size == other.size && self.as_slice() == other.as_slice()
	}
}

impl<T: Eq> Eq for DenseArray<T> {}

impl<T: Hash> Hash for DenseArray<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.size.hash(state);
		self.as_slice().hash(state);
	}
}

impl<T: Clone + Default> Default for DenseArray<T> {
	fn default() -> Self {
		Self::empty()
	}
}

fn check_rank(size: &[usize]) -> Result<()> {
	if size.len() < 2 {
		return Err(Error::InvalidShape {
			size: size.to_vec(),
			reason: "rank must be at least 2",
		});
	}
	Ok(())
}

fn numel(size: &[usize]) -> usize {
	size.iter().product()
}
