use crate::array::DenseArray;
use crate::error::{Error, Result};

/// Complex array stored as two sibling real arrays of identical size.
///
/// Writing a part past its bounds grows both parts, so the real and
/// imaginary arrays always agree in size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexArray {
	re: DenseArray<f64>,
	im: DenseArray<f64>,
}

impl ComplexArray {
	/// Creates a zero-filled complex array.
	pub fn new(size: &[usize]) -> Result<Self> {
		Ok(Self {
			re: DenseArray::new(size)?,
			im: DenseArray::new(size)?,
		})
	}

	/// Pairs existing real and imaginary parts.
	pub fn from_parts(re: DenseArray<f64>, im: DenseArray<f64>) -> Result<Self> {
		if re.size() != im.size() {
			return Err(Error::PartMismatch {
				real: re.size().to_vec(),
				imag: im.size().to_vec(),
			});
		}
		Ok(Self { re, im })
	}

	/// A 1×1 complex number.
	pub fn scalar(re: f64, im: f64) -> Self {
		Self {
			re: DenseArray::scalar(re),
			im: DenseArray::scalar(im),
		}
	}

	/// Returns `(re, im)` at `pos`.
	pub fn get(&self, pos: &[usize]) -> Result<(f64, f64)> {
		Ok((*self.re.get(pos)?, *self.im.get(pos)?))
	}

	/// Writes both parts at `pos`, growing as needed.
	pub fn set(&mut self, value: (f64, f64), pos: &[usize]) -> Result<()> {
		self.re.set(value.0, pos)?;
		self.im.set(value.1, pos)
	}

	/// Writes the real part, growing the imaginary part to match.
	pub fn set_real(&mut self, value: f64, pos: &[usize]) -> Result<()> {
		self.re.set(value, pos)?;
		self.im.resize_up(pos)
	}

	/// Writes the imaginary part, growing the real part to match.
	pub fn set_imag(&mut self, value: f64, pos: &[usize]) -> Result<()> {
		self.im.set(value, pos)?;
		self.re.resize_up(pos)
	}

	pub fn size(&self) -> &[usize] {
		self.re.size()
	}

	pub fn real(&self) -> &DenseArray<f64> {
		&self.re
	}

	pub fn imag(&self) -> &DenseArray<f64> {
		&self.im
	}
}
