/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by array and value operations.
///
/// None of these touch an engine session; they are reported before any
/// protocol traffic happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A size vector cannot describe an array (rank below two, or a buffer
	/// too short for the requested size).
	#[error("invalid shape {size:?}: {reason}")]
	InvalidShape { size: Vec<usize>, reason: &'static str },
	/// A read addressed a position outside the logical size, or a
	/// coordinate was zero.
	#[error("position {pos:?} is out of bounds for size {size:?}")]
	OutOfBounds { pos: Vec<usize>, size: Vec<usize> },
	/// A position vector does not have one coordinate per dimension.
	#[error("position {pos:?} does not match array rank {rank}")]
	RankMismatch { pos: Vec<usize>, rank: usize },
	/// The real and imaginary parts of a complex array disagree in size.
	#[error("complex parts differ in size: real {real:?}, imaginary {imag:?}")]
	PartMismatch { real: Vec<usize>, imag: Vec<usize> },
}
