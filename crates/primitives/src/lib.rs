//! Data model for values exchanged with an external numeric engine.
//!
//! [`DenseArray`] is the storage primitive: a fixed-rank, column-major buffer
//! that grows when written past its bounds. [`Value`] is the closed set of
//! kinds the engine can save and load (numeric, logical, complex, string,
//! struct, cell and function handle), all built on top of it.
//!
//! Values are owned. Handing a value to a session or receiving one back
//! moves or clones it; two values never share a buffer.

/// Column-major growable arrays.
pub mod array;
/// Error types for shape and bounds violations.
pub mod error;
/// Value kinds built on [`DenseArray`].
pub mod value;

pub use array::DenseArray;
pub use error::{Error, Result};
pub use value::{Cell, ComplexArray, FunctionHandle, NamedValue, Struct, Value, ValueKind};
