use super::NamedValue;

/// Function handle as the engine saves it.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionHandle {
	/// Handle to a named function, e.g. `sin`.
	Named(String),
	/// Anonymous function with its source text, e.g. `@(x) x + a`, and the
	/// variables it captured when it was created.
	Anonymous {
		source: String,
		captured: Vec<NamedValue>,
	},
}

impl FunctionHandle {
	pub fn named(name: impl Into<String>) -> Self {
		Self::Named(name.into())
	}

	/// An anonymous function without captured variables.
	pub fn anonymous(source: impl Into<String>) -> Self {
		Self::Anonymous {
			source: source.into(),
			captured: Vec::new(),
		}
	}
}
