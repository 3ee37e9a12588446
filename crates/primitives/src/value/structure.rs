use indexmap::IndexMap;

use super::Value;

/// Scalar struct: field names mapped to values, in insertion order.
///
/// Field order is preserved because the engine reports fields in the order
/// they were created.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Struct {
	fields: IndexMap<String, Value>,
}

impl Struct {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the field value, or `None` when the field does not exist.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	/// Sets a field, returning the previous value if the field existed.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.fields.insert(name.into(), value.into())
	}

	/// Removes a field, keeping the order of the remaining ones.
	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.fields.shift_remove(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterates fields in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Struct {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}
