use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter; no two calls to [`Self::next`] return the same value.
#[derive(Debug, Default)]
pub struct SequenceClock {
	next: AtomicU64,
}

impl SequenceClock {
	/// Creates a clock whose first value is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next sequence number.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;
	use std::sync::Arc;

	use super::*;

	#[test]
	fn values_are_unique_across_threads() {
		let clock = Arc::new(SequenceClock::new());
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let clock = clock.clone();
				std::thread::spawn(move || (0..1000).map(|_| clock.next()).collect::<Vec<_>>())
			})
			.collect();
		let mut seen = HashSet::new();
		for handle in handles {
			for value in handle.join().unwrap() {
				assert!(seen.insert(value));
			}
		}
		assert_eq!(seen.len(), 4000);
		assert!(!seen.contains(&0));
	}
}
