use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::rng::SharedRng;
use crate::error::MarkovError;

/// Frequency table usable as a discrete weighted distribution.
///
/// A `WeightedCounter` counts how many times each distinct value was
/// inserted and samples values with a probability proportional to their
/// count. Conceptually it is a bag of marbles: inserting adds a marble,
/// selecting draws one at random and puts it back.
///
/// ## Invariants
/// - `total` is always the sum of all counts
/// - Every stored count is strictly positive
/// - The counter never shrinks
///
/// Entries are kept ordered, so the cumulative walk in [`select`] visits
/// them in the same order on every instance holding the same counts.
///
/// [`select`]: WeightedCounter::select
#[derive(Serialize, Clone, Debug)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct WeightedCounter<T: Ord> {
	/// Observed values and their occurrence counts.
	/// Serialized as `[value, count]` pairs so any value type is accepted.
	#[serde(serialize_with = "serialize_entries")]
	counts: BTreeMap<T, usize>,
	/// Sum of all counts.
	total: usize,
	/// Source consumed by `select`, possibly shared with sibling counters.
	#[serde(skip)]
	rng: SharedRng,
}

fn serialize_entries<T, S>(counts: &BTreeMap<T, usize>, serializer: S) -> Result<S::Ok, S::Error>
where
	T: Serialize,
	S: Serializer,
{
	serializer.collect_seq(counts.iter())
}

impl<T: Ord + Clone> WeightedCounter<T> {
	/// Creates an empty counter drawing from `rng`.
	pub fn new(rng: SharedRng) -> Self {
		Self { counts: BTreeMap::new(), total: 0, rng }
	}

	/// Creates an empty counter with its own source seeded by `seed`.
	pub fn with_seed(seed: i64) -> Self {
		Self::new(SharedRng::new(seed))
	}

	/// Records one occurrence of `value` and returns its new count.
	pub fn insert(&mut self, value: T) -> usize {
		self.total += 1;
		let count = self.counts.entry(value).or_insert(0);
		*count += 1;
		*count
	}

	/// Returns how many times `value` was inserted (0 if never).
	pub fn get(&self, value: &T) -> usize {
		self.counts.get(value).copied().unwrap_or(0)
	}

	/// Returns the number of insertions across all values.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Returns the number of distinct values.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.total == 0
	}

	/// Returns the probability of drawing `value`.
	///
	/// An empty counter has nothing to draw from, so every value has a
	/// probability of 0 there.
	pub fn probability(&self, value: &T) -> f64 {
		if self.total == 0 {
			return 0.0;
		}
		self.get(value) as f64 / self.total as f64
	}

	/// Returns every distinct value with its probability.
	pub fn probabilities(&self) -> Vec<(T, f64)> {
		self.counts
			.iter()
			.map(|(value, count)| (value.clone(), *count as f64 / self.total as f64))
			.collect()
	}

	/// Returns every distinct value once.
	pub fn keys(&self) -> impl Iterator<Item = &T> {
		self.counts.keys()
	}

	/// Returns every distinct value with its count.
	pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
		self.counts.iter().map(|(value, count)| (value, *count))
	}

	/// Returns the source this counter draws from.
	pub fn rng(&self) -> &SharedRng {
		&self.rng
	}

	/// Draws a value with probability proportional to its count.
	///
	/// Picks a uniform index in `[0, total)` and walks the cumulative
	/// count ranges until one contains it: O(n) over distinct values.
	///
	/// # Errors
	/// Returns [`MarkovError::EmptyDistribution`] if nothing was inserted.
	pub fn select(&self) -> Result<T, MarkovError> {
		if self.total == 0 {
			return Err(MarkovError::EmptyDistribution);
		}

		let mut index = self.rng.random_below(self.total);
		for (value, count) in &self.counts {
			if index < *count {
				return Ok(value.clone());
			}
			index -= count;
		}

		// Only reachable if `total` drifted from the sum of counts.
		Err(MarkovError::EmptyDistribution)
	}
}

impl<T: Ord + Clone> Default for WeightedCounter<T> {
	fn default() -> Self {
		Self::new(SharedRng::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
	enum Marble {
		Red,
		Green,
		Blue,
	}

	#[test]
	fn insert_returns_running_count() {
		let mut counter = WeightedCounter::default();
		assert_eq!(counter.insert('a'), 1);
		assert_eq!(counter.insert('b'), 1);
		assert_eq!(counter.insert('a'), 2);
		assert_eq!(counter.get(&'a'), 2);
		assert_eq!(counter.get(&'z'), 0);
		assert_eq!(counter.total(), 3);
		assert_eq!(counter.len(), 2);
	}

	#[test]
	fn probability_follows_counts() {
		let mut counter = WeightedCounter::default();
		for marble in [Marble::Red, Marble::Green, Marble::Red, Marble::Blue] {
			counter.insert(marble);
		}

		assert_eq!(counter.probability(&Marble::Red), 0.5);
		assert_eq!(counter.probability(&Marble::Green), 0.25);
		assert_eq!(counter.probability(&Marble::Blue), 0.25);
		assert_eq!(
			counter.probabilities(),
			vec![(Marble::Red, 0.5), (Marble::Green, 0.25), (Marble::Blue, 0.25)]
		);
	}

	#[test]
	fn empty_counter_has_zero_probability() {
		let counter: WeightedCounter<char> = WeightedCounter::default();
		assert_eq!(counter.probability(&'a'), 0.0);
		assert!(counter.probabilities().is_empty());
		assert!(counter.is_empty());
	}

	#[test]
	fn select_on_empty_counter_is_an_error() {
		let counter: WeightedCounter<String> = WeightedCounter::with_seed(5);
		assert_eq!(counter.select(), Err(MarkovError::EmptyDistribution));
	}

	#[test]
	fn select_single_value() {
		let mut counter = WeightedCounter::with_seed(5);
		counter.insert("only".to_owned());
		for _ in 0..20 {
			assert_eq!(counter.select().unwrap(), "only");
		}
	}

	#[test]
	fn select_converges_to_weights() {
		let mut counter = WeightedCounter::with_seed(42);
		for option in ['A', 'A', 'B', 'A'] {
			counter.insert(option);
		}

		let draws = 10_000;
		let mut a = 0usize;
		let mut b = 0usize;
		for _ in 0..draws {
			match counter.select().unwrap() {
				'A' => a += 1,
				'B' => b += 1,
				other => panic!("unexpected draw {other:?}"),
			}
		}

		// 3:1 weights mean A should take three quarters of the draws.
		assert_eq!(a + b, draws);
		let share = a as f64 / draws as f64;
		assert!((share - 0.75).abs() / 0.75 < 0.05, "A drew {a} of {draws}");
	}

	#[test]
	fn same_seed_same_selections() {
		let build = || {
			let mut counter = WeightedCounter::with_seed(11);
			for word in ["x", "y", "y", "z", "z", "z"] {
				counter.insert(word.to_owned());
			}
			counter
		};
		let first = build();
		let second = build();
		let a: Vec<String> = (0..50).map(|_| first.select().unwrap()).collect();
		let b: Vec<String> = (0..50).map(|_| second.select().unwrap()).collect();
		assert_eq!(a, b);
	}

	#[test]
	fn serializes_entries_and_total() {
		let mut counter = WeightedCounter::default();
		counter.insert(vec!['a', 'b']);
		counter.insert(vec!['a', 'b']);
		let json = serde_json::to_value(&counter).unwrap();
		assert_eq!(json, serde_json::json!({ "counts": [[["a", "b"], 2]], "total": 2 }));
	}

	proptest! {
		#[test]
		fn total_is_sum_of_counts(values in proptest::collection::vec(0u8..16, 0..200)) {
			let mut counter = WeightedCounter::default();
			for value in &values {
				counter.insert(*value);
			}
			prop_assert_eq!(counter.total(), values.len());
			prop_assert_eq!(counter.iter().map(|(_, count)| count).sum::<usize>(), counter.total());
			for (value, count) in counter.iter() {
				prop_assert_eq!(count, values.iter().filter(|v| *v == value).count());
			}
		}

		#[test]
		fn repeated_insert_counts(n in 1usize..500) {
			let mut counter = WeightedCounter::default();
			for _ in 0..n {
				counter.insert('v');
			}
			prop_assert_eq!(counter.get(&'v'), n);
			prop_assert_eq!(counter.total(), n);
			prop_assert_eq!(counter.probability(&'v'), 1.0);
		}

		#[test]
		fn selection_is_always_an_inserted_value(
			values in proptest::collection::vec(0u8..8, 1..50),
			seed in any::<i64>(),
		) {
			let mut counter = WeightedCounter::with_seed(seed);
			for value in &values {
				counter.insert(*value);
			}
			let drawn = counter.select().unwrap();
			prop_assert!(counter.get(&drawn) > 0);
		}
	}
}
