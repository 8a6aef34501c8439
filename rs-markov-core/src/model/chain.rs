use std::collections::HashMap;

use log::{debug, trace};
use serde::Serialize;

use super::counter::WeightedCounter;
use super::generator::Generator;
use super::rng::{DEFAULT_SEED, SharedRng};
use super::token::Token;
use crate::error::MarkovError;

/// Something that can learn from token sequences and produce generators.
pub trait ChainModel {
	/// Alphabet the chain is built over.
	type Token: Token;

	/// Learns one example sequence.
	fn feed(&mut self, tokens: &[Self::Token]) -> Result<(), MarkovError>;

	/// Resets the random source shared by the whole chain.
	fn seed(&mut self, seed: i64);

	/// Starts a new generation run.
	fn make_generator(&self) -> Result<Generator<'_, Self::Token>, MarkovError>;
}

/// Summary of what a chain has learned so far.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChainStats {
	/// Number of tokens in each prefix window.
	pub prefix_len: usize,
	/// Distinct windows with at least one recorded transition.
	pub windows: usize,
	/// Distinct windows observed at the start of a sequence.
	pub starting_windows: usize,
	/// Transitions recorded across all windows, terminal ones included.
	pub transitions: usize,
	/// Sequences fed so far.
	pub sequences: usize,
}

/// Fixed-order Markov chain over tokens of type `T`.
///
/// The chain state is a window of the last `prefix_len` tokens. For every
/// window observed while feeding, the chain keeps a counter of the tokens
/// that followed it, the terminal sentinel included when a sequence ended
/// right after the window.
///
/// # Responsibilities
/// - Accumulate transition counts from example sequences
/// - Record how sequences start, to pick where generation begins
/// - Hand out generators sharing the chain's random source
///
/// # Invariants
/// - `prefix_len` is always >= 1
/// - Every window key holds exactly `prefix_len` tokens
/// - Every counter in `transitions` has a total >= 1
/// - Every counter of the chain draws from the same `rng`
#[derive(Debug)]
pub struct Chain<T: Token> {
	/// Number of tokens in a window.
	prefix_len: usize,
	/// Mapping from a window to the tokens observed right after it.
	transitions: HashMap<Vec<T>, WeightedCounter<T>>,
	/// Windows observed at the start of fed sequences.
	initial_prefixes: WeightedCounter<Vec<T>>,
	/// Random source shared by every counter above.
	rng: SharedRng,
}

/// Chain over characters, generating "words".
///
/// A word does not have to be a literal word: any string of characters,
/// spaces and punctuation included, can be fed and generated.
pub type WordChain = Chain<char>;

/// Chain over words, generating sentences.
pub type SentenceChain = Chain<String>;

impl<T: Token> Chain<T> {
	/// Creates an empty chain whose windows hold `prefix_len` tokens.
	///
	/// # Errors
	/// Returns an error if `prefix_len` is 0.
	pub fn new(prefix_len: usize) -> Result<Self, MarkovError> {
		Self::with_seed(prefix_len, DEFAULT_SEED)
	}

	/// Creates an empty chain whose random source is seeded with `seed`.
	pub fn with_seed(prefix_len: usize, seed: i64) -> Result<Self, MarkovError> {
		if prefix_len == 0 {
			return Err(MarkovError::InvalidPrefixLength(prefix_len));
		}
		debug!("new chain: prefix_len={prefix_len} seed={seed}");

		let rng = SharedRng::new(seed);
		Ok(Self {
			prefix_len,
			transitions: HashMap::new(),
			initial_prefixes: WeightedCounter::new(rng.clone()),
			rng,
		})
	}

	/// Returns the number of tokens in each window.
	pub fn prefix_len(&self) -> usize {
		self.prefix_len
	}

	/// Returns whether at least one sequence was fed.
	pub fn is_fed(&self) -> bool {
		!self.initial_prefixes.is_empty()
	}

	/// Returns the counter of starting windows.
	pub fn initial_prefixes(&self) -> &WeightedCounter<Vec<T>> {
		&self.initial_prefixes
	}

	/// Returns the tokens observed after `window`, if it was ever observed.
	pub fn transitions(&self, window: &[T]) -> Option<&WeightedCounter<T>> {
		self.transitions.get(window)
	}

	/// Returns the number of distinct windows with recorded transitions.
	pub fn window_count(&self) -> usize {
		self.transitions.len()
	}

	/// Returns the random source shared by the chain's counters.
	pub fn rng(&self) -> &SharedRng {
		&self.rng
	}

	pub fn stats(&self) -> ChainStats {
		ChainStats {
			prefix_len: self.prefix_len,
			windows: self.transitions.len(),
			starting_windows: self.initial_prefixes.len(),
			transitions: self.transitions.values().map(WeightedCounter::total).sum(),
			sequences: self.initial_prefixes.total(),
		}
	}

	/// Records that `suffix` followed `window`, creating the window's
	/// counter if necessary.
	///
	/// `suffix` should be the terminal sentinel if the window is meant to
	/// be able to end a sequence.
	///
	/// Returns `true` if the window was seen for the first time.
	///
	/// # Errors
	/// Returns [`MarkovError::Length`] if `window` does not hold exactly
	/// `prefix_len` tokens. Nothing is recorded in that case.
	pub fn insert(&mut self, window: Vec<T>, suffix: T) -> Result<bool, MarkovError> {
		if window.len() != self.prefix_len {
			return Err(MarkovError::Length { got: window.len(), want: self.prefix_len });
		}
		trace!("insert {window:?} -> {suffix:?}");
		let mut created = false;
		let counter = self.transitions.entry(window).or_insert_with(|| {
			created = true;
			WeightedCounter::new(self.rng.clone())
		});
		counter.insert(suffix);
		Ok(created)
	}

	/// Learns one example sequence.
	///
	/// The first `prefix_len` tokens form the starting window. Every later
	/// token is recorded as following the window before it, then the window
	/// slides forward by one. The final window is recorded as ending the
	/// sequence.
	///
	/// # Errors
	/// Returns [`MarkovError::Length`] if `tokens` is shorter than the
	/// prefix length. The chain is left untouched in that case.
	pub fn feed(&mut self, tokens: &[T]) -> Result<(), MarkovError> {
		if tokens.len() < self.prefix_len {
			return Err(MarkovError::Length { got: tokens.len(), want: self.prefix_len });
		}

		let mut window = tokens[..self.prefix_len].to_vec();
		self.initial_prefixes.insert(window.clone());

		for suffix in &tokens[self.prefix_len..] {
			self.insert(window.clone(), suffix.clone())?;
			window.rotate_left(1);
			if let Some(last) = window.last_mut() {
				*last = suffix.clone();
			}
		}
		self.insert(window, T::terminal())?;

		debug!("fed {} tokens, {} windows known", tokens.len(), self.transitions.len());
		Ok(())
	}

	/// Resets the random source used by every counter of the chain.
	pub fn seed(&mut self, seed: i64) {
		debug!("reseeding chain with {seed}");
		self.rng.reseed(seed);
	}

	/// Creates a generator starting from a randomly drawn starting window.
	///
	/// # Errors
	/// Returns [`MarkovError::NotFed`] if no sequence was ever fed.
	pub fn make_generator(&self) -> Result<Generator<'_, T>, MarkovError> {
		if !self.is_fed() {
			return Err(MarkovError::NotFed);
		}
		let window = self.initial_prefixes.select()?;
		debug!("new generator starting at {window:?}");
		Ok(Generator::new(self, window))
	}
}

impl<T: Token> ChainModel for Chain<T> {
	type Token = T;

	fn feed(&mut self, tokens: &[T]) -> Result<(), MarkovError> {
		Chain::feed(self, tokens)
	}

	fn seed(&mut self, seed: i64) {
		Chain::seed(self, seed)
	}

	fn make_generator(&self) -> Result<Generator<'_, T>, MarkovError> {
		Chain::make_generator(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(s: &str) -> Vec<String> {
		s.split_whitespace().map(str::to_owned).collect()
	}

	fn key(s: &str) -> Vec<String> {
		words(s)
	}

	#[test]
	fn zero_prefix_is_rejected() {
		assert_eq!(SentenceChain::new(0).unwrap_err(), MarkovError::InvalidPrefixLength(0));
	}

	#[test]
	fn sentence_feed_counts_transitions() {
		let mut chain = SentenceChain::new(2).unwrap();
		chain.feed(&words("a b a c a b a d")).unwrap();

		let expected: &[(&str, &[(&str, usize)])] = &[
			("a b", &[("a", 2)]),
			("b a", &[("c", 1), ("d", 1)]),
			("a c", &[("a", 1)]),
			("c a", &[("b", 1)]),
			("a d", &[("", 1)]),
		];

		assert_eq!(chain.window_count(), expected.len());
		for (window, suffixes) in expected {
			let counter = chain.transitions(&key(window)).unwrap_or_else(|| panic!("missing window {window:?}"));
			let total: usize = suffixes.iter().map(|(_, n)| n).sum();
			assert_eq!(counter.total(), total, "total for window {window:?}");
			for (suffix, count) in *suffixes {
				assert_eq!(counter.get(&suffix.to_string()), *count, "count of {suffix:?} after {window:?}");
			}
		}

		assert_eq!(chain.initial_prefixes().probability(&key("a b")), 1.0);
	}

	#[test]
	fn word_feed_counts_transitions() {
		let mut chain = WordChain::new(2).unwrap();
		chain.feed(&"abacabad".chars().collect::<Vec<_>>()).unwrap();

		assert_eq!(chain.transitions(&['a', 'b']).unwrap().get(&'a'), 2);
		assert_eq!(chain.transitions(&['b', 'a']).unwrap().get(&'c'), 1);
		assert_eq!(chain.transitions(&['b', 'a']).unwrap().get(&'d'), 1);
		assert_eq!(chain.transitions(&['a', 'c']).unwrap().get(&'a'), 1);
		assert_eq!(chain.transitions(&['c', 'a']).unwrap().get(&'b'), 1);
		assert_eq!(chain.transitions(&['a', 'd']).unwrap().get(&'\0'), 1);
		assert_eq!(chain.initial_prefixes().probability(&vec!['a', 'b']), 1.0);
	}

	#[test]
	fn short_feed_leaves_chain_untouched() {
		let mut chain = SentenceChain::new(3).unwrap();
		chain.feed(&words("one two three four")).unwrap();
		let before = chain.stats();

		assert_eq!(chain.feed(&words("too short")), Err(MarkovError::Length { got: 2, want: 3 }));
		assert_eq!(chain.stats(), before);
		assert!(chain.transitions(&key("too short")).is_none());
	}

	#[test]
	fn feed_of_exactly_prefix_len_only_records_ending() {
		let mut chain = WordChain::new(3).unwrap();
		chain.feed(&['x', 'y', 'z']).unwrap();

		assert_eq!(chain.window_count(), 1);
		assert_eq!(chain.transitions(&['x', 'y', 'z']).unwrap().get(&'\0'), 1);
	}

	#[test]
	fn insert_reports_new_windows() {
		let mut chain = SentenceChain::new(1).unwrap();
		assert!(chain.insert(key("hello"), "world".to_owned()).unwrap());
		assert!(!chain.insert(key("hello"), String::new()).unwrap());
		assert_eq!(chain.transitions(&key("hello")).unwrap().total(), 2);
	}

	#[test]
	fn insert_rejects_windows_of_the_wrong_length() {
		let mut chain = WordChain::new(2).unwrap();
		chain.feed(&['a', 'b', 'c']).unwrap();
		let before = chain.stats();

		assert_eq!(
			chain.insert(vec!['x', 'y', 'z', 'w'], 'q'),
			Err(MarkovError::Length { got: 4, want: 2 })
		);
		assert_eq!(chain.insert(vec![], 'q'), Err(MarkovError::Length { got: 0, want: 2 }));

		assert_eq!(chain.stats(), before);
		assert!(chain.transitions(&['x', 'y', 'z', 'w']).is_none());
		assert!(chain.transitions(&[]).is_none());
	}

	#[test]
	fn counters_share_chain_rng() {
		let mut chain = WordChain::new(1).unwrap();
		chain.feed(&['a', 'b']).unwrap();
		assert!(chain.initial_prefixes().rng().same_source(chain.rng()));
		assert!(chain.transitions(&['a']).unwrap().rng().same_source(chain.rng()));
	}

	#[test]
	fn repeated_feeds_accumulate() {
		let mut chain = SentenceChain::new(1).unwrap();
		chain.feed(&words("the cat")).unwrap();
		chain.feed(&words("the dog")).unwrap();
		chain.feed(&words("the cat")).unwrap();

		let after_the = chain.transitions(&key("the")).unwrap();
		assert_eq!(after_the.get(&"cat".to_owned()), 2);
		assert_eq!(after_the.get(&"dog".to_owned()), 1);
		assert_eq!(chain.stats(), ChainStats {
			prefix_len: 1,
			windows: 3,
			starting_windows: 1,
			transitions: 6,
			sequences: 3,
		});
	}

	#[test]
	fn unfed_chain_has_no_generator() {
		let chain = WordChain::new(2).unwrap();
		assert!(matches!(chain.make_generator(), Err(MarkovError::NotFed)));
	}
}
