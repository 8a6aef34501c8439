use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used by chains and counters that were never explicitly seeded.
pub const DEFAULT_SEED: i64 = 1;

/// Handle to a pseudo-random source shared by every counter of a chain.
///
/// Cloning the handle shares the underlying generator, so reseeding
/// through any clone reseeds them all. One seed therefore determines a
/// whole generation run.
///
/// The source sits behind a mutex: generators drawn from the same chain
/// may be driven from several threads without corrupting its state.
#[derive(Clone, Debug)]
pub struct SharedRng {
	inner: Arc<Mutex<StdRng>>,
}

impl SharedRng {
	/// Creates a new source seeded with `seed`.
	///
	/// Negative seeds are accepted; their bit pattern seeds the generator.
	pub fn new(seed: i64) -> Self {
		Self { inner: Arc::new(Mutex::new(StdRng::seed_from_u64(seed as u64))) }
	}

	/// Resets the shared source to the state derived from `seed`.
	pub fn reseed(&self, seed: i64) {
		*self.lock() = StdRng::seed_from_u64(seed as u64);
	}

	/// Draws a uniform integer in `[0, bound)`, or 0 when `bound` is 0.
	pub(crate) fn random_below(&self, bound: usize) -> usize {
		if bound == 0 {
			return 0;
		}
		self.lock().random_range(0..bound)
	}

	/// Whether two handles point at the same source.
	pub fn same_source(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	// The generator state is valid whatever a panicking holder was doing.
	fn lock(&self) -> MutexGuard<'_, StdRng> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Default for SharedRng {
	fn default() -> Self {
		Self::new(DEFAULT_SEED)
	}
}
