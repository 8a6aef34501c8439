use thiserror::Error;

/// Errors reported by the Markov chain primitives.
///
/// Every variant is a local input-validation failure. Nothing here is
/// transient, so callers never need to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkovError {
	/// `feed` received fewer tokens than the chain's prefix length.
	#[error("got {got} tokens, want >={want}")]
	Length { got: usize, want: usize },

	/// A generator was requested from a chain that was never fed.
	#[error("chain has not been fed any sequence")]
	NotFed,

	/// `select` was called on a counter holding no observations.
	#[error("cannot select from an empty distribution")]
	EmptyDistribution,

	/// A chain was configured with a prefix length of zero.
	#[error("prefix length must be >= 1, got {0}")]
	InvalidPrefixLength(usize),

	/// A text mode name other than `sentence` or `word`.
	#[error("unknown mode {0:?}, expected \"sentence\" or \"word\"")]
	UnknownMode(String),
}
