use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::chain::{ChainStats, SentenceChain, WordChain};
use super::rng::DEFAULT_SEED;
use crate::error::MarkovError;

/// How raw text is cut into tokens.
///
/// Parsing ignores case, whether through `FromStr` or serde.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	/// Tokens are whitespace-separated words; output is space-joined.
	Sentence,
	/// Tokens are characters; output is concatenated.
	Word,
}

impl FromStr for Mode {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"sentence" => Ok(Mode::Sentence),
			"word" => Ok(Mode::Word),
			_ => Err(MarkovError::UnknownMode(s.to_owned())),
		}
	}
}

impl<'de> Deserialize<'de> for Mode {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let name = String::deserialize(deserializer)?;
		name.parse().map_err(de::Error::custom)
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mode::Sentence => f.write_str("sentence"),
			Mode::Word => f.write_str("word"),
		}
	}
}

/// A chain fed and rendered as plain text.
///
/// Wraps either chain variant behind one text-in, text-out interface,
/// so front ends don't need to know about token types.
#[derive(Debug)]
pub enum TextChain {
	Sentence(SentenceChain),
	Word(WordChain),
}

impl TextChain {
	/// Creates an empty chain of the given mode.
	pub fn new(mode: Mode, prefix_len: usize) -> Result<Self, MarkovError> {
		Self::with_seed(mode, prefix_len, DEFAULT_SEED)
	}

	pub fn with_seed(mode: Mode, prefix_len: usize, seed: i64) -> Result<Self, MarkovError> {
		Ok(match mode {
			Mode::Sentence => TextChain::Sentence(SentenceChain::with_seed(prefix_len, seed)?),
			Mode::Word => TextChain::Word(WordChain::with_seed(prefix_len, seed)?),
		})
	}

	pub fn mode(&self) -> Mode {
		match self {
			TextChain::Sentence(_) => Mode::Sentence,
			TextChain::Word(_) => Mode::Word,
		}
	}

	/// Feeds one example.
	///
	/// Sentence mode splits `text` on whitespace, word mode feeds every
	/// character, whitespace and punctuation included.
	pub fn feed_text(&mut self, text: &str) -> Result<(), MarkovError> {
		match self {
			TextChain::Sentence(chain) => {
				let words: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
				chain.feed(&words)
			}
			TextChain::Word(chain) => {
				let chars: Vec<char> = text.chars().collect();
				chain.feed(&chars)
			}
		}
	}

	pub fn seed(&mut self, seed: i64) {
		match self {
			TextChain::Sentence(chain) => chain.seed(seed),
			TextChain::Word(chain) => chain.seed(seed),
		}
	}

	/// Generates one sequence and renders it as text.
	///
	/// # Parameters
	/// - `limit`: maximum number of tokens to emit, `None` to run until the
	///   chain reaches its sentinel.
	///
	/// # Errors
	/// Returns [`MarkovError::NotFed`] if nothing was fed yet.
	pub fn generate(&self, limit: Option<usize>) -> Result<String, MarkovError> {
		match self {
			TextChain::Sentence(chain) => Ok(chain.make_generator()?.take_sequence(limit)?.join(" ")),
			TextChain::Word(chain) => Ok(chain.make_generator()?.take_sequence(limit)?.into_iter().collect()),
		}
	}

	pub fn stats(&self) -> ChainStats {
		match self {
			TextChain::Sentence(chain) => chain.stats(),
			TextChain::Word(chain) => chain.stats(),
		}
	}
}
