//! Markov-chain text generation library.
//!
//! This crate provides a fixed-order Markov chain generator including:
//! - A frequency counter usable as a discrete weighted distribution
//! - Prefix-window chains over characters (words) or words (sentences)
//! - Lazy generators walking a chain until its terminal sentinel
//! - A text layer that tokenizes input and renders generated output
//!
//! All randomness flows from one explicitly seeded source per chain, so
//! the same feed order and the same seed always produce the same output.

/// Chains, counters and generators.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// Corpus loading helpers.
pub mod io;

pub use error::MarkovError;
pub use model::chain::{Chain, ChainModel, ChainStats, SentenceChain, WordChain};
pub use model::counter::WeightedCounter;
pub use model::generator::Generator;
pub use model::rng::{DEFAULT_SEED, SharedRng};
pub use model::text::{Mode, TextChain};
pub use model::token::Token;
