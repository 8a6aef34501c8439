//! Top-level module for the Markov chain system.
//!
//! This module provides:
//! - Token types and their terminal sentinels (`Token`)
//! - A seedable random source shared across a chain (`SharedRng`)
//! - Frequency counters sampled as weighted distributions (`WeightedCounter`)
//! - Prefix-window chains over characters or words (`Chain`)
//! - Lazy generators walking a chain (`Generator`)
//! - A plain-text front for both chain variants (`TextChain`)

/// Token abstraction and sentinel values.
pub mod token;

/// Random source shared by every counter of a chain.
pub mod rng;

/// Weighted frequency counter.
///
/// Counts occurrences per value and samples values proportionally
/// to their counts.
pub mod counter;

/// Fixed-order Markov chain.
///
/// Handles sequence ingestion, transition counting and the
/// starting-window distribution.
pub mod chain;

/// Lazy generation over a populated chain.
pub mod generator;

/// Text tokenization and rendering for both chain variants.
pub mod text;
