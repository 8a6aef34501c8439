use log::{trace, warn};

use super::chain::Chain;
use super::token::Token;
use crate::error::MarkovError;

/// Lazy cursor producing one token at a time from a populated [`Chain`].
///
/// The generator owns its current window and only reads the chain. Its
/// random draws go through the chain's shared source, so a chain's seed
/// determines every run started from it, in order.
///
/// # States
/// - running: the window's lead token is a regular token
/// - terminal: the lead token is the sentinel; `next_token` keeps
///   reporting it with `stop = true` and nothing changes anymore
///
/// A run is finite whenever the reachable part of the chain eventually
/// leads to the sentinel. Cyclic data can make it endless, so callers
/// wanting a bound must impose one (see [`Generator::take_sequence`]).
#[derive(Debug)]
pub struct Generator<'a, T: Token> {
	chain: &'a Chain<T>,
	window: Vec<T>,
}

impl<'a, T: Token> Generator<'a, T> {
	pub(crate) fn new(chain: &'a Chain<T>, window: Vec<T>) -> Self {
		Self { chain, window }
	}

	/// Returns the current window, lead token first.
	pub fn window(&self) -> &[T] {
		&self.window
	}

	/// Returns the next token, and whether the sequence has stopped.
	///
	/// When `stop` is true the returned token is the sentinel and carries
	/// no content.
	///
	/// # Errors
	/// Only fails if the chain holds an empty counter, which feeding never
	/// produces.
	pub fn next_token(&mut self) -> Result<(T, bool), MarkovError> {
		let token = self.window.first().cloned().unwrap_or_else(T::terminal);
		if token.is_terminal() {
			return Ok((token, true));
		}

		// Once the sentinel entered the window, only sentinels can follow.
		let next = if self.window.iter().any(|token| token.is_terminal()) {
			T::terminal()
		} else {
			match self.chain.transitions(&self.window) {
				Some(counter) => counter.select()?,
				None => {
					warn!("window {:?} was never observed, ending sequence", self.window);
					T::terminal()
				}
			}
		};
		trace!("{:?} -> {next:?}", self.window);

		self.window.rotate_left(1);
		if let Some(last) = self.window.last_mut() {
			*last = next;
		}
		Ok((token, false))
	}

	/// Returns `true` if another regular token can be returned.
	pub fn has_next(&self) -> bool {
		self.window.first().is_some_and(|token| !token.is_terminal())
	}

	/// Collects the remaining tokens of the run, stopping early after
	/// `limit` tokens if one is given.
	pub fn take_sequence(&mut self, limit: Option<usize>) -> Result<Vec<T>, MarkovError> {
		self.by_ref().take(limit.unwrap_or(usize::MAX)).collect()
	}
}

/// Yields every regular token of the run, then ends at the sentinel.
impl<T: Token> Iterator for Generator<'_, T> {
	type Item = Result<T, MarkovError>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.next_token() {
			Ok((_, true)) => None,
			Ok((token, false)) => Some(Ok(token)),
			Err(e) => {
				// Report once, then behave as terminated.
				self.window.fill(T::terminal());
				Some(Err(e))
			}
		}
	}
}
