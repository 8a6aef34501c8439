use std::fmt::Debug;
use std::hash::Hash;

/// A value a chain can be built from.
///
/// Tokens must be hashable (transition lookup) and totally ordered, so
/// that counters walk their entries in the same order on every instance.
///
/// Each token type reserves one value as the terminal sentinel. Callers
/// must never feed that value: a chain fed with it has undefined output.
pub trait Token: Clone + Eq + Hash + Ord + Debug {
	/// The sentinel marking the end of a sequence.
	fn terminal() -> Self;

	/// Whether this token is the terminal sentinel.
	fn is_terminal(&self) -> bool {
		*self == Self::terminal()
	}
}

/// Characters of a "word". The NUL code point ends the word.
impl Token for char {
	fn terminal() -> Self {
		'\0'
	}

	fn is_terminal(&self) -> bool {
		*self == '\0'
	}
}

/// Words of a sentence. The empty word ends the sentence.
impl Token for String {
	fn terminal() -> Self {
		String::new()
	}

	fn is_terminal(&self) -> bool {
		self.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sentinels() {
		assert!('\0'.is_terminal());
		assert!(!'a'.is_terminal());
		assert!(String::terminal().is_terminal());
		assert!(!"word".to_owned().is_terminal());
	}
}
