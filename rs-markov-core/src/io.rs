use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads a text corpus and returns one example sequence per line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Skips blank lines, which carry no tokens to learn from
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}
