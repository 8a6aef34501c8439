use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::{LevelFilter, info};
use rs_markov_core::io::read_lines;
use rs_markov_core::{Mode, TextChain};

/// CLI tool to use Markov chains.
#[derive(Parser, Debug)]
#[command(name = "markov", version, about = "CLI tool to use Markov chains")]
#[command(long_about = "A CLI tool to feed a Markov chain and generate tokens.")]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Manage a sentence chain/generator, where each token is a word.
	/// Each example is a "sentence" to feed the chain.
	#[command(after_help = "Example: markov sentence \"my sentence\" \"my other sentence\"")]
	Sentence(ChainArgs),

	/// Manage a word chain/generator, where each token is a character.
	/// Any string of characters is allowed, including spacing and
	/// punctuation, so this can also generate whole sentences of
	/// made-up words.
	#[command(after_help = "Example: markov word \"foo\" \"bar\"")]
	Word(ChainArgs),
}

#[derive(Args, Debug)]
struct ChainArgs {
	/// Example sequences to feed the chain
	examples: Vec<String>,

	/// The number of tokens to use as a prefix
	#[arg(long, value_name = "N", default_value_t = 1)]
	prefix: usize,

	/// Seed for the random source (random if omitted)
	#[arg(long, value_name = "SEED", allow_negative_numbers = true)]
	seed: Option<i64>,

	/// Stop a generated sequence after this many tokens
	#[arg(long, value_name = "N")]
	max_tokens: Option<usize>,

	/// Read additional examples from a file, one per line
	#[arg(short, long, value_name = "PATH")]
	file: Option<PathBuf>,

	/// Number of sequences to generate
	#[arg(short = 'n', long, value_name = "N", default_value_t = 1)]
	count: usize,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let (mode, args) = match cli.command {
		Commands::Sentence(args) => (Mode::Sentence, args),
		Commands::Word(args) => (Mode::Word, args),
	};

	for line in run(mode, args)? {
		println!("{line}");
	}
	Ok(())
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = if quiet > 0 {
		LevelFilter::Error
	} else {
		match verbose {
			0 => LevelFilter::Warn,
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	builder.filter_level(level);
	let _ = builder.try_init();
}

/// Feeds every example into a new chain and generates `count` sequences.
fn run(mode: Mode, args: ChainArgs) -> Result<Vec<String>> {
	let mut examples = args.examples;
	if let Some(path) = &args.file {
		let lines = read_lines(path).with_context(|| format!("unable to read examples from {}", path.display()))?;
		examples.extend(lines);
	}
	if examples.is_empty() {
		bail!("no examples provided, pass at least one example or --file");
	}

	let seed = args.seed.unwrap_or_else(rand::random);
	info!("{mode} chain: prefix={} seed={seed} examples={}", args.prefix, examples.len());

	let mut chain = TextChain::with_seed(mode, args.prefix, seed)?;
	for example in &examples {
		chain.feed_text(example).with_context(|| format!("unable to feed {example:?}"))?;
	}

	(0..args.count)
		.map(|_| chain.generate(args.max_tokens).map_err(anyhow::Error::from))
		.collect()
}
