use std::collections::BTreeMap;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use serde::Deserialize;

use rs_markov_core::{MarkovError, Mode, TextChain};

/// HTTP front end keeping Markov chains in memory.
#[derive(Parser, Debug)]
#[command(version, about = "Serve in-memory Markov chains over HTTP")]
struct Cli {
	/// Address to bind, as host:port
	#[arg(long, env = "MARKOV_BIND", default_value = "127.0.0.1:5000")]
	bind: String,
}

/// Query parameters for chain creation
#[derive(Deserialize)]
struct CreateParams {
	mode: Option<Mode>,
	prefix: Option<usize>,
	seed: Option<i64>,
}

#[derive(Deserialize)]
struct SeedParams {
	value: i64,
}

/// Query parameters for the generate endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_tokens: Option<usize>,
}

/// Chains by name. The mutex serializes every feed and every run.
#[derive(Default)]
struct SharedData {
	chains: BTreeMap<String, TextChain>,
}

type Shared = web::Data<Mutex<SharedData>>;

macro_rules! lock_or_500 {
	($data:expr) => {
		match $data.lock() {
			Ok(guard) => guard,
			Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
		}
	};
}

/// HTTP GET endpoint `/v1/chains`
///
/// Lists chain names, one per line.
#[get("/v1/chains")]
async fn list_chains(data: Shared) -> impl Responder {
	let shared_data = lock_or_500!(data);
	let names: Vec<&str> = shared_data.chains.keys().map(String::as_str).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

/// HTTP PUT endpoint `/v1/chains/{name}`
///
/// Creates an empty chain, replacing any chain of the same name.
/// Defaults to sentence mode with a prefix of 1.
#[put("/v1/chains/{name}")]
async fn create_chain(data: Shared, name: web::Path<String>, query: web::Query<CreateParams>) -> impl Responder {
	let mode = query.mode.unwrap_or(Mode::Sentence);
	let prefix = query.prefix.unwrap_or(1);
	let chain = match query.seed {
		Some(seed) => TextChain::with_seed(mode, prefix, seed),
		None => TextChain::new(mode, prefix),
	};
	let chain = match chain {
		Ok(c) => c,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let name = name.into_inner();
	info!("creating {mode} chain {name:?} with prefix {prefix}");
	let mut shared_data = lock_or_500!(data);
	shared_data.chains.insert(name, chain);
	HttpResponse::Ok().body("Chain created")
}

/// HTTP PUT endpoint `/v1/chains/{name}/feed`
///
/// Feeds every non-blank line of the body as one example. Stops at the
/// first example that cannot be fed; the examples before it stay fed.
#[put("/v1/chains/{name}/feed")]
async fn feed_chain(data: Shared, name: web::Path<String>, body: String) -> impl Responder {
	let mut shared_data = lock_or_500!(data);
	let chain = match shared_data.chains.get_mut(name.as_str()) {
		Some(c) => c,
		None => return HttpResponse::NotFound().body("Unknown chain"),
	};

	let mut fed = 0;
	for (number, line) in body.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
		if let Err(e) = chain.feed_text(line) {
			return HttpResponse::BadRequest().body(format!("line {}: {e}", number + 1));
		}
		fed += 1;
	}
	info!("fed {fed} examples into {:?}", name.as_str());
	HttpResponse::Ok().body(format!("Fed {fed} examples"))
}

/// HTTP PUT endpoint `/v1/chains/{name}/seed`
#[put("/v1/chains/{name}/seed")]
async fn seed_chain(data: Shared, name: web::Path<String>, query: web::Query<SeedParams>) -> impl Responder {
	let mut shared_data = lock_or_500!(data);
	match shared_data.chains.get_mut(name.as_str()) {
		Some(chain) => {
			chain.seed(query.value);
			HttpResponse::Ok().body("Chain seeded")
		}
		None => HttpResponse::NotFound().body("Unknown chain"),
	}
}

/// HTTP GET endpoint `/v1/chains/{name}/generate`
///
/// Generates one sequence. `max_tokens` bounds it, since cyclic chains
/// may otherwise never reach their end.
#[get("/v1/chains/{name}/generate")]
async fn generate(data: Shared, name: web::Path<String>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	let chain = match shared_data.chains.get(name.as_str()) {
		Some(c) => c,
		None => return HttpResponse::NotFound().body("Unknown chain"),
	};

	match chain.generate(query.max_tokens) {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(MarkovError::NotFed) => HttpResponse::Conflict().body("Chain has not been fed"),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/chains/{name}/stats`
#[get("/v1/chains/{name}/stats")]
async fn chain_stats(data: Shared, name: web::Path<String>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	match shared_data.chains.get(name.as_str()) {
		Some(chain) => HttpResponse::Ok().json(chain.stats()),
		None => HttpResponse::NotFound().body("Unknown chain"),
	}
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(list_chains)
		.service(create_chain)
		.service(feed_chain)
		.service(seed_chain)
		.service(generate)
		.service(chain_stats);
}

/// Main entry point for the server.
///
/// Wraps all chains in a `Mutex` for thread safety and starts an
/// Actix-web HTTP server. Nothing is persisted: chains live as long as
/// the process.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let shared_data = web::Data::new(Mutex::new(SharedData::default()));

	info!("listening on {}", cli.bind);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind(&cli.bind)
		.with_context(|| format!("unable to bind {}", cli.bind))?
		.run()
		.await?;
	Ok(())
}
