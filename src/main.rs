mod action;
mod card;
mod cli;
mod config;
mod ledger;
mod model;
mod navigation;
mod server;
mod translate;
mod views;

use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

use action::{Env, Registry};
use config::Config;
use ledger::{Ledger, SqliteStore};
use server::HttpServer;
use translate::Translator;

fn main() {
    let filter =
        EnvFilter::try_from_env("MAILPANEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = Config::load()?;

    let translator = match &config.translations {
        Some(path) => Translator::load(path)?,
        None => Translator::default(),
    };

    let ledger_path = config
        .ledger_path()
        .ok_or("could not determine home directory")?;
    let store = SqliteStore::open(&ledger_path)
        .map_err(|e| format!("failed to open ledger at {}: {e}", ledger_path.display()))?;
    let ledger = Ledger::new(store);

    let server = HttpServer::new(config.base_url()?, config.api_key.clone())
        .map_err(|e| format!("failed to initialize HTTP client: {e}"))?;
    let registry = Registry::standard();

    let env = Env {
        registry: &registry,
        server: &server,
        ledger: &ledger,
        translator: &translator,
        config: &config,
    };
    cli::run(&env)
}
