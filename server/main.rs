//! simple-mlp HTTP server
//!
//! Trains (or restores) a one-hidden-layer network on a logic gate and serves
//! its metrics and predictions as JSON. Served by a synchronous tiny_http
//! server, one thread per request.
//!
//! Run with:
//!   cargo run --bin mlp-server --release -- --gate xor
//!
//! Endpoints:
//!   GET  /train[?epochs=N]  restore or train, respond with metrics
//!   GET  /metrics           metrics of the current network
//!   POST /predict           {"input": [..]} -> {"output": [..], "class": n}
//!   GET  /model             download the saved model record

mod handlers;
mod routes;
mod state;

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use clap::Parser;
use tiny_http::Server;

use simple_mlp::network::DEFAULT_LEARNING_RATE;
use simple_mlp::persist::DEFAULT_MODEL_PATH;
use simple_mlp::Gate;

use state::{ServerSettings, ServerState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// Gate to learn when no saved model exists
    #[arg(long, default_value = "xor")]
    gate: Gate,
    #[arg(long, default_value_t = 3)]
    hidden: usize,
    /// Passes over the four-row truth table per training run
    #[arg(long, default_value_t = 12_500)]
    epochs: usize,
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f64,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .init();

    let server = Server::http(&args.addr).map_err(|e| anyhow!("failed to bind {}: {e}", args.addr))?;

    let settings = ServerSettings {
        gate:          args.gate,
        hidden:        args.hidden,
        epochs:        args.epochs,
        learning_rate: args.learning_rate,
        model_path:    args.model,
    };
    log::info!("listening on http://{} ({:?})", args.addr, settings);

    let shared_state = Arc::new(Mutex::new(ServerState::new(settings)));

    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
