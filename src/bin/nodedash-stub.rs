//! Development stand-in for the broker API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use clap::Parser;
use tokio::sync::RwLock;

use nodedash::logging::{self, LogTarget};

#[path = "nodedash_stub/fixtures.rs"]
mod fixtures;
use self::fixtures::Fixtures;
#[path = "nodedash_stub/http_error.rs"]
mod http_error;
#[path = "nodedash_stub/handlers.rs"]
mod handlers;

#[derive(Parser)]
#[command(name = "nodedash-stub")]
#[command(about = "Stub broker serving canned nodes, images and job results", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8001")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// JSON file with `nodes`, `images` and `classes`
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Delay before answering train/inference requests
    #[arg(long, default_value_t = 0)]
    job_delay_ms: u64,
}

pub(crate) struct StubState {
    pub(crate) fixtures: Fixtures,
    pub(crate) job_delay: Duration,
    /// Models trained since startup, per node.
    pub(crate) trained: RwLock<HashMap<String, Vec<String>>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(LogTarget::Stderr, "info")?;

    let fixtures = match &args.fixtures {
        Some(path) => Fixtures::load(path)?,
        None => Fixtures::default(),
    };

    let state = Arc::new(StubState {
        fixtures,
        job_delay: Duration::from_millis(args.job_delay_ms),
        trained: RwLock::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/nodes", get(handlers::nodes))
        .route("/images", get(handlers::images))
        .route("/image", get(handlers::image))
        .route("/get_json", get(handlers::get_json))
        .route("/train", post(handlers::train))
        .route("/inference", post(handlers::inference))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(%local_addr, "nodedash-stub listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
