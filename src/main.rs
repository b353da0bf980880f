use std::sync::Arc;

use clap::Parser;

mod config;
mod handler;
mod http;
mod logger;
mod relay;
mod routing;
mod script;
mod server;

/// VPNet web service: gf-relay reverse proxy and gfwrt setup scripts
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (extension optional); `VPNET_<SECTION>__<KEY>` variables override it
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration errors are fatal before anything listens
    let cfg = config::Config::load_from(&args.config).map_err(|e| {
        eprintln!("[VPNet] {e}");
        e
    })?;
    logger::init(&cfg.logging)?;

    // Create Tokio runtime, worker count from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(cfg)?);

    let listener = server::create_listener(addr).map_err(|e| {
        logger::log_error(&format!("Failed to bind {addr}: {e}"));
        e
    })?;
    logger::log_server_start(&listener.local_addr()?, &state.config, &state.relay);

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    tracing::info!("[VPNet] Server stopped");
    Ok(())
}
