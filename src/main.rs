use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use actransit::client::TransitClient;

mod actransit;
mod config;
mod handlers;
mod model;

#[derive(Parser)]
#[command(name = "actransit_departures")]
#[command(about = "Serves live AC Transit stop and departure predictions", long_about = None)]
struct Args {
    /// Port to listen on, overrides the PORT environment variable
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !config::is_production_environment() {
        config::load_env();
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let appender = tracing_appender::rolling::daily("./logs", "actransit_departures.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);

    // A layer that logs events to rolling files.
    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_appender)
        .with_ansi(false)
        .pretty();

    Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_log)
        .with(env_filter)
        .init();

    // The only place environment state turns into configuration
    let client = TransitClient::from_env();
    let port = args.port.unwrap_or_else(config::server_port);

    let app = Router::new()
        .route("/transit/all", get(handlers::all_transit_stops))
        .route("/transit/stop/{stop_id}", get(handlers::transit_stop))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .with_state(client);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("couldn't bind port {port}"))?;

    info!("serving on port {port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("error listening for the shutdown signal: {e}");
    }
}
