//! Chatsync daemon entry point.
//!
//! Binary name: `chatsyncd`
//!
//! Parses CLI arguments, initializes tracing and the document store, then
//! serves the trigger ingress and liveness endpoints until shutdown.

mod http;
mod state;

use clap::Parser;

use state::AppState;

/// Keeps the messaging subsystem in sync with the booking workflow.
#[derive(Debug, Parser)]
#[command(name = "chatsyncd", version, about)]
struct Cli {
    /// Address to bind the HTTP surface to.
    #[arg(long, env = "CHATSYNC_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP surface.
    #[arg(long, env = "CHATSYNC_PORT", default_value_t = 8080)]
    port: u16,

    /// Export spans via OpenTelemetry (stdout exporter).
    #[arg(long, env = "CHATSYNC_OTEL")]
    otel: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG overrides.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    chatsync_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;
    for route in state.trigger_router.describe_routes() {
        tracing::info!(%route, "trigger registered");
    }

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Chatsync listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    chatsync_observe::tracing_setup::shutdown_tracing();
    println!("\n  Server stopped.");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
