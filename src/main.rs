//! Essay grader entrypoint.
//!
//! `grader` serves HTTP, `grader --invoke` scores one event read from stdin,
//! `grader --health-check` checks a running server.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use grader::config::Config;
use grader::gateway::{HandlerState, create_router_with_state, run_grader};
use grader::registry::ModelRegistry;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    // stdout is reserved for the envelope in --invoke mode.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        artifact_root = %config.artifact_root.display(),
        stub_models = config.stub_models,
        preload = config.preload,
        "Essay grader starting"
    );

    let registry = Arc::new(ModelRegistry::new(config.registry_config()));
    let state = HandlerState::new(Arc::clone(&registry), config.stub_models);

    if std::env::args().any(|arg| arg == "--invoke") {
        let mut input = Vec::new();
        std::io::stdin().read_to_end(&mut input)?;
        let envelope = run_grader(&state, &input).await;
        println!("{}", serde_json::to_string(&envelope)?);
        return Ok(());
    }

    if config.preload {
        preload_models(Arc::clone(&registry)).await?;
    }

    let addr = config.socket_addr();
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Essay grader shutdown complete");
    Ok(())
}

/// Warm start. A failed load is logged and retried by the first request.
async fn preload_models(registry: Arc<ModelRegistry>) -> anyhow::Result<()> {
    tracing::info!("Preloading models...");
    let outcome = tokio::task::spawn_blocking(move || registry.ensure_loaded().map(|_| ())).await?;

    match outcome {
        Ok(()) => tracing::info!("Preload complete."),
        Err(e) => tracing::warn!("Failed to preload models: {}. Loading on first request.", e),
    }
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("GRADER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
