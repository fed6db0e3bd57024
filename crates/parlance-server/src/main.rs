//! Parlance Server - HTTP API for speech transcription and translation

use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlance_core::{
    EngineSecrets, RestSpeechEngine, SpeechConfig, SpeechEngine, TranslationOrchestrator,
};
use parlance_server::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "parlance_server=debug,parlance_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parlance speech server");

    let secrets = EngineSecrets::from_env()
        .ok_or_else(|| anyhow::anyhow!("SPEECH_KEY and SPEECH_REGION must be set"))?;
    let config = SpeechConfig::default();
    info!("Staging directory: {:?}", config.staging_dir);

    let engine: Arc<dyn SpeechEngine> = Arc::new(RestSpeechEngine::new(secrets, &config));
    let orchestrator = TranslationOrchestrator::new(engine, &config);
    let state = AppState::new(orchestrator);

    info!("Speech engine client initialized");

    // Build router
    let app = api::create_router(state.clone());

    // Start server
    let host = std::env::var("PARLANCE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("PARLANCE_PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid PARLANCE_PORT='{}', falling back to 8080", raw);
                8080
            }
        },
        Err(_) => 8080,
    };
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    info!("Server ready. Press Ctrl+C to stop.");
    server.await?;

    Ok(())
}

/// Wait for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
