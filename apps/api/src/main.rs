mod config;
mod errors;
mod generation;
mod model;
mod models;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::invoker::LocalModelGenerator;
use crate::model::{device_label, select_device};
use crate::routes::build_router;
use crate::state::{AppState, ModelInfo};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cover Letter API v{}", env!("CARGO_PKG_VERSION"));

    // Select compute device
    let device = select_device(config.force_cpu);
    let device_name = device_label(&device);
    info!("Compute device: {device_name}");

    // Load tokenizer + model once; the process cannot serve without them
    let loaded = model::load(&config.model_path, device).with_context(|| {
        format!(
            "Failed to load model from {}",
            config.model_path.display()
        )
    })?;

    let model_info = ModelInfo {
        device: device_name,
        model_path: config.model_path.display().to_string(),
        architecture: loaded.architecture.to_string(),
    };

    if let Some(seed) = config.generation_seed {
        info!("Sampler seed pinned to {seed}");
    }

    // Build app state
    let state = AppState {
        generator: Arc::new(LocalModelGenerator::new(loaded)),
        config: config.clone(),
        model_info,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
