use std::sync::Arc;

use crate::config::Config;
use crate::generation::invoker::TextGenerator;

/// Display details about the loaded model, captured once at startup.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// e.g. `"GPU - CUDA:0"` or `"CPU"`.
    pub device: String,
    pub model_path: String,
    pub architecture: String,
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generator. Default: `LocalModelGenerator` over the model loaded at startup.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
    pub model_info: ModelInfo,
}
