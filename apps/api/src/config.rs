use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL_PATH: &str = "./fine_tuned_model";

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local directory holding the tokenizer and model checkpoint.
    pub model_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Skip accelerator probing and run on the CPU.
    pub force_cpu: bool,
    /// Pins the sampler seed so repeated submissions are reproducible.
    pub generation_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let model_path = std::env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());

        Ok(Config {
            model_path: absolute_model_path(&model_path)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            force_cpu: parse_flag(std::env::var("FORCE_CPU").ok().as_deref())
                .context("FORCE_CPU must be true/false/1/0")?,
            generation_seed: std::env::var("GENERATION_SEED")
                .ok()
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("GENERATION_SEED must be an unsigned integer")?,
        })
    }
}

/// Resolves a relative model path against the working directory.
fn absolute_model_path(path: &str) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Cannot resolve MODEL_PATH '{path}'"))
}

fn parse_flag(value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => anyhow::bail!("unrecognized flag value '{other}'"),
    }
}
