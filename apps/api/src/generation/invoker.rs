//! Generation Invoker — runs the loaded model on a prompt.
//!
//! `TextGenerator` is the seam between the request pipeline and inference.
//! `AppState` carries an `Arc<dyn TextGenerator>`; production uses
//! `LocalModelGenerator`, tests swap in a fixed-text generator.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use thiserror::Error;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::generation::sampling::SamplingConfig;
use crate::model::{CausalLm, LoadedModel};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Model execution error: {0}")]
    Model(#[from] candle_core::Error),

    #[error("Prompt encoded to zero tokens")]
    EmptyPrompt,

    #[error("Generation worker aborted: {0}")]
    Aborted(String),
}

/// One prompt plus the decoding parameters and seed to run it with.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub sampling: SamplingConfig,
    pub seed: u64,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the decoded prompt plus continuation, special tokens removed.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Runs generations against the model loaded at startup.
///
/// The mutex serializes access to the model's key/value cache, so concurrent
/// submissions generate one after another.
pub struct LocalModelGenerator {
    model: Arc<Mutex<LoadedModel>>,
}

impl LocalModelGenerator {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            model: Arc::new(Mutex::new(model)),
        }
    }
}

#[async_trait]
impl TextGenerator for LocalModelGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || {
            // Poisoning is ignored: run_generation clears the KV cache first.
            let mut loaded = model.lock().unwrap_or_else(PoisonError::into_inner);
            let LoadedModel {
                tokenizer,
                model,
                eos_token_id,
                device,
                ..
            } = &mut *loaded;
            run_generation(model.as_mut(), tokenizer, device, *eos_token_id, &request)
        })
        .await
        .map_err(|e| GenerationError::Aborted(e.to_string()))?
    }
}

/// Samples up to `max_new_tokens` after the prompt, stopping early at EOS.
pub fn run_generation(
    model: &mut dyn CausalLm,
    tokenizer: &Tokenizer,
    device: &Device,
    eos_token_id: u32,
    request: &GenerationRequest,
) -> Result<String, GenerationError> {
    let started = Instant::now();
    model.clear_kv_cache()?;

    let encoding = tokenizer
        .encode(request.prompt.as_str(), true)
        .map_err(|e| GenerationError::Tokenizer(e.to_string()))?;
    let mut tokens = encoding.get_ids().to_vec();
    if tokens.is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }
    let prompt_len = tokens.len();

    let mut logits_processor =
        LogitsProcessor::from_sampling(request.seed, request.sampling.sampling());

    for step in 0..request.sampling.max_new_tokens {
        let (context, offset) = if step == 0 {
            (&tokens[..], 0)
        } else {
            (&tokens[tokens.len() - 1..], tokens.len() - 1)
        };
        let input = Tensor::new(context, device)?.unsqueeze(0)?;
        let logits = model
            .forward(&input, offset)?
            .flatten_all()?
            .to_dtype(DType::F32)?;
        let next = logits_processor.sample(&logits)?;
        tokens.push(next);
        if next == eos_token_id {
            debug!("EOS reached after {} new tokens", step + 1);
            break;
        }
    }

    let text = tokenizer
        .decode(&tokens, true)
        .map_err(|e| GenerationError::Tokenizer(e.to_string()))?;

    info!(
        "Generated {} tokens from a {}-token prompt in {:.1}s",
        tokens.len() - prompt_len,
        prompt_len,
        started.elapsed().as_secs_f32()
    );

    Ok(text)
}
