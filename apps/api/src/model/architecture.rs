//! Supported causal LM architectures behind one object-safe trait.

use std::fmt;

use candle_core::{DType, Device, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::{llama, qwen2};

use crate::model::gpt2::{Gpt2, Gpt2Config};

/// A decoder-only language model with an internal key/value cache.
///
/// `forward` takes `(batch, seq)` token ids starting at `seqlen_offset` and
/// returns next-token logits for the last position. Callers flatten the
/// result; each architecture keeps its own leading unit dimensions.
pub trait CausalLm: Send {
    fn forward(&mut self, input_ids: &Tensor, seqlen_offset: usize) -> Result<Tensor>;

    /// Drops cached keys/values so the next call starts a fresh sequence.
    fn clear_kv_cache(&mut self) -> Result<()>;
}

/// The `model_type` values accepted in `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Gpt2,
    Llama,
    Qwen2,
}

impl Architecture {
    pub fn from_model_type(model_type: &str) -> Option<Self> {
        match model_type {
            "gpt2" => Some(Architecture::Gpt2),
            "llama" => Some(Architecture::Llama),
            "qwen2" => Some(Architecture::Qwen2),
            _ => None,
        }
    }

    pub fn model_type(&self) -> &'static str {
        match self {
            Architecture::Gpt2 => "gpt2",
            Architecture::Llama => "llama",
            Architecture::Qwen2 => "qwen2",
        }
    }

    /// Builds the model from raw `config.json` bytes and loaded weights.
    pub fn build(
        &self,
        config_json: &[u8],
        vb: VarBuilder,
        dtype: DType,
        device: &Device,
    ) -> std::result::Result<Box<dyn CausalLm>, crate::model::ModelLoadError> {
        let model: Box<dyn CausalLm> = match self {
            Architecture::Gpt2 => {
                let cfg: Gpt2Config = serde_json::from_slice(config_json)?;
                Box::new(Gpt2::load(&cfg, vb)?)
            }
            Architecture::Llama => {
                let cfg = serde_json::from_slice::<llama::LlamaConfig>(config_json)?.into_config(false);
                Box::new(LlamaLm::load(cfg, vb, dtype, device)?)
            }
            Architecture::Qwen2 => {
                let cfg: qwen2::Config = serde_json::from_slice(config_json)?;
                Box::new(Qwen2Lm(qwen2::ModelForCausalLM::new(&cfg, vb)?))
            }
        };
        Ok(model)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_type())
    }
}

/// Llama keeps its cache outside the model; rebuilding it clears it.
struct LlamaLm {
    model: llama::Llama,
    cache: llama::Cache,
    config: llama::Config,
    dtype: DType,
    device: Device,
}

impl LlamaLm {
    fn load(config: llama::Config, vb: VarBuilder, dtype: DType, device: &Device) -> Result<Self> {
        let model = llama::Llama::load(vb, &config)?;
        let cache = llama::Cache::new(true, dtype, &config, device)?;
        Ok(Self {
            model,
            cache,
            config,
            dtype,
            device: device.clone(),
        })
    }
}

impl CausalLm for LlamaLm {
    fn forward(&mut self, input_ids: &Tensor, seqlen_offset: usize) -> Result<Tensor> {
        self.model.forward(input_ids, seqlen_offset, &mut self.cache)
    }

    fn clear_kv_cache(&mut self) -> Result<()> {
        self.cache = llama::Cache::new(true, self.dtype, &self.config, &self.device)?;
        Ok(())
    }
}

struct Qwen2Lm(qwen2::ModelForCausalLM);

impl CausalLm for Qwen2Lm {
    fn forward(&mut self, input_ids: &Tensor, seqlen_offset: usize) -> Result<Tensor> {
        self.0.forward(input_ids, seqlen_offset)
    }

    fn clear_kv_cache(&mut self) -> Result<()> {
        self.0.clear_kv_cache();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_round_trip() {
        for arch in [Architecture::Gpt2, Architecture::Llama, Architecture::Qwen2] {
            assert_eq!(Architecture::from_model_type(arch.model_type()), Some(arch));
        }
    }

    #[test]
    fn test_unknown_model_type() {
        assert_eq!(Architecture::from_model_type("bert"), None);
        assert_eq!(Architecture::from_model_type("GPT2"), None);
    }
}
