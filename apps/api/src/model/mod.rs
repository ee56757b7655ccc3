//! Model Provider — loads the tokenizer and causal LM from a local directory.
//!
//! Loading happens once in `main`. Every failure here is fatal: the caller
//! surfaces the error and the process exits without serving requests.
//!
//! Expected directory layout (as written by `save_pretrained`):
//! `config.json`, `tokenizer.json`, optional `generation_config.json`, and
//! weights as `model.safetensors`, sharded safetensors with
//! `model.safetensors.index.json`, or a legacy `pytorch_model.bin`.

pub mod architecture;
pub mod device;
pub mod gpt2;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use serde::Deserialize;
use thiserror::Error;
use tokenizers::Tokenizer;
use tracing::info;

pub use architecture::{Architecture, CausalLm};
pub use device::{device_label, select_device};

const CONFIG_FILE: &str = "config.json";
const GENERATION_CONFIG_FILE: &str = "generation_config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const SAFETENSORS_INDEX_FILE: &str = "model.safetensors.index.json";
const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Tokens tried, in order, when no config names an end-of-sequence id.
const EOS_TOKEN_CANDIDATES: &[&str] = &["<|endoftext|>", "</s>", "<|im_end|>", "<eos>"];

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("I/O error reading model artifacts: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Model weights error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("Unsupported model_type '{0}' (expected gpt2, llama or qwen2)")]
    UnsupportedArchitecture(String),

    #[error("No end-of-sequence token id in config or tokenizer")]
    MissingEosToken,
}

/// The tokenizer and model pair, bound to one device.
///
/// Constructed once and owned by the generator; the tokenizer and weights are
/// never mutated after load.
pub struct LoadedModel {
    pub tokenizer: Tokenizer,
    pub model: Box<dyn CausalLm>,
    pub eos_token_id: u32,
    pub architecture: Architecture,
    pub device: Device,
}

#[derive(Debug, Deserialize)]
struct ModelTypeField {
    model_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenIds {
    One(u32),
    Many(Vec<u32>),
}

impl TokenIds {
    fn first(&self) -> Option<u32> {
        match self {
            TokenIds::One(id) => Some(*id),
            TokenIds::Many(ids) => ids.first().copied(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EosField {
    #[serde(default)]
    eos_token_id: Option<TokenIds>,
}

#[derive(Debug, PartialEq)]
enum WeightFiles {
    SafeTensors(Vec<PathBuf>),
    Pytorch(PathBuf),
}

/// Loads tokenizer and model from `model_dir` onto `device`.
pub fn load(model_dir: &Path, device: Device) -> Result<LoadedModel, ModelLoadError> {
    let started = Instant::now();

    if !model_dir.is_dir() {
        return Err(ModelLoadError::MissingArtifact(model_dir.to_path_buf()));
    }

    let config_json = read_required(&model_dir.join(CONFIG_FILE))?;
    let architecture = detect_architecture(&config_json)?;

    let tokenizer_path = require_file(model_dir.join(TOKENIZER_FILE))?;
    let tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| ModelLoadError::Tokenizer(e.to_string()))?;

    let eos_token_id = resolve_eos_token_id(model_dir, &tokenizer)?;

    let dtype = DType::F32;
    let vb = match find_weights(model_dir)? {
        // SAFETY: the weight files are memory-mapped read-only and are not
        // modified while the process runs.
        WeightFiles::SafeTensors(paths) => unsafe {
            VarBuilder::from_mmaped_safetensors(&paths, dtype, &device)?
        },
        WeightFiles::Pytorch(path) => VarBuilder::from_pth(&path, dtype, &device)?,
    };
    let model = architecture.build(&config_json, vb, dtype, &device)?;

    info!(
        "Loaded {} model from {} on {} in {:.1}s (eos_token_id={})",
        architecture,
        model_dir.display(),
        device_label(&device),
        started.elapsed().as_secs_f32(),
        eos_token_id
    );

    Ok(LoadedModel {
        tokenizer,
        model,
        eos_token_id,
        architecture,
        device,
    })
}

fn require_file(path: PathBuf) -> Result<PathBuf, ModelLoadError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ModelLoadError::MissingArtifact(path))
    }
}

fn read_required(path: &Path) -> Result<Vec<u8>, ModelLoadError> {
    let path = require_file(path.to_path_buf())?;
    Ok(std::fs::read(path)?)
}

fn detect_architecture(config_json: &[u8]) -> Result<Architecture, ModelLoadError> {
    let field: ModelTypeField = serde_json::from_slice(config_json)?;
    let model_type = field.model_type.unwrap_or_default();
    Architecture::from_model_type(&model_type)
        .ok_or(ModelLoadError::UnsupportedArchitecture(model_type))
}

/// `generation_config.json` wins over `config.json`; the tokenizer vocabulary
/// is the last resort.
fn resolve_eos_token_id(model_dir: &Path, tokenizer: &Tokenizer) -> Result<u32, ModelLoadError> {
    for file in [GENERATION_CONFIG_FILE, CONFIG_FILE] {
        if let Some(id) = read_eos_token_id(&model_dir.join(file))? {
            return Ok(id);
        }
    }

    EOS_TOKEN_CANDIDATES
        .iter()
        .find_map(|token| tokenizer.token_to_id(token))
        .ok_or(ModelLoadError::MissingEosToken)
}

fn read_eos_token_id(path: &Path) -> Result<Option<u32>, ModelLoadError> {
    if !path.is_file() {
        return Ok(None);
    }
    let field: EosField = serde_json::from_slice(&std::fs::read(path)?)?;
    Ok(field.eos_token_id.as_ref().and_then(TokenIds::first))
}

fn find_weights(model_dir: &Path) -> Result<WeightFiles, ModelLoadError> {
    let single = model_dir.join(SAFETENSORS_FILE);
    if single.is_file() {
        return Ok(WeightFiles::SafeTensors(vec![single]));
    }

    let index = model_dir.join(SAFETENSORS_INDEX_FILE);
    if index.is_file() {
        let index: serde_json::Value = serde_json::from_slice(&std::fs::read(&index)?)?;
        let shards: BTreeSet<&str> = index
            .get("weight_map")
            .and_then(|m| m.as_object())
            .map(|m| m.values().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        if shards.is_empty() {
            return Err(ModelLoadError::MissingArtifact(model_dir.join(SAFETENSORS_INDEX_FILE)));
        }
        let paths = shards
            .into_iter()
            .map(|shard| require_file(model_dir.join(shard)))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(WeightFiles::SafeTensors(paths));
    }

    let pytorch = model_dir.join(PYTORCH_FILE);
    if pytorch.is_file() {
        return Ok(WeightFiles::Pytorch(pytorch));
    }

    Err(ModelLoadError::MissingArtifact(single))
}
