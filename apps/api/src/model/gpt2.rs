//! GPT-2 causal language model on `candle-nn`.
//!
//! Loads checkpoints written by `GPT2LMHeadModel.save_pretrained`, with or
//! without the `transformer.` tensor prefix. Projection weights use the
//! `Conv1D` layout, `(in_features, out_features)`, so they are multiplied
//! directly instead of through `candle_nn::Linear`. The LM head is tied to
//! the token embedding.

use candle_core::{DType, Device, Module, Result, Tensor, D};
use candle_nn::{embedding, layer_norm, Embedding, LayerNorm, Linear, VarBuilder};
use serde::Deserialize;

use crate::model::architecture::CausalLm;

fn default_layer_norm_epsilon() -> f64 {
    1e-5
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gpt2Config {
    pub vocab_size: usize,
    pub n_positions: usize,
    pub n_embd: usize,
    pub n_layer: usize,
    pub n_head: usize,
    #[serde(default = "default_layer_norm_epsilon")]
    pub layer_norm_epsilon: f64,
}

#[derive(Debug, Clone)]
struct Conv1D {
    weight: Tensor,
    bias: Tensor,
}

impl Conv1D {
    fn load(in_dim: usize, out_dim: usize, vb: VarBuilder) -> Result<Self> {
        let weight = vb.get((in_dim, out_dim), "weight")?;
        let bias = vb.get(out_dim, "bias")?;
        Ok(Self { weight, bias })
    }
}

impl Module for Conv1D {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        xs.broadcast_matmul(&self.weight)?.broadcast_add(&self.bias)
    }
}

#[derive(Debug, Clone)]
struct Attention {
    c_attn: Conv1D,
    c_proj: Conv1D,
    n_head: usize,
    head_dim: usize,
    kv_cache: Option<(Tensor, Tensor)>,
}

impl Attention {
    fn load(cfg: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        let c_attn = Conv1D::load(cfg.n_embd, 3 * cfg.n_embd, vb.pp("c_attn"))?;
        let c_proj = Conv1D::load(cfg.n_embd, cfg.n_embd, vb.pp("c_proj"))?;
        Ok(Self {
            c_attn,
            c_proj,
            n_head: cfg.n_head,
            head_dim: cfg.n_embd / cfg.n_head,
            kv_cache: None,
        })
    }

    fn split_heads(&self, xs: &Tensor, b: usize, t: usize) -> Result<Tensor> {
        xs.reshape((b, t, self.n_head, self.head_dim))?
            .transpose(1, 2)?
            .contiguous()
    }

    fn forward(&mut self, xs: &Tensor, mask: Option<&Tensor>) -> Result<Tensor> {
        let (b, t, c) = xs.dims3()?;
        let qkv = self.c_attn.forward(xs)?;
        let q = self.split_heads(&qkv.narrow(D::Minus1, 0, c)?, b, t)?;
        let k = self.split_heads(&qkv.narrow(D::Minus1, c, c)?, b, t)?;
        let v = self.split_heads(&qkv.narrow(D::Minus1, 2 * c, c)?, b, t)?;

        let (k, v) = match &self.kv_cache {
            Some((past_k, past_v)) => (Tensor::cat(&[past_k, &k], 2)?, Tensor::cat(&[past_v, &v], 2)?),
            None => (k, v),
        };
        self.kv_cache = Some((k.clone(), v.clone()));

        let scale = 1f64 / (self.head_dim as f64).sqrt();
        let scores = (q.matmul(&k.t()?)? * scale)?;
        let scores = match mask {
            Some(mask) => scores.broadcast_add(mask)?,
            None => scores,
        };
        let weights = candle_nn::ops::softmax_last_dim(&scores)?;
        let ys = weights
            .matmul(&v)?
            .transpose(1, 2)?
            .reshape((b, t, c))?;
        self.c_proj.forward(&ys)
    }
}

#[derive(Debug, Clone)]
struct Mlp {
    c_fc: Conv1D,
    c_proj: Conv1D,
}

impl Mlp {
    fn load(cfg: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        let c_fc = Conv1D::load(cfg.n_embd, 4 * cfg.n_embd, vb.pp("c_fc"))?;
        let c_proj = Conv1D::load(4 * cfg.n_embd, cfg.n_embd, vb.pp("c_proj"))?;
        Ok(Self { c_fc, c_proj })
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        // gelu() is the tanh approximation, matching GPT-2's gelu_new.
        self.c_proj.forward(&self.c_fc.forward(xs)?.gelu()?)
    }
}

#[derive(Debug, Clone)]
struct Block {
    ln_1: LayerNorm,
    attn: Attention,
    ln_2: LayerNorm,
    mlp: Mlp,
}

impl Block {
    fn load(cfg: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            ln_1: layer_norm(cfg.n_embd, cfg.layer_norm_epsilon, vb.pp("ln_1"))?,
            attn: Attention::load(cfg, vb.pp("attn"))?,
            ln_2: layer_norm(cfg.n_embd, cfg.layer_norm_epsilon, vb.pp("ln_2"))?,
            mlp: Mlp::load(cfg, vb.pp("mlp"))?,
        })
    }

    fn forward(&mut self, xs: &Tensor, mask: Option<&Tensor>) -> Result<Tensor> {
        let xs = (xs + self.attn.forward(&self.ln_1.forward(xs)?, mask)?)?;
        &xs + self.mlp.forward(&self.ln_2.forward(&xs)?)?
    }
}

#[derive(Debug, Clone)]
pub struct Gpt2 {
    wte: Embedding,
    wpe: Embedding,
    blocks: Vec<Block>,
    ln_f: LayerNorm,
    lm_head: Linear,
    device: Device,
}

impl Gpt2 {
    pub fn load(cfg: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        let vb = if vb.contains_tensor("transformer.wte.weight") {
            vb.pp("transformer")
        } else {
            vb
        };
        let wte = embedding(cfg.vocab_size, cfg.n_embd, vb.pp("wte"))?;
        let wpe = embedding(cfg.n_positions, cfg.n_embd, vb.pp("wpe"))?;
        let blocks = (0..cfg.n_layer)
            .map(|i| Block::load(cfg, vb.pp(format!("h.{i}"))))
            .collect::<Result<Vec<_>>>()?;
        let ln_f = layer_norm(cfg.n_embd, cfg.layer_norm_epsilon, vb.pp("ln_f"))?;
        let lm_head = Linear::new(wte.embeddings().clone(), None);
        Ok(Self {
            wte,
            wpe,
            blocks,
            ln_f,
            lm_head,
            device: vb.device().clone(),
        })
    }
}

/// Additive mask hiding future positions: `(t, past + t)`, `-inf` above the
/// shifted diagonal.
fn causal_mask(t: usize, past: usize, device: &Device) -> Result<Tensor> {
    let total = past + t;
    let mask: Vec<f32> = (0..t)
        .flat_map(|i| {
            (0..total).map(move |j| if j > i + past { f32::NEG_INFINITY } else { 0.0 })
        })
        .collect();
    Tensor::from_slice(&mask, (t, total), device)
}

impl CausalLm for Gpt2 {
    fn forward(&mut self, input_ids: &Tensor, seqlen_offset: usize) -> Result<Tensor> {
        let (_b, t) = input_ids.dims2()?;
        let positions = Tensor::arange(seqlen_offset as u32, (seqlen_offset + t) as u32, &self.device)?;
        let mut xs = self
            .wte
            .forward(input_ids)?
            .broadcast_add(&self.wpe.forward(&positions)?)?;

        let mask = if t > 1 {
            Some(causal_mask(t, seqlen_offset, &self.device)?.to_dtype(xs.dtype())?)
        } else {
            None
        };
        for block in self.blocks.iter_mut() {
            xs = block.forward(&xs, mask.as_ref())?;
        }

        let xs = self.ln_f.forward(&xs)?.narrow(1, t - 1, 1)?;
        self.lm_head.forward(&xs)?.to_dtype(DType::F32)
    }

    fn clear_kv_cache(&mut self) -> Result<()> {
        for block in self.blocks.iter_mut() {
            block.attn.kv_cache = None;
        }
        Ok(())
    }
}
