use candle_transformers::generation::Sampling;
use serde::Serialize;

/// Decoding parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingConfig {
    pub max_new_tokens: usize,
    pub temperature: f64,
    pub top_k: usize,
    pub top_p: f64,
}

impl SamplingConfig {
    /// The fixed configuration used for every cover letter.
    pub const COVER_LETTER: SamplingConfig = SamplingConfig {
        max_new_tokens: 400,
        temperature: 0.7,
        top_k: 50,
        top_p: 0.95,
    };

    /// Top-k filtering first, then nucleus filtering over the survivors.
    pub fn sampling(&self) -> Sampling {
        Sampling::TopKThenTopP {
            k: self.top_k,
            p: self.top_p,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_letter_config_values() {
        let cfg = SamplingConfig::COVER_LETTER;
        assert_eq!(cfg.max_new_tokens, 400);
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.top_k, 50);
        assert_eq!(cfg.top_p, 0.95);
    }

    #[test]
    fn test_sampling_is_top_k_then_top_p() {
        let sampling = SamplingConfig::COVER_LETTER.sampling();
        assert!(matches!(
            sampling,
            Sampling::TopKThenTopP { k: 50, p, temperature } if p == 0.95 && temperature == 0.7
        ));
    }
}
