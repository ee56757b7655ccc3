//! Cover letter pipeline — one submission, top to bottom.
//!
//! Flow: build_prompt → TextGenerator::generate → extract_letter_body →
//!       render_all (Minimal, Formal, Modern).
//!
//! Nothing here is retried. A generation failure fails the current
//! submission only; the loaded model stays usable for the next one.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::extractor::GenerationResult;
use crate::generation::invoker::{GenerationRequest, TextGenerator};
use crate::generation::prompts::build_prompt;
use crate::generation::sampling::SamplingConfig;
use crate::models::application::ApplicationRecord;
use crate::templates::{format_letter_date, render_all, RenderedLetter};

/// Output of a single submission.
#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterSet {
    pub generation_id: Uuid,
    /// Date printed in every letter, e.g. `19 October 2026`.
    pub generated_on: String,
    pub generation: GenerationResult,
    pub letters: Vec<RenderedLetter>,
}

/// Derives a sampler seed from the per-request id.
fn seed_from_id(id: Uuid) -> u64 {
    let (high, low) = id.as_u64_pair();
    high ^ low
}

/// Runs the full pipeline for `record`.
///
/// `fixed_seed` pins the sampler seed; when unset each submission gets a
/// fresh seed, so identical input yields different letters.
pub async fn generate_cover_letters(
    generator: &dyn TextGenerator,
    record: &ApplicationRecord,
    today: NaiveDate,
    fixed_seed: Option<u64>,
) -> Result<CoverLetterSet, AppError> {
    let generation_id = Uuid::new_v4();
    let request = GenerationRequest {
        prompt: build_prompt(record),
        sampling: SamplingConfig::COVER_LETTER,
        seed: fixed_seed.unwrap_or_else(|| seed_from_id(generation_id)),
    };

    info!(
        "Generating cover letter {} for '{}' at '{}'",
        generation_id, record.job_title, record.company
    );

    let decoded = generator
        .generate(request)
        .await
        .map_err(|e| AppError::Generation(format!("Cover letter generation failed: {e}")))?;

    let generation = GenerationResult::from_decoded(decoded);
    let letters = render_all(&generation.letter_body, record, today);

    info!(
        "Cover letter {} rendered: {} chars of body, {} layouts",
        generation_id,
        generation.letter_body.len(),
        letters.len()
    );

    Ok(CoverLetterSet {
        generation_id,
        generated_on: format_letter_date(today),
        generation,
        letters,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{FailingGenerator, FixedGenerator};
    use super::*;
    use crate::models::application::sample_record;
    use crate::templates::TemplateStyle;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_extracts_and_renders_all_styles() {
        let generator = FixedGenerator::new("\nI am thrilled to apply for this role.\n");
        let set = generate_cover_letters(&generator, &sample_record(), today(), Some(7))
            .await
            .unwrap();

        assert_eq!(set.generation.letter_body, "I am thrilled to apply for this role.");
        assert!(set.generation.raw_text.starts_with("Job Title: Data Analyst\n"));
        assert_eq!(set.generated_on, "19 October 2026");
        let styles: Vec<TemplateStyle> = set.letters.iter().map(|l| l.style).collect();
        assert_eq!(styles, TemplateStyle::ALL.to_vec());
        assert!(set
            .letters
            .iter()
            .all(|l| l.text.contains("I am thrilled to apply for this role.")));
    }

    #[tokio::test]
    async fn test_pipeline_sends_prompt_and_fixed_sampling() {
        let generator = FixedGenerator::new("Body");
        generate_cover_letters(&generator, &sample_record(), today(), Some(7))
            .await
            .unwrap();

        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, build_prompt(&sample_record()));
        assert_eq!(requests[0].sampling, SamplingConfig::COVER_LETTER);
        assert_eq!(requests[0].seed, 7);
    }

    #[tokio::test]
    async fn test_pipeline_output_is_byte_stable_for_fixed_generation() {
        let generator = FixedGenerator::new("\nSame body every time.");
        let first = generate_cover_letters(&generator, &sample_record(), today(), None)
            .await
            .unwrap();
        let second = generate_cover_letters(&generator, &sample_record(), today(), None)
            .await
            .unwrap();
        assert_eq!(first.letters, second.letters);
        assert_ne!(first.generation_id, second.generation_id);
    }

    #[tokio::test]
    async fn test_generation_failure_is_surfaced() {
        let err = generate_cover_letters(&FailingGenerator, &sample_record(), today(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(msg) if msg.contains("out of memory")));
    }

    #[test]
    fn test_seed_from_id_is_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(seed_from_id(id), seed_from_id(id));
    }
}
