// Prompt layout for the fine-tuned cover letter model.
// The model was trained on this exact label order; changing a label or the
// order changes what it generates.

use crate::models::application::ApplicationRecord;

/// Final prompt line. The model continues after it, and the extractor splits on it.
pub const SENTINEL: &str = "Cover Letter:";

/// Serializes the record into the fixed prompt. User text is passed through
/// unmodified: no escaping, no truncation.
pub fn build_prompt(record: &ApplicationRecord) -> String {
    format!(
        "Job Title: {}\n\
         Hiring Company: {}\n\
         Applicant Name: {}\n\
         Working Experience: {}\n\
         Skillsets: {}\n\
         {SENTINEL}\n",
        record.job_title, record.company, record.applicant_name, record.experience, record.skills,
    )
}
