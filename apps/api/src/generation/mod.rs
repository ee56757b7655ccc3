// Cover letter generation: prompt building, model invocation, letter
// extraction, and the per-submission pipeline that ties them to rendering.

pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod invoker;
pub mod prompts;
pub mod sampling;
