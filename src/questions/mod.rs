//! LLM-backed initial batch and follow-up question generation (§4.3)

pub mod generator;

pub use generator::{GeneratedQuestion, QuestionGenerator};
