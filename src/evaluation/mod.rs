//! LLM-backed four-axis answer scoring with a heuristic fallback (§4.4)

pub mod evaluator;

pub use evaluator::{AnswerEvaluator, EvaluationResult};
