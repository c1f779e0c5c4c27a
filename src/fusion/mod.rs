//! Fusion & Report: weighted axis scoring, grading, narrative summary, and
//! job-wide ranking for completed interviews (§4.7)

pub mod report;

pub use report::{compute_final_score, rank_completed_interviews, FusionEngine};
