//! Session Coordinator: single entry point for every per-interview
//! operation, dispatching to the question, evaluation, proctoring, voice,
//! and fusion pipelines (§4.1)

pub mod coordinator;

pub use coordinator::{SessionCoordinator, SubmitOutcome};
