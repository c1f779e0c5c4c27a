//! RAG (Retrieval-Augmented Generation) module
//!
//! Extracts text from an uploaded CV and builds a per-interview chunk
//! index used to ground question generation.

pub mod chunker;
pub mod cv_ingest;
pub mod embedding;
pub mod retriever;
pub mod service;
pub mod vectordb;

pub use embedding::EmbeddingService;
pub use service::{RagError, RagService};
#[allow(unused_imports)]
pub use vectordb::{SearchResult, VectorStore};
