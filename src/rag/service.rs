//! RAG service: CV ingest + per-interview retrieval, with lazy model loading

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;

use super::chunker::chunk_text;
use super::cv_ingest;
use super::retriever::Retriever;
use super::vectordb::{SearchResult, VectorStore};
use super::EmbeddingService;
use crate::db::Repository;

/// Timeout for first-use embedding model load
const INIT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RagError {
    #[error("embedding backend unavailable")]
    IndexUnavailable,
}

struct RagInternals {
    embedding_service: EmbeddingService,
}

/// RAG service with lazy embedding-model initialization
pub struct RagService {
    vector_store: VectorStore,
    model_dir: PathBuf,
    internals: OnceCell<Arc<RagInternals>>,
    init_failed: AtomicBool,
}

impl RagService {
    pub fn new(db: Arc<Repository>, model_dir: PathBuf) -> Self {
        Self {
            vector_store: VectorStore::new(db),
            model_dir,
            internals: OnceCell::new(),
            init_failed: AtomicBool::new(false),
        }
    }

    async fn ensure_initialized(&self) -> Result<Arc<RagInternals>> {
        if self.init_failed.load(Ordering::Relaxed) {
            return Err(RagError::IndexUnavailable.into());
        }

        match tokio::time::timeout(INIT_TIMEOUT, self.do_init()).await {
            Ok(result) => result,
            Err(_) => {
                self.init_failed.store(true, Ordering::Relaxed);
                tracing::error!("embedding model initialization timed out after {:?}", INIT_TIMEOUT);
                Err(RagError::IndexUnavailable.into())
            }
        }
    }

    async fn do_init(&self) -> Result<Arc<RagInternals>> {
        self.internals
            .get_or_try_init(|| async {
                tracing::info!(model_dir = ?self.model_dir, "loading embedding model");

                let model_dir = self.model_dir.clone();
                let embedding_service = tokio::task::spawn_blocking(move || {
                    EmbeddingService::new_from_local(model_dir)
                })
                .await
                .map_err(|e| anyhow!("embedding init task panicked: {}", e))?
                .map_err(|e| {
                    tracing::error!("embedding model init failed: {:?}", e);
                    e
                })?;

                Ok::<_, anyhow::Error>(Arc::new(RagInternals { embedding_service }))
            })
            .await
            .map_err(|_| RagError::IndexUnavailable.into())
            .map(Arc::clone)
    }

    /// Extract, chunk, embed, and upsert a CV's text under `interview_id`.
    ///
    /// Returns the number of chunks stored. Callers treat `EmptyDocument`
    /// and `UnsupportedFormat` as recoverable — the interview proceeds
    /// without CV grounding (§4.2).
    pub async fn ingest_cv(&self, interview_id: &str, file_path: &Path) -> Result<usize> {
        let text = cv_ingest::extract_text(file_path)?;
        let chunks = chunk_text(&text);
        if chunks.is_empty() {
            return Err(super::cv_ingest::CvIngestError::EmptyDocument.into());
        }

        let internals = self.ensure_initialized().await?;
        let embeddings = internals.embedding_service.embed_batch(&chunks).await?;

        for (ordinal, (chunk, embedding)) in chunks.iter().zip(embeddings.iter()).enumerate() {
            self.vector_store
                .insert_chunk(interview_id, ordinal as i64, chunk, embedding)
                .await?;
        }

        self.vector_store.build_index(interview_id).await?;
        Ok(chunks.len())
    }

    /// Retrieve the top-k most relevant CV chunks for a query, scoped to
    /// one interview.
    pub async fn retrieve(
        &self,
        interview_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let internals = self.ensure_initialized().await?;
        let embedding = internals.embedding_service.embed_text(query).await?;
        self.vector_store.search(interview_id, &embedding, k).await
    }

    /// Build a prompt-ready context string from retrieved chunks.
    pub fn build_context(results: &[SearchResult], max_length: usize) -> String {
        Retriever::build_context(results, max_length)
    }

    /// Drop all CV chunks and index state for an interview (§9 RAG scoping).
    pub async fn purge_interview(&self, interview_id: &str) -> Result<()> {
        self.vector_store.purge(interview_id).await
    }

    pub fn has_cv_chunks(&self, interview_id: &str) -> bool {
        self.vector_store.count(interview_id).unwrap_or(0) > 0
    }
}
