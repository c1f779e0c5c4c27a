//! Per-interview vector index over CV chunks

use anyhow::{Context, Result};
use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::Repository;

/// A single chunk hit returned by a similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: i64,
    pub text: String,
    pub ordinal: i64,
    pub similarity: f32,
}

/// Vector store for CV chunks, namespaced by interview_id.
///
/// Each interview's chunks get their own HNSW index so similarity search
/// never crosses between candidates (§3 RAG Chunk invariant).
pub struct VectorStore {
    repo: Arc<Repository>,
    indices: Mutex<HashMap<String, Arc<Hnsw<'static, f32, DistCosine>>>>,
}

impl VectorStore {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self {
            repo,
            indices: Mutex::new(HashMap::new()),
        }
    }

    /// Persist a chunk + embedding and invalidate the cached index for
    /// this interview so the next search rebuilds it.
    pub async fn insert_chunk(
        &self,
        interview_id: &str,
        ordinal: i64,
        text: &str,
        embedding: &[f32],
    ) -> Result<i64> {
        let id = self.repo.insert_cv_chunk(interview_id, ordinal, text, embedding)?;
        self.indices.lock().await.remove(interview_id);
        Ok(id)
    }

    /// Build (or rebuild) the HNSW index for one interview's chunks.
    pub async fn build_index(&self, interview_id: &str) -> Result<()> {
        let embeddings = self.repo.get_cv_chunk_embeddings(interview_id)?;
        if embeddings.is_empty() {
            self.indices.lock().await.remove(interview_id);
            return Ok(());
        }

        let nb_layer = 16.min((embeddings.len() as f32).ln() as usize).max(1);
        let max_nb_connection = 48;
        let ef_construction = 200;

        let hnsw = Hnsw::<f32, DistCosine>::new(
            max_nb_connection,
            embeddings.len(),
            nb_layer,
            ef_construction,
            DistCosine {},
        );

        for (id, embedding) in &embeddings {
            hnsw.insert((embedding, *id as usize));
        }

        self.indices
            .lock()
            .await
            .insert(interview_id.to_string(), Arc::new(hnsw));

        tracing::debug!(
            interview_id,
            chunk_count = embeddings.len(),
            "built CV chunk index"
        );
        Ok(())
    }

    /// Cosine-similarity search within one interview's chunk namespace.
    pub async fn search(
        &self,
        interview_id: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        {
            let indices = self.indices.lock().await;
            if !indices.contains_key(interview_id) {
                drop(indices);
                self.build_index(interview_id).await?;
            }
        }

        let indices = self.indices.lock().await;
        let hnsw = match indices.get(interview_id) {
            Some(hnsw) => Arc::clone(hnsw),
            None => return Ok(Vec::new()),
        };
        drop(indices);

        let ef_search = (top_k * 2).max(50);
        let neighbors = hnsw.search(embedding, top_k, ef_search);

        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let chunk_id = neighbor.d_id as i64;
            let similarity = 1.0 - neighbor.distance;
            if let Some(chunk) = self
                .repo
                .get_cv_chunk_by_id(chunk_id)
                .context("failed to load chunk for search hit")?
            {
                results.push(SearchResult {
                    chunk_id: chunk.id,
                    text: chunk.text,
                    ordinal: chunk.ordinal,
                    similarity,
                });
            }
        }

        Ok(results)
    }

    /// Drop an interview's chunks and cached index entirely.
    pub async fn purge(&self, interview_id: &str) -> Result<()> {
        self.repo.purge_cv_chunks(interview_id)?;
        self.indices.lock().await.remove(interview_id);
        Ok(())
    }

    pub fn count(&self, interview_id: &str) -> Result<i64> {
        self.repo.count_cv_chunks(interview_id)
    }
}
