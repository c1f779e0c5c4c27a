//! Embedding service using fastembed for text vectorization

use anyhow::{Context, Result};
#[allow(unused_imports)]
use fastembed::{
    InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles, UserDefinedEmbeddingModel,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Dimensionality of the fixed sentence encoder used for CV chunks (§4.2).
pub const EMBEDDING_DIM: usize = 384;

/// Embedding service for converting text to vectors
pub struct EmbeddingService {
    model: Arc<Mutex<TextEmbedding>>,
}

impl EmbeddingService {
    /// Initialize embedding service from local model files
    ///
    /// # Arguments
    /// * `model_dir` - Directory containing model files (onnx/model.onnx, tokenizer.json, etc.)
    pub fn new_from_local(model_dir: PathBuf) -> Result<Self> {
        tracing::info!("initializing embedding model from local files: {:?}", model_dir);

        let onnx_path = model_dir.join("onnx").join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");
        let special_tokens_path = model_dir.join("special_tokens_map.json");
        let tokenizer_config_path = model_dir.join("tokenizer_config.json");

        if !onnx_path.exists() {
            return Err(anyhow::anyhow!("ONNX model file not found: {:?}", onnx_path));
        }
        if !tokenizer_path.exists() {
            return Err(anyhow::anyhow!("tokenizer file not found: {:?}", tokenizer_path));
        }

        let onnx_file =
            std::fs::read(&onnx_path).context(format!("failed to read ONNX file: {:?}", onnx_path))?;
        let tokenizer_file = std::fs::read(&tokenizer_path)
            .context(format!("failed to read tokenizer file: {:?}", tokenizer_path))?;
        let config_file = std::fs::read(&config_path).unwrap_or_else(|_| b"{}".to_vec());
        let special_tokens_file =
            std::fs::read(&special_tokens_path).unwrap_or_else(|_| b"{}".to_vec());
        let tokenizer_config_file =
            std::fs::read(&tokenizer_config_path).unwrap_or_else(|_| b"{}".to_vec());

        let tokenizer_files = TokenizerFiles {
            tokenizer_file,
            config_file,
            special_tokens_map_file: special_tokens_file,
            tokenizer_config_file,
        };

        // CLS pooling matches the BGE-family encoder this service assumes.
        let user_model = UserDefinedEmbeddingModel::new(onnx_file, tokenizer_files)
            .with_pooling(Pooling::Cls);

        let options = InitOptionsUserDefined::new();

        let model = TextEmbedding::try_new_from_user_defined(user_model, options)
            .context("failed to initialize embedding model from local files")?;

        tracing::info!("embedding model initialized from {:?}", model_dir);

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    /// Embed single text into a vector
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut model = self.model.lock().await;
        let embeddings = model
            .embed(vec![text.to_string()], None)
            .context("failed to generate embedding")?;

        embeddings.into_iter().next().context("no embedding generated")
    }

    /// Embed multiple texts in one batch call
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut model = self.model.lock().await;
        let embeddings = model
            .embed(texts.to_vec(), None)
            .context("failed to generate batch embeddings")?;

        Ok(embeddings)
    }
}
