//! Process-wide configuration, loaded once at startup from the environment

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Risk score weights for the proctoring engine's alert levels (§4.5)
#[derive(Debug, Clone, Copy)]
pub struct RiskWeights {
    pub low: f32,
    pub medium: f32,
    pub high: f32,
    pub critical: f32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            low: 1.0,
            medium: 3.0,
            high: 7.0,
            critical: 15.0,
        }
    }
}

/// Process-wide configuration. Constructed once in `main` and shared via
/// `Arc` across every service, matching the teacher's single
/// `SiliconFlowClient::from_env()` construction in `run()`.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,

    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,

    pub stt_base_url: String,
    pub stt_api_key: String,

    pub embedding_model_dir: PathBuf,
    pub face_mesh_model_path: Option<PathBuf>,
    pub object_detection_model_path: Option<PathBuf>,

    pub followup_threshold: f32,
    pub risk_weights: RiskWeights,
    pub risk_normaliser: f32,

    pub allow_degraded_startup: bool,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from environment variables (via `.env` + `std::env`)
    pub fn from_env() -> Result<Self> {
        let llm_api_key = env::var("LLM_API_KEY").context("LLM_API_KEY not set")?;
        let stt_api_key = env::var("STT_API_KEY").unwrap_or_default();

        let followup_threshold: f32 = env_or("FOLLOWUP_THRESHOLD", "85")
            .parse()
            .context("FOLLOWUP_THRESHOLD must be a number")?;

        let risk_normaliser: f32 = env_or("RISK_NORMALISER", "20")
            .parse()
            .context("RISK_NORMALISER must be a number")?;

        let allow_degraded_startup = env_or("ALLOW_DEGRADED_STARTUP", "false")
            .parse()
            .unwrap_or(false);

        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            database_path: env_or("DATABASE_PATH", "intellihire.db"),

            llm_base_url: env_or("LLM_BASE_URL", "https://api.siliconflow.cn/v1"),
            llm_api_key,
            llm_model: env_or("LLM_MODEL", "Qwen/Qwen3-8B"),

            stt_base_url: env_or("STT_BASE_URL", "https://api.siliconflow.cn/v1"),
            stt_api_key,

            embedding_model_dir: PathBuf::from(env_or(
                "EMBEDDING_MODEL_DIR",
                "resources/models/models--Xenova--bge-small-zh-v1.5",
            )),
            face_mesh_model_path: env::var("FACE_MESH_MODEL_PATH").ok().map(PathBuf::from),
            object_detection_model_path: env::var("OBJECT_DETECTION_MODEL_PATH")
                .ok()
                .map(PathBuf::from),

            followup_threshold,
            risk_weights: RiskWeights::default(),
            risk_normaliser,

            allow_degraded_startup,
        })
    }

    /// A config suitable for tests: no real LLM credentials, in-memory DB.
    /// Not `#[cfg(test)]` since the integration suite under `tests/` needs
    /// it too and links against this crate without that cfg applied.
    pub fn for_test() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            database_path: ":memory:".to_string(),
            llm_base_url: "http://localhost:0".to_string(),
            llm_api_key: "test-key".to_string(),
            llm_model: "test-model".to_string(),
            stt_base_url: "http://localhost:0".to_string(),
            stt_api_key: "test-key".to_string(),
            embedding_model_dir: PathBuf::from("resources/models/test"),
            face_mesh_model_path: None,
            object_detection_model_path: None,
            followup_threshold: 85.0,
            risk_weights: RiskWeights::default(),
            risk_normaliser: 20.0,
            allow_degraded_startup: true,
        }
    }
}
