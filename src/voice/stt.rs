//! Speech-to-text transcription client, mirroring `llm::client`'s shape
//! (POST to a configured endpoint, parse JSON, map errors) for the
//! provider's OpenAI-compatible `/audio/transcriptions` endpoint.

use anyhow::{Context, Result};
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct SttClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SttClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build STT HTTP client")?;

        Ok(Self {
            api_key: config.stt_api_key.clone(),
            base_url: config.stt_base_url.clone(),
            client,
        })
    }

    pub async fn transcribe(&self, audio_bytes: Vec<u8>, filename: &str) -> Result<String> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let part = multipart::Part::bytes(audio_bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part).text("model", "whisper-1");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .context("failed to send request to STT provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("STT request failed with status {}: {}", status, error_text);
        }

        let transcription: TranscriptionResponse = response.json().await.context("failed to parse STT response")?;
        Ok(transcription.text)
    }
}
