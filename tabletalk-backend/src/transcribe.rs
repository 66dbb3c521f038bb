//! Speech-to-text collaborator. The assistant treats its output as
//! ordinary typed text and has no other dependency on it.

use reqwest::{header, multipart, Client};
use serde::Deserialize;
use std::time::Duration;

use crate::config::TranscriptionConfig;
use crate::error::{Error, Result};

/// Client for an OpenAI-compatible `audio/transcriptions` endpoint.
#[derive(Clone)]
pub struct Transcriber {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl Transcriber {
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if !config.api_key.is_empty() {
            let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| Error::Config(format!("invalid API key format: {}", e)))?;
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }

    /// Best-effort transcript of an audio blob.
    pub async fn transcribe(&self, file_name: &str, audio: Vec<u8>) -> Result<String> {
        let part = multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::ModelTransport(format!("transcription request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ModelTransport(format!(
                "transcription API returned status {}: {}",
                status, body
            )));
        }

        let data: TranscriptionResponse = response.json().await.map_err(|e| {
            Error::ModelFormat(format!("failed to parse transcription response: {}", e))
        })?;

        Ok(data.text.trim().to_string())
    }
}
