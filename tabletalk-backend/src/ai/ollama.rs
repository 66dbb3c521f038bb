use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ai::{Message, MessageRole};
use crate::error::{Error, Result};

/// Client for a local Ollama server's `/api/generate` endpoint.
/// Non-streaming, temperature 0.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub async fn generate_text(&self, messages: Vec<Message>) -> Result<String> {
        // The generate API takes a single system string and a single
        // prompt string rather than a message list.
        let mut system_parts = Vec::new();
        let mut prompt_parts = Vec::new();
        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(message.content),
                _ => prompt_parts.push(message.content),
            }
        }

        let request = GenerateRequest {
            model: self.model.clone(),
            system: if system_parts.is_empty() {
                None
            } else {
                Some(system_parts.join("\n\n"))
            },
            prompt: prompt_parts.join("\n"),
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        let url = format!("{}/api/generate", self.endpoint);
        log::debug!("[OLLAMA] Sending request to {} with model {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ModelTransport(format!("generate request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ModelTransport(format!(
                "Ollama returned status {}: {}",
                status, body
            )));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::ModelFormat(format!("failed to parse generate response: {}", e)))?;

        Ok(data.response)
    }
}
