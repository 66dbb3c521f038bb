pub mod classifier;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod summarizer;

pub use classifier::ActionClassifier;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use prompts::PromptStore;
pub use summarizer::Summarizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ModelProvider};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One non-streaming text generation call. The classifier and the
/// summarizer depend on this seam rather than on a concrete client,
/// which is also what the tests mock.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, messages: Vec<Message>) -> Result<String>;
}

/// Unified AI client over the configured provider.
pub enum AiClient {
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

impl AiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.provider {
            ModelProvider::OpenAi => Ok(AiClient::OpenAi(OpenAiClient::new(
                &config.api_key,
                &config.ai_endpoint,
                &config.model_name,
            )?)),
            ModelProvider::Ollama => Ok(AiClient::Ollama(OllamaClient::new(
                &config.ai_endpoint,
                &config.model_name,
            )?)),
        }
    }

    pub async fn generate_text(&self, messages: Vec<Message>) -> Result<String> {
        match self {
            AiClient::OpenAi(client) => client.generate_text(messages).await,
            AiClient::Ollama(client) => client.generate_text(messages).await,
        }
    }
}

#[async_trait]
impl TextGenerator for AiClient {
    async fn generate_text(&self, messages: Vec<Message>) -> Result<String> {
        AiClient::generate_text(self, messages).await
    }
}
