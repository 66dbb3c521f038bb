use std::env;

use crate::error::{Error, Result};
use crate::policy::ExecutionPolicy;

/// Which hosted model API the assistant talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelProvider {
    OpenAi,
    #[default]
    Ollama,
}

/// Voice transcription settings. Present only when transcription is
/// usable (an API key or an explicit endpoint is configured).
#[derive(Clone)]
pub struct TranscriptionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub schema_file: String,
    pub classify_prompt_file: String,
    pub summarize_prompt_file: String,
    pub provider: ModelProvider,
    pub api_key: String,
    pub ai_endpoint: String,
    pub model_name: String,
    pub policy: ExecutionPolicy,
    pub bot_token: Option<String>,
    pub transcription: Option<TranscriptionConfig>,
}

impl Config {
    /// Load everything from the environment once at startup. Any
    /// invalid value is a fatal `Config` error.
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("AI_PROVIDER")
            .unwrap_or_else(|_| "ollama".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => ModelProvider::OpenAi,
            "ollama" => ModelProvider::Ollama,
            other => {
                return Err(Error::Config(format!(
                    "unknown AI_PROVIDER '{}', expected 'openai' or 'ollama'",
                    other
                )));
            }
        };

        let api_key = env::var("API_KEY").unwrap_or_default();
        if provider == ModelProvider::OpenAi && api_key.is_empty() {
            return Err(Error::Config(
                "API_KEY must be set when AI_PROVIDER is 'openai'".to_string(),
            ));
        }

        let ai_endpoint = env::var("AI_ENDPOINT").unwrap_or_else(|_| {
            match provider {
                ModelProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
                ModelProvider::Ollama => "http://localhost:11434",
            }
            .to_string()
        });

        let model_name = env::var("MODEL_NAME").unwrap_or_else(|_| {
            match provider {
                ModelProvider::OpenAi => "gpt-4o-mini",
                ModelProvider::Ollama => "qwen3:4b",
            }
            .to_string()
        });

        let policy = match env::var("QUERY_POLICY") {
            Ok(value) => ExecutionPolicy::from_str(&value).ok_or_else(|| {
                Error::Config(format!(
                    "unknown QUERY_POLICY '{}', expected 'readonly' or 'blocklist'",
                    value
                ))
            })?,
            Err(_) => ExecutionPolicy::default(),
        };

        let bot_token = env::var("BOT_TOKEN").ok().filter(|t| !t.is_empty());

        let transcribe_endpoint = env::var("TRANSCRIBE_ENDPOINT").ok();
        let transcription = if transcribe_endpoint.is_some() || !api_key.is_empty() {
            Some(TranscriptionConfig {
                endpoint: transcribe_endpoint.unwrap_or_else(|| {
                    "https://api.openai.com/v1/audio/transcriptions".to_string()
                }),
                model: env::var("TRANSCRIBE_MODEL").unwrap_or_else(|_| "whisper-1".to_string()),
                api_key: api_key.clone(),
            })
        } else {
            None
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/tabletalk.db".to_string()),
            schema_file: env::var("DB_SCHEMA_FILE").unwrap_or_else(|_| "./schema.sql".to_string()),
            classify_prompt_file: env::var("CLASSIFY_PROMPT_FILE")
                .unwrap_or_else(|_| "./prompts/classify_action.prompt".to_string()),
            summarize_prompt_file: env::var("SUMMARIZE_PROMPT_FILE")
                .unwrap_or_else(|_| "./prompts/summarize_result.prompt".to_string()),
            provider,
            api_key,
            ai_endpoint,
            model_name,
            policy,
            bot_token,
            transcription,
        })
    }
}
