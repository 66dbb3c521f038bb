//! Query-action classifier - one model call per turn, degrading to a
//! fixed fallback reply on every failure.

use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use crate::ai::{Message, PromptStore, TextGenerator};
use crate::error::Error;
use crate::models::Action;

/// Reply used when the model call or its JSON cannot be used at all.
pub const CLASSIFY_FALLBACK: &str =
    "Sorry, an error occurred while communicating with the AI. Please try again.";

/// Reply used when the model asked for a query but sent no SQL.
pub const INVALID_QUERY_REPLY: &str = "Sorry, I could not generate a valid SQL query.";

/// Reply used when the model sent an action tag we do not know.
pub const UNKNOWN_ACTION_REPLY: &str = "Sorry, I didn't understand the action to be taken.";

/// Loose shape used to recognize an unknown action tag, as opposed to
/// output that is not the contract at all.
#[derive(Deserialize)]
struct RawAction {
    action: String,
    #[serde(default)]
    #[allow(dead_code)]
    payload: String,
}

pub struct ActionClassifier {
    model: Arc<dyn TextGenerator>,
    prompts: Arc<PromptStore>,
    fence_pattern: Regex,
    think_pattern: Regex,
}

impl ActionClassifier {
    pub fn new(model: Arc<dyn TextGenerator>, prompts: Arc<PromptStore>) -> Self {
        Self {
            model,
            prompts,
            fence_pattern: Regex::new(r"```(?:json)?").unwrap(),
            think_pattern: Regex::new(r"(?s)<think>.*?</think>").unwrap(),
        }
    }

    /// Classify one user request into an `Action`. Never returns an
    /// error: transport failures, malformed JSON and empty payloads
    /// all degrade to a `UserMessage` fallback.
    pub async fn classify(&self, user_text: &str, product_context: &str) -> Action {
        if user_text.trim().is_empty() {
            return Action::UserMessage(String::new());
        }

        let system = self.prompts.classify_prompt(product_context);
        let messages = vec![
            Message::system(system),
            Message::user(format!("Request: {}\nResponse:", user_text)),
        ];

        let raw = match self.model.generate_text(messages).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Classification call failed: {}", e);
                return fallback();
            }
        };

        let clean = self.clean_payload(&raw);
        if clean.is_empty() {
            log::warn!("The model returned an empty classification");
            return fallback();
        }

        match serde_json::from_str::<Action>(&clean) {
            Ok(Action::DatabaseQuery(sql)) if sql.trim().is_empty() => {
                log::warn!("The model returned a query action with an empty payload");
                Action::UserMessage(INVALID_QUERY_REPLY.to_string())
            }
            Ok(action) => action,
            Err(decode_err) => {
                // Distinguish an unknown tag from output that is not
                // the contract at all.
                if let Ok(raw_action) = serde_json::from_str::<RawAction>(&clean) {
                    log::warn!("Unknown action received from the model: {}", raw_action.action);
                    return Action::UserMessage(UNKNOWN_ACTION_REPLY.to_string());
                }
                log::error!(
                    "Failed to decode action JSON: {} - raw: {}",
                    Error::ModelFormat(decode_err.to_string()),
                    clean
                );
                fallback()
            }
        }
    }

    /// Strip thinking delimiters and Markdown code fences from the
    /// raw model text.
    fn clean_payload(&self, raw: &str) -> String {
        let without_think = self.think_pattern.replace_all(raw, "");
        let without_think: &str = without_think.as_ref();
        // Some models omit the opening tag; keep only what follows
        // the last closing delimiter.
        let tail = without_think
            .rsplit("</think>")
            .next()
            .unwrap_or(without_think);
        self.fence_pattern.replace_all(tail, "").trim().to_string()
    }
}

fn fallback() -> Action {
    Action::UserMessage(CLASSIFY_FALLBACK.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MessageRole;
    use crate::error::Result;
    use async_trait::async_trait;

    struct FixedModel(String);

    #[async_trait]
    impl TextGenerator for FixedModel {
        async fn generate_text(&self, _messages: Vec<Message>) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl TextGenerator for FailingModel {
        async fn generate_text(&self, _messages: Vec<Message>) -> Result<String> {
            Err(Error::ModelTransport("connection refused".to_string()))
        }
    }

    /// Captures the messages it was called with, for prompt assertions.
    struct RecordingModel {
        reply: String,
        seen: std::sync::Mutex<Vec<Vec<Message>>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingModel {
        async fn generate_text(&self, messages: Vec<Message>) -> Result<String> {
            self.seen.lock().unwrap().push(messages);
            Ok(self.reply.clone())
        }
    }

    fn classifier(model: impl TextGenerator + 'static) -> ActionClassifier {
        let prompts = PromptStore::from_templates(
            "Known products: {product_list}. Respond in JSON.",
            "unused",
        );
        ActionClassifier::new(Arc::new(model), Arc::new(prompts))
    }

    #[tokio::test]
    async fn test_classify_database_query() {
        let c = classifier(FixedModel(
            r#"{"action": "database_query", "payload": "SELECT name FROM products"}"#.to_string(),
        ));
        let action = c.classify("list the products", "apple").await;
        assert_eq!(
            action,
            Action::DatabaseQuery("SELECT name FROM products".to_string())
        );
    }

    #[tokio::test]
    async fn test_classify_strips_markdown_fences() {
        let fenced = "```json\n{\"action\": \"database_query\", \"payload\": \"SELECT 1\"}\n```";
        let bare = r#"{"action": "database_query", "payload": "SELECT 1"}"#;

        let from_fenced = classifier(FixedModel(fenced.to_string()))
            .classify("anything", "apple")
            .await;
        let from_bare = classifier(FixedModel(bare.to_string()))
            .classify("anything", "apple")
            .await;
        assert_eq!(from_fenced, from_bare);
        assert_eq!(from_fenced, Action::DatabaseQuery("SELECT 1".to_string()));
    }

    #[tokio::test]
    async fn test_classify_strips_thinking_delimiters() {
        let raw = "<think>the user wants a count</think>{\"action\": \"database_query\", \"payload\": \"SELECT COUNT(*) FROM products\"}";
        let action = classifier(FixedModel(raw.to_string()))
            .classify("how many products", "apple")
            .await;
        assert_eq!(
            action,
            Action::DatabaseQuery("SELECT COUNT(*) FROM products".to_string())
        );
    }

    #[tokio::test]
    async fn test_classify_handles_unclosed_think_prefix() {
        let raw = "some rambling</think>{\"action\": \"user_message\", \"payload\": \"hi\"}";
        let action = classifier(FixedModel(raw.to_string()))
            .classify("hello", "apple")
            .await;
        assert_eq!(action, Action::UserMessage("hi".to_string()));
    }

    #[tokio::test]
    async fn test_not_json_degrades_to_fallback() {
        let action = classifier(FixedModel("not json".to_string()))
            .classify("anything", "apple")
            .await;
        assert_eq!(action, Action::UserMessage(CLASSIFY_FALLBACK.to_string()));
    }

    #[tokio::test]
    async fn test_transport_error_degrades_to_fallback() {
        let action = classifier(FailingModel).classify("anything", "apple").await;
        assert_eq!(action, Action::UserMessage(CLASSIFY_FALLBACK.to_string()));
    }

    #[tokio::test]
    async fn test_empty_response_degrades_to_fallback() {
        let action = classifier(FixedModel(String::new()))
            .classify("anything", "apple")
            .await;
        assert_eq!(action, Action::UserMessage(CLASSIFY_FALLBACK.to_string()));
    }

    #[tokio::test]
    async fn test_empty_sql_payload_is_invalid_query() {
        let action = classifier(FixedModel(
            r#"{"action": "database_query", "payload": "  "}"#.to_string(),
        ))
        .classify("anything", "apple")
        .await;
        assert_eq!(action, Action::UserMessage(INVALID_QUERY_REPLY.to_string()));
    }

    #[tokio::test]
    async fn test_unknown_action_tag() {
        let action = classifier(FixedModel(
            r#"{"action": "reboot_server", "payload": "now"}"#.to_string(),
        ))
        .classify("anything", "apple")
        .await;
        assert_eq!(action, Action::UserMessage(UNKNOWN_ACTION_REPLY.to_string()));
    }

    #[tokio::test]
    async fn test_empty_user_text_short_circuits() {
        let model = RecordingModel {
            reply: String::new(),
            seen: std::sync::Mutex::new(Vec::new()),
        };
        let c = classifier(model);
        let action = c.classify("   ", "apple").await;
        assert_eq!(action, Action::UserMessage(String::new()));
    }

    #[tokio::test]
    async fn test_context_is_injected_into_system_prompt() {
        let model = Arc::new(RecordingModel {
            reply: r#"{"action": "user_message", "payload": "ok"}"#.to_string(),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let prompts = PromptStore::from_templates(
            "Known products: {product_list}. Respond in JSON.",
            "unused",
        );
        let c = ActionClassifier::new(model.clone(), Arc::new(prompts));
        c.classify("hello", "apple, pear").await;

        let seen = model.seen.lock().unwrap();
        let system = &seen[0][0];
        assert_eq!(system.role, MessageRole::System);
        assert!(system.content.contains("apple, pear"));
        assert!(seen[0][1].content.contains("hello"));
    }
}
