//! Feedback summarizer - renders a query result into one or two
//! sentences of plain language.

use std::sync::Arc;

use crate::ai::{Message, PromptStore, TextGenerator};
use crate::models::QueryOutcome;

/// Fixed reply when the model cannot be reached or answers garbage.
pub const FEEDBACK_FALLBACK: &str = "Could not generate feedback for the result.";

pub struct Summarizer {
    model: Arc<dyn TextGenerator>,
    prompts: Arc<PromptStore>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn TextGenerator>, prompts: Arc<PromptStore>) -> Self {
        Self { model, prompts }
    }

    /// One blocking model call; the text comes back verbatim, trimmed.
    /// Never raises: failures return the fixed fallback string.
    pub async fn summarize(&self, original_sql: &str, outcome: &QueryOutcome) -> String {
        let prompt = self.prompts.summarize_prompt(original_sql, &outcome.render());

        match self.model.generate_text(vec![Message::user(prompt)]).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::error!("Feedback generation failed: {}", e);
                FEEDBACK_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::models::SqlValue;
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

    fn prompts() -> Arc<PromptStore> {
        Arc::new(PromptStore::from_templates(
            "unused",
            "Summarize:\n{query_and_result_context}",
        ))
    }

    #[tokio::test]
    async fn test_summarize_returns_trimmed_model_text() {
        let s = Summarizer::new(
            Arc::new(FixedModel("  there are 7 items in stock \n".to_string())),
            prompts(),
        );
        let outcome = QueryOutcome::Rows {
            columns: vec!["sum".to_string()],
            rows: vec![vec![SqlValue::Integer(7)]],
        };
        let text = s.summarize("SELECT SUM(quantity) FROM products", &outcome).await;
        assert_eq!(text, "there are 7 items in stock");
    }

    #[tokio::test]
    async fn test_summarize_failure_returns_fallback() {
        let s = Summarizer::new(Arc::new(FailingModel), prompts());
        let outcome = QueryOutcome::Affected(0);
        let text = s.summarize("SELECT 1", &outcome).await;
        assert_eq!(text, FEEDBACK_FALLBACK);
    }

    #[tokio::test]
    async fn test_summarize_prompt_carries_query_and_result() {
        let model = Arc::new(RecordingModel {
            reply: "seven".to_string(),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let s = Summarizer::new(model.clone(), prompts());
        let outcome = QueryOutcome::Rows {
            columns: vec!["sum".to_string()],
            rows: vec![vec![SqlValue::Integer(7)]],
        };
        s.summarize("SELECT SUM(quantity) FROM products", &outcome).await;

        let seen = model.seen.lock().unwrap();
        let prompt = &seen[0][0].content;
        assert!(prompt.contains("SELECT SUM(quantity) FROM products"));
        assert!(prompt.contains('7'));
    }
}
